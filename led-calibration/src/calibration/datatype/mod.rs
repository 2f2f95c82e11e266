//! Records passed between the calibration stages.
mod features;
mod fragment;
mod waveform;

pub use features::{AmplitudeFeature, AreaFeature, LedCalibrationRecord, MAX_TRACE_LENGTH};
pub use fragment::Fragment;
pub use waveform::{Baseline, MergedWaveform, Signal};
