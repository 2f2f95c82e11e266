//! Stages which turn raw digitiser fragments into LED calibration features.
//!
//! Each stage is a pure function over immutable records, so a typical batch reads:
//! ```ignore
//!     let waveforms = merge_fragments(&fragments, &channels, acq_window_length)?;
//!     let baselines = estimate_baselines(&waveforms, baseline_window)?;
//!     let signals = normalize(&waveforms, &baselines)?;
//!     let amplitudes = extract_amplitudes(&signals, led_window)?;
//!     let areas = integrate_around_peaks(&signals, &amplitudes, offsets)?;
//! ```
pub(crate) mod amplitude;
pub(crate) mod area;
pub(crate) mod baseline;
pub(crate) mod datatype;
pub(crate) mod error;
pub(crate) mod merger;
pub(crate) mod normalizer;
pub(crate) mod window;

pub use amplitude::{extract_amplitude, extract_amplitudes};
pub use area::{integrate, integrate_around_peak, integrate_around_peaks, peak_anchored_window};
pub use baseline::{estimate_baseline, estimate_baselines};
pub use datatype::{
    AmplitudeFeature, AreaFeature, Baseline, Fragment, LedCalibrationRecord, MAX_TRACE_LENGTH,
    MergedWaveform, Signal,
};
pub use error::{CalibrationError, ShapeMismatchKind};
pub use merger::merge_fragments;
pub use normalizer::normalize;
pub use window::{ParseWindowError, PeakOffsets, SampleWindow};

pub type Real = f64;
