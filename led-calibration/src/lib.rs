//! # LED Calibration
//!
//! Computes the calibration quantities of the neutron veto photomultipliers from an LED pulser run.
//! For each batch of raw fragments (one acquisition window) the component:
//! * Reassembles the fragments of each channel into a single trace.
//! * Estimates the baseline of the trace in a pre-signal window.
//! * Subtracts the baseline and inverts the trace, so that pulses are positive-going.
//! * Extracts the LED amplitude, its sample index, and the pulse area integrated around it.
//!
pub mod calibration;
pub mod channels;
pub mod parameters;
pub mod processing;

pub use calibration::{
    CalibrationError, Fragment, LedCalibrationRecord, PeakOffsets, Real, SampleWindow,
};
pub use channels::ChannelSelection;
pub use parameters::{CalibrationSettings, IntegrationMode};
pub use processing::compute;
