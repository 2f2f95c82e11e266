use super::MergedWaveform;
use crate::calibration::{CalibrationError, Real, SampleWindow};
use nveto_common::{Channel, Time, TimeResolution};
use serde::{Deserialize, Serialize};

/// The maximum of a signal within a window.
#[derive(Clone, Debug, PartialEq)]
pub struct AmplitudeFeature {
    pub channel: Channel,
    /// The maximum value.
    pub amplitude: Real,
    /// Index of the first sample attaining the maximum, relative to the start of the trace.
    pub index: usize,
}

/// The integral of a signal over a window.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaFeature {
    pub channel: Channel,
    /// Sum of the signal, in ADC counts × samples.
    pub area: Real,
    /// The window which was integrated over.
    pub window: SampleWindow,
}

/// The longest trace whose length and peak index fit in a [LedCalibrationRecord].
pub const MAX_TRACE_LENGTH: usize = i32::MAX as usize;

/// One row of output, describing the LED response of one channel in one acquisition window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedCalibrationRecord {
    pub channel: Channel,
    /// Start time of the acquisition window, in ns since the unix epoch.
    pub start_time: Time,
    /// Duration of each sample, in ns.
    pub time_resolution: TimeResolution,
    /// Length of the merged trace, in samples.
    pub length: i32,
    /// Area of the pulse, integrated around its peak.
    pub area: f32,
    /// Amplitude in the LED window.
    pub amplitude_led: f32,
    /// Amplitude in the noise window, far from the LED pulse.
    pub amplitude_noise: f32,
    /// Sample of the LED peak, relative to the start of the trace.
    pub signal_time: i32,
}

impl LedCalibrationRecord {
    /// Assembles a record from the features of one channel instance.
    ///
    /// Fails with [CalibrationError::LengthMismatch] if the trace is longer than [MAX_TRACE_LENGTH].
    pub fn new(
        waveform: &MergedWaveform,
        area: &AreaFeature,
        led: &AmplitudeFeature,
        noise: &AmplitudeFeature,
    ) -> Result<Self, CalibrationError> {
        let too_long = |_| CalibrationError::LengthMismatch {
            channel: waveform.channel,
            expected: MAX_TRACE_LENGTH,
            found: waveform.len(),
        };
        Ok(Self {
            channel: waveform.channel,
            start_time: waveform.start_time,
            time_resolution: waveform.time_resolution,
            length: i32::try_from(waveform.len()).map_err(too_long)?,
            area: area.area as f32,
            amplitude_led: led.amplitude as f32,
            amplitude_noise: noise.amplitude as f32,
            signal_time: i32::try_from(led.index).map_err(too_long)?,
        })
    }
}
