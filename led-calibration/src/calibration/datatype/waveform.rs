use crate::calibration::Real;
use nveto_common::{Channel, Intensity, Time, TimeResolution};

/// The full trace of one channel over an acquisition window.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedWaveform {
    pub channel: Channel,
    /// Start time of the first fragment, in ns since the unix epoch.
    pub start_time: Time,
    /// Duration of each sample, in ns.
    pub time_resolution: TimeResolution,
    /// Samples of all fragments, concatenated in fragment index order.
    pub samples: Vec<Intensity>,
}

impl MergedWaveform {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The pre-pulse level of a channel's trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Baseline {
    pub channel: Channel,
    /// The arithmetic mean of the baseline window.
    pub mean: Real,
    /// The standard error of the mean.
    pub stderr: Real,
}

/// A baseline subtracted and inverted trace, in which pulses are positive-going.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub channel: Channel,
    pub values: Vec<Real>,
}

impl Signal {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
