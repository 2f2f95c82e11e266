use nveto_common::{Channel, FragmentIndex, Intensity, Time, TimeResolution};
use serde::{Deserialize, Serialize};

/// One record of a multi-part waveform capture, as delivered by the digitiser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The channel which recorded the fragment.
    pub channel: Channel,
    /// Position of the fragment within the acquisition window, starting at 0.
    pub fragment_index: FragmentIndex,
    /// Time of the first sample, in ns since the unix epoch.
    pub start_time: Time,
    /// Duration of each sample, in ns.
    pub time_resolution: TimeResolution,
    /// Raw ADC values.
    pub samples: Vec<Intensity>,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
