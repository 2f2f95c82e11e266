//! Selection of the channels which take part in the calibration.
use nveto_common::{Channel, VETO_CHANNELS};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, num::ParseIntError, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseChannelsError {
    #[error("Invalid channel: {0}")]
    Channel(#[from] ParseIntError),
    #[error("Channel range {0}-{1} is decreasing")]
    DecreasingRange(Channel, Channel),
    #[error("Channel list is empty")]
    Empty,
}

/// The channels whose fragments are calibrated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelSelection {
    /// Every channel present in the batch.
    All,
    /// Only the listed channels. Fragments of other channels are discarded.
    Only(BTreeSet<Channel>),
}

impl ChannelSelection {
    /// Selects the photomultipliers of the neutron veto.
    pub fn veto() -> Self {
        Self::Only(VETO_CHANNELS.collect())
    }

    pub fn contains(&self, channel: Channel) -> bool {
        match self {
            Self::All => true,
            Self::Only(channels) => channels.contains(&channel),
        }
    }
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self::veto()
    }
}

/// Parses either `all`, or a comma separated list of channels and inclusive ranges,
/// e.g. `2000-2009,2015`.
impl FromStr for ChannelSelection {
    type Err = ParseChannelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let mut channels = BTreeSet::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            match item.split_once('-') {
                Some((first, last)) => {
                    let (first, last) = (
                        first.trim().parse::<Channel>()?,
                        last.trim().parse::<Channel>()?,
                    );
                    if first > last {
                        return Err(ParseChannelsError::DecreasingRange(first, last));
                    }
                    channels.extend(first..=last);
                }
                None => {
                    channels.insert(item.parse::<Channel>()?);
                }
            }
        }
        if channels.is_empty() {
            return Err(ParseChannelsError::Empty);
        }
        Ok(Self::Only(channels))
    }
}
