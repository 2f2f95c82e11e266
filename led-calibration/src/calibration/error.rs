//! Failures which abort the processing of a batch.
use super::SampleWindow;
use nveto_common::{Channel, FragmentIndex, metrics::failures::FailureKind};
use thiserror::Error;

/// Describes how a channel's fragments fail to line up.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ShapeMismatchKind {
    #[error("{found} fragment(s) with index {fragment_index}, but {expected} with index 0")]
    FragmentCount {
        fragment_index: FragmentIndex,
        expected: usize,
        found: usize,
    },
    #[error("fragment with index {fragment_index} has {found} samples, expected {expected}")]
    FragmentLength {
        fragment_index: FragmentIndex,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("Channel {channel}: {kind}")]
    ShapeMismatch {
        channel: Channel,
        kind: ShapeMismatchKind,
    },
    #[error("Channel {channel}: merged trace has {found} samples, expected {expected}")]
    LengthMismatch {
        channel: Channel,
        expected: usize,
        found: usize,
    },
    #[error("Channel {channel} has a {present} but no {absent}")]
    ChannelMismatch {
        channel: Channel,
        present: &'static str,
        absent: &'static str,
    },
    #[error("Channel {channel}: window {window} is invalid for a trace of {len} samples")]
    InvalidWindow {
        channel: Channel,
        window: SampleWindow,
        len: usize,
    },
}

impl CalibrationError {
    pub fn channel(&self) -> Channel {
        match self {
            Self::ShapeMismatch { channel, .. }
            | Self::LengthMismatch { channel, .. }
            | Self::ChannelMismatch { channel, .. }
            | Self::InvalidWindow { channel, .. } => *channel,
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::ShapeMismatch { .. } => FailureKind::ShapeMismatch,
            Self::LengthMismatch { .. } => FailureKind::LengthMismatch,
            Self::ChannelMismatch { .. } => FailureKind::ChannelMismatch,
            Self::InvalidWindow { .. } => FailureKind::InvalidWindow,
        }
    }
}
