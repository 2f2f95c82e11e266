//! Bounds-checked sample windows over a trace.
use super::CalibrationError;
use nveto_common::Channel;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseWindowError {
    #[error("Expected two comma separated values, found \"{0}\"")]
    Format(String),
    #[error("Invalid sample count: {0}")]
    Int(#[from] ParseIntError),
}

/// Parses text of the form "a,b" into a pair of sample counts.
fn parse_pair(s: &str) -> Result<(usize, usize), ParseWindowError> {
    let (first, second) = s
        .split_once(',')
        .ok_or_else(|| ParseWindowError::Format(s.to_owned()))?;
    Ok((
        first.trim().parse::<usize>()?,
        second.trim().parse::<usize>()?,
    ))
}

/// The closed-open range of sample indices `[lo, hi)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct SampleWindow {
    pub lo: usize,
    pub hi: usize,
}

impl SampleWindow {
    pub const fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    pub fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    pub fn is_empty(&self) -> bool {
        self.lo >= self.hi
    }

    /// Returns the values inside the window.
    ///
    /// Fails with [CalibrationError::InvalidWindow] if the window is empty or inverted,
    /// or extends past the end of `values`.
    /// # Parameters
    /// - values: the trace to take the window of.
    /// - channel: the channel the trace belongs to, used to report failures.
    pub fn slice<'a, T>(
        &self,
        values: &'a [T],
        channel: Channel,
    ) -> Result<&'a [T], CalibrationError> {
        let invalid = || CalibrationError::InvalidWindow {
            channel,
            window: *self,
            len: values.len(),
        };
        if self.is_empty() {
            return Err(invalid());
        }
        values.get(self.lo..self.hi).ok_or_else(invalid)
    }
}

impl Display for SampleWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.lo, self.hi)
    }
}

impl FromStr for SampleWindow {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = parse_pair(s)?;
        Ok(Self { lo, hi })
    }
}

impl From<(usize, usize)> for SampleWindow {
    fn from((lo, hi): (usize, usize)) -> Self {
        Self { lo, hi }
    }
}

impl From<SampleWindow> for (usize, usize) {
    fn from(window: SampleWindow) -> Self {
        (window.lo, window.hi)
    }
}

/// Offsets, in samples, of an integration window from the peak it is anchored to.
///
/// The window covers `[peak - before, peak + after)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct PeakOffsets {
    pub before: usize,
    pub after: usize,
}

impl PeakOffsets {
    pub const fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }
}

impl FromStr for PeakOffsets {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (before, after) = parse_pair(s)?;
        Ok(Self { before, after })
    }
}

impl From<(usize, usize)> for PeakOffsets {
    fn from((before, after): (usize, usize)) -> Self {
        Self { before, after }
    }
}

impl From<PeakOffsets> for (usize, usize) {
    fn from(offsets: PeakOffsets) -> Self {
        (offsets.before, offsets.after)
    }
}
