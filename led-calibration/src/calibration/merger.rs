//! Reassembles the fragments of each channel into a single trace per acquisition window.
use super::{CalibrationError, Fragment, MAX_TRACE_LENGTH, MergedWaveform, ShapeMismatchKind};
use crate::channels::ChannelSelection;
use itertools::Itertools;
use nveto_common::{Channel, FragmentIndex};
use std::collections::HashMap;
use tracing::trace;

/// Merges a batch of fragments into one waveform per channel instance.
///
/// Fragments are grouped by fragment index, and the k-th fragment of a channel with index 0
/// is concatenated with the k-th fragments of the same channel with index 1, 2, ....
/// Waveforms are returned in the order of their index 0 fragments.
/// # Parameters
/// - fragments: the raw fragments of the batch.
/// - channels: fragments of channels outside this selection are discarded before merging.
/// - acq_window_length: the number of samples each merged waveform must have.
#[tracing::instrument(skip_all, fields(num_fragments = fragments.len(), num_waveforms))]
pub fn merge_fragments(
    fragments: &[Fragment],
    channels: &ChannelSelection,
    acq_window_length: usize,
) -> Result<Vec<MergedWaveform>, CalibrationError> {
    let selected = fragments
        .iter()
        .filter(|fragment| channels.contains(fragment.channel))
        .collect::<Vec<_>>();

    let Some(first) = selected.first() else {
        tracing::Span::current().record("num_waveforms", 0);
        return Ok(Vec::new());
    };

    if acq_window_length > MAX_TRACE_LENGTH {
        return Err(CalibrationError::LengthMismatch {
            channel: first.channel,
            expected: MAX_TRACE_LENGTH,
            found: acq_window_length,
        });
    }

    let fragment_length = first.len();
    if let Some(fragment) = selected.iter().find(|f| f.len() != fragment_length) {
        return Err(CalibrationError::ShapeMismatch {
            channel: fragment.channel,
            kind: ShapeMismatchKind::FragmentLength {
                fragment_index: fragment.fragment_index,
                expected: fragment_length,
                found: fragment.len(),
            },
        });
    }

    // Each trace is made of one fragment from each of `acq_window_length / fragment_length` index groups.
    let present_length = selected
        .iter()
        .map(|fragment| fragment.fragment_index as usize + 1)
        .max()
        .unwrap_or_default()
        .saturating_mul(fragment_length);
    let num_groups = acq_window_length
        .checked_div(fragment_length)
        .filter(|num_groups| num_groups * fragment_length == acq_window_length)
        .filter(|_| present_length <= acq_window_length)
        .ok_or(CalibrationError::LengthMismatch {
            channel: first.channel,
            expected: acq_window_length,
            found: present_length,
        })?;

    let groups: HashMap<(Channel, FragmentIndex), Vec<&Fragment>> = selected
        .iter()
        .copied()
        .into_group_map_by(|fragment| (fragment.channel, fragment.fragment_index));

    for channel in selected.iter().map(|fragment| fragment.channel).unique() {
        check_group_counts(&groups, channel, num_groups)?;
    }

    let mut occurrences = HashMap::<Channel, usize>::new();
    let waveforms = selected
        .iter()
        .filter(|fragment| fragment.fragment_index == 0)
        .map(|head| {
            let occurrence = occurrences.entry(head.channel).or_default();
            let waveform = concatenate(&groups, head, *occurrence, num_groups, acq_window_length);
            *occurrence += 1;
            waveform
        })
        .collect::<Result<Vec<_>, _>>()?;

    trace!("Merged {} fragments into {} waveforms", selected.len(), waveforms.len());
    tracing::Span::current().record("num_waveforms", waveforms.len());
    Ok(waveforms)
}

/// Checks that a channel has as many fragments of every index as it has of index 0.
fn check_group_counts(
    groups: &HashMap<(Channel, FragmentIndex), Vec<&Fragment>>,
    channel: Channel,
    num_groups: usize,
) -> Result<(), CalibrationError> {
    let count = |fragment_index: FragmentIndex| {
        groups
            .get(&(channel, fragment_index))
            .map(Vec::len)
            .unwrap_or_default()
    };
    let expected = count(0);
    for fragment_index in (1..num_groups).map(|i| i as FragmentIndex) {
        let found = count(fragment_index);
        if found != expected {
            return Err(CalibrationError::ShapeMismatch {
                channel,
                kind: ShapeMismatchKind::FragmentCount {
                    fragment_index,
                    expected,
                    found,
                },
            });
        }
    }
    Ok(())
}

/// Concatenates the samples of the given occurrence of a channel, in fragment index order.
fn concatenate(
    groups: &HashMap<(Channel, FragmentIndex), Vec<&Fragment>>,
    head: &Fragment,
    occurrence: usize,
    num_groups: usize,
    merged_length: usize,
) -> Result<MergedWaveform, CalibrationError> {
    let mut samples = Vec::with_capacity(merged_length);
    for fragment_index in (0..num_groups).map(|i| i as FragmentIndex) {
        let fragment = groups
            .get(&(head.channel, fragment_index))
            .and_then(|group| group.get(occurrence))
            .ok_or(CalibrationError::ShapeMismatch {
                channel: head.channel,
                kind: ShapeMismatchKind::FragmentCount {
                    fragment_index,
                    expected: occurrence + 1,
                    found: occurrence,
                },
            })?;
        samples.extend_from_slice(&fragment.samples);
    }
    Ok(MergedWaveform {
        channel: head.channel,
        start_time: head.start_time,
        time_resolution: head.time_resolution,
        samples,
    })
}
