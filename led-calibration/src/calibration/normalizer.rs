//! Subtracts the baseline from each trace and inverts it.
use super::{Baseline, CalibrationError, MergedWaveform, Real, Signal};
use nveto_common::Channel;
use std::collections::{HashMap, VecDeque};

/// Returns `-(v - baseline)` for each sample `v`, so that negative-going pulses become positive.
pub fn invert(waveform: &MergedWaveform, baseline: Real) -> Signal {
    Signal {
        channel: waveform.channel,
        values: waveform
            .samples
            .iter()
            .map(|&v| -(v as Real - baseline))
            .collect(),
    }
}

/// Pairs each waveform with the baseline of its channel, and produces its [Signal].
///
/// When a channel occurs more than once, its waveforms and baselines are paired in order.
/// Fails with [CalibrationError::ChannelMismatch] if a channel has a waveform but no baseline,
/// or a baseline but no waveform.
#[tracing::instrument(skip_all, level = "debug", fields(num_waveforms = waveforms.len()))]
pub fn normalize(
    waveforms: &[MergedWaveform],
    baselines: &[Baseline],
) -> Result<Vec<Signal>, CalibrationError> {
    let mut by_channel = HashMap::<Channel, VecDeque<&Baseline>>::new();
    for baseline in baselines {
        by_channel
            .entry(baseline.channel)
            .or_default()
            .push_back(baseline);
    }

    let signals = waveforms
        .iter()
        .map(|waveform| {
            by_channel
                .get_mut(&waveform.channel)
                .and_then(VecDeque::pop_front)
                .map(|baseline| invert(waveform, baseline.mean))
                .ok_or(CalibrationError::ChannelMismatch {
                    channel: waveform.channel,
                    present: "waveform",
                    absent: "baseline",
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(unused) = baselines
        .iter()
        .find(|baseline| by_channel.get(&baseline.channel).is_some_and(|q| !q.is_empty()))
    {
        return Err(CalibrationError::ChannelMismatch {
            channel: unused.channel,
            present: "baseline",
            absent: "waveform",
        });
    }
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nveto_common::Intensity;

    fn waveform(channel: Channel, samples: Vec<Intensity>) -> MergedWaveform {
        MergedWaveform {
            channel,
            start_time: 0,
            time_resolution: 2,
            samples,
        }
    }

    fn baseline(channel: Channel, mean: Real) -> Baseline {
        Baseline {
            channel,
            mean,
            stderr: 0.0,
        }
    }

    #[test]
    fn subtracts_and_inverts_every_sample() {
        let waveforms = [
            waveform(1, vec![100, 90, 50, 101, 100]),
            waveform(2, vec![-3, 0, 7]),
        ];
        let baselines = [baseline(2, 0.5), baseline(1, 100.25)];
        let signals = normalize(&waveforms, &baselines).unwrap();
        assert_eq!(signals.len(), 2);
        for (signal, (waveform, mean)) in signals.iter().zip(waveforms.iter().zip([100.25, 0.5])) {
            assert_eq!(signal.channel, waveform.channel);
            assert_eq!(signal.len(), waveform.len());
            for (s, &w) in signal.values.iter().zip(&waveform.samples) {
                assert_eq!(*s, -(w as Real - mean));
            }
        }
        assert_eq!(signals[0].values, vec![0.25, 10.25, 50.25, -0.75, 0.25]);
    }

    #[test]
    fn repeated_channels_pair_in_order() {
        let waveforms = [waveform(1, vec![10]), waveform(1, vec![10])];
        let baselines = [baseline(1, 10.0), baseline(1, 20.0)];
        let signals = normalize(&waveforms, &baselines).unwrap();
        assert_eq!(signals[0].values, vec![0.0]);
        assert_eq!(signals[1].values, vec![10.0]);
    }

    #[test]
    fn waveform_without_baseline() {
        let waveforms = [waveform(1, vec![0]), waveform(2, vec![0])];
        let baselines = [baseline(1, 0.0)];
        assert_eq!(
            normalize(&waveforms, &baselines),
            Err(CalibrationError::ChannelMismatch {
                channel: 2,
                present: "waveform",
                absent: "baseline"
            })
        );
    }

    #[test]
    fn baseline_without_waveform() {
        let waveforms = [waveform(1, vec![0])];
        let baselines = [baseline(1, 0.0), baseline(3, 0.0)];
        assert_eq!(
            normalize(&waveforms, &baselines),
            Err(CalibrationError::ChannelMismatch {
                channel: 3,
                present: "baseline",
                absent: "waveform"
            })
        );
    }
}
