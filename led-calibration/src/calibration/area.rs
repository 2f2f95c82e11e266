//! Integrates each signal over a window.
//!
//! The window is normally anchored at the LED peak, see [integrate_around_peak].
//! Integration over a fixed window is kept for compatibility with older calibration runs.
use super::{
    AmplitudeFeature, AreaFeature, CalibrationError, PeakOffsets, Real, SampleWindow, Signal,
};

/// Sums the signal over the window.
pub fn integrate(signal: &Signal, window: SampleWindow) -> Result<AreaFeature, CalibrationError> {
    let area = window
        .slice(&signal.values, signal.channel)?
        .iter()
        .sum::<Real>();
    Ok(AreaFeature {
        channel: signal.channel,
        area,
        window,
    })
}

/// Returns the window `[peak - before, peak + after)`, clipped to the bounds of the trace.
/// # Parameters
/// - peak: the index of the peak.
/// - offsets: the extent of the window on either side of the peak.
/// - len: the length of the trace.
pub fn peak_anchored_window(peak: usize, offsets: PeakOffsets, len: usize) -> SampleWindow {
    SampleWindow::new(
        peak.saturating_sub(offsets.before).min(len),
        peak.saturating_add(offsets.after).min(len),
    )
}

/// Sums the signal over a window anchored at the peak found by the amplitude extractor.
pub fn integrate_around_peak(
    signal: &Signal,
    peak: &AmplitudeFeature,
    offsets: PeakOffsets,
) -> Result<AreaFeature, CalibrationError> {
    if peak.channel != signal.channel {
        return Err(CalibrationError::ChannelMismatch {
            channel: signal.channel,
            present: "signal",
            absent: "peak",
        });
    }
    integrate(
        signal,
        peak_anchored_window(peak.index, offsets, signal.len()),
    )
}

/// Applies [integrate_around_peak] to each signal and its peak.
#[tracing::instrument(skip_all, level = "debug", fields(num_signals = signals.len()))]
pub fn integrate_around_peaks(
    signals: &[Signal],
    peaks: &[AmplitudeFeature],
    offsets: PeakOffsets,
) -> Result<Vec<AreaFeature>, CalibrationError> {
    if let Some(signal) = signals.get(peaks.len()) {
        return Err(CalibrationError::ChannelMismatch {
            channel: signal.channel,
            present: "signal",
            absent: "peak",
        });
    }
    if let Some(peak) = peaks.get(signals.len()) {
        return Err(CalibrationError::ChannelMismatch {
            channel: peak.channel,
            present: "peak",
            absent: "signal",
        });
    }
    signals
        .iter()
        .zip(peaks)
        .map(|(signal, peak)| integrate_around_peak(signal, peak, offsets))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn signal(values: Vec<Real>) -> Signal {
        Signal { channel: 7, values }
    }

    fn peak(index: usize) -> AmplitudeFeature {
        AmplitudeFeature {
            channel: 7,
            amplitude: 0.0,
            index,
        }
    }

    #[test]
    fn sum_over_window() {
        let data = (0..10).map(|v| v as Real).collect::<Vec<_>>();
        let feature = integrate(&signal(data.clone()), SampleWindow::new(3, 7)).unwrap();
        assert_approx_eq!(feature.area, data[3..7].iter().sum::<Real>());
        assert_approx_eq!(feature.area, 18.0);
        assert_eq!(feature.window, SampleWindow::new(3, 7));
    }

    #[test]
    fn empty_window_is_invalid() {
        let window = SampleWindow::new(4, 4);
        assert_eq!(
            integrate(&signal(vec![1.0; 10]), window),
            Err(CalibrationError::InvalidWindow {
                channel: 7,
                window,
                len: 10
            })
        );
    }

    #[test]
    fn anchored_window_inside_trace() {
        assert_eq!(
            peak_anchored_window(150, PeakOffsets::new(10, 20), 330),
            SampleWindow::new(140, 170)
        );
    }

    #[test]
    fn anchored_window_clips_at_start() {
        assert_eq!(
            peak_anchored_window(3, PeakOffsets::new(10, 20), 330),
            SampleWindow::new(0, 23)
        );
        assert_eq!(
            peak_anchored_window(0, PeakOffsets::new(10, 20), 330),
            SampleWindow::new(0, 20)
        );
    }

    #[test]
    fn anchored_window_clips_at_end() {
        assert_eq!(
            peak_anchored_window(325, PeakOffsets::new(10, 20), 330),
            SampleWindow::new(315, 330)
        );
        assert_eq!(
            peak_anchored_window(329, PeakOffsets::new(10, usize::MAX), 330),
            SampleWindow::new(319, 330)
        );
    }

    #[test]
    fn integrate_near_trace_edges() {
        let data = vec![1.0; 30];
        let start = integrate_around_peak(&signal(data.clone()), &peak(2), PeakOffsets::new(5, 5))
            .unwrap();
        assert_eq!(start.window, SampleWindow::new(0, 7));
        assert_approx_eq!(start.area, 7.0);

        let end = integrate_around_peak(&signal(data), &peak(28), PeakOffsets::new(5, 5)).unwrap();
        assert_eq!(end.window, SampleWindow::new(23, 30));
        assert_approx_eq!(end.area, 7.0);
    }

    #[test]
    fn zero_offsets_are_invalid() {
        assert!(matches!(
            integrate_around_peak(&signal(vec![1.0; 30]), &peak(10), PeakOffsets::new(0, 0)),
            Err(CalibrationError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn peak_of_other_channel() {
        let other = AmplitudeFeature {
            channel: 8,
            amplitude: 1.0,
            index: 1,
        };
        assert!(matches!(
            integrate_around_peak(&signal(vec![1.0; 3]), &other, PeakOffsets::new(1, 1)),
            Err(CalibrationError::ChannelMismatch { channel: 7, .. })
        ));
    }

    #[test]
    fn unpaired_signals() {
        let signals = [signal(vec![1.0; 3]), signal(vec![1.0; 3])];
        assert!(matches!(
            integrate_around_peaks(&signals, &[peak(1)], PeakOffsets::new(1, 1)),
            Err(CalibrationError::ChannelMismatch { absent: "peak", .. })
        ));
        let areas = integrate_around_peaks(&signals, &[peak(1), peak(0)], PeakOffsets::new(1, 1))
            .unwrap();
        assert_eq!(areas.len(), 2);
        assert_approx_eq!(areas[1].area, 1.0);
    }
}
