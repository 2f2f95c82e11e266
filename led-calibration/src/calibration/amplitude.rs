//! Locates the peak of each signal within a window.
use super::{AmplitudeFeature, CalibrationError, Real, SampleWindow, Signal};

/// Finds the maximum of the signal within the window.
///
/// Ties resolve to the first sample attaining the maximum.
/// The returned index is relative to the start of the trace, not the window.
/// # Parameters
/// - signal: the baseline subtracted and inverted trace.
/// - window: the region in which the pulse is expected.
pub fn extract_amplitude(
    signal: &Signal,
    window: SampleWindow,
) -> Result<AmplitudeFeature, CalibrationError> {
    let values = window.slice(&signal.values, signal.channel)?;
    let (offset, amplitude) = values.iter().copied().enumerate().fold(
        (0, Real::NEG_INFINITY),
        |(best_offset, best), (offset, value)| {
            if value > best {
                (offset, value)
            } else {
                (best_offset, best)
            }
        },
    );
    Ok(AmplitudeFeature {
        channel: signal.channel,
        amplitude,
        index: window.lo + offset,
    })
}

/// Applies [extract_amplitude] to every signal, preserving their order.
#[tracing::instrument(skip_all, level = "debug", fields(num_signals = signals.len(), %window))]
pub fn extract_amplitudes(
    signals: &[Signal],
    window: SampleWindow,
) -> Result<Vec<AmplitudeFeature>, CalibrationError> {
    signals
        .iter()
        .map(|signal| extract_amplitude(signal, window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(values: Vec<Real>) -> Signal {
        Signal { channel: 2001, values }
    }

    #[test]
    fn first_maximum() {
        let feature =
            extract_amplitude(&signal(vec![1.0, 5.0, 5.0, 2.0]), SampleWindow::new(0, 4)).unwrap();
        assert_eq!(feature.amplitude, 5.0);
        assert_eq!(feature.index, 1);
    }

    #[test]
    fn index_is_relative_to_trace() {
        let data = vec![9.0, 0.0, 1.0, 3.0, 2.0, 3.0, 8.0];
        let feature = extract_amplitude(&signal(data), SampleWindow::new(1, 6)).unwrap();
        assert_eq!(feature.channel, 2001);
        assert_eq!(feature.amplitude, 3.0);
        assert_eq!(feature.index, 3);
    }

    #[test]
    fn negative_signal() {
        let data = vec![-4.0, -2.5, -3.0];
        let feature = extract_amplitude(&signal(data), SampleWindow::new(0, 3)).unwrap();
        assert_eq!(feature.amplitude, -2.5);
        assert_eq!(feature.index, 1);
    }

    #[test]
    fn window_past_end_of_trace() {
        let window = SampleWindow::new(120, 220);
        assert_eq!(
            extract_amplitude(&signal(vec![0.0; 200]), window),
            Err(CalibrationError::InvalidWindow {
                channel: 2001,
                window,
                len: 200
            })
        );
    }

    #[test]
    fn every_signal_is_processed() {
        let signals = [signal(vec![0.0, 1.0]), signal(vec![2.0, 0.0])];
        let features = extract_amplitudes(&signals, SampleWindow::new(0, 2)).unwrap();
        assert_eq!(
            features.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![1, 0]
        );
    }
}
