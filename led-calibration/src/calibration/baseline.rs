//! Estimates the pre-pulse level of each trace.
use super::{Baseline, CalibrationError, MergedWaveform, Real, SampleWindow};

/// Computes the mean and standard error of the mean of the samples within the window.
/// # Parameters
/// - waveform: the merged trace.
/// - window: the pre-signal window, which should not contain any pulse.
pub fn estimate_baseline(
    waveform: &MergedWaveform,
    window: SampleWindow,
) -> Result<Baseline, CalibrationError> {
    let samples = window.slice(&waveform.samples, waveform.channel)?;
    let count = window.len() as Real;
    let mean = samples.iter().map(|&v| v as Real).sum::<Real>() / count;
    let variance = samples
        .iter()
        .map(|&v| (v as Real - mean).powi(2))
        .sum::<Real>()
        / count;
    Ok(Baseline {
        channel: waveform.channel,
        mean,
        stderr: variance.sqrt() / count.sqrt(),
    })
}

/// Applies [estimate_baseline] to every waveform, preserving their order.
#[tracing::instrument(skip_all, level = "debug", fields(num_waveforms = waveforms.len(), %window))]
pub fn estimate_baselines(
    waveforms: &[MergedWaveform],
    window: SampleWindow,
) -> Result<Vec<Baseline>, CalibrationError> {
    waveforms
        .iter()
        .map(|waveform| estimate_baseline(waveform, window))
        .collect()
}
