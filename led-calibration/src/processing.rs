//! Runs the calibration stages over one batch of fragments.
use crate::{
    calibration::{
        AreaFeature, CalibrationError, Fragment, LedCalibrationRecord, estimate_baselines,
        extract_amplitudes, integrate, integrate_around_peaks, merge_fragments, normalize,
    },
    parameters::{CalibrationSettings, IntegrationMode},
};
use metrics::counter;
use nveto_common::metrics::{
    failures,
    names::{BATCHES_PROCESSED, FAILURES, RECORDS_PRODUCED},
};
use tracing::debug;

/// Computes one [LedCalibrationRecord] per channel instance in the batch.
///
/// The batch should contain the fragments of a single acquisition window.
/// If any stage fails the whole batch is rejected, and no records are returned.
/// # Parameters
/// - fragments: the raw fragments of the batch, in any order.
/// - settings: the windows, channels and acquisition length to use.
#[tracing::instrument(
    skip_all,
    fields(num_fragments = fragments.len(), num_records),
    err(level = "warn")
)]
pub fn compute(
    fragments: &[Fragment],
    settings: &CalibrationSettings,
) -> Result<Vec<LedCalibrationRecord>, CalibrationError> {
    match compute_records(fragments, settings) {
        Ok(records) => {
            tracing::Span::current().record("num_records", records.len());
            counter!(BATCHES_PROCESSED).increment(1);
            counter!(RECORDS_PRODUCED).increment(records.len() as u64);
            Ok(records)
        }
        Err(e) => {
            counter!(FAILURES, &[failures::get_label(e.failure_kind())]).increment(1);
            Err(e)
        }
    }
}

fn compute_records(
    fragments: &[Fragment],
    settings: &CalibrationSettings,
) -> Result<Vec<LedCalibrationRecord>, CalibrationError> {
    let waveforms = merge_fragments(fragments, &settings.channels, settings.acq_window_length)?;
    let baselines = estimate_baselines(&waveforms, settings.baseline_window)?;
    let signals = normalize(&waveforms, &baselines)?;

    let led = extract_amplitudes(&signals, settings.led_window)?;
    let noise = extract_amplitudes(&signals, settings.noise_window)?;
    let areas = match settings.integration_mode {
        IntegrationMode::PeakAnchored => {
            integrate_around_peaks(&signals, &led, settings.integration_window)?
        }
        IntegrationMode::Fixed => signals
            .iter()
            .map(|signal| integrate(signal, settings.fixed_integration_window))
            .collect::<Result<Vec<AreaFeature>, _>>()?,
    };
    debug!("Extracted features of {} waveforms", waveforms.len());

    waveforms
        .iter()
        .zip(&areas)
        .zip(led.iter().zip(&noise))
        .map(|((waveform, area), (led, noise))| {
            LedCalibrationRecord::new(waveform, area, led, noise)
        })
        .collect()
}
