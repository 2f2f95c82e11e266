use crate::simulation_elements::{
    FloatRandomDistribution, Interval, JsonValueError, Noise, NoiseSource, NumConstant,
    PulseEvent, PulseTemplate,
};
use led_calibration::Fragment;
use nveto_common::{Channel, FragmentIndex, Intensity, Time, TimeResolution};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Bernoulli, BernoulliError, Distribution};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

///
/// This struct is created from the configuration JSON file.
///
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Simulation {
    /// The channels which are digitised, inclusive.
    pub(crate) channels: Interval<Channel>,
    /// Number of fragments each acquisition window is split into.
    pub(crate) fragments_per_window: NumConstant<usize>,
    /// Number of samples in each fragment.
    pub(crate) fragment_length: NumConstant<usize>,
    /// Duration of each sample, in ns.
    pub(crate) time_resolution: TimeResolution,
    /// Time between the starts of consecutive acquisition windows, in ns.
    pub(crate) window_period: Time,
    /// Level of the trace when there is no pulse, drawn once per channel and window.
    pub(crate) baseline: FloatRandomDistribution,
    /// Probability that a channel sees the LED pulse in a given window.
    pub(crate) occupancy: f64,
    pub(crate) pulse: PulseTemplate,
    #[serde(default)]
    pub(crate) noises: Vec<NoiseSource>,
}

#[derive(Debug, Error)]
pub(crate) enum SimulationError {
    #[error("Json value error: {0}")]
    JsonValue(#[from] JsonValueError),
    #[error("Invalid occupancy: {0}")]
    Occupancy(#[from] BernoulliError),
}

impl Simulation {
    /// Generates the fragments of the given number of acquisition windows.
    ///
    /// Windows are generated in parallel, the rng of each window is seeded from `seed` and the window index,
    /// so the output is reproducible.
    /// # Parameters
    /// - num_windows: the number of acquisition windows.
    /// - start_time: start time of the first window, in ns since the unix epoch.
    /// - seed: the random seed.
    #[instrument(skip_all, err(level = "error"))]
    pub(crate) fn generate_windows(
        &self,
        num_windows: usize,
        start_time: Time,
        seed: u64,
    ) -> Result<Vec<Vec<Fragment>>, SimulationError> {
        (0..num_windows)
            .into_par_iter()
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                let window_start = start_time + index as Time * self.window_period;
                self.generate_window(window_start, &mut rng)
            })
            .collect()
    }

    /// Generates the fragments of every channel for one acquisition window.
    #[instrument(skip_all, level = "debug", err(level = "error"))]
    pub(crate) fn generate_window<R: Rng>(
        &self,
        start_time: Time,
        rng: &mut R,
    ) -> Result<Vec<Fragment>, SimulationError> {
        let fragments_per_window = self.fragments_per_window.value()?;
        let fragment_length = self.fragment_length.value()?;
        let occupancy = Bernoulli::new(self.occupancy)?;

        let mut fragments = Vec::with_capacity(
            fragments_per_window * self.channels.range_inclusive().len(),
        );
        for channel in self.channels.range_inclusive() {
            let trace = self.generate_trace(
                fragments_per_window * fragment_length,
                occupancy.sample(rng),
                rng,
            )?;
            fragments.extend(
                trace
                    .chunks(fragment_length.max(1))
                    .enumerate()
                    .map(|(index, samples)| Fragment {
                        channel,
                        fragment_index: index as FragmentIndex,
                        start_time: start_time
                            + (index * fragment_length) as Time * self.time_resolution as Time,
                        time_resolution: self.time_resolution,
                        samples: samples.to_vec(),
                    }),
            );
        }
        Ok(fragments)
    }

    /// Generates the samples of one channel, with the pulse going below the baseline.
    fn generate_trace<R: Rng>(
        &self,
        length: usize,
        pulsed: bool,
        rng: &mut R,
    ) -> Result<Vec<Intensity>, SimulationError> {
        let baseline = self.baseline.sample(rng)?;
        let pulse = pulsed
            .then(|| PulseEvent::sample(&self.pulse, rng))
            .transpose()?;
        let mut noises = self.noises.iter().map(Noise::new).collect::<Vec<_>>();

        (0..length)
            .map(|time| -> Result<Intensity, SimulationError> {
                let depth = pulse
                    .as_ref()
                    .map(|pulse| pulse.get_value_at(time as f64))
                    .unwrap_or_default();
                let value = noises
                    .iter_mut()
                    .try_fold(baseline - depth, |value, noise| noise.noisify(value, rng))?;
                Ok(value
                    .round()
                    .clamp(Intensity::MIN as f64, Intensity::MAX as f64) as Intensity)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use led_calibration::{CalibrationSettings, ChannelSelection, compute};

    const CONFIG: &str = r#"{
        "channels": { "min": 2000, "max": 2003 },
        "fragments-per-window": { "const": 2 },
        "fragment-length": { "const": 165 },
        "time-resolution": 2,
        "window-period": 1000000,
        "baseline": { "random-type": "constant-float", "value": { "const": 15000.0 } },
        "occupancy": 1.0,
        "pulse": {
            "pulse-type": "gaussian",
            "height": { "random-type": "constant-float", "value": { "const": 40.0 } },
            "peak-time": { "random-type": "constant-float", "value": { "const": 150.0 } },
            "sd": { "random-type": "constant-float", "value": { "const": 3.0 } }
        }
    }"#;

    fn simulation() -> Simulation {
        serde_json::from_str(CONFIG).unwrap()
    }

    #[test]
    fn window_shape() {
        let fragments = simulation()
            .generate_window(1_000, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(fragments.len(), 8);
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment.channel, 2000 + (i / 2) as Channel);
            assert_eq!(fragment.fragment_index, (i % 2) as FragmentIndex);
            assert_eq!(fragment.len(), 165);
            assert_eq!(fragment.start_time, 1_000 + 330 * (i % 2) as Time);
            assert_eq!(fragment.time_resolution, 2);
        }
    }

    #[test]
    fn zero_occupancy_is_flat() {
        let simulation = Simulation {
            occupancy: 0.0,
            ..simulation()
        };
        let fragments = simulation
            .generate_window(0, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(
            fragments
                .iter()
                .all(|fragment| fragment.samples.iter().all(|&v| v == 15000))
        );
    }

    #[test]
    fn invalid_occupancy() {
        let simulation = Simulation {
            occupancy: 1.5,
            ..simulation()
        };
        assert!(matches!(
            simulation.generate_window(0, &mut StdRng::seed_from_u64(0)),
            Err(SimulationError::Occupancy(_))
        ));
    }

    #[test]
    fn windows_are_reproducible() {
        let simulation = Simulation {
            occupancy: 0.5,
            ..simulation()
        };
        let first = simulation.generate_windows(3, 0, 42).unwrap();
        let second = simulation.generate_windows(3, 0, 42).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[2][0].start_time, 2_000_000);
    }

    #[test]
    fn calibration_of_simulated_windows() {
        let settings = CalibrationSettings {
            channels: ChannelSelection::All,
            acq_window_length: 330,
            ..Default::default()
        };
        for fragments in simulation().generate_windows(2, 0, 7).unwrap() {
            let records = compute(&fragments, &settings).unwrap();
            assert_eq!(records.len(), 4);
            for record in records {
                assert_approx_eq!(record.amplitude_led, 40.0);
                assert_eq!(record.signal_time, 150);
                assert_eq!(record.length, 330);
                // The integral of the gaussian is 40 × 3 × √(2π), less the rounding of each sample.
                assert_approx_eq!(record.area, 300.8, 5.0);
                assert_approx_eq!(record.amplitude_noise, 0.0);
            }
        }
    }
}
