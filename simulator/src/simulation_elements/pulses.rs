use super::{FloatRandomDistribution, utils::JsonValueError};
use rand::Rng;
use serde::Deserialize;

/// Describes the shape of the LED pulse, with times in samples from the start of the acquisition window.
///
/// Heights are the depth of the pulse below the baseline, in ADC counts.
#[derive(Debug, Deserialize, Clone)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "pulse-type"
)]
pub(crate) enum PulseTemplate {
    Flat {
        start: FloatRandomDistribution,
        width: FloatRandomDistribution,
        height: FloatRandomDistribution,
    },
    Triangular {
        start: FloatRandomDistribution,
        /// Position of the peak, as a fraction of the width.
        peak_time: FloatRandomDistribution,
        width: FloatRandomDistribution,
        height: FloatRandomDistribution,
    },
    Gaussian {
        height: FloatRandomDistribution,
        peak_time: FloatRandomDistribution,
        sd: FloatRandomDistribution,
    },
}

/// Number of standard deviations either side of the mean beyond which a gaussian pulse is zero.
const GAUSSIAN_EXTENT: f64 = 5.0;

#[derive(Debug)]
pub(crate) enum PulseEvent {
    Flat {
        start: f64,
        stop: f64,
        amplitude: f64,
    },
    Triangular {
        start: f64,
        peak_time: f64,
        stop: f64,
        amplitude: f64,
    },
    Gaussian {
        start: f64,
        stop: f64,
        mean: f64,
        sd: f64,
        peak_amplitude: f64,
    },
}

impl PulseEvent {
    pub(crate) fn sample<R: Rng>(
        template: &PulseTemplate,
        rng: &mut R,
    ) -> Result<Self, JsonValueError> {
        match template {
            PulseTemplate::Flat {
                start,
                width,
                height,
            } => {
                let start = start.sample(rng)?;
                Ok(Self::Flat {
                    start,
                    stop: start + width.sample(rng)?,
                    amplitude: height.sample(rng)?,
                })
            }
            PulseTemplate::Triangular {
                start,
                peak_time,
                width,
                height,
            } => {
                let start = start.sample(rng)?;
                let width = width.sample(rng)?;
                Ok(Self::Triangular {
                    start,
                    peak_time: start + peak_time.sample(rng)? * width,
                    stop: start + width,
                    amplitude: height.sample(rng)?,
                })
            }
            PulseTemplate::Gaussian {
                height,
                peak_time,
                sd,
            } => {
                let mean = peak_time.sample(rng)?;
                let sd = sd.sample(rng)?;
                Ok(Self::Gaussian {
                    start: mean - GAUSSIAN_EXTENT * sd,
                    stop: mean + GAUSSIAN_EXTENT * sd,
                    mean,
                    sd,
                    peak_amplitude: height.sample(rng)?,
                })
            }
        }
    }

    pub(crate) fn get_start(&self) -> f64 {
        match self {
            Self::Flat { start, .. } => *start,
            Self::Triangular { start, .. } => *start,
            Self::Gaussian { start, .. } => *start,
        }
    }

    pub(crate) fn get_end(&self) -> f64 {
        match self {
            Self::Flat { stop, .. } => *stop,
            Self::Triangular { stop, .. } => *stop,
            Self::Gaussian { stop, .. } => *stop,
        }
    }

    /// Depth of the pulse at the given time, in samples.
    pub(crate) fn get_value_at(&self, time: f64) -> f64 {
        if self.get_start() > time || time > self.get_end() {
            return Default::default();
        }

        match *self {
            Self::Flat { amplitude, .. } => amplitude,
            Self::Triangular {
                start,
                peak_time,
                stop,
                amplitude,
            } => {
                if time < peak_time {
                    amplitude * (time - start) / (peak_time - start)
                } else {
                    amplitude * (stop - time) / (stop - peak_time)
                }
            }
            Self::Gaussian {
                mean,
                sd,
                peak_amplitude,
                ..
            } => peak_amplitude * f64::exp(-0.5 * f64::powi((time - mean) / sd, 2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_elements::NumConstant;
    use assert_approx_eq::assert_approx_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn constant(value: f64) -> FloatRandomDistribution {
        FloatRandomDistribution::ConstantFloat {
            value: NumConstant::Const(value),
        }
    }

    #[test]
    fn triangular_values() {
        let template = PulseTemplate::Triangular {
            start: constant(140.0),
            peak_time: constant(0.5),
            width: constant(20.0),
            height: constant(50.0),
        };
        let pulse = PulseEvent::sample(&template, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(pulse.get_start(), 140.0);
        assert_eq!(pulse.get_end(), 160.0);
        assert_approx_eq!(pulse.get_value_at(150.0), 50.0);
        assert_approx_eq!(pulse.get_value_at(145.0), 25.0);
        assert_approx_eq!(pulse.get_value_at(155.0), 25.0);
        assert_eq!(pulse.get_value_at(139.0), 0.0);
        assert_eq!(pulse.get_value_at(161.0), 0.0);
    }

    #[test]
    fn triangular_from_json() {
        let template: PulseTemplate = serde_json::from_str(
            r#"{
                "pulse-type": "triangular",
                "start": { "random-type": "constant-float", "value": { "const": 100.0 } },
                "peak-time": { "random-type": "constant-float", "value": { "const": 0.25 } },
                "width": { "random-type": "constant-float", "value": { "const": 40.0 } },
                "height": { "random-type": "constant-float", "value": { "const": 20.0 } }
            }"#,
        )
        .unwrap();
        let pulse = PulseEvent::sample(&template, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(pulse.get_start(), 100.0);
        assert_eq!(pulse.get_end(), 140.0);
        assert_approx_eq!(pulse.get_value_at(110.0), 20.0);
        assert_approx_eq!(pulse.get_value_at(125.0), 10.0);
    }

    #[test]
    fn gaussian_values() {
        let template: PulseTemplate = serde_json::from_str(
            r#"{
                "pulse-type": "gaussian",
                "height": { "random-type": "constant-float", "value": { "const": 40.0 } },
                "peak-time": { "random-type": "constant-float", "value": { "const": 150.0 } },
                "sd": { "random-type": "constant-float", "value": { "const": 3.0 } }
            }"#,
        )
        .unwrap();
        let pulse = PulseEvent::sample(&template, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(pulse.get_start(), 135.0);
        assert_eq!(pulse.get_end(), 165.0);
        assert_approx_eq!(pulse.get_value_at(150.0), 40.0);
        assert_approx_eq!(pulse.get_value_at(153.0), 40.0 * f64::exp(-0.5));
        assert_eq!(pulse.get_value_at(166.0), 0.0);
    }

    #[test]
    fn flat_values() {
        let template = PulseTemplate::Flat {
            start: constant(10.0),
            width: constant(5.0),
            height: constant(7.0),
        };
        let pulse = PulseEvent::sample(&template, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(pulse.get_value_at(9.5), 0.0);
        assert_eq!(pulse.get_value_at(12.0), 7.0);
        assert_eq!(pulse.get_value_at(15.0), 7.0);
    }
}
