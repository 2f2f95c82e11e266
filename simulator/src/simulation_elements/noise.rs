use super::{
    Interval, NumConstant,
    utils::{JsonValueError, normal},
};
use rand::Rng;
use rand_distr::Distribution;
use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct NoiseSource {
    attributes: NoiseAttributes,
    /// Length of the moving average window to apply to the noise.
    /// If no smoothing is required, set this to
    /// ```json
    /// "smoothing-window-length": { "const": 1 }
    /// ```
    smoothing_window_length: NumConstant<usize>,
}

impl NoiseSource {
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Result<f64, JsonValueError> {
        match &self.attributes {
            NoiseAttributes::Uniform(Interval { min, max }) => {
                let (min, max) = (min.value()?, max.value()?);
                Ok((max - min) * rng.random::<f64>() + min)
            }
            NoiseAttributes::Gaussian { mean, sd } => {
                Ok(normal(mean.value()?, sd.value()?)?.sample(rng))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "noise-type"
)]
pub(crate) enum NoiseAttributes {
    Uniform(Interval<NumConstant<f64>>),
    Gaussian {
        mean: NumConstant<f64>,
        sd: NumConstant<f64>,
    },
}

/// Adds smoothed noise from a [NoiseSource] to consecutive samples of a trace.
pub(crate) struct Noise<'a> {
    source: &'a NoiseSource,
    prev: VecDeque<f64>,
}

impl<'a> Noise<'a> {
    pub(crate) fn new(source: &'a NoiseSource) -> Self {
        Self {
            source,
            prev: Default::default(),
        }
    }

    pub(crate) fn noisify<R: Rng>(
        &mut self,
        value: f64,
        rng: &mut R,
    ) -> Result<f64, JsonValueError> {
        let window_len = self.source.smoothing_window_length.value()?.max(1);
        if self.prev.len() >= window_len {
            self.prev.pop_front();
        }
        self.prev.push_back(self.source.sample(rng)?);
        Ok(value + self.prev.iter().sum::<f64>() / self.prev.len() as f64)
    }
}
