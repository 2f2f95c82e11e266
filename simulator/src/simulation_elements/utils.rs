use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use serde::Deserialize;
use std::{
    env::{self, VarError},
    num::{ParseFloatError, ParseIntError},
    ops::RangeInclusive,
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JsonValueError {
    #[error("Cannot Extract Environment Variable")]
    EnvVar(#[from] VarError),
    #[error("Invalid String to Float: {0}")]
    FloatFromStr(#[from] ParseFloatError),
    #[error("Invalid String to Int: {0}")]
    IntFromStr(#[from] ParseIntError),
    #[error("Invalid Uniform Distribution: {0}")]
    UniformDistribution(#[from] rand_distr::uniform::Error),
    #[error("Invalid Normal Distribution: {0}")]
    NormalDistribution(#[from] rand_distr::NormalError),
    #[error("Invalid Exponential Distribution: {0}")]
    ExpDistribution(#[from] rand_distr::ExpError),
    #[error("Negative Standard Deviation: {0}")]
    NegativeStandardDeviation(f64),
}

/// Builds a normal distribution, rejecting a negative standard deviation.
pub(crate) fn normal(mean: f64, sd: f64) -> Result<Normal<f64>, JsonValueError> {
    if sd < 0.0 {
        return Err(JsonValueError::NegativeStandardDeviation(sd));
    }
    Ok(Normal::new(mean, sd)?)
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum NumConstant<T> {
    Const(T),
    FromEnvVar(String),
}

impl<T> NumConstant<T>
where
    T: FromStr + Copy,
    JsonValueError: From<<T as FromStr>::Err>,
{
    pub(crate) fn value(&self) -> Result<T, JsonValueError> {
        match self {
            Self::Const(v) => Ok(*v),
            Self::FromEnvVar(environment_variable) => Ok(env::var(environment_variable)?.parse()?),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "random-type"
)]
pub(crate) enum FloatRandomDistribution {
    ConstantFloat {
        value: NumConstant<f64>,
    },
    UniformFloat {
        min: NumConstant<f64>,
        max: NumConstant<f64>,
    },
    Normal {
        mean: NumConstant<f64>,
        sd: NumConstant<f64>,
    },
    Exponential {
        lifetime: NumConstant<f64>,
    },
}

impl FloatRandomDistribution {
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Result<f64, JsonValueError> {
        match self {
            Self::ConstantFloat { value } => value.value(),
            Self::UniformFloat { min, max } => {
                let (min, max) = (min.value()?, max.value()?);
                if min >= max {
                    return Ok(min);
                }
                Ok(rand_distr::Uniform::new(min, max)?.sample(rng))
            }
            Self::Normal { mean, sd } => Ok(normal(mean.value()?, sd.value()?)?.sample(rng)),
            Self::Exponential { lifetime } => Ok(Exp::new(1.0 / lifetime.value()?)?.sample(rng)),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Interval<T>
where
    T: Clone,
{
    pub(crate) min: T,
    pub(crate) max: T,
}

impl<T: PartialOrd + Copy> Interval<T> {
    pub(crate) fn range_inclusive(&self) -> RangeInclusive<T> {
        self.min..=self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn constant_distribution() {
        let distribution: FloatRandomDistribution =
            serde_json::from_str(r#"{ "random-type": "constant-float", "value": { "const": 2.5 } }"#)
                .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(distribution.sample(&mut rng).unwrap(), 2.5);
    }

    #[test]
    fn uniform_distribution_stays_in_bounds() {
        let distribution = FloatRandomDistribution::UniformFloat {
            min: NumConstant::Const(-1.0),
            max: NumConstant::Const(1.0),
        };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let value = distribution.sample(&mut rng).unwrap();
            assert!((-1.0..1.0).contains(&value));
        }
    }

    #[test]
    fn negative_sd_is_an_error() {
        let distribution = FloatRandomDistribution::Normal {
            mean: NumConstant::Const(0.0),
            sd: NumConstant::Const(-1.0),
        };
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            distribution.sample(&mut rng),
            Err(JsonValueError::NegativeStandardDeviation(sd)) if sd == -1.0
        ));
    }

    #[test]
    fn infinite_sd_is_an_error() {
        let distribution = FloatRandomDistribution::Normal {
            mean: NumConstant::Const(0.0),
            sd: NumConstant::Const(f64::INFINITY),
        };
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            distribution.sample(&mut rng),
            Err(JsonValueError::NormalDistribution(_))
        ));
    }

    #[test]
    fn unset_environment_variable() {
        let constant = NumConstant::<usize>::FromEnvVar("NVETO_SIMULATOR_UNSET_VARIABLE".into());
        assert!(matches!(constant.value(), Err(JsonValueError::EnvVar(_))));
    }
}
