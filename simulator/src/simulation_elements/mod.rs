mod noise;
mod pulses;
mod utils;

pub(crate) use noise::{Noise, NoiseSource};
pub(crate) use pulses::{PulseEvent, PulseTemplate};
pub(crate) use utils::{FloatRandomDistribution, Interval, JsonValueError, NumConstant};
