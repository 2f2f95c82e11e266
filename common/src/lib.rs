//! Types, logging and metrics shared by the components of the neutron veto LED calibration.
pub mod metrics;

pub use const_format;
pub use git_version;
use tracing_subscriber::{EnvFilter, fmt};

/// Identifies a photomultiplier channel.
pub type Channel = i16;
/// Nanoseconds since the unix epoch.
pub type Time = i64;
/// Duration of a single sample, in ns.
pub type TimeResolution = i16;
/// Raw digitiser value, in ADC counts.
pub type Intensity = i16;
/// Position of a fragment within its acquisition window.
pub type FragmentIndex = u32;

/// Channels of the neutron veto photomultipliers, used when no channel list is given.
pub const VETO_CHANNELS: std::ops::RangeInclusive<Channel> = 2000..=2119;

/// Expands to the crate version followed by the git revision it was built from.
#[macro_export]
macro_rules! version {
    () => {
        $crate::const_format::concatcp!(
            env!("CARGO_PKG_VERSION"),
            " (",
            $crate::git_version::git_version!(fallback = "unknown"),
            ")"
        )
    };
}

/// Installs the standard `tracing` subscriber.
///
/// The filter is read from `RUST_LOG`, falling back to `default_directive` when it is unset or malformed.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    fmt().with_env_filter(filter).with_target(false).init();
}
