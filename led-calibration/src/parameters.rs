//! Defines the settings used by the calibration stages.
use crate::{
    calibration::{PeakOffsets, SampleWindow},
    channels::ChannelSelection,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

/// Determines the window over which the pulse area is integrated.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationMode {
    /// Integrate over `[peak - x, peak + y)`, where the peak is found in the LED window.
    #[default]
    PeakAnchored,
    /// Integrate over the fixed window given by `fixed-integration-window`.
    /// This is the legacy behaviour and does not follow the pulse.
    Fixed,
}

/// Encapsulates the parameters of every calibration stage.
///
/// These can be given on the command line, or loaded from a JSON file
/// whose keys are the kebab-case names of the fields.
#[derive(Clone, Debug, PartialEq, Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CalibrationSettings {
    /// Window, in samples, used to calculate the baseline. Given as "lo,hi".
    #[clap(long, default_value = "0,110")]
    pub baseline_window: SampleWindow,

    /// Window, in samples, where the LED signal is expected. Given as "lo,hi".
    #[clap(long, default_value = "120,220")]
    pub led_window: SampleWindow,

    /// Window, in samples, far from the LED signal, where the noise amplitude is measured. Given as "lo,hi".
    #[clap(long, default_value = "10,50")]
    pub noise_window: SampleWindow,

    /// Integration window [peak - x, peak + y), in samples relative to the LED peak. Given as "x,y".
    #[clap(long, default_value = "10,20")]
    pub integration_window: PeakOffsets,

    /// Determines how the integration window is placed.
    #[clap(long, value_enum, default_value_t)]
    pub integration_mode: IntegrationMode,

    /// Window, in samples, integrated over when the integration mode is `fixed`. Given as "lo,hi".
    #[clap(long, default_value = "120,160")]
    pub fixed_integration_window: SampleWindow,

    /// Channels to calibrate, either "all" or a list such as "2000-2119" or "2001,2005".
    #[clap(long, default_value = "2000-2119")]
    pub channels: ChannelSelection,

    /// Length of the acquisition window, in samples, which the merged fragments must cover.
    #[clap(long, default_value = "320")]
    pub acq_window_length: usize,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            baseline_window: SampleWindow::new(0, 110),
            led_window: SampleWindow::new(120, 220),
            noise_window: SampleWindow::new(10, 50),
            integration_window: PeakOffsets::new(10, 20),
            integration_mode: IntegrationMode::default(),
            fixed_integration_window: SampleWindow::new(120, 160),
            channels: ChannelSelection::veto(),
            acq_window_length: 320,
        }
    }
}
