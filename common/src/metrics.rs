//! Metric names and labels used by the calibration components.

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "nveto_led_";

    pub const BATCHES_RECEIVED: &str = concatcp!(METRIC_NAME_PREFIX, "batches_received");
    pub const BATCHES_PROCESSED: &str = concatcp!(METRIC_NAME_PREFIX, "batches_processed");
    pub const RECORDS_PRODUCED: &str = concatcp!(METRIC_NAME_PREFIX, "records_produced");
    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const COMPONENT_INFO: &str = concatcp!(METRIC_NAME_PREFIX, "component_info");
}

pub mod failures {
    use strum::{Display, IntoStaticStr};

    #[derive(Clone, Copy, Debug, Display, IntoStaticStr, PartialEq)]
    #[strum(serialize_all = "snake_case")]
    pub enum FailureKind {
        UnableToDecodeBatch,
        ShapeMismatch,
        LengthMismatch,
        ChannelMismatch,
        InvalidWindow,
    }

    pub fn get_label(value: FailureKind) -> (&'static str, String) {
        ("kind", value.to_string())
    }

}

/// Registers a gauge carrying the component name and version.
pub fn component_info_metric(component: &'static str, version: &'static str) {
    ::metrics::gauge!(
        names::COMPONENT_INFO,
        &[
            ("component", component.to_owned()),
            ("version", version.to_owned())
        ]
    )
    .set(1.0);
}
