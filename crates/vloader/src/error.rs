use crate::circles::SlotId;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigViolation {
    #[error("circles_count must be at least 1")]
    NoCircles,
    #[error("circle_radius must be a positive finite number, got {0}")]
    Radius(f64),
    #[error("gap_percentage must be within 0..=100, got {0}")]
    GapPercentage(f64),
    #[error("gap_location {location} is past the last boundary ({count})")]
    GapLocation { location: usize, count: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoaderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigViolation),
    #[error("Transition of circle {slot} did not complete after {waited:?}")]
    TransitionTimeout { slot: SlotId, waited: Duration },
}
