use crate::config::LoaderConfig;
use crate::geometry::{Bounds, Point};

/// Floor for the step divisor so a single-circle column does not divide by zero.
pub const STEP_DIVISOR_EPSILON: f64 = 1e-5;

/// Cached measurements of the column. Recomputed on every bounds or
/// configuration change so animation ticks can read them directly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub gap_size: f64,
    pub step_size: f64,
    pub circle_radius: f64,
    pub center_x: f64,
}

impl Layout {
    pub fn measure(config: &LoaderConfig, bounds: Bounds) -> Self {
        let available_height = bounds.height - 2.0 * config.circle_radius;
        let gap_size = (config.gap_percentage / 100.0) * bounds.height;
        let divisor = (config.circles_count as f64 - 1.0).max(STEP_DIVISOR_EPSILON);

        Self {
            gap_size,
            step_size: (available_height - gap_size) / divisor,
            circle_radius: config.circle_radius,
            center_x: bounds.mid_x(),
        }
    }

    /// Resting y of the circle at `index`, pushed down by the gap when it sits
    /// below the gap boundary.
    pub fn resting_y(&self, index: usize, gapped: bool) -> f64 {
        let gap_add = if gapped { self.gap_size } else { 0.0 };
        self.step_size * index as f64 + self.circle_radius + gap_add
    }

    pub fn position(&self, index: usize, gap_location: usize) -> Point {
        Point::new(self.center_x, self.resting_y(index, index >= gap_location))
    }

    pub fn positions(&self, count: usize, gap_location: usize) -> Vec<Point> {
        (0..count)
            .map(|i| self.position(i, gap_location))
            .collect()
    }
}

pub fn compute_positions(config: &LoaderConfig, bounds: Bounds) -> Vec<Point> {
    Layout::measure(config, bounds).positions(config.circles_count, config.gap_location)
}
