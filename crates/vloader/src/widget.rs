use crate::animator::{GapAnimator, Step, StepToken};
use crate::circles::{CircleArena, CircleStyle, SlotId};
use crate::config::{Colour, LoaderConfig};
use crate::error::{ConfigViolation, LoaderError};
use crate::host::Container;
use crate::layout::Layout;
use std::time::Instant;

/// The bouncing-gap column.
///
/// Every configuration change goes through an explicit setter that validates
/// the new value, reconciles the circles and re-runs layout. Animation is
/// driven from outside: [`start_animating`](Self::start_animating) hands out
/// the first [`Step`], and each [`finish_step`](Self::finish_step) hands out
/// the next one until the loader is stopped.
pub struct VerticalLoader<C> {
    config: LoaderConfig,
    container: C,
    circles: CircleArena,
    layout: Layout,
    animator: GapAnimator,
}

impl<C: Container> VerticalLoader<C> {
    pub fn new(config: LoaderConfig, container: C) -> Result<Self, LoaderError> {
        config.validate()?;
        Ok(Self::assemble(config, container))
    }

    pub fn with_default_config(container: C) -> Self {
        Self::assemble(LoaderConfig::default(), container)
    }

    fn assemble(config: LoaderConfig, mut container: C) -> Self {
        let mut circles = CircleArena::new();
        circles.reconcile(config.circles_count, style_of(&config), &mut container);

        let mut loader = Self {
            config,
            container,
            circles,
            layout: Layout::default(),
            animator: GapAnimator::new(),
        };
        loader.invalidate_layout();
        loader
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Callers that resize the container must follow up with
    /// [`invalidate_layout`](Self::invalidate_layout).
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn circles(&self) -> &CircleArena {
        &self.circles
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn animator(&self) -> &GapAnimator {
        &self.animator
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Replaces the whole configuration. On error nothing changes.
    pub fn set_configuration(&mut self, config: LoaderConfig) -> Result<(), LoaderError> {
        config.validate()?;

        let previous = std::mem::replace(&mut self.config, config);
        if previous.circle_radius != self.config.circle_radius
            || previous.circle_colour != self.config.circle_colour
        {
            self.circles.restyle(style_of(&self.config));
        }
        self.reconcile_count();
        self.invalidate_layout();
        Ok(())
    }

    pub fn set_circle_radius(&mut self, radius: f64) -> Result<(), LoaderError> {
        self.set_configuration(LoaderConfig {
            circle_radius: radius,
            ..self.config.clone()
        })
    }

    pub fn set_circle_colour(&mut self, colour: Colour) {
        self.config.circle_colour = colour;
        self.circles.restyle(style_of(&self.config));
        self.invalidate_layout();
    }

    /// Shrinking the column below the gap location pulls the gap up with it.
    pub fn set_circles_count(&mut self, count: usize) -> Result<(), LoaderError> {
        if count < 1 {
            return Err(ConfigViolation::NoCircles.into());
        }
        self.set_configuration(LoaderConfig {
            circles_count: count,
            gap_location: self.config.gap_location.min(count),
            ..self.config.clone()
        })
    }

    pub fn set_gap_percentage(&mut self, percentage: f64) -> Result<(), LoaderError> {
        self.set_configuration(LoaderConfig {
            gap_percentage: percentage,
            ..self.config.clone()
        })
    }

    /// While animating the stored location is replaced by wherever the gap
    /// stops, so this only has a visible effect when idle.
    pub fn set_gap_location(&mut self, location: usize) -> Result<(), LoaderError> {
        self.set_configuration(LoaderConfig {
            gap_location: location,
            ..self.config.clone()
        })
    }

    fn reconcile_count(&mut self) {
        let count = self.config.circles_count;
        if self
            .circles
            .reconcile(count, style_of(&self.config), &mut self.container)
        {
            log::debug!("Column reconciled to {} circles", count);
            self.animator.clamp_to(count);
        }
    }

    /// Re-measures the column and moves every circle to its resting position.
    /// While animating the gap sits wherever the animator has it, which puts
    /// the moving circle on its step target. Hosts running transitions must
    /// re-aim them at the new positions.
    pub fn invalidate_layout(&mut self) {
        self.layout = Layout::measure(&self.config, self.container.bounds());

        let gap_location = if self.animator.is_animating() {
            self.animator.index()
        } else {
            self.config.gap_location
        };

        let layout = self.layout;
        for (slot, circle) in self.circles.iter_mut() {
            circle.center = layout.position(slot.index(), gap_location);
        }
    }

    /// Returns the first step, or `None` when already animating.
    pub fn start_animating(&mut self) -> Option<Step> {
        if !self.animator.start(self.config.gap_location) {
            return None;
        }
        log::debug!("Animation started at gap {}", self.config.gap_location);
        self.next_step()
    }

    pub fn stop_animating(&mut self) {
        if let Some(index) = self.animator.stop() {
            log::debug!("Animation stopped at gap {}", index);
            self.config.gap_location = index;
        }
    }

    /// Feeds back a finished transition and returns the following step, if
    /// the chain is still running.
    pub fn finish_step(&mut self, token: StepToken) -> Option<Step> {
        if !self.animator.complete(token) {
            log::trace!("Ignoring completion of step {}", token);
            return None;
        }
        self.next_step()
    }

    fn next_step(&mut self) -> Option<Step> {
        let step = self
            .animator
            .next_step(self.config.circles_count, &self.layout)?;
        log::trace!(
            "Step {}: circle {} -> {:.2} over {:?}",
            step.token,
            step.slot,
            step.target_y,
            step.duration
        );
        Some(step)
    }

    /// Hands out the pending step again under a new token, for a host whose
    /// transition never reported back. Speed and direction are kept.
    pub fn reissue_step(&mut self) -> Option<Step> {
        let step = self.animator.reissue(&self.layout)?;
        log::debug!("Reissued step for circle {} as {}", step.slot, step.token);
        Some(step)
    }

    pub fn slow_down(&mut self) {
        self.animator.slow_down();
    }

    pub fn speed_up(&mut self) {
        self.animator.speed_up();
    }

    /// Writes an interpolated y for one circle. Slots that no longer exist are
    /// ignored.
    pub fn place(&mut self, slot: SlotId, y: f64) {
        if let Some(circle) = self.circles.get_mut(slot) {
            circle.center.y = y;
        }
    }

    pub fn check_stalled(&self, now: Instant) -> Result<(), LoaderError> {
        self.animator.check_stalled(now)
    }
}

fn style_of(config: &LoaderConfig) -> CircleStyle {
    CircleStyle {
        radius: config.circle_radius,
        colour: config.circle_colour,
    }
}
