use crate::circles::SlotId;
use crate::error::LoaderError;
use crate::layout::Layout;
use crate::transition::Easing;
use derive_more::Display;
use std::time::{Duration, Instant};
use strum::Display as StrumDisplay;

/// Seconds per step after a stop.
pub const BASE_STEP_DURATION: f64 = 1.0;
pub const SPEED_FACTOR: f64 = 3.0;
/// Extra time a transition gets past its own duration before it counts as stalled.
pub const STALL_GRACE: Duration = Duration::from_secs(1);

/// Identifies one issued step. The generation changes on every start, so
/// completions from an earlier chain never match the pending step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{generation}.{sequence}")]
pub struct StepToken {
    generation: u64,
    sequence: u64,
}

impl StepToken {
    pub fn new(generation: u64, sequence: u64) -> Self {
        Self {
            generation,
            sequence,
        }
    }
}

/// One requested move: bring `slot` to `target_y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub token: StepToken,
    pub slot: SlotId,
    pub target_y: f64,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Animating,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: StepToken,
    slot: SlotId,
    issued_at: Instant,
    duration: Duration,
}

/// Walks the gap boundary back and forth over `0..=circles_count`.
#[derive(Debug, Clone)]
pub struct GapAnimator {
    phase: Phase,
    index: usize,
    forward: bool,
    duration: f64,
    generation: u64,
    sequence: u64,
    in_flight: Option<InFlight>,
}

impl Default for GapAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl GapAnimator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            index: 0,
            forward: false,
            duration: BASE_STEP_DURATION,
            generation: 0,
            sequence: 0,
            in_flight: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Animating
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn step_duration(&self) -> f64 {
        self.duration
    }

    /// Returns `false` when already animating.
    pub fn start(&mut self, gap_location: usize) -> bool {
        if self.is_animating() {
            return false;
        }
        self.phase = Phase::Animating;
        self.index = gap_location;
        self.forward = false;
        self.generation += 1;
        self.sequence = 0;
        self.in_flight = None;
        true
    }

    /// Returns the index the gap stopped at, or `None` when already idle.
    pub fn stop(&mut self) -> Option<usize> {
        if !self.is_animating() {
            return None;
        }
        self.phase = Phase::Idle;
        self.duration = BASE_STEP_DURATION;
        self.in_flight = None;
        Some(self.index)
    }

    pub fn slow_down(&mut self) {
        self.duration *= SPEED_FACTOR;
    }

    pub fn speed_up(&mut self) {
        self.duration /= SPEED_FACTOR;
    }

    /// Moves the gap one boundary and returns the index of the circle that
    /// has to move for it. Direction turns inward whenever the index sits on
    /// either end of the column.
    fn advance(&mut self, circles_count: usize) -> usize {
        if self.index >= circles_count {
            self.index = circles_count;
            self.forward = false;
        } else if self.index == 0 {
            self.forward = true;
        }

        if self.forward {
            self.index += 1;
            self.index - 1
        } else {
            self.index -= 1;
            self.index
        }
    }

    /// Issues the next step of the chain, or `None` once stopped.
    pub fn next_step(&mut self, circles_count: usize, layout: &Layout) -> Option<Step> {
        if !self.is_animating() || circles_count == 0 {
            return None;
        }

        let slot = SlotId::new(self.advance(circles_count));
        Some(self.issue(slot, layout))
    }

    /// Hands out the pending step again under a fresh token. Index, direction
    /// and speed stay as they are; the old token no longer completes.
    pub fn reissue(&mut self, layout: &Layout) -> Option<Step> {
        let flight = self.in_flight.filter(|_| self.is_animating())?;
        Some(self.issue(flight.slot, layout))
    }

    fn issue(&mut self, slot: SlotId, layout: &Layout) -> Step {
        // moving forward the circle leaves the gap, moving back it enters it
        let target_y = layout.resting_y(slot.index(), !self.forward);

        self.sequence += 1;
        let token = StepToken::new(self.generation, self.sequence);
        let duration = Duration::from_secs_f64(self.duration);

        self.in_flight = Some(InFlight {
            token,
            slot,
            issued_at: Instant::now(),
            duration,
        });

        Step {
            token,
            slot,
            target_y,
            delay: Duration::ZERO,
            duration,
            easing: Easing::EaseOut,
        }
    }

    /// Accepts the completion of the pending step. Anything else (a stale
    /// generation, a superseded step, a completion after stop) is rejected.
    pub fn complete(&mut self, token: StepToken) -> bool {
        match self.in_flight {
            Some(f) if self.is_animating() && f.token == token => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    pub fn clamp_to(&mut self, circles_count: usize) {
        self.index = self.index.min(circles_count);
    }

    pub fn check_stalled(&self, now: Instant) -> Result<(), LoaderError> {
        let Some(flight) = self.in_flight else {
            return Ok(());
        };
        let waited = now.saturating_duration_since(flight.issued_at);
        if waited > flight.duration + STALL_GRACE {
            return Err(LoaderError::TransitionTimeout {
                slot: flight.slot,
                waited,
            });
        }
        Ok(())
    }
}
