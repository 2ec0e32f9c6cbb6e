//! Time-boxed interpolation of circle positions.
//!
//! The loader only asks for "move this circle to this y over this long"; the
//! [`Timeline`] is the piece that actually walks the value there frame by
//! frame and reports when each move is done. Hosts feed it frame deltas from
//! whatever clock they have and forward the finished tokens back to
//! [`crate::widget::VerticalLoader::finish_step`].

use crate::animator::{Step, StepToken};
use crate::circles::SlotId;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, EnumIter, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Maps linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub token: StepToken,
    pub slot: SlotId,
    pub from: f64,
    pub to: f64,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
    elapsed: Duration,
}

impl Tween {
    pub fn new(step: &Step, from: f64) -> Self {
        Self {
            token: step.token,
            slot: step.slot,
            from,
            to: step.target_y,
            delay: step.delay,
            duration: step.duration,
            easing: step.easing,
            elapsed: Duration::ZERO,
        }
    }

    pub fn sample(&self) -> f64 {
        if self.duration.is_zero() {
            return if self.elapsed >= self.delay {
                self.to
            } else {
                self.from
            };
        }
        let active = self.elapsed.saturating_sub(self.delay);
        let t = active.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.evaluate(t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub samples: Vec<(SlotId, f64)>,
    pub finished: Vec<StepToken>,
}

/// Running tweens, at most one per slot.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Starts moving `step.slot` from `from` to the step target. A tween
    /// already running on the same slot is superseded; its token is returned
    /// so the caller can still deliver that completion.
    pub fn begin(&mut self, step: &Step, from: f64) -> Option<StepToken> {
        let superseded = self
            .tweens
            .iter()
            .position(|t| t.slot == step.slot)
            .map(|i| self.tweens.swap_remove(i).token);

        self.tweens.push(Tween::new(step, from));
        superseded
    }

    pub fn advance(&mut self, dt: Duration) -> Frame {
        let mut frame = Frame::default();

        for tween in &mut self.tweens {
            tween.elapsed += dt;
            frame.samples.push((tween.slot, tween.sample()));
        }

        self.tweens.retain(|t| {
            if t.is_finished() {
                frame.finished.push(t.token);
                false
            } else {
                true
            }
        });

        frame
    }

    /// Re-aims running tweens after a relayout. `target` gives the new end
    /// value per slot; tweens it has none for keep theirs. Progress is kept.
    pub fn retarget(&mut self, mut target: impl FnMut(SlotId) -> Option<f64>) {
        for tween in &mut self.tweens {
            if let Some(to) = target(tween.slot) {
                tween.to = to;
            }
        }
    }

    /// Drops tweens whose slot was removed from the column and reports them
    /// as finished.
    pub fn retain_slots(&mut self, count: usize) -> Vec<StepToken> {
        let mut dropped = Vec::new();
        self.tweens.retain(|t| {
            if t.slot.index() < count {
                true
            } else {
                dropped.push(t.token);
                false
            }
        });
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::StepToken;
    use strum::IntoEnumIterator;

    fn step(slot: usize, target_y: f64, seq: u64) -> Step {
        Step {
            token: StepToken::new(1, seq),
            slot: SlotId::new(slot),
            target_y,
            delay: Duration::ZERO,
            duration: Duration::from_secs(1),
            easing: Easing::Linear,
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in Easing::iter() {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing}");
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-9, "{easing}");
            assert_eq!(easing.evaluate(-3.0), 0.0, "{easing}");
        }
    }

    #[test]
    fn test_ease_out_is_front_loaded() {
        assert!(Easing::EaseOut.evaluate(0.25) > 0.25);
        assert!(Easing::EaseIn.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_easing_from_str() {
        assert_eq!("ease-out".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert_eq!("LINEAR".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!(Easing::EaseInOut.to_string(), "ease-in-out");
    }

    #[test]
    fn test_timeline_interpolates_and_finishes_once() {
        let mut timeline = Timeline::new();
        timeline.begin(&step(2, 100.0, 1), 0.0);

        let frame = timeline.advance(Duration::from_millis(500));
        assert_eq!(frame.samples, vec![(SlotId::new(2), 50.0)]);
        assert!(frame.finished.is_empty());

        let frame = timeline.advance(Duration::from_millis(600));
        assert_eq!(frame.samples, vec![(SlotId::new(2), 100.0)]);
        assert_eq!(frame.finished, vec![StepToken::new(1, 1)]);
        assert!(timeline.is_idle());

        let frame = timeline.advance(Duration::from_millis(600));
        assert!(frame.finished.is_empty());
    }

    #[test]
    fn test_delay_holds_start_value() {
        let mut timeline = Timeline::new();
        let mut delayed = step(0, 10.0, 1);
        delayed.delay = Duration::from_millis(200);
        timeline.begin(&delayed, 4.0);

        let frame = timeline.advance(Duration::from_millis(100));
        assert_eq!(frame.samples, vec![(SlotId::new(0), 4.0)]);
    }

    #[test]
    fn test_begin_on_same_slot_supersedes() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.begin(&step(1, 10.0, 1), 0.0), None);
        assert_eq!(
            timeline.begin(&step(1, 20.0, 2), 5.0),
            Some(StepToken::new(1, 1))
        );
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.begin(&step(3, 20.0, 3), 5.0), None);
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_retarget_keeps_progress() {
        let mut timeline = Timeline::new();
        timeline.begin(&step(1, 100.0, 1), 0.0);
        timeline.begin(&step(4, 100.0, 2), 0.0);
        timeline.advance(Duration::from_millis(500));

        timeline.retarget(|slot| (slot == SlotId::new(1)).then_some(200.0));

        let frame = timeline.advance(Duration::from_millis(250));
        assert_eq!(
            frame.samples,
            vec![(SlotId::new(1), 150.0), (SlotId::new(4), 75.0)]
        );
        let frame = timeline.advance(Duration::from_millis(250));
        assert_eq!(
            frame.samples,
            vec![(SlotId::new(1), 200.0), (SlotId::new(4), 100.0)]
        );
    }

    #[test]
    fn test_retain_slots_reports_dropped() {
        let mut timeline = Timeline::new();
        timeline.begin(&step(1, 10.0, 1), 0.0);
        timeline.begin(&step(5, 10.0, 2), 0.0);

        assert_eq!(timeline.retain_slots(3), vec![StepToken::new(1, 2)]);
        assert_eq!(timeline.len(), 1);
    }
}
