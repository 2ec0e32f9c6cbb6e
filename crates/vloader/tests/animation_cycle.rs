use std::time::Duration;
use vloader::animator::Step;
use vloader::circles::SlotId;
use vloader::config::LoaderConfig;
use vloader::geometry::Bounds;
use vloader::VerticalLoader;
use vloader::host::HeadlessContainer;
use vloader::layout::compute_positions;
use vloader::transition::Timeline;

const FRAME: Duration = Duration::from_millis(16);

fn loader(config: LoaderConfig) -> VerticalLoader<HeadlessContainer> {
    VerticalLoader::new(config, HeadlessContainer::new(Bounds::new(40.0, 200.0))).unwrap()
}

fn heights(loader: &VerticalLoader<HeadlessContainer>) -> Vec<f64> {
    loader.circles().iter().map(|(_, c)| c.center.y).collect()
}

fn begin(loader: &VerticalLoader<HeadlessContainer>, timeline: &mut Timeline, step: &Step) {
    let from = loader.circles().get(step.slot).unwrap().center.y;
    timeline.begin(step, from);
}

/// Runs frames until `steps` transitions have finished, the way a host's frame
/// clock would. Returns the slots moved per finished step.
fn drive(
    loader: &mut VerticalLoader<HeadlessContainer>,
    timeline: &mut Timeline,
    steps: usize,
) -> Vec<SlotId> {
    let mut moved = Vec::new();
    while moved.len() < steps {
        let frame = timeline.advance(FRAME);
        for (slot, y) in frame.samples {
            loader.place(slot, y);
        }
        for token in frame.finished {
            if let Some(step) = loader.finish_step(token) {
                let from = loader.circles().get(step.slot).unwrap().center.y;
                timeline.begin(&step, from);
                moved.push(step.slot);
            }
        }
        if timeline.is_idle() {
            break;
        }
    }
    moved
}

#[test]
fn test_full_bounce_returns_column_to_rest() {
    let mut loader = loader(LoaderConfig {
        circles_count: 3,
        gap_location: 1,
        ..LoaderConfig::default()
    });
    let rest: Vec<f64> = loader.circles().iter().map(|(_, c)| c.center.y).collect();
    let mut timeline = Timeline::new();

    loader.speed_up();
    loader.speed_up();
    let first = loader.start_animating().unwrap();
    let from = loader.circles().get(first.slot).unwrap().center.y;
    timeline.begin(&first, from);

    // 1 -> 0 -> 1 -> 2 -> 3 -> 2 -> 1: back where it started after six moves
    let moved = drive(&mut loader, &mut timeline, 5);
    assert_eq!(
        moved,
        [0, 1, 2, 2, 1].map(SlotId::new).to_vec(),
        "slots moved after the first step"
    );

    // let the last transition land
    while !timeline.is_idle() {
        let frame = timeline.advance(FRAME);
        for (slot, y) in frame.samples {
            loader.place(slot, y);
        }
        if !frame.finished.is_empty() {
            loader.stop_animating();
        }
    }

    assert_eq!(loader.config().gap_location, 1);
    let now: Vec<f64> = loader.circles().iter().map(|(_, c)| c.center.y).collect();
    for (a, b) in rest.iter().zip(&now) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }
}

#[test]
fn test_stop_lets_in_flight_transition_land() {
    let mut loader = loader(LoaderConfig::default());
    let mut timeline = Timeline::new();

    let step = loader.start_animating().unwrap();
    let from = loader.circles().get(step.slot).unwrap().center.y;
    timeline.begin(&step, from);
    loader.stop_animating();

    let mut finished = Vec::new();
    while !timeline.is_idle() {
        let frame = timeline.advance(FRAME);
        for (slot, y) in frame.samples {
            loader.place(slot, y);
        }
        finished.extend(frame.finished);
    }

    assert_eq!(finished, vec![step.token]);
    assert!(loader.finish_step(step.token).is_none());
    let landed = loader.circles().get(step.slot).unwrap().center.y;
    assert!((landed - step.target_y).abs() < 1e-9);
}

#[test]
fn test_shrinking_mid_animation_keeps_steps_on_column() {
    let mut loader = loader(LoaderConfig::default());
    let mut timeline = Timeline::new();

    let step = loader.start_animating().unwrap();
    timeline.begin(&step, 0.0);
    loader.set_circles_count(2).unwrap();
    assert_eq!(timeline.retain_slots(loader.circles().len()), vec![step.token]);

    let mut next = loader.finish_step(step.token);
    for _ in 0..10 {
        let Some(current) = next else { break };
        assert!(current.slot.index() < 2);
        assert!(loader.animator().index() <= 2);
        next = loader.finish_step(current.token);
    }
    assert!(next.is_some());
}

#[test]
fn test_each_frame_moves_exactly_one_circle() {
    let mut loader = loader(LoaderConfig::default());
    let mut timeline = Timeline::new();

    loader.speed_up();
    let first = loader.start_animating().unwrap();
    begin(&loader, &mut timeline, &first);

    for frame_no in 0..200 {
        let before = heights(&loader);
        let frame = timeline.advance(FRAME);
        for (slot, y) in frame.samples {
            loader.place(slot, y);
        }
        for token in frame.finished {
            let step = loader.finish_step(token).unwrap();
            begin(&loader, &mut timeline, &step);
        }

        let after = heights(&loader);
        let moved = before.iter().zip(&after).filter(|(a, b)| a != b).count();
        assert_eq!(moved, 1, "frame {frame_no}");
    }
}

#[test]
fn test_resize_mid_transition_lands_on_new_layout() {
    let mut loader = loader(LoaderConfig::default());
    let mut timeline = Timeline::new();

    let step = loader.start_animating().unwrap();
    begin(&loader, &mut timeline, &step);
    for _ in 0..6 {
        for (slot, y) in timeline.advance(FRAME).samples {
            loader.place(slot, y);
        }
    }

    loader.container_mut().resize(Bounds::new(40.0, 400.0));
    loader.invalidate_layout();
    timeline.retarget(|slot| loader.circles().get(slot).map(|c| c.center.y));
    loader.stop_animating();

    while !timeline.is_idle() {
        for (slot, y) in timeline.advance(FRAME).samples {
            loader.place(slot, y);
        }
    }

    let expected = compute_positions(loader.config(), Bounds::new(40.0, 400.0));
    for ((slot, circle), point) in loader.circles().iter().zip(&expected) {
        assert!(
            (circle.center.y - point.y).abs() < 1e-9,
            "circle {slot} at {} instead of {}",
            circle.center.y,
            point.y
        );
    }
}
