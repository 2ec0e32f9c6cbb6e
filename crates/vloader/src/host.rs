use crate::circles::SlotId;
use crate::geometry::Bounds;

/// The surface that holds the circles. Circles are owned by the loader; the
/// container is only told which slots are currently part of the column.
pub trait Container {
    fn bounds(&self) -> Bounds;
    fn attach(&mut self, slot: SlotId);
    fn detach(&mut self, slot: SlotId);
}

/// Container with no backing surface. Used by the CLI to compute layouts and
/// by tests to observe attach/detach order.
#[derive(Debug, Clone, Default)]
pub struct HeadlessContainer {
    pub bounds: Bounds,
    pub attached: Vec<SlotId>,
    pub detached: Vec<SlotId>,
}

impl HeadlessContainer {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }
}

impl Container for HeadlessContainer {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn attach(&mut self, slot: SlotId) {
        self.attached.push(slot);
    }

    fn detach(&mut self, slot: SlotId) {
        self.attached.retain(|s| *s != slot);
        self.detached.push(slot);
    }
}
