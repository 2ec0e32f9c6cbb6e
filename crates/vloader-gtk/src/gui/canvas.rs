use cairo::Context;
use std::collections::BTreeSet;
use std::f64::consts::PI;
use vloader::VerticalLoader;
use vloader::circles::SlotId;
use vloader::geometry::Bounds;
use vloader::host::Container;

/// The drawing area as seen by the loader: its current size and the slots
/// that should be painted.
#[derive(Debug, Clone, Default)]
pub struct CanvasContainer {
    bounds: Bounds,
    attached: BTreeSet<SlotId>,
}

impl CanvasContainer {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            bounds: Bounds::new(width as f64, height as f64),
            attached: BTreeSet::new(),
        }
    }

    /// Returns whether the size actually changed.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        let bounds = Bounds::new(width as f64, height as f64);
        let changed = bounds != self.bounds;
        self.bounds = bounds;
        changed
    }

    pub fn is_attached(&self, slot: SlotId) -> bool {
        self.attached.contains(&slot)
    }
}

impl Container for CanvasContainer {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn attach(&mut self, slot: SlotId) {
        self.attached.insert(slot);
    }

    fn detach(&mut self, slot: SlotId) {
        self.attached.remove(&slot);
    }
}

pub fn draw(cr: &Context, loader: &VerticalLoader<CanvasContainer>) -> Result<(), cairo::Error> {
    let canvas = loader.container();

    for (_, circle) in loader
        .circles()
        .iter()
        .filter(|(slot, _)| canvas.is_attached(*slot))
    {
        let (r, g, b, a) = (*circle.colour).into_components();
        cr.set_source_rgba(r, g, b, a);
        cr.arc(circle.center.x, circle.center.y, circle.radius, 0.0, 2.0 * PI);
        cr.fill()?;
    }
    Ok(())
}
