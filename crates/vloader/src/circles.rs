use crate::config::Colour;
use crate::geometry::Point;
use crate::host::Container;
use derive_more::{Display, From, Into};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct SlotId(usize);

impl SlotId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleStyle {
    pub radius: f64,
    pub colour: Colour,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub colour: Colour,
}

impl Circle {
    pub fn new(style: CircleStyle) -> Self {
        Self {
            center: Point::default(),
            radius: style.radius,
            colour: style.colour,
        }
    }

    pub fn restyle(&mut self, style: CircleStyle) {
        self.radius = style.radius;
        self.colour = style.colour;
    }
}

/// Circles indexed by slot. Slot `i` is always the `i`-th circle from the top,
/// so growing or shrinking the column only ever touches the tail.
#[derive(Debug, Clone, Default)]
pub struct CircleArena {
    slots: Vec<Circle>,
}

impl CircleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: SlotId) -> Option<&Circle> {
        self.slots.get(slot.index())
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Circle> {
        self.slots.get_mut(slot.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Circle)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, c)| (SlotId::new(i), c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut Circle)> {
        self.slots
            .iter_mut()
            .enumerate()
            .map(|(i, c)| (SlotId::new(i), c))
    }

    /// Grows or shrinks the column to `new_count`. Returns whether anything
    /// changed so the caller knows to re-run layout.
    pub fn reconcile<C: Container>(
        &mut self,
        new_count: usize,
        style: CircleStyle,
        container: &mut C,
    ) -> bool {
        match self.slots.len().cmp(&new_count) {
            Ordering::Equal => false,
            Ordering::Greater => {
                while self.slots.len() > new_count {
                    self.slots.pop();
                    container.detach(SlotId::new(self.slots.len()));
                }
                true
            }
            Ordering::Less => {
                while self.slots.len() < new_count {
                    let slot = SlotId::new(self.slots.len());
                    self.slots.push(Circle::new(style));
                    container.attach(slot);
                }
                true
            }
        }
    }

    pub fn restyle(&mut self, style: CircleStyle) {
        self.slots.iter_mut().for_each(|c| c.restyle(style));
    }
}
