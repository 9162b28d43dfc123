// surface.rs - Retained presentation surface shared by the active strategy and the UI layer

use std::cell::RefCell;
use std::rc::Rc;

pub type SurfaceHandle = Rc<RefCell<Surface>>;

/// Handle to a unit, valid only until the next `remove_all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    epoch: u64,
    index: usize,
}

/// Input signals a strategy can subscribe to on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Click,
    Scroll,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Laid out by the surface from the unit's row/col tags.
    Flow,
    /// Pinned at a pixel offset from the surface origin.
    Absolute { x: f32, y: f32 },
}

/// One painted cell. `row` and `col` are the tags a click is decoded from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentationUnit {
    pub row: usize,
    pub col: usize,
    pub placement: Placement,
    pub alive: bool,
}

#[derive(Debug)]
pub struct Surface {
    cell_size: f32,
    extent: (f32, f32),
    units: Vec<PresentationUnit>,
    epoch: u64,
    listeners: Vec<Signal>,
    active: bool,
}

impl Surface {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            extent: (0.0, 0.0),
            units: Vec::new(),
            epoch: 0,
            listeners: Vec::new(),
            active: false,
        }
    }

    pub fn into_handle(self) -> SurfaceHandle {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Scrollable content size as (width, height) in pixels.
    #[inline]
    pub fn extent(&self) -> (f32, f32) {
        self.extent
    }

    pub fn set_extent(&mut self, width: f32, height: f32) {
        self.extent = (width, height);
    }

    pub fn append(&mut self, unit: PresentationUnit) -> UnitId {
        self.units.push(unit);
        self.id_at(self.units.len() - 1)
    }

    #[inline]
    fn id_at(&self, index: usize) -> UnitId {
        UnitId { epoch: self.epoch, index }
    }

    /// Resolves an id against the current units. Ids from before the last
    /// `remove_all` resolve to nothing.
    pub fn unit(&self, id: UnitId) -> Option<&PresentationUnit> {
        if id.epoch != self.epoch {
            return None;
        }
        self.units.get(id.index)
    }

    pub fn set_alive(&mut self, id: UnitId, alive: bool) {
        if id.epoch != self.epoch {
            return;
        }
        if let Some(unit) = self.units.get_mut(id.index) {
            unit.alive = alive;
        }
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &PresentationUnit)> {
        self.units.iter().enumerate().map(|(i, unit)| (self.id_at(i), unit))
    }

    #[inline]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Drops every unit; ids handed out earlier become stale.
    pub fn remove_all(&mut self) {
        self.units.clear();
        self.epoch += 1;
    }

    pub fn attach(&mut self, signal: Signal) {
        if !self.listeners.contains(&signal) {
            self.listeners.push(signal);
        }
    }

    pub fn detach_all(&mut self) {
        self.listeners.clear();
    }

    #[inline]
    pub fn listens_to(&self, signal: Signal) -> bool {
        self.listeners.contains(&signal)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Top-left pixel of a unit relative to the surface origin.
    pub fn origin_of(&self, unit: &PresentationUnit) -> (f32, f32) {
        match unit.placement {
            Placement::Flow => (
                unit.col as f32 * self.cell_size,
                unit.row as f32 * self.cell_size,
            ),
            Placement::Absolute { x, y } => (x, y),
        }
    }

    /// Unit under a point given in surface pixels. The last appended unit wins on overlap.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<UnitId> {
        let size = self.cell_size;
        self.units
            .iter()
            .enumerate()
            .rev()
            .find(|(_, unit)| {
                let (ux, uy) = self.origin_of(unit);
                x >= ux && x < ux + size && y >= uy && y < uy + size
            })
            .map(|(i, _)| self.id_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(row: usize, col: usize, placement: Placement) -> PresentationUnit {
        PresentationUnit { row, col, placement, alive: false }
    }

    #[test]
    fn flow_units_are_placed_by_tags() {
        let mut surface = Surface::new(10.0);
        let id = surface.append(unit(2, 3, Placement::Flow));
        assert_eq!(surface.origin_of(surface.unit(id).unwrap()), (30.0, 20.0));
        assert_eq!(surface.hit_test(35.0, 29.9), Some(id));
        assert_eq!(surface.hit_test(40.0, 25.0), None);
    }

    #[test]
    fn absolute_units_ignore_tags_for_layout() {
        let mut surface = Surface::new(8.0);
        let id = surface.append(unit(0, 0, Placement::Absolute { x: 80.0, y: 16.0 }));
        assert_eq!(surface.hit_test(81.0, 17.0), Some(id));
        assert_eq!(surface.hit_test(1.0, 1.0), None);
    }

    #[test]
    fn ids_from_before_remove_all_resolve_to_nothing() {
        let mut surface = Surface::new(10.0);
        let old = surface.append(unit(0, 0, Placement::Flow));
        surface.remove_all();
        let new = surface.append(unit(4, 7, Placement::Flow));
        assert_ne!(old, new);
        assert!(surface.unit(old).is_none());
        surface.set_alive(old, true);
        assert!(!surface.unit(new).unwrap().alive);
        assert_eq!(surface.unit(new).unwrap().row, 4);
    }

    #[test]
    fn listeners_are_deduplicated_and_detached_together() {
        let mut surface = Surface::new(4.0);
        surface.attach(Signal::Click);
        surface.attach(Signal::Click);
        surface.attach(Signal::Scroll);
        assert!(surface.listens_to(Signal::Click));
        surface.detach_all();
        assert!(!surface.listens_to(Signal::Click));
        assert!(!surface.listens_to(Signal::Scroll));
    }
}
