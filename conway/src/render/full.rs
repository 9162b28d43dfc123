// full.rs - Renders every cell through a unit allocated once per prepare()

use tracing::debug;

use super::surface::{Placement, PresentationUnit, Signal, SurfaceHandle, UnitId};
use super::{ClickEvent, RenderStrategy, StrategyKind};
use crate::grid::{Board, CellCoord, Dimensions};

pub struct FullRenderer {
    surface: SurfaceHandle,
    units: Vec<UnitId>,
    width: usize,
}

impl FullRenderer {
    pub fn new(surface: SurfaceHandle) -> Self {
        surface.borrow_mut().attach(Signal::Click);
        Self {
            surface,
            units: Vec::new(),
            width: 0,
        }
    }
}

impl RenderStrategy for FullRenderer {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Full
    }

    fn prepare(&mut self, dims: Dimensions) {
        let mut surface = self.surface.borrow_mut();
        surface.remove_all();
        let size = surface.cell_size();
        surface.set_extent(dims.width() as f32 * size, dims.height() as f32 * size);

        self.units.clear();
        self.units.reserve(dims.cell_count());
        for row in 0..dims.height() {
            for col in 0..dims.width() {
                let id = surface.append(PresentationUnit {
                    row,
                    col,
                    placement: Placement::Flow,
                    alive: false,
                });
                self.units.push(id);
            }
        }
        self.width = dims.width();
        debug!(units = self.units.len(), "full renderer prepared");
    }

    fn render(&mut self, board: &Board) {
        let mut surface = self.surface.borrow_mut();
        for (row, line) in board.rows().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if let Some(&id) = self.units.get(row * self.width + col) {
                    surface.set_alive(id, cell.is_alive());
                }
            }
        }
    }

    fn clear(&mut self) {
        self.surface.borrow_mut().remove_all();
        self.units.clear();
        self.width = 0;
    }

    fn destroy(&mut self) {
        self.clear();
        self.surface.borrow_mut().detach_all();
    }

    fn locate_click(&self, event: ClickEvent) -> Option<CellCoord> {
        let surface = self.surface.borrow();
        surface
            .unit(event.target)
            .map(|unit| CellCoord::new(unit.row, unit.col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::render::surface::Surface;

    #[test]
    fn prepare_allocates_one_unit_per_cell() {
        let surface = Surface::new(5.0).into_handle();
        let mut renderer = FullRenderer::new(surface.clone());
        renderer.prepare(Dimensions::new(7, 4).unwrap());
        assert_eq!(surface.borrow().unit_count(), 28);
        assert_eq!(surface.borrow().extent(), (35.0, 20.0));
    }

    #[test]
    fn render_mirrors_board_state() {
        let surface = Surface::new(5.0).into_handle();
        let mut renderer = FullRenderer::new(surface.clone());
        let dims = Dimensions::new(3, 2).unwrap();
        renderer.prepare(dims);

        let mut board = Board::dead(dims);
        board.set(1, 2, Cell::Alive).unwrap();
        renderer.render(&board);

        let surface = surface.borrow();
        let alive: Vec<_> = surface
            .units()
            .filter(|(_, unit)| unit.alive)
            .map(|(_, unit)| (unit.row, unit.col))
            .collect();
        assert_eq!(alive, vec![(1, 2)]);
    }

    #[test]
    fn clear_keeps_listeners_destroy_drops_them() {
        let surface = Surface::new(5.0).into_handle();
        let mut renderer = FullRenderer::new(surface.clone());
        renderer.prepare(Dimensions::new(2, 2).unwrap());

        renderer.clear();
        assert_eq!(surface.borrow().unit_count(), 0);
        assert!(surface.borrow().listens_to(Signal::Click));

        renderer.destroy();
        assert!(!surface.borrow().listens_to(Signal::Click));
    }
}
