// windowed.rs - Materializes only the cells inside the scrolled viewport plus an overscan margin

use std::ops::RangeInclusive;

use tracing::trace;

use super::surface::{Placement, PresentationUnit, Signal, SurfaceHandle};
use super::{ClickEvent, RenderStrategy, ScrollEvent, StrategyKind, Viewport};
use crate::grid::{Board, CellCoord, Dimensions};

/// Scroll position, pane size and cell geometry the visible window is derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub scroll_top: f32,
    pub scroll_left: f32,
    pub container_height: f32,
    pub container_width: f32,
    pub cell_size: f32,
    pub overscan: usize,
}

impl ViewportState {
    pub fn new(viewport: Viewport, cell_size: f32, overscan: usize) -> Self {
        Self {
            scroll_top: non_negative(viewport.scroll_top),
            scroll_left: non_negative(viewport.scroll_left),
            container_height: non_negative(viewport.container_height),
            container_width: non_negative(viewport.container_width),
            cell_size,
            overscan,
        }
    }

    pub fn visible_rows(&self, height: usize) -> IndexRange {
        visible_range(
            self.scroll_top,
            self.container_height,
            self.cell_size,
            self.overscan,
            height,
        )
    }

    pub fn visible_cols(&self, width: usize) -> IndexRange {
        visible_range(
            self.scroll_left,
            self.container_width,
            self.cell_size,
            self.overscan,
            width,
        )
    }
}

/// Inclusive, never-empty range of row or column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRange {
    pub first: usize,
    pub last: usize,
}

impl IndexRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    #[inline]
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// `floor(offset / cell) - overscan ..= ceil((offset + span) / cell) + overscan`,
/// clamped to `0..=len - 1`.
pub fn visible_range(
    offset: f32,
    span: f32,
    cell_size: f32,
    overscan: usize,
    len: usize,
) -> IndexRange {
    let max_index = len.saturating_sub(1);
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return IndexRange { first: 0, last: max_index };
    }
    let cell = f64::from(cell_size);
    let offset = f64::from(non_negative(offset));
    let span = f64::from(non_negative(span));
    let margin = overscan as f64;

    let first = (offset / cell).floor() - margin;
    let last = ((offset + span) / cell).ceil() + margin;
    let bound = max_index as f64;
    IndexRange {
        first: first.clamp(0.0, bound) as usize,
        last: last.clamp(0.0, bound) as usize,
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

pub struct WindowedRenderer {
    surface: SurfaceHandle,
    viewport: ViewportState,
    window: Option<(IndexRange, IndexRange)>,
}

impl WindowedRenderer {
    pub fn new(surface: SurfaceHandle, viewport: Viewport, overscan: usize) -> Self {
        let cell_size = {
            let mut surface = surface.borrow_mut();
            surface.attach(Signal::Click);
            surface.attach(Signal::Scroll);
            surface.cell_size()
        };
        Self {
            surface,
            viewport: ViewportState::new(viewport, cell_size, overscan),
            window: None,
        }
    }

    /// Row and column ranges materialized by the last render.
    pub fn window(&self) -> Option<(IndexRange, IndexRange)> {
        self.window
    }
}

impl RenderStrategy for WindowedRenderer {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Windowed
    }

    fn prepare(&mut self, dims: Dimensions) {
        let mut surface = self.surface.borrow_mut();
        surface.remove_all();
        let size = self.viewport.cell_size;
        surface.set_extent(dims.width() as f32 * size, dims.height() as f32 * size);
        self.window = None;
    }

    fn render(&mut self, board: &Board) {
        let rows = self.viewport.visible_rows(board.height());
        let cols = self.viewport.visible_cols(board.width());
        let size = self.viewport.cell_size;

        let mut surface = self.surface.borrow_mut();
        // TODO: diff against the previous window instead of rebuilding every unit.
        surface.remove_all();
        for row in rows.indices() {
            let line = board.row(row);
            for col in cols.indices() {
                surface.append(PresentationUnit {
                    row,
                    col,
                    placement: Placement::Absolute {
                        x: col as f32 * size,
                        y: row as f32 * size,
                    },
                    alive: line[col].is_alive(),
                });
            }
        }
        trace!(?rows, ?cols, units = surface.unit_count(), "window rebuilt");
        self.window = Some((rows, cols));
    }

    fn clear(&mut self) {
        self.surface.borrow_mut().remove_all();
        self.window = None;
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

    fn scroll(&mut self, event: ScrollEvent) -> bool {
        self.viewport.scroll_top = non_negative(event.top);
        self.viewport.scroll_left = non_negative(event.left);
        true
    }

    fn resize_container(&mut self, width: f32, height: f32) -> bool {
        self.viewport.container_width = non_negative(width);
        self.viewport.container_height = non_negative(height);
        true
    }
}
