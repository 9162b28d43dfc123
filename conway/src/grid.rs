// grid.rs - Board types for Conway's Game of Life

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{LifeError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

/// Validated board size. Both sides are at least one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn check(&self, row: usize, col: usize) -> Result<()> {
        if self.contains(row, col) {
            Ok(())
        } else {
            Err(LifeError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Logical (row, col) address of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// `height` rows of `width` cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl Board {
    pub fn dead(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![Cell::Dead; dims.cell_count()],
        }
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.dims.width + col
    }

    /// Panics when `(row, col)` is outside the board; callers index validated coordinates.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        assert!(self.dims.contains(row, col), "cell ({row}, {col}) out of range");
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        self.dims.check(row, col)?;
        let idx = self.index(row, col);
        self.cells[idx] = cell;
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.dims.width;
        &self.cells[start..start + self.dims.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.dims.width)
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn hash_cells(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.dims.hash(&mut hasher);
        self.cells.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_dimensions_are_rejected() {
        assert_eq!(
            Dimensions::new(0, 4),
            Err(LifeError::InvalidDimension { width: 0, height: 4 })
        );
        assert!(Dimensions::new(3, 0).is_err());
        assert!(Dimensions::new(1, 1).is_ok());
    }

    #[test]
    fn rows_have_exactly_width_cells() {
        let board = Board::dead(Dimensions::new(7, 3).unwrap());
        assert_eq!(board.rows().count(), 3);
        assert!(board.rows().all(|row| row.len() == 7));
    }

    #[test]
    fn set_outside_board_reports_coordinates() {
        let mut board = Board::dead(Dimensions::new(4, 2).unwrap());
        let err = board.set(2, 0, Cell::Alive).unwrap_err();
        assert_eq!(
            err,
            LifeError::OutOfBounds { row: 2, col: 0, width: 4, height: 2 }
        );
        assert_eq!(board.population(), 0);
    }
}
