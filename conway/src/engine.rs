// engine.rs - Toroidal Life simulation: owns the board and advances generations

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::Result;
use crate::grid::{Board, Cell, Dimensions};
use crate::patterns::Pattern;

/// Moore neighbourhood as (row, col) offsets.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

const HISTORY_LEN: usize = 10;

/// Standard B3/S23 transition for one cell.
#[inline]
pub fn next_state(cell: Cell, live_neighbors: u8) -> Cell {
    match (cell, live_neighbors) {
        (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive, // Survival
        (Cell::Dead, 3) => Cell::Alive,                     // Birth
        _ => Cell::Dead,                                    // Death or stays dead
    }
}

pub struct Engine {
    board: Board,
    rng: StdRng,
    generation: u64,
    board_history: [u64; HISTORY_LEN],
    history_count: usize,
    cycle_detected: bool,
}

impl Engine {
    /// Allocates an all-dead board. Fails on a zero width or height.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Same as [`Engine::new`] with a reproducible random source.
    pub fn seeded(width: usize, height: usize, seed: u64) -> Result<Self> {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, rng: StdRng) -> Result<Self> {
        let dims = Dimensions::new(width, height)?;
        Ok(Self {
            board: Board::dead(dims),
            rng,
            generation: 0,
            board_history: [0; HISTORY_LEN],
            history_count: 0,
            cycle_detected: false,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.board.dims()
    }

    /// Completed `advance()` calls since the board was last reset.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.board.population()
    }

    /// True when the last `advance()` produced a board seen in the recent history.
    #[inline]
    pub fn cycle_detected(&self) -> bool {
        self.cycle_detected
    }

    pub fn randomize(&mut self) {
        let rng = &mut self.rng;
        for cell in self.board.cells_mut() {
            *cell = Cell::from(rng.gen_bool(0.5));
        }
        self.reset_history();
    }

    pub fn clear(&mut self) {
        self.board.cells_mut().fill(Cell::Dead);
        self.reset_history();
    }

    pub fn toggle(&mut self, row: usize, col: usize) -> Result<()> {
        let dims = self.board.dims();
        dims.check(row, col)?;
        let flipped = self.board.cell(row, col).toggled();
        self.board.set(row, col, flipped)
    }

    /// Live cells among the eight neighbours, wrapping both axes independently.
    pub fn count_live_neighbors(&self, row: usize, col: usize) -> u8 {
        count_live_neighbors(&self.board, row, col)
    }

    /// Replaces the board with the next generation, computed from a read-only snapshot.
    pub fn advance(&mut self) {
        let current = &self.board;
        let mut next = Board::dead(current.dims());
        {
            let width = current.width();
            let cells = next.cells_mut();
            for (row, line) in current.rows().enumerate() {
                for (col, &cell) in line.iter().enumerate() {
                    let count = count_live_neighbors(current, row, col);
                    cells[row * width + col] = next_state(cell, count);
                }
            }
        }
        self.board = next;
        self.generation += 1;
        self.cycle_detected = self.record_history();
    }

    /// Discards the board and allocates a dead one. Dimensions are validated first.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        let dims = Dimensions::new(width, height)?;
        debug!(width, height, "reallocating board");
        self.board = Board::dead(dims);
        self.reset_history();
        Ok(())
    }

    /// Clears the board and stamps `pattern` centred on it, wrapping at the edges.
    pub fn apply_pattern(&mut self, pattern: &Pattern) {
        self.board.cells_mut().fill(Cell::Dead);
        let dims = self.board.dims();
        let (rows, cols) = pattern.extent();
        let top = (dims.height() as isize - rows as isize) / 2;
        let left = (dims.width() as isize - cols as isize) / 2;
        for &(dr, dc) in pattern.cells {
            let row = (top + dr as isize).rem_euclid(dims.height() as isize) as usize;
            let col = (left + dc as isize).rem_euclid(dims.width() as isize) as usize;
            // Coordinates are wrapped into range above.
            let _ = self.board.set(row, col, Cell::Alive);
        }
        self.reset_history();
    }

    fn reset_history(&mut self) {
        self.generation = 0;
        self.board_history = [0; HISTORY_LEN];
        self.history_count = 0;
        self.cycle_detected = false;
    }

    fn record_history(&mut self) -> bool {
        let current_hash = self.board.hash_cells();
        let filled = self.history_count.min(HISTORY_LEN);
        if self.board_history[..filled].contains(&current_hash) {
            return true;
        }
        self.board_history[self.history_count % HISTORY_LEN] = current_hash;
        self.history_count += 1;
        false
    }
}

fn count_live_neighbors(board: &Board, row: usize, col: usize) -> u8 {
    let height = board.height() as isize;
    let width = board.width() as isize;
    let mut count = 0;
    for &(dr, dc) in &NEIGHBOR_OFFSETS {
        let nr = (row as isize + dr).rem_euclid(height) as usize;
        let nc = (col as isize + dc).rem_euclid(width) as usize;
        if board.cell(nr, nc).is_alive() {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;

    fn engine_with(width: usize, height: usize, alive: &[(usize, usize)]) -> Engine {
        let mut engine = Engine::seeded(width, height, 7).unwrap();
        for &(row, col) in alive {
            engine.toggle(row, col).unwrap();
        }
        engine
    }

    #[test]
    fn new_board_is_dead() {
        let engine = Engine::new(5, 3).unwrap();
        assert_eq!(engine.population(), 0);
        assert_eq!(engine.dims().width(), 5);
        assert_eq!(engine.dims().height(), 3);
    }

    #[test]
    fn zero_dimensions_fail_before_allocation() {
        assert!(matches!(
            Engine::new(0, 10),
            Err(LifeError::InvalidDimension { width: 0, height: 10 })
        ));
    }

    #[test]
    fn corner_wraps_on_both_axes_with_unequal_sides() {
        // 5 wide, 3 tall: a single live cell at the top-left corner.
        let engine = engine_with(5, 3, &[(0, 0)]);
        assert_eq!(engine.count_live_neighbors(2, 4), 1);
        assert_eq!(engine.count_live_neighbors(2, 0), 1);
        assert_eq!(engine.count_live_neighbors(0, 4), 1);
        assert_eq!(engine.count_live_neighbors(1, 1), 1);
        assert_eq!(engine.count_live_neighbors(1, 2), 0);
        assert_eq!(engine.count_live_neighbors(0, 0), 0);
    }

    #[test]
    fn full_board_counts_eight() {
        let mut engine = Engine::seeded(4, 6, 1).unwrap();
        for row in 0..6 {
            for col in 0..4 {
                engine.toggle(row, col).unwrap();
            }
        }
        assert_eq!(engine.count_live_neighbors(0, 0), 8);
        assert_eq!(engine.count_live_neighbors(5, 3), 8);
    }

    #[test]
    fn toggle_outside_board_is_rejected() {
        let mut engine = Engine::new(3, 3).unwrap();
        assert!(matches!(engine.toggle(3, 0), Err(LifeError::OutOfBounds { .. })));
        assert!(matches!(engine.toggle(0, 3), Err(LifeError::OutOfBounds { .. })));
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn toggle_twice_restores_cell() {
        let mut engine = Engine::new(3, 3).unwrap();
        engine.toggle(1, 2).unwrap();
        assert_eq!(engine.board().cell(1, 2), Cell::Alive);
        engine.toggle(1, 2).unwrap();
        assert_eq!(engine.board().cell(1, 2), Cell::Dead);
    }

    #[test]
    fn transition_table() {
        assert_eq!(next_state(Cell::Alive, 1), Cell::Dead);
        assert_eq!(next_state(Cell::Alive, 2), Cell::Alive);
        assert_eq!(next_state(Cell::Alive, 3), Cell::Alive);
        assert_eq!(next_state(Cell::Alive, 4), Cell::Dead);
        assert_eq!(next_state(Cell::Dead, 3), Cell::Alive);
        assert_eq!(next_state(Cell::Dead, 2), Cell::Dead);
    }

    #[test]
    fn seeded_randomize_is_reproducible() {
        let mut a = Engine::seeded(40, 30, 99).unwrap();
        let mut b = Engine::seeded(40, 30, 99).unwrap();
        a.randomize();
        b.randomize();
        assert_eq!(a.board(), b.board());
        assert!(a.population() > 0);
        assert!(a.population() < 40 * 30);
    }

    #[test]
    fn clear_kills_every_cell_and_resets_generation() {
        let mut engine = Engine::seeded(10, 10, 3).unwrap();
        engine.randomize();
        engine.advance();
        engine.clear();
        assert_eq!(engine.population(), 0);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn still_life_reports_cycle() {
        let mut engine = engine_with(6, 6, &[(2, 2), (2, 3), (3, 2), (3, 3)]);
        engine.advance();
        assert!(!engine.cycle_detected());
        engine.advance();
        assert!(engine.cycle_detected());
    }
}
