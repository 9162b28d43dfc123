// error.rs - Errors raised by the board, strategies and controller

use thiserror::Error;

/// Errors produced while building or mutating a Life session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifeError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidDimension { width: usize, height: usize },
    #[error("cell ({row}, {col}) is outside the {width}x{height} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
    #[error("unknown render strategy: {0}")]
    UnknownStrategy(String),
    #[error("frame rate must be at least 1 fps, got {0}")]
    InvalidFps(u32),
    #[error("cell size must be a positive number of pixels, got {0}")]
    InvalidCellSize(f32),
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),
}

pub type Result<T> = std::result::Result<T, LifeError>;
