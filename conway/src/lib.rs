//! Toroidal Game of Life with viewport-windowed rendering.
//!
//! [`Engine`] owns the board and advances generations. A [`RenderStrategy`]
//! paints the board onto a retained [`Surface`], either every cell
//! ([`FullRenderer`]) or only the scrolled window ([`WindowedRenderer`]).
//! [`Controller`] ties both together under a fixed-rate loop whose steps are
//! scheduled through a [`StepScheduler`] and cancelled per run session.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod render;
pub mod schedule;

pub use config::LifeConfig;
pub use controller::{Controller, RunState};
pub use engine::Engine;
pub use error::{LifeError, Result};
pub use grid::{Board, Cell, CellCoord, Dimensions};
pub use render::{
    ClickEvent, FullRenderer, RenderStrategy, ScrollEvent, StrategyKind, Surface, SurfaceHandle,
    Viewport, WindowedRenderer,
};
pub use schedule::{ImmediateScheduler, StepScheduler, TokioScheduler};
