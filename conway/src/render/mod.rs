// render/mod.rs - Render strategy interface and the two variants behind it

use std::fmt;
use std::str::FromStr;

use crate::error::LifeError;
use crate::grid::{Board, CellCoord, Dimensions};

pub mod full;
pub mod surface;
pub mod windowed;

pub use full::FullRenderer;
pub use surface::{Placement, PresentationUnit, Signal, Surface, SurfaceHandle, UnitId};
pub use windowed::{IndexRange, ViewportState, WindowedRenderer, visible_range};

/// Raw click on the surface; `target` is the unit under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: UnitId,
}

/// New scroll offsets of the pane showing the surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollEvent {
    pub top: f32,
    pub left: f32,
}

/// Scroll position and visible pane size, carried across strategy switches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub scroll_top: f32,
    pub scroll_left: f32,
    pub container_height: f32,
    pub container_width: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Full,
    #[default]
    Windowed,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Full, StrategyKind::Windowed];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Full => "full",
            StrategyKind::Windowed => "windowed",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(StrategyKind::Full),
            "windowed" => Ok(StrategyKind::Windowed),
            _ => Err(LifeError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Paints a board onto a [`Surface`]. Strategies only read the board.
pub trait RenderStrategy {
    fn kind(&self) -> StrategyKind;

    /// Attach presentation state sized for `dims`.
    fn prepare(&mut self, dims: Dimensions);

    fn render(&mut self, board: &Board);

    /// Tear down presentation state, keeping event subscriptions.
    fn clear(&mut self);

    /// Tear down everything, event subscriptions included.
    fn destroy(&mut self);

    /// Decode the logical cell a click landed on.
    fn locate_click(&self, event: ClickEvent) -> Option<CellCoord>;

    /// Returns true if the visible window depends on scroll position.
    fn scroll(&mut self, _event: ScrollEvent) -> bool {
        false
    }

    /// Returns true if the visible window depends on the pane size.
    fn resize_container(&mut self, _width: f32, _height: f32) -> bool {
        false
    }
}

pub fn build(
    kind: StrategyKind,
    surface: SurfaceHandle,
    viewport: Viewport,
    overscan: usize,
) -> Box<dyn RenderStrategy> {
    match kind {
        StrategyKind::Full => Box::new(FullRenderer::new(surface)),
        StrategyKind::Windowed => Box::new(WindowedRenderer::new(surface, viewport, overscan)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip_through_display() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        }
        assert_eq!(" Windowed ".parse::<StrategyKind>(), Ok(StrategyKind::Windowed));
    }

    #[test]
    fn unknown_strategy_name_is_reported() {
        assert_eq!(
            "canvas".parse::<StrategyKind>(),
            Err(LifeError::UnknownStrategy("canvas".into()))
        );
        assert!("virtual".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn build_attaches_the_signals_each_variant_needs() {
        let surface = Surface::new(6.0).into_handle();
        let mut full = build(StrategyKind::Full, surface.clone(), Viewport::default(), 0);
        assert_eq!(full.kind(), StrategyKind::Full);
        assert!(surface.borrow().listens_to(Signal::Click));
        assert!(!surface.borrow().listens_to(Signal::Scroll));
        full.destroy();

        let windowed = build(StrategyKind::Windowed, surface.clone(), Viewport::default(), 0);
        assert_eq!(windowed.kind(), StrategyKind::Windowed);
        assert!(surface.borrow().listens_to(Signal::Scroll));
    }
}
