// config.rs - Construction-time settings for a Life session

use std::time::Duration;

use crate::error::{LifeError, Result};
use crate::grid::Dimensions;
use crate::render::StrategyKind;

#[derive(Clone, Debug, PartialEq)]
pub struct LifeConfig {
    pub width: usize,
    pub height: usize,
    /// Scheduled steps per second while running.
    pub fps: u32,
    pub strategy: StrategyKind,
    /// Side of one cell in surface pixels.
    pub cell_size: f32,
    /// Extra rows/columns materialized around the visible window.
    pub overscan: usize,
    /// Seed for `randomize`; entropy when unset.
    pub seed: Option<u64>,
    /// Stop the loop when a step reproduces one of the last few boards.
    pub stop_on_cycle: bool,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 60,
            fps: 25,
            strategy: StrategyKind::Windowed,
            cell_size: 12.0,
            overscan: 2,
            seed: None,
            stop_on_cycle: false,
        }
    }
}

impl LifeConfig {
    pub fn validate(&self) -> Result<()> {
        Dimensions::new(self.width, self.height)?;
        validate_fps(self.fps)?;
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(LifeError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        frame_interval(self.fps)
    }
}

pub(crate) fn validate_fps(fps: u32) -> Result<()> {
    if fps == 0 {
        return Err(LifeError::InvalidFps(fps));
    }
    Ok(())
}

/// `1000 / fps` milliseconds. `fps` must be non-zero.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LifeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_interval(), Duration::from_millis(40));
    }

    #[test]
    fn each_bad_field_is_reported() {
        let zero_width = LifeConfig { width: 0, ..LifeConfig::default() };
        assert!(matches!(
            zero_width.validate(),
            Err(LifeError::InvalidDimension { width: 0, .. })
        ));

        let zero_fps = LifeConfig { fps: 0, ..LifeConfig::default() };
        assert_eq!(zero_fps.validate(), Err(LifeError::InvalidFps(0)));

        let flat_cells = LifeConfig { cell_size: 0.0, ..LifeConfig::default() };
        assert_eq!(flat_cells.validate(), Err(LifeError::InvalidCellSize(0.0)));

        let nan_cells = LifeConfig { cell_size: f32::NAN, ..LifeConfig::default() };
        assert!(matches!(nan_cells.validate(), Err(LifeError::InvalidCellSize(_))));
    }
}
