// main.rs - Desktop front end for the toroidal Game of Life (eframe), with a headless mode

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use conway::{Controller, ImmediateScheduler, LifeConfig, StrategyKind, TokioScheduler};
use eframe::egui;
use tracing::{debug, info};

mod ui;

use ui::ConwayApp;

#[derive(Parser, Debug)]
#[command(
    name = "conway_ui",
    version,
    about = "Toroidal Game of Life with full and viewport-windowed rendering"
)]
struct Cli {
    /// Board width in cells.
    #[arg(long, env = "CONWAY_WIDTH", default_value_t = 100)]
    width: usize,

    /// Board height in cells.
    #[arg(long, env = "CONWAY_HEIGHT", default_value_t = 60)]
    height: usize,

    /// Generations per second while running.
    #[arg(long, env = "CONWAY_FPS", default_value_t = 25)]
    fps: u32,

    /// Render strategy: `full` or `windowed`.
    #[arg(long, env = "CONWAY_STRATEGY", default_value_t = StrategyKind::Windowed)]
    strategy: StrategyKind,

    /// Cell side in pixels.
    #[arg(long, env = "CONWAY_CELL_SIZE", default_value_t = 12.0)]
    cell_size: f32,

    /// Rows/columns rendered beyond the visible window.
    #[arg(long, env = "CONWAY_OVERSCAN", default_value_t = 2)]
    overscan: usize,

    /// Seed for the random board; entropy when omitted.
    #[arg(long, env = "CONWAY_SEED")]
    seed: Option<u64>,

    /// Stop running once the board repeats a recent generation.
    #[arg(long)]
    stop_on_cycle: bool,

    /// Run this many generations without a window and exit.
    #[arg(long, value_name = "GENERATIONS")]
    headless: Option<u64>,
}

impl Cli {
    fn config(&self) -> LifeConfig {
        LifeConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            strategy: self.strategy,
            cell_size: self.cell_size,
            overscan: self.overscan,
            seed: self.seed,
            stop_on_cycle: self.stop_on_cycle,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config();
    config.validate().context("invalid configuration")?;

    match cli.headless {
        Some(generations) => run_headless(&config, generations),
        None => run_windowed(config),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run_headless(config: &LifeConfig, generations: u64) -> Result<()> {
    let mut life = Controller::new(config, ImmediateScheduler::new())
        .context("failed to build life session")?;
    if generations == 0 {
        info!(population = life.engine().population(), "nothing to run");
        return Ok(());
    }

    life.start();
    while life.is_running() && life.engine().generation() < generations {
        life.on_frame();
        debug!(
            generation = life.engine().generation(),
            population = life.engine().population(),
            "step"
        );
    }
    life.stop();

    info!(
        generation = life.engine().generation(),
        population = life.engine().population(),
        last_render_ms = life.last_render_ms(),
        "headless run finished"
    );
    Ok(())
}

fn run_windowed(config: LifeConfig) -> Result<()> {
    // Filled in once eframe hands us a context; ready steps request a repaint through it.
    let repaint: Arc<OnceLock<egui::Context>> = Arc::new(OnceLock::new());
    let scheduler = TokioScheduler::new()
        .context("failed to start timer runtime")?
        .with_waker({
            let repaint = Arc::clone(&repaint);
            move || {
                if let Some(ctx) = repaint.get() {
                    ctx.request_repaint();
                }
            }
        });
    let life = Controller::new(&config, scheduler).context("failed to build life session")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| {
            let _ = repaint.set(cc.egui_ctx.clone());
            Box::new(ConwayApp::new(life))
        }),
    )
    .map_err(|err| anyhow!("eframe exited with an error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_library_defaults() {
        let cli = Cli::try_parse_from(["conway_ui"]).unwrap();
        let config = cli.config();
        assert_eq!(config, LifeConfig::default());
        assert!(cli.headless.is_none());
    }

    #[test]
    fn cli_parses_strategy_and_headless_run() {
        let cli = Cli::try_parse_from([
            "conway_ui",
            "--strategy",
            "full",
            "--width",
            "40",
            "--seed",
            "7",
            "--headless",
            "12",
        ])
        .unwrap();
        assert_eq!(cli.strategy, StrategyKind::Full);
        assert_eq!(cli.config().width, 40);
        assert_eq!(cli.config().seed, Some(7));
        assert_eq!(cli.headless, Some(12));
    }

    #[test]
    fn cli_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["conway_ui", "--strategy", "canvas"]).is_err());
    }

    #[test]
    fn headless_run_completes() {
        let config = LifeConfig {
            width: 16,
            height: 12,
            seed: Some(3),
            ..LifeConfig::default()
        };
        run_headless(&config, 10).unwrap();
    }
}
