// controller.rs - Run/stop/resize state machine driving the engine and the active render strategy

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{LifeConfig, frame_interval, validate_fps};
use crate::engine::Engine;
use crate::error::Result;
use crate::grid::{Board, Dimensions};
use crate::patterns;
use crate::render::{
    self, ClickEvent, RenderStrategy, ScrollEvent, Signal, StrategyKind, Surface, SurfaceHandle,
    Viewport,
};
use crate::schedule::{PendingStep, RunToken, StepScheduler};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

#[derive(Default)]
struct Observers {
    on_start: Option<Box<dyn FnMut()>>,
    on_stop: Option<Box<dyn FnMut()>>,
    on_tick: Option<Box<dyn FnMut(f64)>>,
}

pub struct Controller<S: StepScheduler> {
    engine: Engine,
    strategy: Box<dyn RenderStrategy>,
    surface: SurfaceHandle,
    scheduler: S,
    run_state: RunState,
    token: RunToken,
    sessions: u64,
    fps: u32,
    overscan: usize,
    viewport: Viewport,
    stop_on_cycle: bool,
    last_render_ms: f64,
    observers: Observers,
}

impl<S: StepScheduler> Controller<S> {
    /// Validates `config`, seeds a random board and renders it once.
    pub fn new(config: &LifeConfig, scheduler: S) -> Result<Self> {
        config.validate()?;
        let mut engine = match config.seed {
            Some(seed) => Engine::seeded(config.width, config.height, seed)?,
            None => Engine::new(config.width, config.height)?,
        };
        let surface = Surface::new(config.cell_size).into_handle();
        let viewport = Viewport::default();
        let mut strategy = render::build(config.strategy, surface.clone(), viewport, config.overscan);
        strategy.prepare(engine.dims());
        engine.randomize();

        let token = RunToken::new(0);
        token.cancel();

        let mut controller = Self {
            engine,
            strategy,
            surface,
            scheduler,
            run_state: RunState::Idle,
            token,
            sessions: 0,
            fps: config.fps,
            overscan: config.overscan,
            viewport,
            stop_on_cycle: config.stop_on_cycle,
            last_render_ms: 0.0,
            observers: Observers::default(),
        };
        controller.render();
        info!(
            width = config.width,
            height = config.height,
            strategy = %config.strategy,
            fps = config.fps,
            "life session created"
        );
        Ok(controller)
    }

    pub fn on_start(&mut self, callback: impl FnMut() + 'static) {
        self.observers.on_start = Some(Box::new(callback));
    }

    pub fn on_stop(&mut self, callback: impl FnMut() + 'static) {
        self.observers.on_stop = Some(Box::new(callback));
    }

    /// Receives the wall-clock cost in milliseconds of every completed render.
    pub fn on_tick(&mut self, callback: impl FnMut(f64) + 'static) {
        self.observers.on_tick = Some(Box::new(callback));
    }

    pub fn start(&mut self) {
        if self.run_state == RunState::Running {
            return;
        }
        self.run_state = RunState::Running;
        let token = self.fresh_token();
        self.surface.borrow_mut().set_active(true);
        info!(session = token.session(), "simulation started");
        self.run_step(token);
        if let Some(callback) = self.observers.on_start.as_mut() {
            callback();
        }
    }

    pub fn stop(&mut self) {
        if self.run_state == RunState::Idle {
            return;
        }
        self.run_state = RunState::Idle;
        self.token.cancel();
        self.surface.borrow_mut().set_active(false);
        info!(
            session = self.token.session(),
            generation = self.engine.generation(),
            "simulation stopped"
        );
        if let Some(callback) = self.observers.on_stop.as_mut() {
            callback();
        }
    }

    /// Single manual step. Leaves the run state alone.
    pub fn tick(&mut self) {
        let started = Instant::now();
        self.engine.advance();
        self.strategy.render(self.engine.board());
        self.finish_render(started);
    }

    pub fn randomize(&mut self) {
        self.engine.randomize();
        self.render();
    }

    pub fn clear(&mut self) {
        self.engine.clear();
        self.render();
    }

    pub fn apply_pattern(&mut self, name: &str) -> Result<()> {
        let pattern = patterns::find(name)?;
        self.engine.apply_pattern(pattern);
        debug!(pattern = pattern.name, "pattern applied");
        self.render();
        Ok(())
    }

    /// Flips one cell while idle. Returns whether the board changed.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        if self.run_state == RunState::Running {
            debug!(row, col, "ignoring edit while running");
            return false;
        }
        match self.engine.toggle(row, col) {
            Ok(()) => {
                self.render();
                true
            }
            Err(err) => {
                debug!(%err, "dropping stale click");
                false
            }
        }
    }

    /// Forwards a click on the surface into [`Controller::toggle_cell`].
    pub fn click(&mut self, event: ClickEvent) -> bool {
        if !self.surface.borrow().listens_to(Signal::Click) {
            return false;
        }
        match self.strategy.locate_click(event) {
            Some(coord) => self.toggle_cell(coord.row, coord.col),
            None => false,
        }
    }

    /// New scroll offsets. Re-renders at once only while idle; a running loop repaints anyway.
    pub fn scroll(&mut self, event: ScrollEvent) {
        self.viewport.scroll_top = event.top;
        self.viewport.scroll_left = event.left;
        if !self.surface.borrow().listens_to(Signal::Scroll) {
            return;
        }
        if self.strategy.scroll(event) && self.run_state == RunState::Idle {
            self.render();
        }
    }

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.viewport.container_width = width;
        self.viewport.container_height = height;
        if self.strategy.resize_container(width, height) && self.run_state == RunState::Idle {
            self.render();
        }
    }

    /// Replaces the board with a random one of the new size, restarting the loop if it was running.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        let dims = Dimensions::new(width, height)?;
        let was_running = self.run_state == RunState::Running;
        if was_running {
            self.token.cancel();
        }

        self.engine.resize(dims.width(), dims.height())?;
        self.strategy.clear();
        self.strategy.prepare(dims);
        self.engine.randomize();
        info!(width, height, restarted = was_running, "board resized");

        if was_running {
            let token = self.fresh_token();
            self.run_step(token);
        } else {
            self.render();
        }
        Ok(())
    }

    /// Tears down the active strategy and renders once through a fresh `kind` strategy.
    pub fn switch_render_strategy(&mut self, kind: &str) -> Result<()> {
        let kind: StrategyKind = kind.parse()?;
        self.strategy.destroy();
        let mut strategy = render::build(kind, self.surface.clone(), self.viewport, self.overscan);
        strategy.prepare(self.engine.dims());
        self.strategy = strategy;
        info!(strategy = %kind, "render strategy switched");
        self.render();
        Ok(())
    }

    /// Takes effect from the next scheduled step.
    pub fn set_fps(&mut self, fps: u32) -> Result<()> {
        validate_fps(fps)?;
        self.fps = fps;
        Ok(())
    }

    /// Frame callback: runs every step whose delay has elapsed. Returns how many did work.
    pub fn on_frame(&mut self) -> usize {
        let mut executed = 0;
        for step in self.scheduler.drain_ready() {
            if self.run_step(step.token().clone()) {
                executed += 1;
            }
        }
        executed
    }

    fn run_step(&mut self, token: RunToken) -> bool {
        if token.is_cancelled()
            || token.session() != self.token.session()
            || self.run_state != RunState::Running
        {
            debug!(session = token.session(), "abandoning cancelled step");
            return false;
        }

        let started = Instant::now();
        self.engine.advance();
        self.strategy.render(self.engine.board());
        self.finish_render(started);

        if self.stop_on_cycle && self.engine.cycle_detected() {
            info!(generation = self.engine.generation(), "board repeats, stopping");
            self.stop();
            return true;
        }

        self.scheduler
            .schedule(PendingStep::new(token), frame_interval(self.fps));
        true
    }

    fn fresh_token(&mut self) -> RunToken {
        self.sessions += 1;
        self.token = RunToken::new(self.sessions);
        self.token.clone()
    }

    fn render(&mut self) {
        let started = Instant::now();
        self.strategy.render(self.engine.board());
        self.finish_render(started);
    }

    fn finish_render(&mut self, started: Instant) {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.last_render_ms = elapsed_ms;
        if let Some(callback) = self.observers.on_tick.as_mut() {
            callback(elapsed_ms);
        }
    }

    #[inline]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.engine.dims()
    }

    #[inline]
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> SurfaceHandle {
        self.surface.clone()
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn last_render_ms(&self) -> f64 {
        self.last_render_ms
    }
}
