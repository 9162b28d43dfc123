// ui.rs - eframe front end: controls, stats and painting of the presentation surface

use std::cell::Cell;
use std::rc::Rc;

use conway::patterns::PATTERNS;
use conway::{ClickEvent, Controller, ScrollEvent, StrategyKind, SurfaceHandle, TokioScheduler};
use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use tracing::warn;

pub struct ConwayApp {
    life: Controller<TokioScheduler>,
    surface: SurfaceHandle,
    width_input: usize,
    height_input: usize,
    selected_pattern: usize,
    live_color: Color32,
    dead_color: Color32,
    // Written by the controller's observers.
    last_tick_ms: Rc<Cell<f64>>,
    start_enabled: Rc<Cell<bool>>,
    last_scroll: Option<(f32, f32)>,
    last_container: Option<(f32, f32)>,
    error: Option<String>,
}

impl ConwayApp {
    pub fn new(mut life: Controller<TokioScheduler>) -> Self {
        let last_tick_ms = Rc::new(Cell::new(life.last_render_ms()));
        let start_enabled = Rc::new(Cell::new(!life.is_running()));

        let tick_ms = Rc::clone(&last_tick_ms);
        life.on_tick(move |ms| tick_ms.set(ms));
        let on_start = Rc::clone(&start_enabled);
        life.on_start(move || on_start.set(false));
        let on_stop = Rc::clone(&start_enabled);
        life.on_stop(move || on_stop.set(true));

        let dims = life.dims();
        Self {
            surface: life.surface(),
            life,
            width_input: dims.width(),
            height_input: dims.height(),
            selected_pattern: 0,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            last_tick_ms,
            start_enabled,
            last_scroll: None,
            last_container: None,
            error: None,
        }
    }

    fn report(&mut self, result: conway::Result<()>) {
        match result {
            Ok(()) => self.error = None,
            Err(err) => {
                warn!(%err, "rejected");
                self.error = Some(err.to_string());
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let start_enabled = self.start_enabled.get();
            if ui.add_enabled(start_enabled, egui::Button::new("▶ Start")).clicked() {
                self.life.start();
            }
            if ui.add_enabled(!start_enabled, egui::Button::new("⏸ Stop")).clicked() {
                self.life.stop();
            }
            if ui.button("⏭ Tick").clicked() {
                self.life.tick();
            }
            if ui.button("🎲 Random").clicked() {
                self.life.randomize();
            }
            if ui.button("⏹ Clear").clicked() {
                self.life.clear();
            }

            ui.separator();

            ui.label("Width:");
            let width = ui.add(egui::DragValue::new(&mut self.width_input).clamp_range(1..=5000));
            ui.label("Height:");
            let height = ui.add(egui::DragValue::new(&mut self.height_input).clamp_range(1..=5000));
            let committed = |r: &egui::Response| r.lost_focus() || r.drag_released();
            if committed(&width) || committed(&height) {
                let dims = self.life.dims();
                if (self.width_input, self.height_input) != (dims.width(), dims.height()) {
                    let result = self.life.resize(self.width_input, self.height_input);
                    self.report(result);
                }
            }

            ui.separator();

            ui.label("Renderer:");
            let current = self.life.strategy_kind();
            let mut chosen = None;
            egui::ComboBox::from_id_source("strategy_selector")
                .selected_text(current.as_str())
                .show_ui(ui, |ui| {
                    for kind in StrategyKind::ALL {
                        if ui.selectable_label(kind == current, kind.as_str()).clicked() {
                            chosen = Some(kind);
                        }
                    }
                });
            if let Some(kind) = chosen.filter(|kind| *kind != current) {
                let result = self.life.switch_render_strategy(kind.as_str());
                self.report(result);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Pattern:");
            egui::ComboBox::from_id_source("pattern_selector")
                .selected_text(PATTERNS[self.selected_pattern].name)
                .show_ui(ui, |ui| {
                    for (i, pattern) in PATTERNS.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                    }
                });
            if ui.button("Apply Pattern").clicked() {
                let result = self.life.apply_pattern(PATTERNS[self.selected_pattern].name);
                self.report(result);
            }

            ui.separator();

            ui.label("Speed:");
            let mut fps = self.life.fps();
            if ui
                .add(egui::Slider::new(&mut fps, 1..=90).suffix(" gen/sec"))
                .changed()
            {
                let result = self.life.set_fps(fps);
                self.report(result);
            }

            ui.separator();

            ui.label("Live:");
            ui.color_edit_button_srgba(&mut self.live_color);
            ui.label("Dead:");
            ui.color_edit_button_srgba(&mut self.dead_color);
        });

        if let Some(error) = &self.error {
            ui.colored_label(Color32::LIGHT_RED, error);
        }
    }

    fn stats(&self, ui: &mut egui::Ui) {
        let engine = self.life.engine();
        let total = self.life.dims().cell_count();
        let live = engine.population();
        ui.horizontal(|ui| {
            ui.label(format!("Generation: {}", engine.generation()));
            ui.separator();
            ui.label(format!("Live cells: {live}"));
            ui.label(format!("Population: {:.1}%", live as f32 / total as f32 * 100.0));
            ui.separator();
            ui.label(format!("Render: {:.5}ms", self.last_tick_ms.get()));
            ui.label(format!("Units: {}", self.surface.borrow().unit_count()));
        });
    }

    fn board(&mut self, ui: &mut egui::Ui) {
        let surface = &self.surface;
        let live_color = self.live_color;
        let dead_color = self.dead_color;

        let output = egui::ScrollArea::both()
            .auto_shrink([false; 2])
            .show_viewport(ui, |ui, viewport| {
                let surface = surface.borrow();
                let (width, height) = surface.extent();
                let (response, painter) =
                    ui.allocate_painter(egui::vec2(width, height), egui::Sense::click());
                let origin = response.rect.min;
                let visible = viewport.translate(origin.to_vec2());

                painter.rect_filled(visible, 0.0, Color32::BLACK);

                let size = surface.cell_size();
                let spacing = if size > 4.0 { 0.5 } else { 0.0 };
                for (_, unit) in surface.units() {
                    let (x, y) = surface.origin_of(unit);
                    let rect = Rect::from_min_size(origin + egui::vec2(x, y), Vec2::splat(size - spacing));
                    if !visible.intersects(rect) {
                        continue;
                    }
                    let color = if unit.alive { live_color } else { dead_color };
                    painter.rect_filled(rect, 1.0, color);
                }

                let border = if surface.is_active() { live_color } else { Color32::from_gray(60) };
                painter.rect_stroke(visible.shrink(0.5), 0.0, Stroke::new(1.0, border));

                // Handle clicking against the units painted this frame
                let clicked = if response.clicked() {
                    response.interact_pointer_pos().and_then(|pos| {
                        let local = pos - origin;
                        surface.hit_test(local.x, local.y)
                    })
                } else {
                    None
                };
                (viewport, clicked)
            });

        let (viewport, clicked) = output.inner;

        // Before any re-render below invalidates the unit ids painted this frame.
        if let Some(target) = clicked {
            self.life.click(ClickEvent { target });
        }

        let container = (viewport.width(), viewport.height());
        if self.last_container != Some(container) {
            self.last_container = Some(container);
            self.life.set_container_size(container.0, container.1);
            ui.ctx().request_repaint();
        }

        let scroll = (viewport.min.y, viewport.min.x);
        if self.last_scroll != Some(scroll) {
            self.last_scroll = Some(scroll);
            self.life.scroll(ScrollEvent { top: scroll.0, left: scroll.1 });
            ui.ctx().request_repaint();
        }
    }
}

impl eframe::App for ConwayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Run whatever steps became ready since the last frame
        self.life.on_frame();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading("Conway's Game of Life");
            self.controls(ui);
        });

        egui::TopBottomPanel::bottom("stats").show(ctx, |ui| {
            self.stats(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.board(ui);
        });
    }
}
