//! Interactive gravity sandbox built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] plus the
//! UI state (camera, selected size, timing) and implements [`eframe::App`]
//! to draw the bodies and feed user input into the simulation.

use eframe::App;
use glam::Vec2;
use log::error;
use rand::rng;
use sim_core::{MASS_AMPLIFY, SizeTier, SpawnRequest, simulation::Simulation};

use crate::settings::ViewConfig;

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle keyboard and pointer input (size selection, gravity toggle,
///    spawn requests, panning, zoom).
/// 2. If `running` is `true` and a full frame interval has passed, call
///    [`Viewer::step_once`].
/// 3. Render bodies, their net force lines and the cursor preview.
///
/// ### Fields
/// - `sim` - The simulation context (bodies, scratch matrix, gravity flag).
/// - `cfg` - Viewer settings (frame rate, drawing scale, scatter count).
/// - `tier` - Size tier used for the next spawned body.
/// - `rng` - Random number generator used by the scatter tool.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `canvas` - Drawing area of the last frame.
///
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps.
/// - `last_error` - Message of the last failed step, shown in the status bar.
pub struct Viewer {
    sim: Simulation,
    cfg: ViewConfig,
    tier: SizeTier,

    rng: rand::rngs::ThreadRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    canvas: egui::Rect,

    last_step_time: f64,
    last_step_dt: f64,
    last_error: Option<String>,
}

/// Digit of a number key, `1..=9`.
fn number_key(key: egui::Key) -> Option<u32> {
    use egui::Key::*;
    match key {
        Num1 => Some(1),
        Num2 => Some(2),
        Num3 => Some(3),
        Num4 => Some(4),
        Num5 => Some(5),
        Num6 => Some(6),
        Num7 => Some(7),
        Num8 => Some(8),
        Num9 => Some(9),
        _ => None,
    }
}

/// Side length, in world units, of the square marking a body of `mass`.
fn marker_side(mass: f32) -> f32 {
    let size = mass / MASS_AMPLIFY;
    size * size
}

impl Viewer {
    /// Creates a viewer around an empty simulation, running, with no pan
    /// and unit zoom, so world coordinates coincide with window pixels.
    ///
    /// ### Errors
    /// Fails if the simulation cannot be created from `cfg.sim` or the
    /// configured size tier is invalid.
    pub fn new(cfg: ViewConfig) -> anyhow::Result<Self> {
        let sim = Simulation::new(cfg.sim)?;
        let tier = SizeTier::new(cfg.size_tier)?;
        let canvas = egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(cfg.window_width, cfg.window_height),
        );

        Ok(Self {
            sim,
            cfg,
            tier,
            rng: rng(),
            running: true,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            canvas,
            last_step_time: 0.0,
            last_step_dt: 0.0,
            last_error: None,
        })
    }

    /// Removes every body. The camera and settings are kept.
    fn clear(&mut self) {
        self.sim.clear();
        self.last_error = None;
    }

    /// Advances the simulation by a single frame.
    ///
    /// A failing step (the scratch matrix could not grow) pauses the
    /// viewer and keeps the message for the status bar.
    fn step_once(&mut self) {
        if let Err(e) = self.sim.step() {
            error!("simulation step failed: {e}");
            self.last_error = Some(e.to_string());
            self.running = false;
        }
    }

    /// Spawns a body at `pos` with the selected tier.
    ///
    /// While running, the spawn is queued for the next step; while paused
    /// it happens right away so the body shows up immediately.
    fn spawn_at(&mut self, pos: Vec2) {
        let request = SpawnRequest::new(pos, self.tier);
        if self.running {
            self.sim.request_spawn(request);
        } else if let Err(e) = self.sim.spawn(request.position, request.tier) {
            error!("spawn failed: {e}");
            self.last_error = Some(e.to_string());
        }
    }

    /// Scatters `cfg.scatter_count` bodies over the visible area.
    fn scatter(&mut self) {
        let min = self.screen_to_world(self.canvas.min, self.canvas);
        let max = self.screen_to_world(self.canvas.max, self.canvas);
        let center = (min + max) * 0.5;
        let half_extents = (max - min).abs() * 0.5;

        if let Err(e) = self.sim.scatter(
            center,
            half_extents,
            self.cfg.scatter_count,
            self.tier,
            &mut self.rng,
        ) {
            error!("scatter failed: {e}");
            self.last_error = Some(e.to_string());
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are window pixels (y down), scaled by `zoom`
    /// and offset by `pan` from the top-left corner of `rect`.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(
            rect.min.x + p.x * self.zoom + self.pan.x,
            rect.min.y + p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(
            (p.x - rect.min.x - self.pan.x) / self.zoom,
            (p.y - rect.min.y - self.pan.y) / self.zoom,
        )
    }

    /// Screen side of the cursor preview: the marker of a body of the
    /// selected tier at the current zoom.
    fn preview_side(&self) -> f32 {
        marker_side(self.tier.mass().get()) * self.zoom
    }

    /// Applies keyboard shortcuts: `1`-`9` select a size tier, `G`
    /// toggles gravity, `Space` toggles running.
    ///
    /// Only the initial press counts; auto-repeat events of a held key are
    /// ignored so toggles do not flicker.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        let pressed: Vec<egui::Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });

        for key in pressed {
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: egui::Key) {
        if let Some(tier) = number_key(key).and_then(SizeTier::from_number_key) {
            self.tier = tier;
            return;
        }
        match key {
            egui::Key::G => self.sim.toggle_gravity(),
            egui::Key::Space => self.running = !self.running,
            _ => {}
        }
    }

    /// Builds the top panel UI (run controls, stepping, gravity, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                if ui.button("Scatter").clicked() {
                    self.scatter();
                }

                ui.separator();
                let mut gravity = self.sim.gravity_enabled();
                if ui.checkbox(&mut gravity, "Gravity (G)").changed() {
                    self.sim.set_gravity_enabled(gravity);
                }

                ui.separator();
                let mut tier = self.tier.get();
                if ui
                    .add(egui::Slider::new(&mut tier, 1..=sim_core::types::MAX_SIZE_TIER).text("Size"))
                    .changed()
                    && let Ok(t) = SizeTier::new(tier)
                {
                    self.tier = t;
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("frame = {}", self.sim.frame()));
                ui.label(format!("capacity = {}", self.sim.matrix().capacity()));
                ui.label(format!("bodies = {}", self.sim.body_count()));
                ui.label(format!("angles = {:?}", self.sim.config().angle_mode));
                ui.label(if self.sim.gravity_enabled() {
                    "gravity on"
                } else {
                    "gravity off"
                });
                if let Some(msg) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, msg);
                }
            });
        });
    }

    /// Builds the central panel where bodies are drawn and spawned.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::new().fill(egui::Color32::from_rgb(0, 1, 20));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            self.canvas = rect;
            let painter = ui.painter_at(rect);

            // Pan with secondary drag; the primary button spawns.
            if response.dragged_by(egui::PointerButton::Secondary) {
                self.pan += response.drag_delta();
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            // Spawn on the press edge only, holding the button does nothing.
            if response.hovered()
                && ctx.input(|i| i.pointer.primary_pressed())
                && let Some(pos) = hover_world
            {
                self.spawn_at(pos);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);

            for (pos, physics) in self.sim.world().bodies() {
                let center = self.world_to_screen(pos, rect);
                let side = marker_side(physics.mass.get()) * self.zoom;
                painter.rect_stroke(
                    egui::Rect::from_center_size(center, egui::vec2(side, side)),
                    0.0,
                    stroke,
                    egui::StrokeKind::Middle,
                );

                if physics.magnitude == 0.0 {
                    continue;
                }
                let tip = pos + physics.force() * self.cfg.force_line_scale;
                painter.line_segment([center, self.world_to_screen(tip, rect)], stroke);
            }

            // Cursor preview of the selected size.
            if let Some(p) = response.hover_pos() {
                let side = self.preview_side();
                painter.rect_filled(
                    egui::Rect::from_center_size(p, egui::vec2(side, side)),
                    0.0,
                    egui::Color32::WHITE,
                );
            }

            // Auto-run at the configured frame rate.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.cfg.step_interval() {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback: input first, then panels, then the canvas (which
    /// also advances the simulation).
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn viewer() -> Viewer {
        Viewer::new(ViewConfig::default()).unwrap()
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = viewer();
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let eps = 1e-4;
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(-3.5, 8.25),
        ] {
            let back = viewer.screen_to_world(viewer.world_to_screen(p, rect), rect);
            assert!(
                (back - p).abs().max_element() < eps,
                "roundtrip mismatch: p={p:?}, back={back:?}"
            );
        }
    }

    #[test]
    fn default_camera_maps_world_to_pixels() {
        let viewer = viewer();
        let p = viewer.world_to_screen(Vec2::new(120.0, 45.0), test_rect());
        assert_eq!(p, egui::pos2(120.0, 45.0));
    }

    #[test]
    fn number_keys_select_tiers_and_g_toggles_gravity() {
        let mut viewer = viewer();

        viewer.handle_key(egui::Key::Num5);
        assert_eq!(viewer.tier.get(), 6);
        viewer.handle_key(egui::Key::Num9);
        assert_eq!(viewer.tier.get(), 10);

        assert!(viewer.sim.gravity_enabled());
        viewer.handle_key(egui::Key::G);
        assert!(!viewer.sim.gravity_enabled());

        viewer.handle_key(egui::Key::Space);
        assert!(!viewer.running);
    }

    fn key_event(key: egui::Key, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn held_key_toggles_only_once() {
        let mut viewer = viewer();
        let ctx = egui::Context::default();

        let raw = egui::RawInput {
            events: vec![
                key_event(egui::Key::G, false),
                key_event(egui::Key::G, true),
                key_event(egui::Key::G, true),
                key_event(egui::Key::G, true),
            ],
            ..Default::default()
        };
        let _ = ctx.run(raw, |ctx| viewer.handle_keys(ctx));
        assert!(!viewer.sim.gravity_enabled());

        let raw = egui::RawInput {
            events: vec![key_event(egui::Key::Space, false), key_event(egui::Key::Space, true)],
            ..Default::default()
        };
        let _ = ctx.run(raw, |ctx| viewer.handle_keys(ctx));
        assert!(!viewer.running);
    }

    #[test]
    fn cursor_preview_matches_marker_at_any_zoom() {
        let mut viewer = viewer();
        viewer.tier = SizeTier::new(3).unwrap();

        assert_eq!(viewer.preview_side(), 9.0);
        viewer.zoom = 2.5;
        assert_eq!(viewer.preview_side(), marker_side(300.0) * 2.5);
    }

    #[test]
    fn spawn_is_queued_while_running_and_immediate_while_paused() {
        let mut viewer = viewer();

        viewer.spawn_at(Vec2::new(10.0, 10.0));
        assert_eq!(viewer.sim.body_count(), 0);
        viewer.step_once();
        assert_eq!(viewer.sim.body_count(), 1);

        viewer.running = false;
        viewer.spawn_at(Vec2::new(50.0, 10.0));
        assert_eq!(viewer.sim.body_count(), 2);
    }

    #[test]
    fn scatter_fills_visible_area_and_clear_removes_all() {
        let mut viewer = viewer();
        viewer.cfg.scatter_count = 12;

        viewer.scatter();
        assert_eq!(viewer.sim.body_count(), 12);
        for (pos, _) in viewer.sim.world().bodies() {
            assert!(pos.x >= 0.0 && pos.x <= viewer.cfg.window_width);
            assert!(pos.y >= 0.0 && pos.y <= viewer.cfg.window_height);
        }

        viewer.clear();
        assert_eq!(viewer.sim.body_count(), 0);
    }

    #[test]
    fn marker_side_is_squared_size() {
        assert_eq!(marker_side(200.0), 4.0);
        assert_eq!(marker_side(1000.0), 100.0);
    }
}
