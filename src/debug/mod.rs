pub mod history;
pub mod timer;

use winit::window::Window;

use self::history::{FrameHistory, FrameStats};
use self::timer::{SystemPhase, SystemTimers, PHASE_COUNT};
use crate::render::GpuState;
use crate::session::{FinalScore, Phase};

/// Number of frame times to keep in the histogram.
const FRAME_HISTORY_LEN: usize = 300;
/// Seconds between FPS log lines.
const FPS_LOG_INTERVAL: f64 = 5.0;
/// HUD text size in points.
const HUD_TEXT_SIZE: f32 = 20.0;

/// Session numbers the overlay shows, refreshed by the app every frame.
#[derive(Debug, Clone, Copy)]
pub struct SessionInfo {
    pub score: u32,
    pub clicks_remaining: u32,
    pub num_cats: u32,
    pub phase: Phase,
    pub movement_active: bool,
    pub scoring_active: bool,
    pub result: Option<FinalScore>,
    pub elapsed_secs: f64,
    pub tick_count: u64,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            score: 0,
            clicks_remaining: 0,
            num_cats: 0,
            phase: Phase::Moving,
            movement_active: true,
            scoring_active: false,
            result: None,
            elapsed_secs: 0.0,
            tick_count: 0,
        }
    }
}

/// Press-edge toggle for a held key.
#[derive(Debug, Default)]
struct KeyToggle {
    visible: bool,
    was_down: bool,
}

impl KeyToggle {
    /// Returns true if visibility flipped.
    fn poll(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        if pressed {
            self.visible = !self.visible;
        }
        pressed
    }
}

/// egui layer: score HUD, game-over notice, and the F12 debug panel.
pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    debug_toggle: KeyToggle,

    /// Rolling window of frame times (seconds).
    frames: FrameHistory,
    stats: FrameStats,

    pub session: SessionInfo,

    /// Shown once the click budget is spent, until dismissed.
    game_over: Option<FinalScore>,
    game_over_open: bool,

    // Periodic FPS log accumulator.
    frame_count: u64,
    log_timer: f64,
    log_frame_count: u32,
    log_frame_sum: f64,
    log_frame_min: f64,
    log_frame_max: f64,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            debug_toggle: KeyToggle::default(),
            frames: FrameHistory::new(FRAME_HISTORY_LEN),
            stats: FrameStats::default(),
            session: SessionInfo::default(),
            game_over: None,
            game_over_open: false,
            frame_count: 0,
            log_timer: 0.0,
            log_frame_count: 0,
            log_frame_sum: 0.0,
            log_frame_min: f64::MAX,
            log_frame_max: 0.0,
        }
    }

    /// Record a frame time, update rolling stats, and periodically log.
    pub fn record_frame(&mut self, dt: f64) {
        self.frame_count += 1;
        self.frames.push(dt);
        self.stats = self.frames.stats();

        self.log_frame_count += 1;
        self.log_frame_sum += dt;
        self.log_frame_min = self.log_frame_min.min(dt);
        self.log_frame_max = self.log_frame_max.max(dt);
        self.log_timer += dt;

        if self.log_timer >= FPS_LOG_INTERVAL {
            let avg_ms = (self.log_frame_sum / self.log_frame_count as f64) * 1000.0;
            let fps = self.log_frame_count as f64 / self.log_timer;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.log_frame_min * 1000.0,
                self.log_frame_max * 1000.0,
                self.frame_count,
            );
            self.log_timer = 0.0;
            self.log_frame_count = 0;
            self.log_frame_sum = 0.0;
            self.log_frame_min = f64::MAX;
            self.log_frame_max = 0.0;
        }
    }

    /// Handle F12 toggle. Returns true if visibility changed.
    pub fn poll_toggle(&mut self, f12_down: bool) -> bool {
        self.debug_toggle.poll(f12_down)
    }

    pub fn debug_visible(&self) -> bool {
        self.debug_toggle.visible
    }

    /// Pop up the end-of-session notice. Later calls are ignored.
    pub fn show_game_over(&mut self, result: FinalScore) {
        if self.game_over.is_none() {
            self.game_over = Some(result);
            self.game_over_open = true;
        }
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// Run the egui frame and produce paint output.
    /// Returns (clipped_primitives, textures_delta, screen_descriptor).
    pub fn run_frame(
        &mut self,
        window: &Window,
        timers: &SystemTimers,
        screen_w: u32,
        screen_h: u32,
    ) -> (
        Vec<egui::epaint::ClippedPrimitive>,
        egui::TexturesDelta,
        egui_wgpu::ScreenDescriptor,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        // Snapshot read-only state so the UI closure doesn't borrow self.
        let ui_state = UiSnapshot {
            debug_visible: self.debug_toggle.visible,
            stats: self.stats,
            frame_times: self.frames.iter().collect(),
            system_durations: timers.durations_us,
            system_total_us: timers.total_us(),
            session: self.session,
            game_over: self.game_over,
        };

        // Mutable controls: written back after run().
        let mut game_over_open = self.game_over_open;

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            draw_ui(ctx, &ui_state, &mut game_over_open);
        });

        self.game_over_open = game_over_open;

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_w, screen_h],
            pixels_per_point,
        };

        (clipped_primitives, full_output.textures_delta, screen_descriptor)
    }

    /// Upload egui textures and buffers. Call before the egui render pass.
    pub fn prepare_egui(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::epaint::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor)
    }

    /// Render egui into the given render pass.
    pub fn render_egui(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::epaint::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, textures_delta: &egui::TexturesDelta) {
        for &id in &textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }
    }
}

// ---------------------------------------------------------------------------
// UI snapshot + free-function draw (avoids borrow conflicts with egui_ctx)
// ---------------------------------------------------------------------------

struct UiSnapshot {
    debug_visible: bool,
    stats: FrameStats,
    frame_times: Vec<f64>,
    system_durations: [f64; PHASE_COUNT],
    system_total_us: f64,
    session: SessionInfo,
    game_over: Option<FinalScore>,
}

fn draw_ui(ctx: &egui::Context, s: &UiSnapshot, game_over_open: &mut bool) {
    draw_score(ctx, &s.session);

    if let Some(result) = s.game_over {
        draw_game_over(ctx, result, game_over_open);
    }

    if s.debug_visible {
        draw_debug(ctx, s);
    }
}

/// Score and remaining clicks, bottom-right.
fn draw_score(ctx: &egui::Context, session: &SessionInfo) {
    egui::Area::new(egui::Id::new("score_hud"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                for line in [
                    format!("Score: {}", session.score),
                    format!("Clicks: {}", session.clicks_remaining),
                ] {
                    ui.label(
                        egui::RichText::new(line)
                            .size(HUD_TEXT_SIZE)
                            .color(egui::Color32::WHITE),
                    );
                }
            });
        });
}

fn draw_game_over(ctx: &egui::Context, result: FinalScore, open: &mut bool) {
    if !*open {
        return;
    }
    let mut dismissed = false;
    egui::Window::new("Game Over!")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .open(open)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(result.to_string()).size(HUD_TEXT_SIZE).strong());
            ui.add_space(6.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    if dismissed {
        *open = false;
    }
}

fn draw_debug(ctx: &egui::Context, s: &UiSnapshot) {
    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 220))
        .corner_radius(6.0)
        .inner_margin(10.0);

    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .default_width(320.0)
        .resizable(true)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(220));

            // --- Performance ---
            ui.heading("Performance");
            ui.label(format!("FPS: {:.1}", s.stats.fps));
            ui.label(format!(
                "Frame: {:.2}ms avg | {:.2} min | {:.2} max",
                s.stats.avg * 1000.0,
                s.stats.min * 1000.0,
                s.stats.max * 1000.0,
            ));
            ui.add_space(4.0);

            // --- Frame time histogram ---
            ui.heading("Frame Time History");
            if !s.frame_times.is_empty() {
                let max_time = s
                    .frame_times
                    .iter()
                    .copied()
                    .fold(0.0f64, f64::max)
                    .max(0.020);

                let (response, painter) =
                    ui.allocate_painter(egui::vec2(300.0, 60.0), egui::Sense::hover());
                let rect = response.rect;

                let bar_width = rect.width() / s.frame_times.len() as f32;
                let target_y = rect.bottom() - (0.01667 / max_time as f32) * rect.height();

                for (i, &t) in s.frame_times.iter().enumerate() {
                    let h = (t / max_time) as f32 * rect.height();
                    let x = rect.left() + i as f32 * bar_width;
                    let color = if t > 0.01667 {
                        egui::Color32::from_rgb(255, 100, 80)
                    } else {
                        egui::Color32::from_rgb(80, 200, 120)
                    };
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(x, rect.bottom() - h),
                            egui::pos2(x + bar_width - 1.0, rect.bottom()),
                        ),
                        0.0,
                        color,
                    );
                }

                // 16.67ms target line
                painter.line_segment(
                    [
                        egui::pos2(rect.left(), target_y),
                        egui::pos2(rect.right(), target_y),
                    ],
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(255, 255, 100)),
                );
            }
            ui.add_space(4.0);

            // --- System timers ---
            ui.heading("System Timers");
            let total = s.system_total_us.max(1.0);
            let max_us = s
                .system_durations
                .iter()
                .copied()
                .fold(0.0f64, f64::max)
                .max(1.0);

            for phase in SystemPhase::ALL {
                let us = s.system_durations[phase as usize];
                let pct = us / total * 100.0;
                let bar_frac = (us / max_us) as f32;

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("{:<12}", phase.label())).monospace());
                    ui.label(
                        egui::RichText::new(format!("{:>5.0}us ({:>2.0}%)", us, pct)).monospace(),
                    );

                    let (response, painter) =
                        ui.allocate_painter(egui::vec2(80.0, 12.0), egui::Sense::hover());
                    let r = response.rect;
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            r.left_top(),
                            egui::pos2(r.left() + r.width() * bar_frac, r.bottom()),
                        ),
                        2.0,
                        egui::Color32::from_rgb(100, 180, 255),
                    );
                });
            }
            ui.label(
                egui::RichText::new(format!("Total: {:.0}us ({:.2}ms)", total, total / 1000.0))
                    .monospace(),
            );
            ui.add_space(4.0);

            // --- Session ---
            let session = &s.session;
            ui.heading("Session");
            ui.label(format!(
                "Phase: {} | {:.1}s",
                session.phase.label(),
                session.elapsed_secs
            ));
            ui.label(format!(
                "Score: {}/{} | Clicks left: {}",
                session.score, session.num_cats, session.clicks_remaining
            ));
            ui.label(format!(
                "Movement: {} | Scoring: {}",
                if session.movement_active { "on" } else { "off" },
                if session.scoring_active { "open" } else { "closed" },
            ));
            if let Some(result) = session.result {
                ui.label(result.to_string());
            }
            ui.label(format!("Cats: {} | Ticks: {}", session.num_cats, session.tick_count));
            ui.add_space(4.0);
            ui.label("F12: Toggle | ESC: Quit");
        });
}
