use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::cat;
use crate::click::ClickState;
use crate::config::GameConfig;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::debug::{Overlay, SessionInfo};
use crate::ecs::systems;
use crate::ecs::systems::movement::MotionParams;
use crate::ecs::systems::snapshot::CatSnapshot;
use crate::render::instance::{self, CatInstance};
use crate::render::GpuState;
use crate::session::Session;

/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;

/// Top-level application state.
struct App {
    config: GameConfig,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<Overlay>,

    // ECS
    world: hecs::World,
    snapshots: Vec<CatSnapshot>,
    motion: MotionParams,

    // Created when the window is up, so the phase timers start with the game.
    session: Option<Session>,
    session_start: Instant,

    // RNG (deterministic per session when seeded)
    rng: fastrand::Rng,

    click_state: ClickState,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,
    tick_count: u64,

    timers: SystemTimers,

    // Reusable instance buffer (avoid per-frame allocation)
    instance_buf: Vec<CatInstance>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        let capacity = config.num_cats as usize * 2 + 1;
        Self {
            rng: config.rng(),
            motion: MotionParams::from_config(&config),
            window: None,
            gpu: None,
            overlay: None,
            world: hecs::World::new(),
            snapshots: Vec::with_capacity(config.num_cats as usize),
            session: None,
            session_start: Instant::now(),
            click_state: ClickState::new(Vec2::ZERO),
            last_frame_time: None,
            accumulator: 0.0,
            tick_count: 0,
            timers: SystemTimers::new(),
            instance_buf: Vec::with_capacity(capacity),
            config,
        }
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        let Some(session) = &mut self.session else {
            return;
        };

        self.accumulator += dt;
        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        let tick_rate = self.config.tick_rate;
        let elapsed = self.session_start.elapsed();

        while self.accumulator >= tick_rate {
            systems::tick(
                &mut self.world,
                session,
                elapsed,
                tick_rate as f32,
                self.config.flash_step_ms,
                &self.motion,
                &mut self.rng,
                &mut self.snapshots,
                &mut self.timers,
            );

            self.accumulator -= tick_rate;
            self.tick_count += 1;
        }
    }

    /// Interpolation alpha for rendering between ticks.
    fn interpolation_alpha(&self) -> f32 {
        (self.accumulator / self.config.tick_rate) as f32
    }

    fn session_info(&self) -> SessionInfo {
        let Some(session) = &self.session else {
            return SessionInfo::default();
        };
        SessionInfo {
            score: session.score(),
            clicks_remaining: session.clicks_remaining(),
            num_cats: session.num_cats(),
            phase: session.phase(),
            movement_active: session.movement_active(),
            scoring_active: session.scoring_active(),
            result: session.final_score(),
            elapsed_secs: self.session_start.elapsed().as_secs_f64(),
            tick_count: self.tick_count,
        }
    }

    fn on_click(&mut self, point: Vec2) {
        let Some(session) = &mut self.session else {
            return;
        };
        let Some(outcome) = systems::click::handle(&self.world, session, point) else {
            log::debug!("Click at ({:.0}, {:.0}) ignored in phase {}", point.x, point.y, session.phase().label());
            return;
        };
        if let (Some(result), Some(overlay)) = (outcome.final_score, &mut self.overlay) {
            overlay.show_game_over(result);
        }
    }

    fn redraw(&mut self) {
        // --- Timing ---
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            let dt = now.duration_since(last).as_secs_f64();
            if let Some(overlay) = &mut self.overlay {
                overlay.record_frame(dt);
            }
            self.run_fixed_update(dt);
        }
        self.last_frame_time = Some(now);

        let info = self.session_info();

        // --- Build instance buffer from ECS ---
        self.timers.begin();
        let alpha = self.interpolation_alpha();
        let flash = self.session.as_ref().and_then(|s| s.flash.as_ref());
        instance::build(
            &self.world,
            flash,
            self.config.canvas,
            self.config.eye_size(),
            alpha,
            &mut self.instance_buf,
        );
        self.timers.end(SystemPhase::BuildInstances);

        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            return;
        };

        self.timers.begin();
        gpu.update_instances(&self.instance_buf);
        self.timers.end(SystemPhase::GpuUpload);

        // --- Render ---
        self.timers.begin();
        overlay.session = info;
        let (w, h) = (gpu.surface_config.width, gpu.surface_config.height);
        let (primitives, textures_delta, screen) = overlay.run_frame(window, &self.timers, w, h);

        if let Some(mut frame) = gpu.begin_frame() {
            gpu.draw_quads(&mut frame.encoder, &frame.view);

            let extra = overlay.prepare_egui(
                &gpu.device,
                &gpu.queue,
                &mut frame.encoder,
                &primitives,
                &textures_delta,
                &screen,
            );
            {
                let mut pass = GpuState::begin_egui_pass(&mut frame.encoder, &frame.view);
                overlay.render_egui(&mut pass, &primitives, &screen);
            }
            gpu.finish_frame(frame.encoder, frame.output, extra);
        }
        overlay.free_textures(&textures_delta);
        self.timers.end(SystemPhase::RenderSubmit);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let canvas = self.config.canvas;
        let attrs = WindowAttributes::default()
            .with_title("Silly Cats")
            .with_resizable(false)
            .with_inner_size(winit::dpi::PhysicalSize::new(canvas.x as u32, canvas.y as u32));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        // Initialize wgpu + pipeline
        let gpu = match GpuState::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU init failed: {e}");
                event_loop.exit();
                return;
            }
        };
        log::info!("wgpu + quad pipeline initialized");

        self.overlay = Some(Overlay::new(&window, &gpu));
        self.gpu = Some(gpu);

        // Spawn cats, then start the clock.
        cat::spawn_cats(&mut self.world, &self.config, &mut self.rng);
        log::info!("Spawned {} cats", self.config.num_cats);

        self.session = Some(Session::new(&self.config));
        self.session_start = Instant::now();

        // Continuous game loop
        event_loop.set_control_flow(ControlFlow::Poll);

        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                if let Some(session) = &mut self.session {
                    session.cancel_timers();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let down = event.state == ElementState::Pressed;
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) if down => {
                        log::info!("ESC pressed, exiting");
                        if let Some(session) = &mut self.session {
                            session.cancel_timers();
                        }
                        event_loop.exit();
                    }
                    PhysicalKey::Code(KeyCode::F12) => {
                        if let Some(overlay) = &mut self.overlay {
                            if overlay.poll_toggle(down) {
                                log::info!("Debug panel: {}", overlay.debug_visible());
                            }
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.click_state
                    .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.click_state.cursor_left();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let down = state == ElementState::Pressed;
                // Keep the edge detector in sync even when egui takes the press.
                let click = self.click_state.left_button(down);
                if let Some(point) = click.filter(|_| !consumed) {
                    self.on_click(point);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Entry point: create event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::from_env();
    log::info!(
        "Config: {} cats on {}x{} canvas, seed {:?}",
        config.num_cats,
        config.canvas.x,
        config.canvas.y,
        config.seed
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
