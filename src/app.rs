use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::behavior::{BehaviorStateMachine, PetState};
use crate::config::PetConfig;
use crate::hit_region::{ChannelPublisher, ClickThrough};
use crate::movement::Viewport;
use crate::pet::animation::AnimationState;
use crate::pet::Footprint;
#[cfg(windows)]
use crate::platform;
use crate::render::sprite::PetSprite;
use crate::render::GpuState;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 30.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            let fps = self.frames_since_log as f64 / elapsed;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.frame_time_min * 1000.0,
                self.frame_time_max * 1000.0,
                self.frame_count,
            );
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frame_time_min = f64::MAX;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Everything that exists once the window is up.
struct Scene {
    pet: BehaviorStateMachine<ChannelPublisher>,
    anim: AnimationState,
    click_through: ClickThrough,
}

/// Top-level application state.
struct App {
    config: PetConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Option<Scene>,

    /// Last known cursor position in viewport pixels.
    cursor: Vec2,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,
    tick_count: u64,

    frame_stats: FrameStats,
}

impl App {
    fn new(config: PetConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            scene: None,
            cursor: Vec2::ZERO,
            last_frame_time: None,
            accumulator: 0.0,
            tick_count: 0,
            frame_stats: FrameStats::new(),
        }
    }

    fn create_scene(&self, window: &Window) -> Scene {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width as f32, size.height as f32);
        let footprint = Footprint::from_config(&self.config, window.scale_factor() as f32);
        let rng = match self.config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let (publisher, rx) = ChannelPublisher::new();
        let pet = BehaviorStateMachine::new(
            self.config.clone(),
            footprint,
            viewport,
            rng,
            publisher,
        );
        let anim = AnimationState::new(pet.animation());

        Scene {
            pet,
            anim,
            click_through: ClickThrough::new(rx),
        }
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        let Some(scene) = &mut self.scene else {
            return;
        };

        self.accumulator = (self.accumulator + dt).min(MAX_ACCUMULATOR);

        while self.accumulator >= TICK_RATE {
            scene.pet.tick((TICK_RATE * 1000.0) as f32);
            self.accumulator -= TICK_RATE;
            self.tick_count += 1;
        }

        let cue = scene.pet.animation();
        if scene.anim.set_cue(cue) {
            log::debug!("Animation -> {} (playing: {})", cue.key(), cue.playing);
        }
        scene.anim.update(dt as f32);
    }

    /// Apply the latest hit region to the window's click-through state.
    fn sync_click_through(&mut self) {
        let (Some(scene), Some(window)) = (&mut self.scene, &self.window) else {
            return;
        };

        #[cfg(windows)]
        {
            let (x, y) = platform::win32::get_mouse_pos();
            self.cursor = Vec2::new(x, y);
        }

        scene.click_through.drain();
        let dragging = scene.pet.state() == PetState::Dragging;
        if let Some(enabled) = scene.click_through.update(self.cursor, dragging) {
            if let Err(e) = window.set_cursor_hittest(enabled) {
                log::warn!("Failed to toggle click-through: {e}");
            }
        }
    }

    fn build_sprite(&self) -> Option<PetSprite> {
        let scene = self.scene.as_ref()?;
        Some(PetSprite::new(
            scene.pet.position(),
            scene.pet.footprint().sprite,
            &scene.anim,
            scene.click_through.is_over(),
        ))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let Some(monitor) = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
        else {
            log::error!("No monitor found, exiting");
            event_loop.exit();
            return;
        };
        let screen_size = monitor.size();

        // No with_transparent(true): WS_EX_LAYERED conflicts with
        // DirectComposition. Start hidden so DWM doesn't cache a stale frame.
        let attrs = WindowAttributes::default()
            .with_title("Catnap")
            .with_decorations(false)
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(screen_size)
            .with_position(winit::dpi::PhysicalPosition::new(0, 0));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(windows)]
        platform::win32::setup_overlay(&window);

        let size = window.inner_size();
        log::info!(
            "Overlay window created: {}x{} on {:?} (scale {:.2})",
            size.width,
            size.height,
            monitor.name().unwrap_or_default(),
            window.scale_factor()
        );

        match GpuState::new(window.clone()) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("GPU init failed: {e}");
                event_loop.exit();
                return;
            }
        }
        log::info!("wgpu + pet pipeline initialized");

        self.scene = Some(self.create_scene(&window));

        event_loop.set_control_flow(ControlFlow::Poll);

        // Show only once styles and GPU resources are ready (avoids the "white box").
        window.set_visible(true);

        self.window = Some(window);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Window is click-through most of the time, so poll ESC globally.
        #[cfg(windows)]
        if platform::win32::is_escape_pressed() {
            log::info!("ESC pressed, exiting");
            event_loop.exit();
            return;
        }
        #[cfg(not(windows))]
        let _ = event_loop;

        self.sync_click_through();

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
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                if let Some(scene) = &mut self.scene {
                    scene.pet.on_viewport_resize(Viewport::new(
                        new_size.width as f32,
                        new_size.height as f32,
                    ));
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Display scale changed to {scale_factor:.2}");
                if let Some(scene) = &mut self.scene {
                    let footprint = Footprint::from_config(&self.config, scale_factor as f32);
                    scene.pet.on_footprint_changed(footprint);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                if let Some(scene) = &mut self.scene {
                    scene.pet.on_pointer_move(self.cursor);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let Some(scene) = &mut self.scene else {
                    return;
                };
                match state {
                    ElementState::Pressed => {
                        if scene.pet.on_pointer_down(self.cursor) {
                            let at = self.cursor;
                            log::debug!("Picked up at ({:.0}, {:.0})", at.x, at.y);
                        }
                    }
                    ElementState::Released => scene.pet.on_pointer_up(),
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    self.frame_stats.record_frame(dt);
                    self.run_fixed_update(dt);
                }
                self.last_frame_time = Some(now);

                let sprite = self.build_sprite();
                if let (Some(gpu), Some(sprite)) = (&mut self.gpu, sprite) {
                    gpu.set_sprite(&sprite);
                    gpu.render_frame();
                }
            }
            _ => {}
        }
    }
}

/// The overlay needs Win32 global cursor polling to toggle click-through and
/// DirectComposition for a transparent surface.
fn ensure_supported_platform() -> Result<(), Box<dyn std::error::Error>> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(format!(
            "the click-through overlay is only supported on Windows, not {}",
            std::env::consts::OS
        )
        .into())
    }
}

/// Entry point: create the event loop and run until exit.
pub fn run(config: PetConfig) -> Result<(), Box<dyn std::error::Error>> {
    ensure_supported_platform()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    log::info!("Ran {} simulation ticks", app.tick_count);
    Ok(())
}
