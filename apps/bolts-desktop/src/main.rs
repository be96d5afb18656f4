mod input;

use anyhow::{Context, Result};
use bolts_assets::FileAssetLoader;
use bolts_common::{Color, EngineConfig};
use bolts_engine::scene::{box_mesh, spawn_demo_scene};
use bolts_engine::{Engine, EngineError, EngineState, FrameState, Gameplay};
use bolts_input::InputFrame;
use bolts_kernel::Physical;
use bolts_render_wgpu::WgpuRenderer;
use clap::Parser;
use glam::Vec3;
use input::WinitInput;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "bolts-desktop", about = "First-person demo scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    title: Option<String>,

    /// Draw a cubemap skybox instead of the gradient background
    #[arg(long)]
    skybox: bool,

    /// Directory with right/left/top/bottom/front/back.jpg
    #[arg(long)]
    skybox_dir: Option<PathBuf>,

    /// Pitch clamp in degrees, -1 for none
    #[arg(long, allow_hyphen_values = true)]
    pitch_limit: Option<f32>,

    /// Yaw clamp in degrees, -1 for none
    #[arg(long, allow_hyphen_values = true)]
    yaw_limit: Option<f32>,

    #[arg(long)]
    sensitivity: Option<f32>,

    /// Camera speed in units per second
    #[arg(long)]
    speed: Option<f32>,

    #[arg(long)]
    fov: Option<f32>,

    #[arg(long)]
    near: Option<f32>,

    #[arg(long)]
    far: Option<f32>,

    /// Light position as x,y,z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    light: Option<Vec<f32>>,
}

impl Cli {
    /// Overlay the given flags on the default configuration.
    fn config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(v) = self.width {
            config.window_width = v;
        }
        if let Some(v) = self.height {
            config.window_height = v;
        }
        if let Some(v) = &self.title {
            config.window_title = v.clone();
        }
        config.skybox_enabled = self.skybox;
        if let Some(v) = &self.skybox_dir {
            config.skybox_dir = v.clone();
        }
        if let Some(v) = self.pitch_limit {
            config.pitch_limit = v;
        }
        if let Some(v) = self.yaw_limit {
            config.yaw_limit = v;
        }
        if let Some(v) = self.sensitivity {
            config.mouse_sensitivity = v;
        }
        if let Some(v) = self.speed {
            config.move_speed = v;
        }
        if let Some(v) = self.fov {
            config.fov_degrees = v;
        }
        if let Some(v) = self.near {
            config.z_near = v;
        }
        if let Some(v) = self.far {
            config.z_far = v;
        }
        if let Some(&[x, y, z]) = self.light.as_deref() {
            config.light_position = Vec3::new(x, y, z);
        }
        config
    }
}

/// Floats a small marker where the camera is looking, rebuilt every frame
/// as a transient object.
struct LookMarker {
    marker: Physical,
}

impl LookMarker {
    fn new() -> Result<Self> {
        let mut marker = Physical::new(box_mesh(0.05), Color::rgb(1.0, 0.85, 0.2))?;
        marker.set_collidable(false);
        Ok(Self { marker })
    }
}

impl Gameplay for LookMarker {
    fn update(&mut self, state: &mut EngineState, _input: &InputFrame, _dt: f32) {
        let at = state.camera.position + state.camera.front() * 3.0;
        let mut marker = self.marker.clone();
        marker.set_offset(at);
        state.world.push_transient(marker);
    }
}

struct App {
    config: EngineConfig,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    engine: Option<Engine>,
    input: WinitInput,
    gameplay: LookMarker,
    pointer_locked: Option<bool>,
    collisions: usize,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            config,
            window: None,
            renderer: None,
            engine: None,
            input: WinitInput::new(),
            gameplay: LookMarker::new()?,
            pointer_locked: None,
            collisions: 0,
            failure: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.failure = Some(error);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let size = window.inner_size();
        let mut renderer = pollster::block_on(WgpuRenderer::new(
            window.clone(),
            size.width,
            size.height,
        ))
        .map_err(EngineError::Initialization)?;
        let (width, height) = renderer.size();
        tracing::info!(width, height, format = ?renderer.surface_format(), "renderer ready");

        let mut engine = Engine::start(self.config.clone(), &mut renderer, &FileAssetLoader::new())?;
        let scene = spawn_demo_scene(&mut engine.state_mut().world)?;
        tracing::info!(objects = scene.boxes.len() + 1, "demo scene spawned");

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.engine = Some(engine);
        self.sync_cursor();
        Ok(())
    }

    /// Grab and hide the cursor while the engine wants pointer lock.
    fn sync_cursor(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &self.engine) else {
            return;
        };
        let locked = engine.state().pointer_locked();
        if self.pointer_locked == Some(locked) {
            return;
        }
        self.pointer_locked = Some(locked);

        let grab = if locked {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::warn!("cursor grab failed: {e}");
        }
        window.set_cursor_visible(!locked);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(engine), Some(renderer)) = (&mut self.engine, &mut self.renderer) else {
            return;
        };
        let report = match engine.frame(&mut self.input, renderer, &mut self.gameplay) {
            Ok(report) => report,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        if report.state == FrameState::Terminated {
            tracing::info!("window closed");
            event_loop.exit();
            return;
        }
        if report.state == FrameState::Active && report.collisions.len() != self.collisions {
            self.collisions = report.collisions.len();
            tracing::info!(pairs = ?report.collisions, "collisions changed");
        }
        self.sync_cursor();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.input.request_close(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.input.key(code, state == ElementState::Pressed),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.pointer_moved(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("bolts-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli.config())?;
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
