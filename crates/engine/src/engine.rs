use crate::clock::FrameClock;
use crate::error::EngineError;
use crate::frame::{Backdrop, FrameController, FrameReport, Programs};
use crate::gameplay::Gameplay;
use crate::state::{EngineState, FrameState};
use bolts_assets::{AssetLoader, CubemapFaces};
use bolts_common::EngineConfig;
use bolts_input::InputSource;
use bolts_render::{DepthCompare, ProgramDesc, Renderer, VertexLayout, shaders};

pub const LIT_PROGRAM: &str = "lit";
pub const BACKGROUND_PROGRAM: &str = "background";
pub const UI_PROGRAM: &str = "ui";
pub const SKYBOX_PROGRAM: &str = "skybox";

/// A started engine: state, frame controller and clock.
#[derive(Debug)]
pub struct Engine {
    state: EngineState,
    controller: FrameController,
    clock: FrameClock,
    frames: u64,
}

impl Engine {
    /// Validate `config`, compile every program and, if enabled, load and
    /// upload the skybox.
    ///
    /// Any failure here is fatal: no engine is returned, so nothing ever
    /// leaves the terminated state.
    pub fn start(
        config: EngineConfig,
        renderer: &mut dyn Renderer,
        assets: &dyn AssetLoader,
    ) -> Result<Self, EngineError> {
        let result = Self::try_start(config, renderer, assets);
        if let Err(e) = &result {
            tracing::error!(error = %e, "engine failed to start");
        }
        result
    }

    fn try_start(
        config: EngineConfig,
        renderer: &mut dyn Renderer,
        assets: &dyn AssetLoader,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let programs = Programs {
            lit: renderer.compile_program(&ProgramDesc::single_source(
                LIT_PROGRAM,
                shaders::LIT_SHADER,
                VertexLayout::PositionNormal,
            ))?,
            background: renderer.compile_program(&ProgramDesc::single_source(
                BACKGROUND_PROGRAM,
                shaders::BACKGROUND_SHADER,
                VertexLayout::Position,
            ))?,
            ui: renderer.compile_program(&ProgramDesc::single_source(
                UI_PROGRAM,
                shaders::UI_SHADER,
                VertexLayout::Position,
            ))?,
        };

        let backdrop = if config.skybox_enabled {
            let program = renderer.compile_program(
                &ProgramDesc::single_source(SKYBOX_PROGRAM, shaders::SKYBOX_SHADER, VertexLayout::Position)
                    .with_depth_compare(DepthCompare::LessEqual)
                    .sampling_cubemap(),
            )?;
            let images = assets.load_cubemap(&CubemapFaces::in_dir(&config.skybox_dir));
            let texture = renderer.upload_cubemap(&images)?;
            renderer.bind_cubemap(program, texture);
            Backdrop::Skybox { program, texture }
        } else {
            Backdrop::Gradient
        };

        tracing::info!(
            width = config.window_width,
            height = config.window_height,
            skybox = config.skybox_enabled,
            "engine started"
        );

        Ok(Self {
            state: EngineState::new(config),
            controller: FrameController::new(programs, backdrop),
            clock: FrameClock::default(),
            frames: 0,
        })
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    pub fn frame_state(&self) -> FrameState {
        self.state.frame_state()
    }

    pub fn controller(&self) -> &FrameController {
        &self.controller
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Run one frame, timing it with the wall clock.
    pub fn frame(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        gameplay: &mut dyn Gameplay,
    ) -> Result<FrameReport, EngineError> {
        let dt = self.clock.tick();
        self.frame_with_delta(input, renderer, gameplay, dt)
    }

    /// Run one frame with an explicit delta in seconds.
    pub fn frame_with_delta(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        gameplay: &mut dyn Gameplay,
        dt: f32,
    ) -> Result<FrameReport, EngineError> {
        let report = self
            .controller
            .run_frame(&mut self.state, input, renderer, gameplay, dt)?;
        self.frames += 1;
        if self.frames % 120 == 0 {
            tracing::debug!(
                frames = self.frames,
                fps = self.clock.fps(),
                avg = ?self.clock.average(),
                "frame timing"
            );
        }
        Ok(report)
    }

    /// Run frames until the engine terminates or `max_frames` have run.
    /// Returns every frame's report.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        gameplay: &mut dyn Gameplay,
        max_frames: usize,
        dt: f32,
    ) -> Result<Vec<FrameReport>, EngineError> {
        let mut reports = Vec::new();
        while reports.len() < max_frames {
            let report = self.frame_with_delta(input, renderer, gameplay, dt)?;
            let done = report.state == FrameState::Terminated;
            reports.push(report);
            if done {
                break;
            }
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::NoGameplay;
    use crate::scene;
    use bolts_assets::FileAssetLoader;
    use bolts_common::Color;
    use bolts_geometry::Shape;
    use bolts_input::{InputFrame, Key, ScriptedInput};
    use bolts_kernel::Physical;
    use bolts_render::{
        CubemapImages, FaceImage, ProgramHandle, RecordingRenderer, RenderCommand, uniforms,
    };
    use glam::Vec3;

    struct SolidSky;

    impl AssetLoader for SolidSky {
        fn load_cubemap(&self, _faces: &CubemapFaces) -> CubemapImages {
            CubemapImages {
                faces: std::array::from_fn(|_| FaceImage::solid(2, [0, 0, 255, 255])),
                loaded: 6,
            }
        }
    }

    fn started() -> (Engine, RecordingRenderer) {
        let mut renderer = RecordingRenderer::new();
        let engine = Engine::start(EngineConfig::default(), &mut renderer, &SolidSky).unwrap();
        renderer.take_commands();
        (engine, renderer)
    }

    fn cube_at(x: f32) -> Physical {
        Physical::new(scene::box_mesh(1.0), Color::RED)
            .unwrap()
            .with_offset(Vec3::new(x, 0.0, -5.0))
    }

    fn step(engine: &mut Engine, renderer: &mut RecordingRenderer, frame: InputFrame) -> FrameReport {
        let mut input = ScriptedInput::new([frame]);
        engine
            .frame_with_delta(&mut input, renderer, &mut NoGameplay, 0.016)
            .unwrap()
    }

    fn draws_of(commands: &[RenderCommand], program: ProgramHandle) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { program: p, .. } if *p == program))
            .count()
    }

    #[test]
    fn start_compiles_programs() {
        let mut renderer = RecordingRenderer::new();
        let engine = Engine::start(EngineConfig::default(), &mut renderer, &SolidSky).unwrap();
        assert_eq!(engine.frame_state(), FrameState::Active);
        assert_eq!(engine.controller().backdrop(), Backdrop::Gradient);
        let labels: Vec<_> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::CompileProgram { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec![LIT_PROGRAM, BACKGROUND_PROGRAM, UI_PROGRAM]);
    }

    #[test]
    fn compile_failure_is_fatal() {
        let mut renderer = RecordingRenderer::failing_on(UI_PROGRAM);
        let err = Engine::start(EngineConfig::default(), &mut renderer, &SolidSky).unwrap_err();
        assert!(matches!(err, EngineError::Initialization(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            z_near: 0.0,
            ..EngineConfig::default()
        };
        let err = Engine::start(config, &mut RecordingRenderer::new(), &SolidSky).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn skybox_replaces_gradient() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            skybox_enabled: true,
            skybox_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };
        let mut renderer = RecordingRenderer::new();
        let mut engine = Engine::start(config, &mut renderer, &FileAssetLoader::new()).unwrap();
        assert!(renderer
            .commands()
            .iter()
            .any(|c| matches!(c, RenderCommand::UploadCubemap { loaded: 0, .. })));
        let Backdrop::Skybox { program, .. } = engine.controller().backdrop() else {
            panic!("expected skybox backdrop");
        };
        renderer.take_commands();

        step(&mut engine, &mut renderer, InputFrame::default());
        let cmds = renderer.commands();
        assert_eq!(draws_of(cmds, engine.controller().programs().background), 0);
        assert!(matches!(
            cmds.iter().find(|c| matches!(c, RenderCommand::Draw { .. })),
            Some(RenderCommand::Draw { program: p, vertex_count: 36, .. }) if *p == program
        ));
        assert!(!cmds.iter().any(|c| matches!(c, RenderCommand::SetDepthWrite(_))));
    }

    #[test]
    fn active_frame_follows_protocol() {
        let (mut engine, mut renderer) = started();
        engine.state_mut().world.spawn(cube_at(0.0));
        let programs = engine.controller().programs();

        let report = step(&mut engine, &mut renderer, InputFrame::default());
        let cmds = renderer.commands();

        assert_eq!(cmds.first(), Some(&RenderCommand::BeginFrame { clear: scene::CLEAR_COLOR }));
        assert_eq!(cmds.last(), Some(&RenderCommand::Present));
        // gradient drawn with depth writes off, then restored
        assert_eq!(cmds[2], RenderCommand::SetDepthWrite(false));
        assert!(matches!(cmds[3], RenderCommand::Draw { program, vertex_count: 6, .. } if program == programs.background));
        assert_eq!(cmds[4], RenderCommand::SetDepthWrite(true));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::SetUniform { program, name, .. } if *program == programs.lit && name == uniforms::VIEW
        )));

        // eight shapes in a box, one draw each
        assert_eq!(draws_of(cmds, programs.lit), 8);
        assert_eq!(draws_of(cmds, programs.ui), 1);
        assert_eq!(report.draw_calls, 10);
        assert_eq!(report.state, FrameState::Active);

        // crosshair last before present, with depth testing off just for it
        let n = cmds.len();
        assert_eq!(cmds[n - 5], RenderCommand::SetDepthTest(false));
        assert!(matches!(cmds[n - 3], RenderCommand::Draw { vertex_count: 12, depth_test: false, .. }));
        assert_eq!(cmds[n - 2], RenderCommand::SetDepthTest(true));
    }

    #[test]
    fn pause_toggles_once_per_press() {
        let (mut engine, mut renderer) = started();
        let esc = || InputFrame::with_keys([Key::Escape]);

        assert_eq!(step(&mut engine, &mut renderer, esc()).state, FrameState::Paused);
        assert_eq!(step(&mut engine, &mut renderer, esc()).state, FrameState::Paused);
        assert_eq!(step(&mut engine, &mut renderer, esc()).state, FrameState::Paused);
        assert_eq!(
            step(&mut engine, &mut renderer, InputFrame::default()).state,
            FrameState::Paused
        );
        assert_eq!(step(&mut engine, &mut renderer, esc()).state, FrameState::Active);
    }

    #[test]
    fn paused_frame_draws_overlay_only() {
        let (mut engine, mut renderer) = started();
        engine.state_mut().world.spawn(cube_at(0.0));
        engine.state_mut().world.spawn(cube_at(0.5));
        let programs = engine.controller().programs();

        let report = step(&mut engine, &mut renderer, InputFrame::with_keys([Key::Escape]));
        assert!(report.collisions.is_empty());
        assert!(!engine.state().pointer_locked());

        let cmds = renderer.commands();
        assert_eq!(draws_of(cmds, programs.lit), 0);
        let overlay = cmds
            .iter()
            .position(|c| matches!(c, RenderCommand::Draw { vertex_count: 6, program, .. } if *program == programs.ui))
            .unwrap();
        assert_eq!(cmds[overlay - 2], RenderCommand::SetDepthTest(false));
        assert!(matches!(cmds[overlay], RenderCommand::Draw { depth_test: false, .. }));
        assert_eq!(cmds[overlay + 1], RenderCommand::SetDepthTest(true));
        assert!(renderer.depth_test());
    }

    #[test]
    fn close_request_terminates_next_frame() {
        let (mut engine, mut renderer) = started();
        let report = step(&mut engine, &mut renderer, InputFrame::close());
        assert_eq!(report.state, FrameState::Active);
        renderer.take_commands();

        let report = step(&mut engine, &mut renderer, InputFrame::default());
        assert_eq!(report.state, FrameState::Terminated);
        assert!(renderer.commands().is_empty());

        // nothing leaves terminated, not even a pause press
        let report = step(&mut engine, &mut renderer, InputFrame::with_keys([Key::Escape]));
        assert_eq!(report.state, FrameState::Terminated);
    }

    #[test]
    fn close_while_paused_terminates_next_frame() {
        let (mut engine, mut renderer) = started();
        let states: Vec<_> = [
            InputFrame::with_keys([Key::Escape]),
            InputFrame::close(),
        ]
        .into_iter()
        .map(|frame| step(&mut engine, &mut renderer, frame).state)
        .collect();
        assert_eq!(states, vec![FrameState::Paused, FrameState::Paused]);
        renderer.take_commands();

        let report = step(&mut engine, &mut renderer, InputFrame::default());
        assert_eq!(report.state, FrameState::Terminated);
        assert!(renderer.commands().is_empty());
    }

    #[test]
    fn pointer_drives_camera_only_while_locked_and_active() {
        let (mut engine, mut renderer) = started();
        let frame = |x| InputFrame::default().pointer_at(0.0, 0.0).pointer_at(x, 0.0);

        step(&mut engine, &mut renderer, frame(10.0));
        let yaw = engine.state().camera.yaw();
        assert!((yaw - -89.0).abs() < 1e-4);

        // Tab releases the pointer; samples are then ignored
        step(&mut engine, &mut renderer, InputFrame::with_keys([Key::Tab]));
        assert!(!engine.state().pointer_locked());
        step(&mut engine, &mut renderer, frame(50.0));
        assert_eq!(engine.state().camera.yaw(), yaw);
    }

    #[test]
    fn movement_scales_with_delta() {
        let (mut engine, mut renderer) = started();
        let mut input = ScriptedInput::new([InputFrame::with_keys([Key::W])]);
        engine
            .frame_with_delta(&mut input, &mut renderer, &mut NoGameplay, 0.1)
            .unwrap();
        // default speed 2.5 for 0.1 s along -Z from z = 3
        assert!((engine.state().camera.position.z - 2.75).abs() < 1e-5);
    }

    #[test]
    fn collisions_are_reported_while_active() {
        let (mut engine, mut renderer) = started();
        let a = engine.state_mut().world.spawn(cube_at(0.0));
        let b = engine.state_mut().world.spawn(cube_at(0.8));
        engine.state_mut().world.spawn(cube_at(5.0));
        let report = step(&mut engine, &mut renderer, InputFrame::default());
        assert_eq!(report.collisions, vec![(a, b)]);
    }

    #[test]
    fn transient_objects_are_cleared_before_drawing() {
        let (mut engine, mut renderer) = started();
        engine.state_mut().world.push_transient(cube_at(0.0));
        step(&mut engine, &mut renderer, InputFrame::default());
        assert_eq!(draws_of(renderer.commands(), engine.controller().programs().lit), 0);
    }

    #[derive(Default)]
    struct Spawner {
        updates: usize,
        draws: usize,
    }

    impl Gameplay for Spawner {
        fn update(&mut self, state: &mut EngineState, _input: &InputFrame, _dt: f32) {
            self.updates += 1;
            let tri = Shape::triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
            state
                .world
                .push_transient(Physical::new(vec![tri], Color::WHITE).unwrap());
        }

        fn draw(&mut self, _state: &EngineState, _renderer: &mut dyn Renderer, _program: ProgramHandle) {
            self.draws += 1;
        }
    }

    #[test]
    fn gameplay_hooks_run_only_while_active() {
        let (mut engine, mut renderer) = started();
        let mut game = Spawner::default();
        let mut input = ScriptedInput::new([
            InputFrame::default(),
            InputFrame::with_keys([Key::Escape]),
            InputFrame::default(),
        ]);
        let reports = engine
            .run(&mut input, &mut renderer, &mut game, 3, 0.016)
            .unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!((game.updates, game.draws), (1, 1));
        // the transient triangle pushed during update is drawn that frame
        assert_eq!(reports[0].draw_calls, 3);
    }

    #[test]
    fn run_stops_at_termination() {
        let (mut engine, mut renderer) = started();
        let mut input = ScriptedInput::default().close_when_done();
        let reports = engine
            .run(&mut input, &mut renderer, &mut NoGameplay, 100, 0.016)
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].state, FrameState::Terminated);
    }
}
