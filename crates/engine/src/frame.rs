use crate::error::EngineError;
use crate::gameplay::Gameplay;
use crate::scene;
use crate::state::{EngineState, FrameState};
use bolts_common::{Color, ObjectId};
use bolts_input::{Action, InputFrame, InputSource, ToggleLatch};
use bolts_kernel::MoveDirection;
use bolts_render::{
    CubemapImages, ProgramDesc, ProgramHandle, RenderError, Renderer, TextureHandle,
    UniformValue, VertexLayout, uniforms,
};
use serde::Serialize;

/// Programs compiled at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Programs {
    pub lit: ProgramHandle,
    pub background: ProgramHandle,
    pub ui: ProgramHandle,
}

/// What fills the screen behind the scene. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Gradient,
    Skybox {
        program: ProgramHandle,
        texture: TextureHandle,
    },
}

/// Outcome of one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub state: FrameState,
    /// Overlapping pairs among registered objects; empty unless active.
    pub collisions: Vec<(ObjectId, ObjectId)>,
    pub draw_calls: usize,
}

impl FrameReport {
    fn terminated() -> Self {
        Self {
            state: FrameState::Terminated,
            collisions: Vec::new(),
            draw_calls: 0,
        }
    }
}

const MOVEMENT: [(Action, MoveDirection); 6] = [
    (Action::MoveForward, MoveDirection::Forward),
    (Action::MoveBackward, MoveDirection::Backward),
    (Action::StrafeLeft, MoveDirection::Left),
    (Action::StrafeRight, MoveDirection::Right),
    (Action::Ascend, MoveDirection::Up),
    (Action::Descend, MoveDirection::Down),
];

/// Drives one frame at a time in a fixed order:
///
/// 1. honour a pending close request and stop;
/// 2. clear transient objects;
/// 3. poll input and route it;
/// 4. clear and draw the backdrop, set the lit program's uniforms;
/// 5. draw the pause overlay, or the scene followed by a collision query;
/// 6. draw the crosshair;
/// 7. present.
#[derive(Debug)]
pub struct FrameController {
    programs: Programs,
    backdrop: Backdrop,
    pause_latch: ToggleLatch,
    lock_latch: ToggleLatch,
}

impl FrameController {
    pub fn new(programs: Programs, backdrop: Backdrop) -> Self {
        Self {
            programs,
            backdrop,
            pause_latch: ToggleLatch::new(),
            lock_latch: ToggleLatch::new(),
        }
    }

    pub fn programs(&self) -> Programs {
        self.programs
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn run_frame(
        &mut self,
        state: &mut EngineState,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        gameplay: &mut dyn Gameplay,
        dt: f32,
    ) -> Result<FrameReport, EngineError> {
        if state.close_requested() || state.is_terminated() {
            state.terminate();
            return Ok(FrameReport::terminated());
        }

        state.world.clear_transient();

        let frame = input.poll();
        self.route_input(state, &frame, dt);
        if state.frame_state() == FrameState::Active {
            gameplay.update(state, &frame, dt);
        }

        let mut counter = CountingRenderer::new(renderer);
        self.begin_frame(state, &mut counter);

        let mut collisions = Vec::new();
        if state.is_paused() {
            self.draw_overlay(&mut counter);
        } else {
            let lit = self.programs.lit;
            for (_, object) in state.world.iter() {
                object.draw(&mut counter, lit);
            }
            for object in state.world.transient() {
                object.draw(&mut counter, lit);
            }
            gameplay.draw(state, &mut counter, lit);
            collisions = state.world.collision_pairs();
            if !collisions.is_empty() {
                tracing::debug!(count = collisions.len(), "collisions this frame");
            }
        }

        self.draw_crosshair(&mut counter);
        let draw_calls = counter.draws;
        renderer.present().map_err(EngineError::Present)?;

        Ok(FrameReport {
            state: state.frame_state(),
            collisions,
            draw_calls,
        })
    }

    fn route_input(&mut self, state: &mut EngineState, frame: &InputFrame, dt: f32) {
        if frame.close_requested {
            state.request_close();
        }

        let pause_down = state.bindings.is_active(&frame.keys, Action::TogglePause);
        let lock_down = state
            .bindings
            .is_active(&frame.keys, Action::TogglePointerLock);
        if self.pause_latch.update(pause_down) {
            state.toggle_pause();
        }
        let lock_pressed = self.lock_latch.update(lock_down);
        if state.frame_state() != FrameState::Active {
            return;
        }
        if lock_pressed {
            let locked = !state.pointer_locked();
            state.set_pointer_locked(locked);
            tracing::debug!(locked, "pointer lock toggled");
        }

        if state.pointer_locked() {
            for &(x, y) in &frame.pointer {
                state.camera.mouse_input(x, y);
            }
        }

        let step = state.config.move_speed * dt;
        for (action, direction) in MOVEMENT {
            if state.bindings.is_active(&frame.keys, action) {
                state.camera.move_along(direction, step);
            }
        }
    }

    fn begin_frame(&self, state: &EngineState, renderer: &mut dyn Renderer) {
        renderer.begin_frame(scene::CLEAR_COLOR);
        renderer.set_depth_test(true);

        let projection = state.projection_matrix();
        match self.backdrop {
            Backdrop::Skybox { program, texture } => {
                renderer.set_uniform(
                    program,
                    uniforms::VIEW,
                    UniformValue::Mat4(state.sky_view_matrix()),
                );
                renderer.set_uniform(program, uniforms::PROJECTION, UniformValue::Mat4(projection));
                renderer.bind_cubemap(program, texture);
                renderer.upload_and_draw(&scene::SKYBOX_CUBE, VertexLayout::Position, program, 36);
            }
            Backdrop::Gradient => {
                renderer.set_depth_write(false);
                renderer.upload_and_draw(
                    &scene::BACKGROUND_QUAD,
                    VertexLayout::Position,
                    self.programs.background,
                    6,
                );
                renderer.set_depth_write(true);
            }
        }

        let lit = self.programs.lit;
        renderer.set_uniform(lit, uniforms::VIEW, UniformValue::Mat4(state.view_matrix()));
        renderer.set_uniform(lit, uniforms::PROJECTION, UniformValue::Mat4(projection));
        renderer.set_uniform(
            lit,
            uniforms::LIGHT_POS,
            UniformValue::Vec3(state.config.light_position),
        );
        renderer.set_uniform(
            lit,
            uniforms::VIEW_POS,
            UniformValue::Vec3(state.camera.position),
        );
    }

    fn draw_overlay(&self, renderer: &mut dyn Renderer) {
        self.draw_flat(renderer, &scene::OVERLAY_QUAD, scene::OVERLAY_COLOR);
    }

    fn draw_crosshair(&self, renderer: &mut dyn Renderer) {
        self.draw_flat(renderer, &scene::crosshair(), scene::CROSSHAIR_COLOR);
    }

    /// Screen-space draw on top of everything; depth testing is off for
    /// this draw only.
    fn draw_flat(&self, renderer: &mut dyn Renderer, vertices: &[f32], color: Color) {
        let ui = self.programs.ui;
        renderer.set_depth_test(false);
        renderer.set_uniform(ui, uniforms::COLOR, color.into());
        renderer.upload_and_draw(vertices, VertexLayout::Position, ui, (vertices.len() / 3) as u32);
        renderer.set_depth_test(true);
    }
}

/// Forwards to another renderer and counts draw submissions.
struct CountingRenderer<'a> {
    inner: &'a mut dyn Renderer,
    draws: usize,
}

impl<'a> CountingRenderer<'a> {
    fn new(inner: &'a mut dyn Renderer) -> Self {
        Self { inner, draws: 0 }
    }
}

impl Renderer for CountingRenderer<'_> {
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle, RenderError> {
        self.inner.compile_program(desc)
    }

    fn upload_and_draw(
        &mut self,
        vertices: &[f32],
        layout: VertexLayout,
        program: ProgramHandle,
        vertex_count: u32,
    ) {
        self.draws += 1;
        self.inner
            .upload_and_draw(vertices, layout, program, vertex_count);
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        self.inner.set_uniform(program, name, value);
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.inner.set_depth_test(enabled);
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.inner.set_depth_write(enabled);
    }

    fn begin_frame(&mut self, clear: Color) {
        self.inner.begin_frame(clear);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.inner.present()
    }

    fn upload_cubemap(&mut self, images: &CubemapImages) -> Result<TextureHandle, RenderError> {
        self.inner.upload_cubemap(images)
    }

    fn bind_cubemap(&mut self, program: ProgramHandle, texture: TextureHandle) {
        self.inner.bind_cubemap(program, texture);
    }
}
