use crate::renderer::{
    CubemapImages, ProgramDesc, ProgramHandle, RenderError, Renderer, TextureHandle,
    UniformValue, VertexLayout,
};
use bolts_common::Color;
use std::fmt::Write as _;

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    CompileProgram {
        handle: ProgramHandle,
        label: String,
    },
    BeginFrame {
        clear: Color,
    },
    SetUniform {
        program: ProgramHandle,
        name: String,
        value: UniformValue,
    },
    SetDepthTest(bool),
    SetDepthWrite(bool),
    Draw {
        program: ProgramHandle,
        layout: VertexLayout,
        vertex_count: u32,
        vertices: Vec<f32>,
        /// Depth test state in effect for this draw.
        depth_test: bool,
    },
    UploadCubemap {
        handle: TextureHandle,
        loaded: usize,
    },
    BindCubemap {
        program: ProgramHandle,
        texture: TextureHandle,
    },
    Present,
}

/// Headless renderer that records every call.
///
/// Used by tests and the CLI in place of a GPU backend.
#[derive(Debug)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    labels: Vec<String>,
    textures: u32,
    depth_test: bool,
    depth_write: bool,
    fail_program: Option<String>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            labels: Vec::new(),
            textures: 0,
            depth_test: true,
            depth_write: true,
            fail_program: None,
        }
    }

    /// A renderer that refuses to compile the program with `label`.
    pub fn failing_on(label: &str) -> Self {
        Self {
            fail_program: Some(label.to_owned()),
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write
    }

    pub fn program_label(&self, handle: ProgramHandle) -> Option<&str> {
        self.labels.get(handle.0 as usize).map(String::as_str)
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { .. }))
            .count()
    }

    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Present))
            .count()
    }

    /// Draws issued with `program`, in submission order.
    pub fn draws_with(&self, program: ProgramHandle) -> Vec<&RenderCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { program: p, .. } if *p == program))
            .collect()
    }

    /// Human-readable summary of the recorded stream.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Recorded commands (frames={}, draws={}) ===",
            self.frame_count(),
            self.draw_count()
        );
        let _ = writeln!(out, "Programs: {}", self.labels.join(", "));
        for cmd in &self.commands {
            match cmd {
                RenderCommand::BeginFrame { clear } => {
                    let _ = writeln!(
                        out,
                        "  begin clear=({:.3}, {:.3}, {:.3}, {:.3})",
                        clear.r, clear.g, clear.b, clear.a
                    );
                }
                RenderCommand::Draw {
                    program,
                    vertex_count,
                    depth_test,
                    ..
                } => {
                    let label = self.program_label(*program).unwrap_or("?");
                    let _ = writeln!(
                        out,
                        "  draw {label} vertices={vertex_count} depth_test={depth_test}"
                    );
                }
                RenderCommand::Present => out.push_str("  present\n"),
                _ => {}
            }
        }
        out
    }
}

impl Renderer for RecordingRenderer {
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle, RenderError> {
        if self.fail_program.as_deref() == Some(desc.label.as_str()) {
            return Err(RenderError::ProgramCompile {
                label: desc.label.clone(),
                reason: "rejected by recording renderer".into(),
            });
        }
        let handle = ProgramHandle(self.labels.len() as u32);
        self.labels.push(desc.label.clone());
        self.commands.push(RenderCommand::CompileProgram {
            handle,
            label: desc.label.clone(),
        });
        Ok(handle)
    }

    fn upload_and_draw(
        &mut self,
        vertices: &[f32],
        layout: VertexLayout,
        program: ProgramHandle,
        vertex_count: u32,
    ) {
        self.commands.push(RenderCommand::Draw {
            program,
            layout,
            vertex_count,
            vertices: vertices.to_vec(),
            depth_test: self.depth_test,
        });
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        self.commands.push(RenderCommand::SetUniform {
            program,
            name: name.to_owned(),
            value,
        });
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
        self.commands.push(RenderCommand::SetDepthTest(enabled));
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
        self.commands.push(RenderCommand::SetDepthWrite(enabled));
    }

    fn begin_frame(&mut self, clear: Color) {
        self.commands.push(RenderCommand::BeginFrame { clear });
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::Present);
        Ok(())
    }

    fn upload_cubemap(&mut self, images: &CubemapImages) -> Result<TextureHandle, RenderError> {
        let handle = TextureHandle(self.textures);
        self.textures += 1;
        self.commands.push(RenderCommand::UploadCubemap {
            handle,
            loaded: images.loaded,
        });
        Ok(handle)
    }

    fn bind_cubemap(&mut self, program: ProgramHandle, texture: TextureHandle) {
        self.commands
            .push(RenderCommand::BindCubemap { program, texture });
    }
}
