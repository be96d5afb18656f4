use bolts_render::{ProgramHandle, UniformValue, VertexLayout, uniforms};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Vertex format shared by every pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl GpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Group 0 uniform block. Layout matches `Globals` in the WGSL sources.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Globals {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_pos: [f32; 4],
    pub view_pos: [f32; 4],
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            light_pos: [0.0, 0.0, 0.0, 1.0],
            view_pos: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Uniform values held for one program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProgramUniforms {
    pub globals: Globals,
    /// Baked into each vertex at draw time.
    pub color: [f32; 4],
}

impl Default for ProgramUniforms {
    fn default() -> Self {
        Self {
            globals: Globals::default(),
            color: [1.0; 4],
        }
    }
}

impl ProgramUniforms {
    /// Apply a named uniform. Returns false when the name is unknown or the
    /// value has the wrong shape.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        match (name, value) {
            (uniforms::VIEW, UniformValue::Mat4(m)) => self.globals.view = m.to_cols_array_2d(),
            (uniforms::PROJECTION, UniformValue::Mat4(m)) => {
                self.globals.projection = m.to_cols_array_2d();
            }
            (uniforms::LIGHT_POS, v) => match point(v) {
                Some(p) => self.globals.light_pos = p,
                None => return false,
            },
            (uniforms::VIEW_POS, v) => match point(v) {
                Some(p) => self.globals.view_pos = p,
                None => return false,
            },
            (uniforms::COLOR, UniformValue::Vec4(c)) => self.color = c.to_array(),
            (uniforms::COLOR, UniformValue::Vec3(c)) => self.color = c.extend(1.0).to_array(),
            _ => return false,
        }
        true
    }
}

fn point(value: UniformValue) -> Option<[f32; 4]> {
    match value {
        UniformValue::Vec3(v) => Some(v.extend(1.0).to_array()),
        UniformValue::Vec4(v) => Some(v.to_array()),
        _ => None,
    }
}

/// One recorded draw: a range of the frame's vertex stream plus the state
/// it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrawCall {
    pub program: ProgramHandle,
    pub first: u32,
    pub count: u32,
    pub depth_test: bool,
    pub depth_write: bool,
}

/// Draws recorded since the last `begin_frame`.
#[derive(Debug, Default)]
pub(crate) struct DrawBatch {
    vertices: Vec<GpuVertex>,
    calls: Vec<DrawCall>,
}

impl DrawBatch {
    /// Expand `data` into the shared vertex format and record a draw.
    /// At most `vertex_count` complete vertices are taken. Returns how many
    /// were recorded.
    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        program: ProgramHandle,
        data: &[f32],
        layout: VertexLayout,
        vertex_count: u32,
        color: [f32; 4],
        depth_test: bool,
        depth_write: bool,
    ) -> u32 {
        let first = self.vertices.len() as u32;
        let stride = layout.floats_per_vertex();
        for chunk in data.chunks_exact(stride).take(vertex_count as usize) {
            let normal = match layout {
                VertexLayout::Position => [0.0; 3],
                VertexLayout::PositionNormal => [chunk[3], chunk[4], chunk[5]],
            };
            self.vertices.push(GpuVertex {
                position: [chunk[0], chunk[1], chunk[2]],
                normal,
                color,
            });
        }
        let count = self.vertices.len() as u32 - first;
        if count > 0 {
            self.calls.push(DrawCall {
                program,
                first,
                count,
                depth_test,
                depth_write,
            });
        }
        count
    }

    pub fn vertices(&self) -> &[GpuVertex] {
        &self.vertices
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.calls.clear();
    }
}
