use bolts_common::Color;
use glam::{Mat4, Vec3, Vec4};

/// Opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

/// Opaque handle to an uploaded cubemap texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Interleaved float layout of a vertex slice passed to
/// [`Renderer::upload_and_draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// `x, y, z`
    Position,
    /// `x, y, z, nx, ny, nz`
    PositionNormal,
}

impl VertexLayout {
    pub fn floats_per_vertex(self) -> usize {
        match self {
            Self::Position => 3,
            Self::PositionNormal => 6,
        }
    }
}

/// Depth comparison used by a program while depth testing is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthCompare {
    #[default]
    Less,
    /// Needed by the skybox, which is drawn at the far plane.
    LessEqual,
}

/// Everything a backend needs to build a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDesc {
    pub label: String,
    pub vertex_source: String,
    pub fragment_source: String,
    pub layout: VertexLayout,
    pub depth_compare: DepthCompare,
    /// The program samples a cubemap bound with [`Renderer::bind_cubemap`].
    pub samples_cubemap: bool,
}

impl ProgramDesc {
    /// A program whose vertex and fragment stages live in one source.
    pub fn single_source(label: &str, source: &str, layout: VertexLayout) -> Self {
        Self {
            label: label.to_owned(),
            vertex_source: source.to_owned(),
            fragment_source: source.to_owned(),
            layout,
            depth_compare: DepthCompare::Less,
            samples_cubemap: false,
        }
    }

    pub fn with_depth_compare(mut self, compare: DepthCompare) -> Self {
        self.depth_compare = compare;
        self
    }

    pub fn sampling_cubemap(mut self) -> Self {
        self.samples_cubemap = true;
        self
    }
}

/// Value written to a named program uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<Color> for UniformValue {
    fn from(c: Color) -> Self {
        Self::Vec4(c.into())
    }
}

/// Uniform names understood by every backend.
pub mod uniforms {
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    /// Per-draw flat color.
    pub const COLOR: &str = "uColor";
    pub const LIGHT_POS: &str = "lightPos";
    pub const VIEW_POS: &str = "viewPos";
}

/// Decoded RGBA8 pixels of one cubemap face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl FaceImage {
    /// A `size` x `size` face filled with one color.
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        let texels = (size as usize) * (size as usize);
        Self {
            width: size,
            height: size,
            rgba: rgba.repeat(texels),
        }
    }
}

/// Six faces in `+X, -X, +Y, -Y, +Z, -Z` order, all the same square size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapImages {
    pub faces: [FaceImage; 6],
    /// How many faces came from disk rather than the fallback.
    pub loaded: usize,
}

impl CubemapImages {
    pub fn face_size(&self) -> u32 {
        self.faces[0].width
    }
}

/// Errors raised by render backends.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("program `{label}` failed to compile: {reason}")]
    ProgramCompile { label: String, reason: String },
    #[error("unknown program handle {0:?}")]
    UnknownProgram(ProgramHandle),
    #[error("no compatible graphics adapter found")]
    Adapter,
    #[error("device request failed: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("cubemap faces must be square and equally sized, got {0}")]
    CubemapSize(String),
}

/// Backend-agnostic drawing interface.
///
/// The engine reads scene state and issues commands through this trait; a
/// backend never sees or mutates the scene itself. Depth state set with
/// [`set_depth_test`](Renderer::set_depth_test) and
/// [`set_depth_write`](Renderer::set_depth_write) applies to every draw
/// issued after it until changed again.
pub trait Renderer {
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle, RenderError>;

    /// Submit `vertex_count` vertices read from `vertices` as a triangle list.
    fn upload_and_draw(
        &mut self,
        vertices: &[f32],
        layout: VertexLayout,
        program: ProgramHandle,
        vertex_count: u32,
    );

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue);

    fn set_depth_test(&mut self, enabled: bool);

    fn set_depth_write(&mut self, enabled: bool);

    /// Start a frame by clearing color to `clear` and depth to the far plane.
    fn begin_frame(&mut self, clear: Color);

    /// Finish the frame and show it.
    fn present(&mut self) -> Result<(), RenderError>;

    fn upload_cubemap(&mut self, images: &CubemapImages) -> Result<TextureHandle, RenderError>;

    fn bind_cubemap(&mut self, program: ProgramHandle, texture: TextureHandle);
}
