//! Rendering adapter: backend-agnostic drawing interface.
//!
//! # Invariants
//! - Renderers never mutate scene state; they only receive draw commands.
//! - Depth state toggles persist until explicitly restored by the caller.
//!
//! [`RecordingRenderer`] is the headless backend used by tests and the CLI;
//! the GPU backend lives in `bolts-render-wgpu` and implements the same
//! trait.

mod recording;
mod renderer;
pub mod shaders;

pub use recording::{RecordingRenderer, RenderCommand};
pub use renderer::{
    CubemapImages, DepthCompare, FaceImage, ProgramDesc, ProgramHandle, RenderError, Renderer,
    TextureHandle, UniformValue, VertexLayout, uniforms,
};
