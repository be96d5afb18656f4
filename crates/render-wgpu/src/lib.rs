//! wgpu backend for the [`bolts_render::Renderer`] interface.
//!
//! Draws are recorded between `begin_frame` and `present` and encoded into
//! a single render pass when the frame is presented.
//!
//! # Invariants
//! - Each draw keeps the flat color and depth state in effect when it was
//!   issued.
//! - Matrix and light uniforms use the values in effect at `present`.
//! - The renderer never sees scene state, only vertices and uniforms.

mod batch;
mod gpu;

pub use gpu::WgpuRenderer;
