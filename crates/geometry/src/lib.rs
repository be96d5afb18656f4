//! Geometry: immutable shapes in object-local space.
//!
//! # Invariants
//! - Shapes expose no mutators; new geometry means a new value.
//! - Vertex order is fixed per variant and relied on by bounds and drawing.

mod shape;

pub use shape::{Rectangle, Shape, Triangle};
