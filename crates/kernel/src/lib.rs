//! Scene kernel: scene objects, collision queries and the first-person camera.
//!
//! # Invariants
//! - A scene object's bounds are derived from its mesh once and never drift.
//! - The world registry is the single owner of scene objects; ids are never
//!   reused and iteration follows registration order.
//! - Collision queries never move anything.

pub mod camera;
pub mod physical;
pub mod world;

pub use camera::{Camera, MoveDirection};
pub use physical::{Aabb, Bounds, Physical, PhysicalError};
pub use world::PhysicalWorld;
