//! Shared types and startup configuration used across the bolts crates.

mod config;
mod types;

pub use config::{ConfigError, EngineConfig, NO_LIMIT};
pub use types::{Color, ObjectId};
