use bolts_common::ConfigError;
use bolts_render::RenderError;

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A backend could not be brought up. Fatal; there is no retry.
    #[error("engine initialization failed: {0}")]
    Initialization(#[from] RenderError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to present frame: {0}")]
    Present(#[source] RenderError),
}
