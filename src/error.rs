use thiserror::Error;

/// Failures surfaced by the visualizer core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisualizerError {
    /// The platform refuses to build an audio graph until the user has
    /// interacted with the page. Retry after a click or key press.
    #[error("audio context unavailable (requires a user gesture)")]
    AudioContextUnavailable,
    #[error("analyzer has no audio source attached")]
    NotAttached,
    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),
    #[error("invalid surface geometry {width}x{height}")]
    GeometryInvalid { width: f64, height: f64 },
    #[error("transform size must be a power of two in 32..=32768, got {0}")]
    InvalidTransformSize(u32),
    #[error("draw failed: {0}")]
    Draw(String),
    #[error("platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
