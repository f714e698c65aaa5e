//! Rendering errors.

/// Failure inside the rendering stages.
///
/// Never reaches HTTP callers directly: the pipeline logs it and degrades
/// to a fixed placeholder.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A rendering stage panicked.
    #[error("rendering panicked: {0}")]
    Panicked(String),
}
