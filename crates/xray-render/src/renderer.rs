//! Renderer trait abstraction.

use crate::scene::Scene;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid scene: {0}")]
    InvalidScene(String),
    #[error("Write failed: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Trait for rendering backends.
///
/// A backend turns a composed [`Scene`] into its own output: markup for the
/// SVG backend, or a patch of a live document tree for the browser shell.
pub trait Renderer {
    type Output;

    /// Render one frame.
    fn render(&mut self, scene: &Scene) -> RenderResult<Self::Output>;
}
