//! XRay Render Library
//!
//! Turns widget snapshots into a layered scene and renders scenes as
//! SVG markup.

pub mod composer;
mod renderer;
pub mod scene;
pub mod svg;

pub use composer::{ComposeStyle, compose, compose_with};
pub use renderer::{RenderResult, Renderer, RendererError};
pub use scene::{
    BaseImage, BlurFilter, ClipPath, DEFAULT_HINT, Defs, EffectFilter, ElementIds, Fill, Label,
    Node, Overlay, Scene, Wrapper, Zoom,
};
pub use svg::SvgRenderer;
