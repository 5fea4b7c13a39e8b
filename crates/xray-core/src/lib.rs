//! XRay Core Library
//!
//! Platform-agnostic interaction logic for the XRay reveal widget: an image
//! shown blurred, with a sharp circle that follows the pointer and an
//! optional keyboard-triggered full reveal.

pub mod config;
pub mod easing;
pub mod effects;
pub mod host;
pub mod image_ready;
pub mod input;
pub mod radius;
pub mod tween;
pub mod widget;

pub use config::{ClickHandler, ConfigError, ConfigResult, XRayConfig, XRayConfigBuilder};
pub use easing::{EaseCurve, EaseDirection, Easing, EasingError};
pub use effects::{ChainError, ColorMatrix, EffectChain, EffectError};
pub use host::{Host, ListenerId, ListenerKind, StaticHost};
pub use image_ready::{ImageReady, ImageStatus};
pub use input::{TouchPoint, WidgetEvent};
pub use radius::{RadiusMode, responsive_radius};
pub use tween::{Transition, Tween, TweenHandle, TweenStep};
pub use widget::{EventResponse, InteractionState, Regime, WidgetId, WidgetView, XRay};
