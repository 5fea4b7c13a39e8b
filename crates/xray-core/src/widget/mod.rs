//! The interactive XRay widget.
//!
//! - [`XRay`] owns one widget's configuration, interaction state and circle
//!   tween, and reacts to [`WidgetEvent`](crate::input::WidgetEvent)s.
//! - [`WidgetView`] is the read-only snapshot the render layer consumes.
//!
//! The widget never renders anything itself and holds no timers; time only
//! advances through [`XRay::tick`].

mod state;
mod xray;

pub use state::{InteractionState, OFFSCREEN, Regime, RevealCause, WidgetId, WidgetView};
pub use xray::{EventResponse, XRay};
