//! Input events delivered to the widget by its host.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Key that toggles the full reveal.
pub const ACTIVATION_KEY: &str = " ";

/// Whether `key` (a DOM `KeyboardEvent.key` or `code` value) is the
/// activation key.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, " " | "Space" | "Spacebar")
}

/// A single touch contact, in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client: Point,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            client: Point::new(x, y),
        }
    }
}

/// Events the host forwards to the widget, one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WidgetEvent {
    /// The pointer entered the widget.
    PointerEnter,
    /// The pointer moved; `position` is relative to the widget origin.
    PointerMove { position: Point },
    /// The pointer left the widget.
    PointerLeave,
    /// Touches began; only the first contact is used.
    TouchStart { touches: Vec<TouchPoint> },
    /// Touches moved.
    TouchMove { touches: Vec<TouchPoint> },
    /// All touches ended.
    TouchEnd,
    /// The widget gained keyboard focus.
    Focus,
    /// The widget lost keyboard focus.
    Blur,
    /// A key was pressed while the widget had focus.
    KeyDown { key: String },
    /// The widget was clicked at `position` (relative to the widget origin).
    Click { position: Point },
    /// The viewport was resized. Geometry is re-read from the host; the
    /// fields override it when the host reports them with the event.
    Resize {
        size: Option<Size>,
        bounds: Option<Rect>,
    },
    /// The image finished loading.
    ImageLoaded,
    /// The image failed to load.
    ImageFailed { reason: String },
}

impl WidgetEvent {
    pub fn pointer_move(x: f64, y: f64) -> Self {
        WidgetEvent::PointerMove {
            position: Point::new(x, y),
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        WidgetEvent::KeyDown { key: key.into() }
    }

    /// Resize event that re-reads all geometry from the host.
    pub fn resize() -> Self {
        WidgetEvent::Resize {
            size: None,
            bounds: None,
        }
    }

    /// Short name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetEvent::PointerEnter => "pointer-enter",
            WidgetEvent::PointerMove { .. } => "pointer-move",
            WidgetEvent::PointerLeave => "pointer-leave",
            WidgetEvent::TouchStart { .. } => "touch-start",
            WidgetEvent::TouchMove { .. } => "touch-move",
            WidgetEvent::TouchEnd => "touch-end",
            WidgetEvent::Focus => "focus",
            WidgetEvent::Blur => "blur",
            WidgetEvent::KeyDown { .. } => "key-down",
            WidgetEvent::Click { .. } => "click",
            WidgetEvent::Resize { .. } => "resize",
            WidgetEvent::ImageLoaded => "image-loaded",
            WidgetEvent::ImageFailed { .. } => "image-failed",
        }
    }
}
