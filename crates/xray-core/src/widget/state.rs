//! Interaction state definitions.

use kurbo::{Point, Rect};
use std::fmt;
use uuid::Uuid;

/// Pointer position used before the first pointer event, far outside the
/// widget so the circle is not visible.
pub const OFFSCREEN: Point = Point::new(-1000.0, -1000.0);

/// Unique identifier of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Mutable interaction state of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub is_focused: bool,
    pub is_revealed: bool,
    pub is_pointer_over: bool,
    /// Pointer position relative to the widget origin.
    pub pointer: Point,
    /// Radius the circle grows to; `None` until first measured.
    pub responsive_radius: Option<f64>,
    /// Last bounding rectangle reported by the host, in client coordinates.
    pub last_measured_bounds: Option<Rect>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            is_focused: false,
            is_revealed: false,
            is_pointer_over: false,
            pointer: OFFSCREEN,
            responsive_radius: None,
            last_measured_bounds: None,
        }
    }
}

/// What asked for the reveal state to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealCause {
    /// Pointer, touch or focus bookkeeping.
    Implicit,
    /// The viewer toggled the reveal from the keyboard.
    Explicit,
}

/// Named interaction regimes, derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Not focused, pointer outside.
    Idle,
    /// Pointer or touch over the widget; the circle follows it.
    Hovering,
    /// Focused and eligible for a keyboard reveal; the hint is shown.
    PeekEligible,
    /// Focused but a keyboard reveal is not available.
    Focused,
    /// The sharp image covers the whole widget.
    Revealed,
}

/// Snapshot of everything the render layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub id: WidgetId,
    pub is_focused: bool,
    pub is_revealed: bool,
    pub is_pointer_over: bool,
    pub pointer: Point,
    /// Current (tweened) circle radius.
    pub circle_radius: f64,
    pub can_reveal: bool,
    /// Magnification of the sharp layer; 1 while revealed.
    pub zoom: f64,
}

impl WidgetView {
    /// Whether the "press to reveal" hint should be shown.
    pub fn shows_hint(&self) -> bool {
        self.is_focused && !self.is_revealed && self.can_reveal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = InteractionState::default();
        assert!(!state.is_focused);
        assert!(!state.is_revealed);
        assert_eq!(state.pointer, OFFSCREEN);
        assert_eq!(state.responsive_radius, None);
    }

    #[test]
    fn test_widget_ids_are_unique() {
        let a = WidgetId::new();
        let b = WidgetId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 32);
    }
}
