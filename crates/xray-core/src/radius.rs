//! Reveal circle radius calculation.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Fraction of the smaller container side used as the circle's diameter.
pub const RADIUS_FACTOR: f64 = 0.5;

/// How the reveal circle radius is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RadiusMode {
    /// Derived from the container size, multiplied by a scale factor.
    Responsive(f64),
    /// A fixed radius in pixels; the calculator is never consulted.
    Fixed(f64),
}

impl RadiusMode {
    /// Resolve the radius for a container of the given size.
    ///
    /// `None` means the container has not been measured yet and the previous
    /// radius should be kept.
    pub fn resolve(&self, container: Size) -> Option<f64> {
        match *self {
            RadiusMode::Responsive(scale) => responsive_radius(container, scale),
            RadiusMode::Fixed(radius) => Some(radius),
        }
    }

    pub fn is_responsive(&self) -> bool {
        matches!(self, RadiusMode::Responsive(_))
    }
}

/// Radius of the reveal circle for a container of `size`.
///
/// Returns `None` for an unmeasured (zero or non-finite) container rather
/// than a zero radius, which would make the circle flash closed.
pub fn responsive_radius(size: Size, scale: f64) -> Option<f64> {
    if !size.is_finite() || size.width <= 0.0 || size.height <= 0.0 {
        return None;
    }
    let smaller_side = size.width.min(size.height);
    Some(((smaller_side * RADIUS_FACTOR) / 2.0) * scale)
}
