//! Easing curves for the reveal circle transitions.
//!
//! Curves are named with the dotted identifiers used by common web animation
//! libraries, e.g. `"elastic.out(1, 0.3)"`, `"expo.out"` or `"power2.inOut"`.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default overshoot for the `back` curve.
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;
/// Default amplitude for the `elastic` curve.
pub const DEFAULT_ELASTIC_AMPLITUDE: f64 = 1.0;
/// Default period for the `elastic` curve.
pub const DEFAULT_ELASTIC_PERIOD: f64 = 0.3;
/// Default period for `elastic.inOut`.
pub const DEFAULT_ELASTIC_IN_OUT_PERIOD: f64 = 0.45;

/// Errors produced while parsing an easing identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EasingError {
    #[error("Unknown easing curve: {0}")]
    UnknownCurve(String),
    #[error("Unknown easing direction: {0}")]
    UnknownDirection(String),
    #[error("Invalid easing parameter in {0}")]
    InvalidParameter(String),
}

/// Which end of the curve the motion is concentrated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EaseDirection {
    In,
    #[default]
    Out,
    InOut,
}

impl EaseDirection {
    fn suffix(self) -> &'static str {
        match self {
            EaseDirection::In => "in",
            EaseDirection::Out => "out",
            EaseDirection::InOut => "inOut",
        }
    }
}

/// The shape of an easing curve, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EaseCurve {
    /// No easing.
    Linear,
    /// Polynomial curve; `Power(1)` is quadratic, `Power(4)` quintic.
    Power(u8),
    Sine,
    Expo,
    Circ,
    Back { overshoot: f64 },
    Elastic { amplitude: f64, period: f64 },
    Bounce,
}

/// A parsed easing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Easing {
    pub curve: EaseCurve,
    pub direction: EaseDirection,
}

impl Easing {
    pub const LINEAR: Easing = Easing {
        curve: EaseCurve::Linear,
        direction: EaseDirection::Out,
    };

    pub const fn new(curve: EaseCurve, direction: EaseDirection) -> Self {
        Self { curve, direction }
    }

    /// `elastic.out(1, 0.3)`, the default reveal-in curve.
    pub const fn elastic_out() -> Self {
        Self::new(
            EaseCurve::Elastic {
                amplitude: DEFAULT_ELASTIC_AMPLITUDE,
                period: DEFAULT_ELASTIC_PERIOD,
            },
            EaseDirection::Out,
        )
    }

    /// `expo.out`, the default reveal-out curve.
    pub const fn expo_out() -> Self {
        Self::new(EaseCurve::Expo, EaseDirection::Out)
    }

    /// Map linear progress `t` to eased progress.
    ///
    /// `t` is clamped to `[0, 1]`; the result is exactly 0 at `t = 0` and
    /// exactly 1 at `t = 1`, but may overshoot in between.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        if self.curve == EaseCurve::Linear {
            return t;
        }

        match self.direction {
            EaseDirection::Out => self.ease_out(t),
            EaseDirection::In => 1.0 - self.ease_out(1.0 - t),
            EaseDirection::InOut => {
                if t < 0.5 {
                    (1.0 - self.ease_out(1.0 - t * 2.0)) / 2.0
                } else {
                    0.5 + self.ease_out((t - 0.5) * 2.0) / 2.0
                }
            }
        }
    }

    /// The "out" form of the curve; the other directions are derived from it.
    fn ease_out(&self, t: f64) -> f64 {
        match self.curve {
            EaseCurve::Linear => t,
            EaseCurve::Power(power) => 1.0 - (1.0 - t).powi(i32::from(power) + 1),
            EaseCurve::Sine => (t * FRAC_PI_2).sin(),
            EaseCurve::Expo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            EaseCurve::Circ => (1.0 - (t - 1.0) * (t - 1.0)).max(0.0).sqrt(),
            EaseCurve::Back { overshoot } => {
                let p = t - 1.0;
                p * p * ((overshoot + 1.0) * p + overshoot) + 1.0
            }
            EaseCurve::Elastic { amplitude, period } => {
                if t >= 1.0 {
                    return 1.0;
                }
                let amp = amplitude.max(1.0);
                let period = period / amplitude.min(1.0);
                let phase = period / TAU * (1.0 / amp).asin();
                amp * 2f64.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
            }
            EaseCurve::Bounce => bounce_out(t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::new(EaseCurve::Power(1), EaseDirection::Out)
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

impl FromStr for Easing {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (head, params) = match trimmed.find('(') {
            Some(open) => {
                let close = trimmed
                    .rfind(')')
                    .filter(|close| *close > open)
                    .ok_or_else(|| EasingError::InvalidParameter(trimmed.to_string()))?;
                (&trimmed[..open], parse_params(&trimmed[open + 1..close], trimmed)?)
            }
            None => (trimmed, Vec::new()),
        };

        let (name, direction) = match head.split_once('.') {
            Some((name, dir)) => (name, parse_direction(dir)?),
            None => (head, Some(EaseDirection::default())),
        };

        let param = |index: usize, default: f64| params.get(index).copied().unwrap_or(default);

        let curve = match name.to_ascii_lowercase().as_str() {
            "none" | "linear" | "power0" => EaseCurve::Linear,
            "power1" | "quad" => EaseCurve::Power(1),
            "power2" | "cubic" => EaseCurve::Power(2),
            "power3" | "quart" => EaseCurve::Power(3),
            "power4" | "quint" | "strong" => EaseCurve::Power(4),
            "sine" => EaseCurve::Sine,
            "expo" => EaseCurve::Expo,
            "circ" => EaseCurve::Circ,
            "back" => EaseCurve::Back {
                overshoot: param(0, DEFAULT_BACK_OVERSHOOT),
            },
            "elastic" => {
                let default_period = match direction {
                    Some(EaseDirection::InOut) => DEFAULT_ELASTIC_IN_OUT_PERIOD,
                    _ => DEFAULT_ELASTIC_PERIOD,
                };
                let amplitude = param(0, DEFAULT_ELASTIC_AMPLITUDE);
                let period = param(1, default_period);
                if amplitude <= 0.0 || period <= 0.0 {
                    return Err(EasingError::InvalidParameter(trimmed.to_string()));
                }
                EaseCurve::Elastic { amplitude, period }
            }
            "bounce" => EaseCurve::Bounce,
            _ => return Err(EasingError::UnknownCurve(trimmed.to_string())),
        };

        match direction {
            Some(direction) => Ok(Easing::new(curve, direction)),
            None if curve == EaseCurve::Linear => Ok(Easing::LINEAR),
            None => Err(EasingError::UnknownDirection(trimmed.to_string())),
        }
    }
}

/// `None` is the directionless `easeNone` suffix, valid only on linear curves.
fn parse_direction(dir: &str) -> Result<Option<EaseDirection>, EasingError> {
    match dir {
        "in" | "easeIn" => Ok(Some(EaseDirection::In)),
        "out" | "easeOut" => Ok(Some(EaseDirection::Out)),
        "inOut" | "easeInOut" => Ok(Some(EaseDirection::InOut)),
        "none" | "easeNone" => Ok(None),
        other => Err(EasingError::UnknownDirection(other.to_string())),
    }
}

fn parse_params(inner: &str, whole: &str) -> Result<Vec<f64>, EasingError> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| EasingError::InvalidParameter(whole.to_string()))
        })
        .collect()
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.direction.suffix();
        match self.curve {
            EaseCurve::Linear => write!(f, "none"),
            EaseCurve::Power(p) => write!(f, "power{p}.{dir}"),
            EaseCurve::Sine => write!(f, "sine.{dir}"),
            EaseCurve::Expo => write!(f, "expo.{dir}"),
            EaseCurve::Circ => write!(f, "circ.{dir}"),
            EaseCurve::Back { overshoot } => write!(f, "back.{dir}({overshoot})"),
            EaseCurve::Elastic { amplitude, period } => {
                write!(f, "elastic.{dir}({amplitude}, {period})")
            }
            EaseCurve::Bounce => write!(f, "bounce.{dir}"),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Easing {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse("elastic.out(1, 0.3)"), Easing::elastic_out());
        assert_eq!(parse("elastic.out(1,0.3)"), Easing::elastic_out());
        assert_eq!(parse("expo.out"), Easing::expo_out());
        assert_eq!(parse("linear").curve, EaseCurve::Linear);
        assert_eq!(parse("power2").direction, EaseDirection::Out);
        assert_eq!(parse("power2.inOut").direction, EaseDirection::InOut);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("wobble.out".parse::<Easing>(), Err(EasingError::UnknownCurve(_))));
        assert!(matches!("expo.sideways".parse::<Easing>(), Err(EasingError::UnknownDirection(_))));
        assert!(matches!("back.out(abc)".parse::<Easing>(), Err(EasingError::InvalidParameter(_))));
        assert!(matches!("elastic.out(1, 0.3".parse::<Easing>(), Err(EasingError::InvalidParameter(_))));
    }

    #[test]
    fn test_parse_ease_none() {
        assert_eq!(parse("Linear.easeNone"), Easing::LINEAR);
        assert_eq!(parse("power0.none"), Easing::LINEAR);
        assert!(matches!("expo.easeNone".parse::<Easing>(), Err(EasingError::UnknownDirection(_))));
    }

    #[test]
    fn test_elastic_default_period_depends_on_direction() {
        let period = |name: &str| match parse(name).curve {
            EaseCurve::Elastic { period, .. } => period,
            other => panic!("expected elastic, got {other:?}"),
        };
        assert!((period("elastic.out") - DEFAULT_ELASTIC_PERIOD).abs() < f64::EPSILON);
        assert!((period("elastic.in") - DEFAULT_ELASTIC_PERIOD).abs() < f64::EPSILON);
        assert!((period("elastic.inOut") - DEFAULT_ELASTIC_IN_OUT_PERIOD).abs() < f64::EPSILON);
        assert!((period("elastic.inOut(1, 0.2)") - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let names = [
            "none", "power1.in", "power4.inOut", "sine.out", "expo.in", "circ.inOut",
            "back.out(1.7)", "elastic.out(1, 0.3)", "elastic.inOut(2, 0.5)", "bounce.out",
        ];
        for name in names {
            let easing = parse(name);
            assert!(easing.apply(0.0).abs() < 1e-9, "{name} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{name} at 1");
        }
    }

    #[test]
    fn test_apply_clamps_input() {
        let easing = Easing::expo_out();
        assert!(easing.apply(-3.0).abs() < f64::EPSILON);
        assert!((easing.apply(7.0) - 1.0).abs() < f64::EPSILON);
        assert!(easing.apply(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_elastic_overshoots() {
        let easing = Easing::elastic_out();
        let peak = (1..100)
            .map(|i| easing.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_power_curves() {
        let quad_in = parse("power1.in");
        assert!((quad_in.apply(0.5) - 0.25).abs() < 1e-9);
        let cubic_out = parse("cubic.out");
        assert!((cubic_out.apply(0.5) - 0.875).abs() < 1e-9);
        let in_out = parse("power2.inOut");
        assert!((in_out.apply(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["expo.out", "power2.inOut", "elastic.out(1, 0.3)", "back.in(2)", "none"] {
            let easing = parse(name);
            assert_eq!(parse(&easing.to_string()), easing);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Easing::expo_out()).unwrap();
        assert_eq!(json, "\"expo.out\"");
        let back: Easing = serde_json::from_str("\"sine.in\"").unwrap();
        assert_eq!(back, Easing::new(EaseCurve::Sine, EaseDirection::In));
        assert!(serde_json::from_str::<Easing>("\"nope\"").is_err());
    }
}
