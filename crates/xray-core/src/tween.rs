//! Value tweening driven by an external frame clock.
//!
//! A [`Tween`] holds one numeric value and at most one in-flight
//! interpolation. The host's animation scheduler advances it with
//! [`Tween::tick`]; every call to [`Tween::animate_to`] or
//! [`Tween::set_immediate`] discards the previous interpolation before doing
//! anything else, so a cancelled interpolation never produces another step.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An easing curve paired with a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub easing: Easing,
    /// Duration in seconds.
    #[serde(with = "seconds")]
    pub duration: Duration,
}

impl Transition {
    pub fn new(easing: Easing, duration: Duration) -> Self {
        Self { easing, duration }
    }

    /// Default transition for growing the reveal circle.
    pub fn circle_in() -> Self {
        Self::new(Easing::elastic_out(), Duration::from_millis(500))
    }

    /// Default transition for shrinking the reveal circle.
    pub fn circle_out() -> Self {
        Self::new(Easing::expo_out(), Duration::from_millis(200))
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Identifies one interpolation started by a [`Tween`].
///
/// Handles increase monotonically per tween, so a stale handle never matches
/// a newer interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

impl TweenHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// An in-flight interpolation.
#[derive(Debug, Clone)]
struct Interpolation {
    handle: TweenHandle,
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Interpolation {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn value(&self) -> f64 {
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One published step of an interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    /// Interpolation that produced this step.
    pub handle: TweenHandle,
    /// Interpolated value after the step.
    pub value: f64,
    /// Whether this was the final step.
    pub finished: bool,
}

/// A numeric value that can be set instantly or animated towards a target.
#[derive(Debug, Clone)]
pub struct Tween {
    value: f64,
    active: Option<Interpolation>,
    next_handle: u64,
}

impl Tween {
    /// Create a tween resting at `initial`.
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            active: None,
            next_handle: 1,
        }
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Target of the active interpolation, if any.
    pub fn target(&self) -> Option<f64> {
        self.active.as_ref().map(|i| i.to)
    }

    /// Whether an interpolation is in flight.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Handle of the in-flight interpolation.
    pub fn active_handle(&self) -> Option<TweenHandle> {
        self.active.as_ref().map(|i| i.handle)
    }

    /// Cancel any interpolation and jump to `value`.
    pub fn set_immediate(&mut self, value: f64) {
        self.cancel();
        self.value = value;
    }

    /// Cancel any interpolation and start a new one from the current value.
    ///
    /// A zero duration completes synchronously and leaves nothing in flight.
    pub fn animate_to(&mut self, target: f64, transition: Transition) -> TweenHandle {
        self.cancel();

        let handle = TweenHandle(self.next_handle);
        self.next_handle += 1;

        if transition.duration.is_zero() {
            self.value = target;
            return handle;
        }

        self.active = Some(Interpolation {
            handle,
            from: self.value,
            to: target,
            duration: transition.duration,
            elapsed: Duration::ZERO,
            easing: transition.easing,
        });
        handle
    }

    /// Drop the in-flight interpolation, keeping the current value.
    ///
    /// Returns the cancelled handle.
    pub fn cancel(&mut self) -> Option<TweenHandle> {
        self.active.take().map(|i| {
            log::trace!("Tween {} cancelled at {:.3}", i.handle.id(), self.value);
            i.handle
        })
    }

    /// Advance the in-flight interpolation by `dt`.
    ///
    /// Returns the published step, or `None` when nothing is animating.
    pub fn tick(&mut self, dt: Duration) -> Option<TweenStep> {
        let interpolation = self.active.as_mut()?;
        interpolation.elapsed = interpolation.elapsed.saturating_add(dt);

        let handle = interpolation.handle;
        let finished = interpolation.is_complete();
        self.value = if finished {
            interpolation.to
        } else {
            interpolation.value()
        };

        if finished {
            self.active = None;
        }

        Some(TweenStep {
            handle,
            value: self.value,
            finished,
        })
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(0.0)
    }
}
