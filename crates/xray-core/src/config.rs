//! Widget configuration.
//!
//! [`XRayConfig`] is the fully-resolved, validated configuration of one
//! widget. Defaults are applied once, by [`XRayConfigBuilder::build`] or by
//! [`XRayConfig::from_json`], and never re-derived afterwards.

use crate::easing::{Easing, EasingError};
use crate::effects::{ChainError, EffectChain, EffectError};
use crate::radius::RadiusMode;
use crate::tween::Transition;
use kurbo::Point;
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BLUR: f64 = 15.0;
pub const DEFAULT_RADIUS_SCALE: f64 = 1.0;
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const DEFAULT_CIRCLE_IN_TRANSITION: &str = "elastic.out(1, 0.3)";
pub const DEFAULT_CIRCLE_IN_DURATION: f64 = 0.5;
pub const DEFAULT_CIRCLE_OUT_TRANSITION: &str = "expo.out";
pub const DEFAULT_CIRCLE_OUT_DURATION: f64 = 0.2;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Image reference (href) is required")]
    MissingHref,
    #[error("Accessible label (alt) is required")]
    MissingAlt,
    #[error("Invalid value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: f64 },
    #[error("Invalid easing for {field}: {source}")]
    UnknownEasing {
        field: &'static str,
        #[source]
        source: EasingError,
    },
    #[error("Invalid effect matrix in {layer}[{index}]: {source}")]
    InvalidEffectMatrix {
        layer: &'static str,
        index: usize,
        #[source]
        source: EffectError,
    },
    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Callback invoked when the widget is clicked, with the pointer position
/// relative to the widget origin.
/// Runs on the UI thread; the callback need not be `Send`.
#[derive(Clone)]
pub struct ClickHandler(Rc<dyn Fn(Point)>);

impl ClickHandler {
    pub fn new(f: impl Fn(Point) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, position: Point) {
        (self.0)(position)
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler(..)")
    }
}

/// Validated widget configuration.
#[derive(Debug, Clone)]
pub struct XRayConfig {
    /// Image reference.
    pub href: String,
    /// Accessible label.
    pub alt: String,
    /// Gaussian blur standard deviation of the background layer.
    pub blur: f64,
    /// Multiplier applied to the responsive radius.
    pub radius_scale: f64,
    /// Fixed radius; disables the responsive calculation when set.
    pub fixed_radius: Option<f64>,
    /// Whether the viewer may toggle a full reveal from the keyboard.
    pub can_reveal: bool,
    /// Reveal fully as soon as the widget gains focus.
    pub auto_reveal: bool,
    /// Once revealed, stay revealed until explicitly toggled.
    pub persist_reveal: bool,
    pub on_click: Option<ClickHandler>,
    /// Effects applied to the whole overlay.
    pub effects: EffectChain,
    /// Effects applied to the sharp image layer.
    pub image_layer_effects: EffectChain,
    /// Effects applied to the blurred layer.
    pub blur_layer_effects: EffectChain,
    pub circle_in: Transition,
    pub circle_out: Transition,
    /// Requested magnification of the sharp layer; see [`Self::effective_zoom`].
    pub zoom: f64,
}

impl XRayConfig {
    /// Start building a configuration for the required image and label.
    pub fn builder(href: impl Into<String>, alt: impl Into<String>) -> XRayConfigBuilder {
        XRayConfigBuilder::new(href, alt)
    }

    /// Parse and validate the JSON form of the configuration.
    ///
    /// Keys are camelCase (`radiusScale`, `circleInDuration`, ...); `src` is
    /// accepted as an alias of `href`.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        raw.into_builder().build()
    }

    /// Zoom clamped to a minimum of 1.
    pub fn effective_zoom(&self) -> f64 {
        self.zoom.max(1.0)
    }

    /// How the reveal circle radius is chosen.
    pub fn radius_mode(&self) -> RadiusMode {
        match self.fixed_radius {
            Some(radius) => RadiusMode::Fixed(radius),
            None => RadiusMode::Responsive(self.radius_scale),
        }
    }
}

/// Builder for [`XRayConfig`].
#[derive(Debug, Clone)]
pub struct XRayConfigBuilder {
    href: String,
    alt: String,
    blur: f64,
    radius_scale: f64,
    fixed_radius: Option<f64>,
    can_reveal: bool,
    auto_reveal: bool,
    persist_reveal: bool,
    on_click: Option<ClickHandler>,
    effects: Vec<String>,
    image_layer_effects: Vec<String>,
    blur_layer_effects: Vec<String>,
    circle_in_transition: String,
    circle_in_duration: f64,
    circle_out_transition: String,
    circle_out_duration: f64,
    zoom: f64,
}

impl XRayConfigBuilder {
    pub fn new(href: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            alt: alt.into(),
            blur: DEFAULT_BLUR,
            radius_scale: DEFAULT_RADIUS_SCALE,
            fixed_radius: None,
            can_reveal: true,
            auto_reveal: false,
            persist_reveal: false,
            on_click: None,
            effects: Vec::new(),
            image_layer_effects: Vec::new(),
            blur_layer_effects: Vec::new(),
            circle_in_transition: DEFAULT_CIRCLE_IN_TRANSITION.to_string(),
            circle_in_duration: DEFAULT_CIRCLE_IN_DURATION,
            circle_out_transition: DEFAULT_CIRCLE_OUT_TRANSITION.to_string(),
            circle_out_duration: DEFAULT_CIRCLE_OUT_DURATION,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    pub fn radius_scale(mut self, scale: f64) -> Self {
        self.radius_scale = scale;
        self
    }

    pub fn fixed_radius(mut self, radius: Option<f64>) -> Self {
        self.fixed_radius = radius;
        self
    }

    pub fn can_reveal(mut self, allowed: bool) -> Self {
        self.can_reveal = allowed;
        self
    }

    pub fn auto_reveal(mut self, auto: bool) -> Self {
        self.auto_reveal = auto;
        self
    }

    pub fn persist_reveal(mut self, persist: bool) -> Self {
        self.persist_reveal = persist;
        self
    }

    pub fn on_click(mut self, handler: impl Fn(Point) + 'static) -> Self {
        self.on_click = Some(ClickHandler::new(handler));
        self
    }

    pub fn effects<S: Into<String>>(mut self, matrices: impl IntoIterator<Item = S>) -> Self {
        self.effects = matrices.into_iter().map(Into::into).collect();
        self
    }

    pub fn image_layer_effects<S: Into<String>>(
        mut self,
        matrices: impl IntoIterator<Item = S>,
    ) -> Self {
        self.image_layer_effects = matrices.into_iter().map(Into::into).collect();
        self
    }

    pub fn blur_layer_effects<S: Into<String>>(
        mut self,
        matrices: impl IntoIterator<Item = S>,
    ) -> Self {
        self.blur_layer_effects = matrices.into_iter().map(Into::into).collect();
        self
    }

    /// Easing identifier and duration (seconds) for the circle growing in.
    pub fn circle_in(mut self, easing: impl Into<String>, duration: f64) -> Self {
        self.circle_in_transition = easing.into();
        self.circle_in_duration = duration;
        self
    }

    /// Easing identifier and duration (seconds) for the circle shrinking out.
    pub fn circle_out(mut self, easing: impl Into<String>, duration: f64) -> Self {
        self.circle_out_transition = easing.into();
        self.circle_out_duration = duration;
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> ConfigResult<XRayConfig> {
        if self.href.trim().is_empty() {
            return Err(ConfigError::MissingHref);
        }
        if self.alt.trim().is_empty() {
            return Err(ConfigError::MissingAlt);
        }

        let blur = non_negative("blur", self.blur)?;
        let radius_scale = non_negative("radiusScale", self.radius_scale)?;
        let fixed_radius = self
            .fixed_radius
            .map(|r| non_negative("fixedRadius", r))
            .transpose()?;
        if !self.zoom.is_finite() {
            return Err(ConfigError::InvalidNumber {
                field: "zoom",
                value: self.zoom,
            });
        }

        let circle_in = transition(
            "circleInTransition",
            &self.circle_in_transition,
            "circleInDuration",
            self.circle_in_duration,
        )?;
        let circle_out = transition(
            "circleOutTransition",
            &self.circle_out_transition,
            "circleOutDuration",
            self.circle_out_duration,
        )?;

        Ok(XRayConfig {
            href: self.href,
            alt: self.alt,
            blur,
            radius_scale,
            fixed_radius,
            can_reveal: self.can_reveal,
            auto_reveal: self.auto_reveal,
            persist_reveal: self.persist_reveal,
            on_click: self.on_click,
            effects: effect_chain("effects", &self.effects)?,
            image_layer_effects: effect_chain("imageLayerEffects", &self.image_layer_effects)?,
            blur_layer_effects: effect_chain("blurLayerEffects", &self.blur_layer_effects)?,
            circle_in,
            circle_out,
            zoom: self.zoom,
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidNumber { field, value })
    }
}

fn transition(
    easing_field: &'static str,
    easing: &str,
    duration_field: &'static str,
    seconds: f64,
) -> ConfigResult<Transition> {
    let easing: Easing = easing.parse().map_err(|source| ConfigError::UnknownEasing {
        field: easing_field,
        source,
    })?;
    let duration = Duration::try_from_secs_f64(non_negative(duration_field, seconds)?).map_err(
        |_| ConfigError::InvalidNumber {
            field: duration_field,
            value: seconds,
        },
    )?;
    Ok(Transition::new(easing, duration))
}

fn effect_chain(layer: &'static str, sources: &[String]) -> ConfigResult<EffectChain> {
    EffectChain::parse(sources).map_err(|ChainError { index, source }| {
        ConfigError::InvalidEffectMatrix {
            layer,
            index,
            source,
        }
    })
}

/// Wire form of the configuration, before defaults and validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    #[serde(alias = "src")]
    href: String,
    alt: String,
    blur: Option<f64>,
    radius_scale: Option<f64>,
    fixed_radius: Option<f64>,
    can_reveal: Option<bool>,
    auto_reveal: Option<bool>,
    persist_reveal: Option<bool>,
    #[serde(default)]
    effects: Vec<String>,
    #[serde(default)]
    image_layer_effects: Vec<String>,
    #[serde(default)]
    blur_layer_effects: Vec<String>,
    circle_in_transition: Option<String>,
    circle_in_duration: Option<f64>,
    circle_out_transition: Option<String>,
    circle_out_duration: Option<f64>,
    zoom: Option<f64>,
}

impl RawConfig {
    fn into_builder(self) -> XRayConfigBuilder {
        let mut builder = XRayConfigBuilder::new(self.href, self.alt)
            .fixed_radius(self.fixed_radius)
            .effects(self.effects)
            .image_layer_effects(self.image_layer_effects)
            .blur_layer_effects(self.blur_layer_effects);

        if let Some(blur) = self.blur {
            builder = builder.blur(blur);
        }
        if let Some(scale) = self.radius_scale {
            builder = builder.radius_scale(scale);
        }
        if let Some(allowed) = self.can_reveal {
            builder = builder.can_reveal(allowed);
        }
        if let Some(auto) = self.auto_reveal {
            builder = builder.auto_reveal(auto);
        }
        if let Some(persist) = self.persist_reveal {
            builder = builder.persist_reveal(persist);
        }
        if let Some(zoom) = self.zoom {
            builder = builder.zoom(zoom);
        }

        builder.circle_in(
            self.circle_in_transition
                .unwrap_or_else(|| DEFAULT_CIRCLE_IN_TRANSITION.to_string()),
            self.circle_in_duration.unwrap_or(DEFAULT_CIRCLE_IN_DURATION),
        )
        .circle_out(
            self.circle_out_transition
                .unwrap_or_else(|| DEFAULT_CIRCLE_OUT_TRANSITION.to_string()),
            self.circle_out_duration.unwrap_or(DEFAULT_CIRCLE_OUT_DURATION),
        )
    }
}
