//! Named demo presets.

use crate::app::{AppError, AppResult};
use xray_core::config::{XRayConfig, XRayConfigBuilder};

/// Image used by every preset.
pub const EXAMPLE_IMAGE: &str = "example.jpeg";
pub const EXAMPLE_ALT: &str = "Example Image";

/// Darkens the blurred layer to 30% brightness.
pub const DIM_MATRIX: &str = ".3 0 0 0 0 0 .3 0 0 0 0 0 .3 0 0 0 0 0 1 0";

/// Preset names, in gallery order.
pub const DEMO_NAMES: &[&str] = &[
    "default",
    "side-by-side",
    "custom-blur",
    "effects",
    "fixed-radius",
    "custom-transitions",
    "scaled-radius",
    "zoom",
    "reveal-disabled",
    "reveal-persisted",
    "auto-reveal",
    "focused",
];

/// A demo preset: one or more widgets laid out in a row.
#[derive(Debug, Clone)]
pub struct Demo {
    pub name: &'static str,
    pub widgets: Vec<XRayConfig>,
    /// Give the first widget keyboard focus once mounted.
    pub focus_on_mount: bool,
}

/// Look up a preset by name.
///
/// Names are matched case-insensitively; `_` and spaces count as `-`.
pub fn demo(name: &str) -> AppResult<Demo> {
    let normalized = name.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    let key = DEMO_NAMES
        .iter()
        .copied()
        .find(|candidate| *candidate == normalized)
        .ok_or_else(|| AppError::UnknownDemo(name.to_string()))?;

    let example = || XRayConfig::builder(EXAMPLE_IMAGE, EXAMPLE_ALT);
    let single = |builder: XRayConfigBuilder| -> AppResult<Vec<XRayConfig>> {
        Ok(vec![builder.build()?])
    };

    let widgets = match key {
        "side-by-side" => vec![example().build()?, example().build()?],
        "custom-blur" => single(example().blur(2.0))?,
        "effects" => single(example().blur_layer_effects([DIM_MATRIX]))?,
        "fixed-radius" => single(example().fixed_radius(Some(15.0)))?,
        "custom-transitions" => single(example().circle_in("linear", 2.0))?,
        "scaled-radius" => single(example().radius_scale(2.0))?,
        "zoom" => single(example().zoom(2.5).blur(0.0).can_reveal(false))?,
        "reveal-disabled" => single(example().can_reveal(false))?,
        "reveal-persisted" => single(example().auto_reveal(true).persist_reveal(true))?,
        "auto-reveal" => single(example().auto_reveal(true))?,
        _ => single(example())?,
    };

    Ok(Demo {
        name: key,
        widgets,
        focus_on_mount: key == "focused",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_all_presets_build() {
        for name in DEMO_NAMES {
            let preset = demo(name).unwrap();
            assert_eq!(preset.name, *name);
            assert!(!preset.widgets.is_empty(), "{name} has no widgets");
        }
    }

    #[test]
    fn test_lookup_is_forgiving() {
        assert_eq!(demo("Side_By_Side").unwrap().name, "side-by-side");
        assert_eq!(demo(" zoom ").unwrap().name, "zoom");
        assert!(matches!(demo("nope"), Err(AppError::UnknownDemo(_))));
    }

    #[test]
    fn test_preset_settings() {
        assert_eq!(demo("side-by-side").unwrap().widgets.len(), 2);
        assert!((demo("custom-blur").unwrap().widgets[0].blur - 2.0).abs() < f64::EPSILON);
        assert_eq!(demo("fixed-radius").unwrap().widgets[0].fixed_radius, Some(15.0));
        assert_eq!(demo("effects").unwrap().widgets[0].blur_layer_effects.len(), 1);

        let zoom = &demo("zoom").unwrap().widgets[0];
        assert!((zoom.zoom - 2.5).abs() < f64::EPSILON);
        assert!(!zoom.can_reveal);

        let persisted = &demo("reveal-persisted").unwrap().widgets[0];
        assert!(persisted.auto_reveal && persisted.persist_reveal);

        let transitions = &demo("custom-transitions").unwrap().widgets[0];
        assert_eq!(transitions.circle_in.duration, Duration::from_secs(2));
        assert_eq!(transitions.circle_in.easing, xray_core::Easing::LINEAR);
    }

    #[test]
    fn test_focused_preset() {
        assert!(demo("focused").unwrap().focus_on_mount);
        assert!(!demo("default").unwrap().focus_on_mount);
    }
}
