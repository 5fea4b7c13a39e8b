//! Layered render composer.
//!
//! Builds a [`Scene`] purely from a widget snapshot and its configuration.
//! Nothing here holds state between frames.

use crate::scene::{
    BaseImage, BlurFilter, ClipPath, DEFAULT_HINT, Defs, EffectFilter, ElementIds, Fill, Label,
    Node, Overlay, Scene, Wrapper, Zoom,
};
use xray_core::config::XRayConfig;
use xray_core::effects::EffectChain;
use xray_core::widget::WidgetView;

/// Presentation settings that are not part of the widget configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeStyle {
    /// Text of the "press to reveal" hint.
    pub hint: String,
    pub hint_fill: Fill,
}

impl Default for ComposeStyle {
    fn default() -> Self {
        Self {
            hint: DEFAULT_HINT.to_string(),
            hint_fill: Fill::CurrentColor,
        }
    }
}

impl ComposeStyle {
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_hint_fill(mut self, fill: Fill) -> Self {
        self.hint_fill = fill;
        self
    }
}

/// Compose a frame with the default style.
pub fn compose(view: &WidgetView, config: &XRayConfig) -> Scene {
    compose_with(view, config, &ComposeStyle::default())
}

/// Compose a frame.
///
/// Layer order, bottom to top: the blurred image, then the sharp image
/// clipped to the reveal circle. Each effect chain that is non-empty wraps
/// its layer (or, for the global chain, both layers) in a filter group.
pub fn compose_with(view: &WidgetView, config: &XRayConfig, style: &ComposeStyle) -> Scene {
    let ids = ElementIds::for_widget(view.id);

    let blurred = wrap_if(
        &config.blur_layer_effects,
        &ids.blur_effects,
        Node::Image {
            href: config.href.clone(),
            filter: Some(ids.blur.clone()),
            zoom: None,
        },
    );

    let sharp = wrap_if(
        &config.image_layer_effects,
        &ids.image_effects,
        Node::clipped(
            &ids.circle,
            vec![Node::Image {
                href: config.href.clone(),
                filter: None,
                zoom: Some(Zoom {
                    scale: view.zoom,
                    origin: view.pointer,
                }),
            }],
        ),
    );

    let layers = if config.effects.is_empty() {
        vec![blurred, sharp]
    } else {
        vec![Node::filtered(&ids.effects, vec![blurred, sharp])]
    };

    let label = view.shows_hint().then(|| Label {
        text: style.hint.clone(),
        fill: style.hint_fill,
    });

    Scene {
        wrapper: Wrapper {
            class: "xray",
            role: "img",
            aria_label: config.alt.clone(),
            tab_index: 0,
        },
        base_image: BaseImage {
            href: config.href.clone(),
            alt: config.alt.clone(),
            visually_hidden: true,
        },
        overlay: Overlay {
            defs: defs(view, config, &ids),
            layers,
            label,
        },
    }
}

fn defs(view: &WidgetView, config: &XRayConfig, ids: &ElementIds) -> Defs {
    let effects = [
        (&ids.effects, &config.effects),
        (&ids.image_effects, &config.image_layer_effects),
        (&ids.blur_effects, &config.blur_layer_effects),
    ]
    .into_iter()
    .filter(|(_, chain)| !chain.is_empty())
    .map(|(id, chain)| EffectFilter {
        id: id.clone(),
        chain: chain.clone(),
    })
    .collect();

    Defs {
        clip: ClipPath {
            id: ids.circle.clone(),
            center: view.pointer,
            radius: view.circle_radius.max(0.0),
            full_canvas: view.is_revealed,
        },
        blur: BlurFilter {
            id: ids.blur.clone(),
            std_deviation: config.blur,
        },
        effects,
    }
}

fn wrap_if(chain: &EffectChain, id: &str, node: Node) -> Node {
    if chain.is_empty() {
        node
    } else {
        Node::filtered(id, vec![node])
    }
}
