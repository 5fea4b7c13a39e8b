//! Scene tree produced by the composer.
//!
//! The tree mirrors the DOM/SVG structure of the widget: a focusable
//! wrapper, a visually hidden base image used for layout and accessibility,
//! and an SVG overlay with its definitions, layer groups and hint label.

use kurbo::Point;
use peniko::Color;
use xray_core::effects::EffectChain;
use xray_core::widget::WidgetId;

/// Text shown while a keyboard reveal is available.
pub const DEFAULT_HINT: &str = "Press 'Space' to reveal";

/// Ids of the overlay definitions, unique per widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub circle: String,
    pub blur: String,
    pub effects: String,
    pub image_effects: String,
    pub blur_effects: String,
}

impl ElementIds {
    pub fn for_widget(id: WidgetId) -> Self {
        Self {
            circle: format!("xray-circle-{id}"),
            blur: format!("blur-filter-{id}"),
            effects: format!("effects-filter-{id}"),
            image_effects: format!("image-effects-filter-{id}"),
            blur_effects: format!("blur-effects-filter-{id}"),
        }
    }
}

/// Attributes of the focusable root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapper {
    pub class: &'static str,
    pub role: &'static str,
    pub aria_label: String,
    pub tab_index: i32,
}

/// The image element kept in the layout for sizing and accessibility.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseImage {
    pub href: String,
    pub alt: String,
    /// Present in layout but not painted.
    pub visually_hidden: bool,
}

/// Clip region for the sharp layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPath {
    pub id: String,
    pub center: Point,
    pub radius: f64,
    /// Adds a full-canvas rectangle, revealing everything.
    pub full_canvas: bool,
}

/// Gaussian blur applied to the background layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurFilter {
    pub id: String,
    pub std_deviation: f64,
}

/// A filter made of a chain of colour matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectFilter {
    pub id: String,
    pub chain: EffectChain,
}

/// Overlay definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Defs {
    pub clip: ClipPath,
    pub blur: BlurFilter,
    /// Only chains with at least one matrix get a filter.
    pub effects: Vec<EffectFilter>,
}

/// Magnification of an image around an origin point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    pub scale: f64,
    pub origin: Point,
}

/// A node in the overlay layer tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group {
        /// Id of a filter definition.
        filter: Option<String>,
        /// Id of a clip path definition.
        clip_path: Option<String>,
        children: Vec<Node>,
    },
    Image {
        href: String,
        /// Id of a filter definition.
        filter: Option<String>,
        zoom: Option<Zoom>,
    },
}

impl Node {
    /// Group applying the filter `id` to `children`.
    pub fn filtered(id: &str, children: Vec<Node>) -> Self {
        Node::Group {
            filter: Some(id.to_string()),
            clip_path: None,
            children,
        }
    }

    /// Group clipping `children` to the clip path `id`.
    pub fn clipped(id: &str, children: Vec<Node>) -> Self {
        Node::Group {
            filter: None,
            clip_path: Some(id.to_string()),
            children,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group { children, .. } => children,
            Node::Image { .. } => &[],
        }
    }

    /// This node and its descendants, depth first.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }
}

/// How the hint label is painted.
#[derive(Debug, Clone, Copy, Default)]
pub enum Fill {
    /// Inherit the surrounding text colour.
    #[default]
    CurrentColor,
    Solid(Color),
}

impl PartialEq for Fill {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Fill::CurrentColor, Fill::CurrentColor) => true,
            (Fill::Solid(a), Fill::Solid(b)) => a.components == b.components,
            _ => false,
        }
    }
}

/// Centered instructional text.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub fill: Fill,
}

/// The vector overlay covering the base image.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub defs: Defs,
    pub layers: Vec<Node>,
    pub label: Option<Label>,
}

/// Complete visual tree of one widget frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub wrapper: Wrapper,
    pub base_image: BaseImage,
    pub overlay: Overlay,
}

impl Scene {
    /// All overlay nodes, depth first.
    pub fn nodes(&self) -> Vec<&Node> {
        self.overlay.layers.iter().flat_map(Node::walk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_are_per_instance() {
        let id = WidgetId::new();
        let ids = ElementIds::for_widget(id);
        assert_eq!(ids.circle, format!("xray-circle-{id}"));
        assert_eq!(ids.blur_effects, format!("blur-effects-filter-{id}"));
        assert_ne!(ids, ElementIds::for_widget(WidgetId::new()));
    }

    #[test]
    fn test_walk_is_depth_first() {
        let tree = Node::filtered(
            "outer",
            vec![
                Node::clipped(
                    "clip",
                    vec![Node::Image {
                        href: "a.jpg".into(),
                        filter: None,
                        zoom: None,
                    }],
                ),
                Node::Image {
                    href: "b.jpg".into(),
                    filter: None,
                    zoom: None,
                },
            ],
        );
        let hrefs: Vec<&str> = tree
            .walk()
            .into_iter()
            .filter_map(|node| match node {
                Node::Image { href, .. } => Some(href.as_str()),
                Node::Group { .. } => None,
            })
            .collect();
        assert_eq!(hrefs, ["a.jpg", "b.jpg"]);
        assert_eq!(tree.walk().len(), 4);
    }
}
