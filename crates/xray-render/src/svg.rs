//! SVG markup backend.
//!
//! Writes a [`Scene`] as HTML/SVG markup: the focusable wrapper, the hidden
//! base image and the vector overlay.

use crate::renderer::{RenderResult, Renderer, RendererError};
use crate::scene::{Defs, Fill, Label, Node, Scene};
use log::trace;
use std::fmt::Write;

pub const WRAPPER_STYLE: &str =
    "position: relative; isolation: isolate; display: block; color: white; font-family: sans-serif";
pub const IMAGE_STYLE: &str = "position: relative; width: 100%; visibility: hidden; display: block";
pub const SVG_STYLE: &str =
    "position: absolute; top: 0; left: 0; width: 100%; height: 100%; z-index: 5";

/// Renders scenes to markup strings.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    /// Emit inline styles on the wrapper, base image and overlay.
    inline_styles: bool,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the inline layout styles the widget needs without a stylesheet.
    pub fn with_inline_styles(mut self, inline_styles: bool) -> Self {
        self.inline_styles = inline_styles;
        self
    }

    /// Full markup, wrapper element included.
    pub fn render_document(&self, scene: &Scene) -> RenderResult<String> {
        let mut out = String::new();
        let wrapper = &scene.wrapper;
        write!(
            out,
            r#"<div class="{}" role="{}" aria-label="{}" tabindex="{}""#,
            escape(wrapper.class),
            escape(wrapper.role),
            escape(&wrapper.aria_label),
            wrapper.tab_index
        )?;
        self.write_style(&mut out, WRAPPER_STYLE)?;
        out.push('>');
        out.push_str(&self.render_contents(scene)?);
        out.push_str("</div>");
        Ok(out)
    }

    /// Markup of the wrapper's children: base image and overlay.
    pub fn render_contents(&self, scene: &Scene) -> RenderResult<String> {
        validate(scene)?;

        let mut out = String::new();
        let base = &scene.base_image;
        write!(
            out,
            r#"<img class="xray__image" src="{}" alt="{}""#,
            escape(&base.href),
            escape(&base.alt)
        )?;
        if base.visually_hidden {
            if self.inline_styles {
                self.write_style(&mut out, IMAGE_STYLE)?;
            } else {
                out.push_str(r#" style="visibility: hidden""#);
            }
        }
        out.push_str("/>");

        out.push_str(r#"<svg class="xray__svg""#);
        self.write_style(&mut out, SVG_STYLE)?;
        out.push('>');
        write_defs(&mut out, &scene.overlay.defs)?;
        for layer in &scene.overlay.layers {
            write_node(&mut out, layer)?;
        }
        if let Some(label) = &scene.overlay.label {
            write_label(&mut out, label)?;
        }
        out.push_str("</svg>");

        trace!("Rendered {} bytes of overlay markup", out.len());
        Ok(out)
    }

    fn write_style(&self, out: &mut String, style: &str) -> RenderResult<()> {
        if self.inline_styles {
            write!(out, r#" style="{style}""#)?;
        }
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene) -> RenderResult<String> {
        self.render_document(scene)
    }
}

fn validate(scene: &Scene) -> RenderResult<()> {
    let clip = &scene.overlay.defs.clip;
    if !clip.center.is_finite() {
        return Err(RendererError::InvalidScene(format!(
            "clip center is not finite: {:?}",
            clip.center
        )));
    }
    if !clip.radius.is_finite() || clip.radius < 0.0 {
        return Err(RendererError::InvalidScene(format!(
            "clip radius must be finite and non-negative, got {}",
            clip.radius
        )));
    }
    let blur = scene.overlay.defs.blur.std_deviation;
    if !blur.is_finite() || blur < 0.0 {
        return Err(RendererError::InvalidScene(format!(
            "blur deviation must be finite and non-negative, got {blur}"
        )));
    }
    for node in scene.nodes() {
        if let Node::Image { zoom: Some(zoom), .. } = node {
            if !zoom.scale.is_finite() || !zoom.origin.is_finite() {
                return Err(RendererError::InvalidScene(format!(
                    "zoom is not finite: {zoom:?}"
                )));
            }
        }
    }
    Ok(())
}

fn write_defs(out: &mut String, defs: &Defs) -> RenderResult<()> {
    out.push_str("<defs>");

    let clip = &defs.clip;
    write!(
        out,
        r#"<clipPath id="{}"><circle cx="{}" cy="{}" r="{}"/>"#,
        escape(&clip.id),
        clip.center.x,
        clip.center.y,
        clip.radius
    )?;
    if clip.full_canvas {
        out.push_str(r#"<rect x="0" y="0" width="100%" height="100%"/>"#);
    }
    out.push_str("</clipPath>");

    write!(
        out,
        r#"<filter id="{}"><feGaussianBlur in="SourceGraphic" stdDeviation="{}"/></filter>"#,
        escape(&defs.blur.id),
        defs.blur.std_deviation
    )?;

    for effect in &defs.effects {
        write!(out, r#"<filter id="{}">"#, escape(&effect.id))?;
        for matrix in effect.chain.iter() {
            write!(out, r#"<feColorMatrix type="matrix" values="{matrix}"/>"#)?;
        }
        out.push_str("</filter>");
    }

    out.push_str("</defs>");
    Ok(())
}

fn write_node(out: &mut String, node: &Node) -> RenderResult<()> {
    match node {
        Node::Group {
            filter,
            clip_path,
            children,
        } => {
            out.push_str("<g");
            if let Some(id) = filter {
                write!(out, r#" filter="url(#{})""#, escape(id))?;
            }
            if let Some(id) = clip_path {
                write!(out, r#" clip-path="url(#{})""#, escape(id))?;
            }
            out.push('>');
            for child in children {
                write_node(out, child)?;
            }
            out.push_str("</g>");
        }
        Node::Image { href, filter, zoom } => {
            write!(
                out,
                r#"<image href="{}" x="0" y="0" width="100%""#,
                escape(href)
            )?;
            if let Some(id) = filter {
                write!(out, r#" filter="url(#{})""#, escape(id))?;
            }
            if let Some(zoom) = zoom {
                write!(
                    out,
                    r#" style="transform: scale({}); transform-origin: {}px {}px""#,
                    zoom.scale, zoom.origin.x, zoom.origin.y
                )?;
            }
            out.push_str("/>");
        }
    }
    Ok(())
}

fn write_label(out: &mut String, label: &Label) -> RenderResult<()> {
    let fill = match label.fill {
        Fill::CurrentColor => "currentColor".to_string(),
        Fill::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 255 {
                format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
            } else {
                format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
            }
        }
    };
    write!(
        out,
        r#"<text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" fill="{}">{}</text>"#,
        fill,
        escape(&label.text)
    )?;
    Ok(())
}

/// Escape text for use in attribute values and element content.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
