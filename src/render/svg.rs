//! Evaluated frame to SVG document.
//!
//! Each element becomes a `<g>` carrying its cue transform and opacity; children nest inside
//! their parent's group so offsets, scale and opacity compose the same way they do in the
//! evaluator. Blur, glow and fringe are SVG filters and hard-shadow copies.

use std::fmt::Write as _;

use kurbo::Rect;

use crate::{
    composition::model::{Element, ElementKind, Fringe, Glow, GradientStop, Scene, TextStyle},
    eval::evaluator::{EvaluatedFrame, EvaluatedNode},
    foundation::core::{Canvas, Rgba8},
    foundation::error::{TrailerError, TrailerResult},
    layout::column::{Layout, LayoutBox},
};

/// Opacity below which a subtree is skipped entirely.
const INVISIBLE: f64 = 1.0 / 512.0;
/// Baseline position inside a line box, as a fraction of the font size past the half-leading.
const ASCENT_EM: f64 = 0.8;

const FRINGE_RED: Rgba8 = Rgba8::rgb(255, 0, 0);
const FRINGE_CYAN: Rgba8 = Rgba8::rgb(0, 255, 255);

#[derive(Clone, Debug, PartialEq)]
pub struct SvgOptions {
    /// Fill behind everything; the backdrop gradient is translucent.
    pub background: Rgba8,
    /// CSS font-family list handed to the rasterizer's font resolver.
    pub font_family: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            background: Rgba8::BLACK,
            font_family: "Inter, 'Helvetica Neue', Arial, sans-serif".to_owned(),
        }
    }
}

/// Serialize one frame of `scene` as a standalone SVG document sized to the canvas.
#[tracing::instrument(skip_all, fields(t = frame.t))]
pub fn frame_to_svg(
    scene: &Scene,
    layout: &Layout,
    frame: &EvaluatedFrame,
    opts: &SvgOptions,
) -> TrailerResult<String> {
    if frame.nodes.len() != scene.elements.len() || layout.len() != scene.elements.len() {
        return Err(TrailerError::render(format!(
            "frame/layout/scene size mismatch: {} nodes, {} boxes, {} elements",
            frame.nodes.len(),
            layout.len(),
            scene.elements.len()
        )));
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); scene.elements.len()];
    let mut roots = Vec::new();
    for (idx, el) in scene.elements.iter().enumerate() {
        match el.parent {
            Some(p) => children[p.0].push(idx),
            None => roots.push(idx),
        }
    }

    let mut w = SvgWriter {
        scene,
        layout,
        frame,
        opts,
        children,
        defs: String::new(),
        body: String::new(),
    };
    for idx in roots {
        w.element(idx)?;
    }
    w.finish(scene.canvas)
}

struct SvgWriter<'a> {
    scene: &'a Scene,
    layout: &'a Layout,
    frame: &'a EvaluatedFrame,
    opts: &'a SvgOptions,
    children: Vec<Vec<usize>>,
    defs: String,
    body: String,
}

impl SvgWriter<'_> {
    fn finish(self, canvas: Canvas) -> TrailerResult<String> {
        let mut out = String::with_capacity(self.defs.len() + self.body.len() + 512);
        write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height
        )
        .map_err(fmt_err)?;
        write!(out, "<defs>{}</defs>", self.defs).map_err(fmt_err)?;
        write!(
            out,
            r#"<rect width="100%" height="100%" {}/>"#,
            fill_attrs("fill", self.opts.background)
        )
        .map_err(fmt_err)?;
        out.push_str(&self.body);
        out.push_str("</svg>");
        Ok(out)
    }

    fn element(&mut self, idx: usize) -> TrailerResult<()> {
        let (scene, frame, layout) = (self.scene, self.frame, self.layout);
        let el = &scene.elements[idx];
        let node = &frame.nodes[idx];
        if node.world_opacity < INVISIBLE {
            return Ok(());
        }
        let lb = layout
            .get(node.element)
            .ok_or_else(|| TrailerError::render(format!("element '{}' has no layout", el.name)))?;

        let filter = self.filter(idx, el, node)?;
        write!(
            self.body,
            r#"<g id="{}" transform="{}" opacity="{}"{}>"#,
            escape_xml(&el.name),
            transform(lb, node),
            num(node.props.opacity),
            filter
                .map(|id| format!(r#" filter="url(#{id})""#))
                .unwrap_or_default()
        )
        .map_err(fmt_err)?;

        let fringe = node.props.fringe;
        if fringe.is_visible() {
            self.fringe_copies(el, lb, fringe)?;
        }
        self.content(idx, el, lb, None)?;

        for child in self.children[idx].clone() {
            self.element(child)?;
        }
        self.body.push_str("</g>");
        Ok(())
    }

    /// Two hard-edged colour copies behind the element, as CSS `drop-shadow(dx dy 0 colour)`.
    fn fringe_copies(&mut self, el: &Element, lb: &LayoutBox, fringe: Fringe) -> TrailerResult<()> {
        for (offset, color) in [(fringe.red, FRINGE_RED), (fringe.cyan, FRINGE_CYAN)] {
            write!(
                self.body,
                r#"<g transform="translate({} {})" opacity="{}">"#,
                num(offset.x),
                num(offset.y),
                num(fringe.alpha)
            )
            .map_err(fmt_err)?;
            self.content(usize::MAX, el, lb, Some(color))?;
            self.body.push_str("</g>");
        }
        Ok(())
    }

    /// Build the filter for element `idx`, if it needs one.
    fn filter(
        &mut self,
        idx: usize,
        el: &Element,
        node: &EvaluatedNode,
    ) -> TrailerResult<Option<String>> {
        let static_blur = match &el.kind {
            ElementKind::Halo { blur, .. } => *blur,
            _ => 0.0,
        };
        let glow = node.props.glow.or_else(|| style_of(el).and_then(|s| s.shadow));
        let blur = node.props.blur + static_blur;
        if glow.is_none() && blur <= 0.0 {
            return Ok(None);
        }

        let id = format!("fx{idx}");
        let c = self.scene.canvas;
        let (w, h) = (f64::from(c.width), f64::from(c.height));
        write!(
            self.defs,
            r#"<filter id="{id}" filterUnits="userSpaceOnUse" x="{}" y="{}" width="{}" height="{}">"#,
            num(-w),
            num(-h),
            num(3.0 * w),
            num(3.0 * h)
        )
        .map_err(fmt_err)?;

        let mut source = "SourceGraphic";
        if let Some(Glow { near, far }) = glow {
            for (name, shadow) in [("far", far), ("near", near)] {
                // CSS text-shadow blur radius is twice the Gaussian deviation.
                write!(
                    self.defs,
                    r#"<feGaussianBlur in="SourceAlpha" stdDeviation="{dev}" result="{name}-a"/><feFlood {flood}/><feComposite in2="{name}-a" operator="in" result="{name}"/>"#,
                    dev = num(shadow.blur * 0.5),
                    flood = color_attrs("flood-color", "flood-opacity", shadow.color),
                )
                .map_err(fmt_err)?;
            }
            self.defs.push_str(
                r#"<feMerge result="lit"><feMergeNode in="far"/><feMergeNode in="near"/><feMergeNode in="SourceGraphic"/></feMerge>"#,
            );
            source = "lit";
        }
        if blur > 0.0 {
            write!(
                self.defs,
                r#"<feGaussianBlur in="{source}" stdDeviation="{}"/>"#,
                num(blur)
            )
            .map_err(fmt_err)?;
        }
        self.defs.push_str("</filter>");
        Ok(Some(id))
    }

    /// Draw the element's own paint. `tint` replaces every fill (used for fringe copies).
    fn content(
        &mut self,
        idx: usize,
        el: &Element,
        lb: &LayoutBox,
        tint: Option<Rgba8>,
    ) -> TrailerResult<()> {
        let r = lb.rect;
        match &el.kind {
            ElementKind::Backdrop { stops } => {
                let paint = match tint {
                    Some(c) => fill_attrs("fill", c),
                    None => {
                        let id = self.gradient(idx, "bg", (0.0, 0.0, 1.0, 1.0), stops)?;
                        format!(r#"fill="url(#{id})""#)
                    }
                };
                self.rect(r, &paint)
            }
            ElementKind::Halo { diameter, color, .. } => {
                let c = r.center();
                write!(
                    self.body,
                    r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
                    num(c.x),
                    num(c.y),
                    num(diameter * 0.5),
                    fill_attrs("fill", tint.unwrap_or(*color))
                )
                .map_err(fmt_err)
            }
            ElementKind::FlashOverlay { color } => {
                self.rect(r, &fill_attrs("fill", tint.unwrap_or(*color)))
            }
            ElementKind::Glyph { ch, style } => {
                self.text_line(&ch.to_string(), r.center().x, r.y0, lb.font_size, style, tint)
            }
            ElementKind::TextBlock { style, .. } => {
                let line_h = lb.font_size * style.line_height;
                for (i, line) in lb.lines.iter().enumerate() {
                    let top = r.y0 + i as f64 * line_h;
                    self.text_line(line, r.center().x, top, lb.font_size, style, tint)?;
                }
                Ok(())
            }
            ElementKind::Divider { color, .. } => {
                let paint = match tint {
                    Some(c) => fill_attrs("fill", c),
                    None => {
                        let stops = fade_stops(*color);
                        let id = self.gradient(idx, "rule", (0.0, 0.0, 1.0, 0.0), &stops)?;
                        format!(r#"fill="url(#{id})""#)
                    }
                };
                self.rect(r, &paint)
            }
            // Drawn through its child glyphs.
            ElementKind::TextRun { .. } => Ok(()),
            ElementKind::ScanLine { color, .. } => {
                let paint = match tint {
                    Some(c) => fill_attrs("fill", c),
                    None => {
                        let stops = fade_stops(*color);
                        let id = self.gradient(idx, "scan", (0.0, 0.0, 0.0, 1.0), &stops)?;
                        format!(r#"fill="url(#{id})""#)
                    }
                };
                self.rect(r, &paint)
            }
        }
    }

    fn rect(&mut self, r: Rect, paint: &str) -> TrailerResult<()> {
        write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" {paint}/>"#,
            num(r.x0),
            num(r.y0),
            num(r.width()),
            num(r.height())
        )
        .map_err(fmt_err)
    }

    fn text_line(
        &mut self,
        text: &str,
        cx: f64,
        top: f64,
        font_size: f64,
        style: &TextStyle,
        tint: Option<Rgba8>,
    ) -> TrailerResult<()> {
        let half_leading = font_size * (style.line_height - 1.0) * 0.5;
        let baseline = top + half_leading + font_size * ASCENT_EM;
        write!(
            self.body,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" letter-spacing="{}" {}>{}</text>"#,
            num(cx),
            num(baseline),
            escape_xml(&self.opts.font_family),
            num(font_size),
            style.weight,
            if style.italic { "italic" } else { "normal" },
            num(style.letter_spacing_em * font_size),
            fill_attrs("fill", tint.unwrap_or(style.color)),
            escape_xml(text)
        )
        .map_err(fmt_err)
    }

    /// Emit a `linearGradient` in bounding-box units and return its id.
    fn gradient(
        &mut self,
        idx: usize,
        tag: &str,
        (x1, y1, x2, y2): (f64, f64, f64, f64),
        stops: &[GradientStop],
    ) -> TrailerResult<String> {
        let id = format!("{tag}{idx}");
        write!(
            self.defs,
            r#"<linearGradient id="{id}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">"#
        )
        .map_err(fmt_err)?;
        for s in stops {
            write!(
                self.defs,
                r#"<stop offset="{}" {}/>"#,
                num(s.offset),
                color_attrs("stop-color", "stop-opacity", s.color)
            )
            .map_err(fmt_err)?;
        }
        self.defs.push_str("</linearGradient>");
        Ok(id)
    }
}

fn style_of(el: &Element) -> Option<&TextStyle> {
    match &el.kind {
        ElementKind::Glyph { style, .. }
        | ElementKind::TextBlock { style, .. }
        | ElementKind::TextRun { style, .. } => Some(style),
        _ => None,
    }
}

/// Transparent, `color`, transparent.
fn fade_stops(color: Rgba8) -> [GradientStop; 3] {
    [
        GradientStop {
            offset: 0.0,
            color: color.with_alpha(0.0),
        },
        GradientStop {
            offset: 0.5,
            color,
        },
        GradientStop {
            offset: 1.0,
            color: color.with_alpha(0.0),
        },
    ]
}

/// Cue transform around the element's laid-out centre, CSS `transform-origin: center`.
fn transform(lb: &LayoutBox, node: &EvaluatedNode) -> String {
    let p = &node.props;
    let c = lb.center();
    format!(
        "translate({} {}) translate({} {}) rotate({}) scale({} {}) translate({} {})",
        num(p.offset.x),
        num(p.offset.y),
        num(c.x),
        num(c.y),
        num(p.rotation_deg),
        num(p.scale.x),
        num(p.scale.y),
        num(-c.x),
        num(-c.y)
    )
}

fn fill_attrs(attr: &str, c: Rgba8) -> String {
    color_attrs(attr, &format!("{attr}-opacity"), c)
}

/// `color="#rrggbb"` plus the opacity attribute when the colour is translucent.
fn color_attrs(color: &str, opacity: &str, c: Rgba8) -> String {
    if c.a == 255 {
        format!(r#"{color}="{}""#, c.to_hex())
    } else {
        format!(
            r#"{color}="{}" {opacity}="{}""#,
            c.to_hex(),
            num(c.alpha_f64())
        )
    }
}

/// Compact decimal with no exponent and no `-0`.
fn num(v: f64) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { "0".to_owned() } else { format!("{r}") }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn fmt_err(e: std::fmt::Error) -> TrailerError {
    TrailerError::render(format!("svg write failed: {e}"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
