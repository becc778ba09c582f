//! Canvas-relative placement for the trailer's centred column.
//!
//! Top-level text elements stack vertically and the stack is centred on the canvas. Consecutive
//! top-level glyphs share one row. Full-canvas elements (backdrop, flash) and the halo ignore the
//! flow, and the scan line sits at the top edge so its offset channel alone moves it.

use kurbo::Rect;

use crate::{
    composition::model::{ElementId, ElementKind, Scene, TextStyle},
    foundation::core::{Canvas, Vec2},
    foundation::error::{TrailerError, TrailerResult},
};

/// Vertical gap between stacked blocks, px.
pub const FLOW_GAP: f64 = 32.0;
/// Text blocks wrap at this fraction of the canvas width.
pub const MAX_TEXT_WIDTH_FRAC: f64 = 0.8;

/// Where one element sits before any cue offsets it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutBox {
    pub rect: Rect,
    /// Resolved font size, `0` for non-text elements.
    pub font_size: f64,
    /// Wrapped lines for text blocks; empty otherwise.
    pub lines: Vec<String>,
}

impl LayoutBox {
    fn shape(rect: Rect) -> Self {
        Self {
            rect,
            font_size: 0.0,
            lines: Vec::new(),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center().to_vec2()
    }
}

/// One box per scene element, indexed by [`ElementId`].
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct Layout {
    boxes: Vec<LayoutBox>,
}

impl Layout {
    pub fn get(&self, id: ElementId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|b| b.rect)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Horizontal advance of `ch` in ems, before tracking.
///
/// There is no shaper here, so widths are an estimate tuned for a geometric sans. They only decide
/// where glyph boxes go; the rasterizer shapes the real text inside them.
fn advance_em(ch: char, weight: u16) -> f64 {
    let base = match ch {
        ' ' => 0.28,
        'i' | 'l' | 'j' | 'I' | '.' | ',' | '\'' | '!' => 0.3,
        'f' | 't' | 'r' => 0.38,
        'm' | 'w' | 'M' | 'W' => 0.86,
        c if c.is_uppercase() => 0.7,
        _ => 0.55,
    };
    if weight >= 700 { base * 1.06 } else { base }
}

pub fn glyph_advance(ch: char, style: &TextStyle, font_size: f64) -> f64 {
    font_size * (advance_em(ch, style.weight) + style.letter_spacing_em)
}

pub fn text_width(text: &str, style: &TextStyle, font_size: f64) -> f64 {
    text.chars()
        .map(|ch| glyph_advance(ch, style, font_size))
        .sum()
}

/// Greedy word wrap; a single word wider than `max_width` gets a line of its own.
pub fn wrap_words(text: &str, style: &TextStyle, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && text_width(&candidate, style, font_size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

enum Flow {
    /// Consecutive glyphs sharing a baseline.
    Row {
        glyphs: Vec<(ElementId, f64)>,
        font_size: f64,
        height: f64,
    },
    Block {
        id: ElementId,
        size: Vec2,
        font_size: f64,
        lines: Vec<String>,
    },
}

impl Flow {
    fn height(&self) -> f64 {
        match self {
            Self::Row { height, .. } => *height,
            Self::Block { size, .. } => size.y,
        }
    }
}

/// Place every element of `scene` on its canvas.
#[tracing::instrument(skip(scene))]
pub fn column_layout(scene: &Scene) -> TrailerResult<Layout> {
    let canvas = scene.canvas;
    canvas.validate()?;
    let full = Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height));
    let max_text_width = full.width() * MAX_TEXT_WIDTH_FRAC;

    let mut boxes: Vec<Option<LayoutBox>> = vec![None; scene.elements.len()];
    let mut flow: Vec<Flow> = Vec::new();

    for (idx, el) in scene.elements.iter().enumerate() {
        let id = ElementId(idx);
        if el.parent.is_some() {
            // Placed with their parent run below.
            continue;
        }
        match &el.kind {
            ElementKind::Backdrop { .. } | ElementKind::FlashOverlay { .. } => {
                boxes[idx] = Some(LayoutBox::shape(full));
            }
            ElementKind::Halo { diameter, .. } => {
                let c = full.center();
                boxes[idx] = Some(LayoutBox::shape(Rect::from_center_size(
                    c,
                    (*diameter, *diameter),
                )));
            }
            ElementKind::ScanLine { height, .. } => {
                boxes[idx] = Some(LayoutBox::shape(Rect::new(0.0, 0.0, full.width(), *height)));
            }
            ElementKind::Glyph { ch, style } => {
                let font_size = style.size.resolve(canvas);
                let advance = glyph_advance(*ch, style, font_size);
                let height = font_size * style.line_height;
                match flow.last_mut() {
                    Some(Flow::Row {
                        glyphs,
                        font_size: fs,
                        height: h,
                    }) => {
                        glyphs.push((id, advance));
                        *fs = fs.max(font_size);
                        *h = h.max(height);
                    }
                    _ => flow.push(Flow::Row {
                        glyphs: vec![(id, advance)],
                        font_size,
                        height,
                    }),
                }
            }
            ElementKind::TextBlock { lines, style } => {
                let font_size = style.size.resolve(canvas);
                let wrapped: Vec<String> = lines
                    .iter()
                    .flat_map(|l| wrap_words(l, style, font_size, max_text_width))
                    .collect();
                let width = wrapped
                    .iter()
                    .map(|l| text_width(l, style, font_size))
                    .fold(0.0, f64::max);
                let height = wrapped.len() as f64 * font_size * style.line_height;
                flow.push(Flow::Block {
                    id,
                    size: Vec2::new(width, height),
                    font_size,
                    lines: wrapped,
                });
            }
            ElementKind::Divider {
                max_width,
                thickness,
                ..
            } => flow.push(Flow::Block {
                id,
                size: Vec2::new(max_width.min(max_text_width), *thickness),
                font_size: 0.0,
                lines: Vec::new(),
            }),
            ElementKind::TextRun { text, style } => {
                let font_size = style.size.resolve(canvas);
                flow.push(Flow::Block {
                    id,
                    size: Vec2::new(
                        text_width(text, style, font_size),
                        font_size * style.line_height,
                    ),
                    font_size,
                    lines: vec![text.clone()],
                });
            }
        }
    }

    let total = flow.iter().map(Flow::height).sum::<f64>()
        + flow.len().saturating_sub(1) as f64 * FLOW_GAP;
    let mut y = ((full.height() - total) * 0.5).max(0.0);
    let cx = full.center().x;

    for item in flow {
        let height = item.height();
        match item {
            Flow::Row {
                glyphs, font_size, ..
            } => {
                let row_width: f64 = glyphs.iter().map(|(_, a)| a).sum();
                let mut x = cx - row_width * 0.5;
                for (id, advance) in glyphs {
                    boxes[id.0] = Some(LayoutBox {
                        rect: Rect::new(x, y, x + advance, y + height),
                        font_size,
                        lines: Vec::new(),
                    });
                    x += advance;
                }
            }
            Flow::Block {
                id,
                size,
                font_size,
                lines,
            } => {
                let x0 = cx - size.x * 0.5;
                boxes[id.0] = Some(LayoutBox {
                    rect: Rect::new(x0, y, x0 + size.x, y + size.y),
                    font_size,
                    lines,
                });
            }
        }
        y += height + FLOW_GAP;
    }

    place_children(scene, canvas, &mut boxes)?;

    let boxes = boxes
        .into_iter()
        .enumerate()
        .map(|(idx, b)| {
            b.ok_or_else(|| {
                TrailerError::validation(format!(
                    "element '{}' has no layout",
                    scene.elements[idx].name
                ))
            })
        })
        .collect::<TrailerResult<Vec<_>>>()?;
    tracing::debug!(boxes = boxes.len(), "laid out scene");
    Ok(Layout { boxes })
}

/// Glyph children of a text run are laid left to right across the run's box.
fn place_children(
    scene: &Scene,
    canvas: Canvas,
    boxes: &mut [Option<LayoutBox>],
) -> TrailerResult<()> {
    let mut cursors: Vec<Option<f64>> = vec![None; scene.elements.len()];
    for (idx, el) in scene.elements.iter().enumerate() {
        let Some(parent) = el.parent else {
            continue;
        };
        let ElementKind::Glyph { ch, style } = &el.kind else {
            return Err(TrailerError::validation(format!(
                "element '{}': only glyphs can be nested",
                el.name
            )));
        };
        let Some(parent_rect) = boxes.get(parent.0).and_then(|b| b.as_ref()).map(|b| b.rect) else {
            return Err(TrailerError::validation(format!(
                "element '{}' has an unplaced parent",
                el.name
            )));
        };
        let font_size = style.size.resolve(canvas);
        let advance = glyph_advance(*ch, style, font_size);
        let x = cursors[parent.0].unwrap_or(parent_rect.x0);
        cursors[parent.0] = Some(x + advance);
        boxes[idx] = Some(LayoutBox {
            rect: Rect::new(x, parent_rect.y0, x + advance, parent_rect.y1),
            font_size,
            lines: Vec::new(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/column.rs"]
mod tests;
