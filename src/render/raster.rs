use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{
    core::Rgba8,
    error::{TrailerError, TrailerResult},
};

/// One rendered frame of RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixels with alpha un-premultiplied, as PNG and most image APIs expect.
    pub fn to_straight(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        let mut out = [px[0], px[1], px[2], px[3]];
        if self.premultiplied && out[3] != 0 && out[3] != 255 {
            let a = u32::from(out[3]);
            for c in &mut out[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Some(out)
    }

    /// Composite over `background` (treated as opaque) and pack the result as RGB into `out`.
    pub fn write_rgb24_over(&self, background: Rgba8, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.data.len() / 4 * 3);
        let bg = [background.r, background.g, background.b].map(u32::from);
        for px in self.data.chunks_exact(4) {
            let a = u32::from(px[3]);
            let inv = 255 - a;
            for (c, bg) in px[..3].iter().map(|&c| u32::from(c)).zip(bg) {
                let v = if self.premultiplied {
                    c + (bg * inv + 127) / 255
                } else {
                    (c * a + bg * inv + 127) / 255
                };
                out.push(v.min(255) as u8);
            }
        }
    }
}

/// Rasterizes SVG documents with `resvg`, holding one font database for every frame.
pub struct SvgRasterizer {
    options: usvg::Options<'static>,
}

impl SvgRasterizer {
    /// System fonts plus any `.ttf`/`.otf`/`.ttc` files in `font_dir`.
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "loaded font database");

        Self {
            options: usvg::Options {
                fontdb: Arc::new(db),
                font_resolver: font_resolver(),
                ..Default::default()
            },
        }
    }

    pub fn font_faces(&self) -> usize {
        self.options.fontdb.len()
    }

    #[tracing::instrument(skip(self, svg))]
    pub fn rasterize(&self, svg: &str, width: u32, height: u32) -> TrailerResult<FrameRGBA> {
        let tree = usvg::Tree::from_str(svg, &self.options).context("parse frame svg")?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            TrailerError::render(format!("cannot allocate a {width}x{height} pixmap"))
        })?;

        let size = tree.size();
        let transform = resvg::tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new(None)
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };
    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| matches!(ext.as_str(), "ttf" | "otf" | "ttc"));
        if is_font && let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping font");
        }
    }
}

/// Resolve the requested families, then generic sans, then any face at all, so text never
/// silently disappears on a machine without the preferred font.
fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<usvg::fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|f| match f {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
