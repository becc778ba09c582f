use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::{
    core::{Canvas, Fps, Rgba8},
    error::{TrailerError, TrailerResult},
};

/// Output settings for offline rendering. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailerConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Length of a full render, seconds.
    pub seconds: f64,
    /// Scatter seed; `None` draws one from the OS per run.
    pub seed: Option<u64>,
    /// Colour under the backdrop gradient, `[r, g, b, a]`.
    pub background_rgba: [u8; 4],
    /// Extra directory of `.ttf`/`.otf` files for the rasterizer.
    pub font_dir: Option<PathBuf>,
}

impl Default for TrailerConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            seconds: 12.0,
            seed: None,
            background_rgba: Rgba8::BLACK.to_array(),
            font_dir: None,
        }
    }
}

impl TrailerConfig {
    pub fn from_json_str(s: &str) -> TrailerResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> TrailerResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> TrailerResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.seconds.is_finite() || self.seconds <= 0.0 {
            return Err(TrailerError::validation("seconds must be finite and > 0"));
        }
        Ok(())
    }

    pub fn background(&self) -> Rgba8 {
        let [r, g, b, a] = self.background_rgba;
        Rgba8 { r, g, b, a }
    }

    /// Frames in a full render (at least one).
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_floor(self.seconds).max(1)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
