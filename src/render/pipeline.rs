use std::{path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    config::TrailerConfig,
    encode::ffmpeg::{Mp4Settings, Mp4Writer, prepare_output},
    eval::evaluator::EvaluatedFrame,
    foundation::core::FrameIndex,
    foundation::error::{TrailerError, TrailerResult},
    layout::column::{Layout, column_layout},
    presenter::timeline::TimelinePresenter,
    render::raster::{FrameRGBA, SvgRasterizer},
    render::svg::{SvgOptions, frame_to_svg},
    schedule::clock::ManualClock,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    pub frames: u64,
    pub seed: u64,
    /// Playback length of the written video.
    pub video_secs: f64,
    pub bytes: u64,
}

/// Offline host for the trailer: drives a presenter from a manual clock and turns its frames
/// into pixels.
pub struct TrailerRenderer {
    cfg: TrailerConfig,
    svg: SvgOptions,
    rasterizer: SvgRasterizer,
}

/// Mounted presenter plus the layout of its scene.
struct Session {
    clock: ManualClock,
    presenter: TimelinePresenter<ManualClock>,
    layout: Layout,
}

impl Session {
    fn mount(cfg: &TrailerConfig, seed: u64) -> TrailerResult<Self> {
        let clock = ManualClock::new();
        let mut presenter = TimelinePresenter::new(clock.clone(), cfg.canvas);
        presenter.mount_with_seed(seed)?;
        let scene = presenter
            .scene()
            .ok_or_else(|| TrailerError::lifecycle("presenter lost its scene after mount"))?;
        let layout = column_layout(scene)?;
        Ok(Self {
            clock,
            presenter,
            layout,
        })
    }

    fn tick_at(&mut self, at: Duration) -> TrailerResult<EvaluatedFrame> {
        self.clock.set(at);
        self.presenter.tick()
    }
}

impl TrailerRenderer {
    pub fn new(cfg: TrailerConfig) -> TrailerResult<Self> {
        cfg.validate()?;
        let svg = SvgOptions {
            background: cfg.background(),
            ..SvgOptions::default()
        };
        let rasterizer = SvgRasterizer::new(cfg.font_dir.as_deref());
        Ok(Self {
            cfg,
            svg,
            rasterizer,
        })
    }

    pub fn config(&self) -> &TrailerConfig {
        &self.cfg
    }

    /// The configured seed, or a fresh one from the OS.
    pub fn resolve_seed(&self) -> u64 {
        self.cfg.seed.unwrap_or_else(rand::random)
    }

    /// SVG for the instant `at` seconds after mount.
    pub fn svg_at(&self, seed: u64, at: f64) -> TrailerResult<String> {
        let mut session = Session::mount(&self.cfg, seed)?;
        let frame = session.tick_at(secs_to_duration(at)?)?;
        let scene = session
            .presenter
            .scene()
            .ok_or_else(|| TrailerError::lifecycle("presenter is not mounted"))?;
        frame_to_svg(scene, &session.layout, &frame, &self.svg)
    }

    #[tracing::instrument(skip(self))]
    pub fn render_frame_at(&self, seed: u64, at: f64) -> TrailerResult<FrameRGBA> {
        let svg = self.svg_at(seed, at)?;
        self.rasterizer
            .rasterize(&svg, self.cfg.canvas.width, self.cfg.canvas.height)
    }

    /// Render the whole configured duration to an MP4 through `ffmpeg`.
    #[tracing::instrument(skip(self, out), fields(out = %out.display()))]
    pub fn render_to_mp4(&self, seed: u64, out: &Path) -> TrailerResult<RenderStats> {
        let cfg = &self.cfg;
        let mut writer = Mp4Writer::create(out, Mp4Settings::for_config(cfg))?;
        let mut session = Session::mount(cfg, seed)?;

        let total = cfg.frame_count();
        for f in 0..total {
            let frame = session.tick_at(cfg.fps.frame_to_duration(FrameIndex(f)))?;
            let scene = session
                .presenter
                .scene()
                .ok_or_else(|| TrailerError::lifecycle("presenter is not mounted"))?;
            let svg = frame_to_svg(scene, &session.layout, &frame, &self.svg)?;
            let pixels = self
                .rasterizer
                .rasterize(&svg, cfg.canvas.width, cfg.canvas.height)?;
            writer.push(&pixels)?;
            if f % u64::from(cfg.fps.num.max(1)) == 0 {
                tracing::debug!(
                    frame = f,
                    total,
                    flash = session.presenter.flash().is_active(),
                    "rendered"
                );
            }
        }
        session.presenter.unmount();
        let summary = writer.finish()?;
        tracing::info!(frames = summary.frames, bytes = summary.bytes, seed, "encoded trailer");
        Ok(RenderStats {
            frames: summary.frames,
            seed,
            video_secs: summary.video_secs,
            bytes: summary.bytes,
        })
    }
}

/// Write straight-alpha PNG.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> TrailerResult<()> {
    prepare_output(path)?;
    image::save_buffer_with_format(
        path,
        &frame.to_straight(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn secs_to_duration(at: f64) -> TrailerResult<Duration> {
    Duration::try_from_secs_f64(at)
        .map_err(|_| TrailerError::validation(format!("invalid time offset {at}s")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
