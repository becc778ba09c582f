//! MP4 output through a system `ffmpeg` process.
//!
//! Frames are flattened over the trailer background and piped as packed `rgb24`; the video has
//! no alpha, so there is no reason to ship a fourth channel.

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    config::TrailerConfig,
    foundation::core::{Canvas, Fps, Rgba8},
    foundation::error::{TrailerError, TrailerResult},
    render::raster::FrameRGBA,
};

/// libx264 knobs for a trailer render.
#[derive(Clone, Debug, PartialEq)]
pub struct Mp4Settings {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Colour translucent pixels are composited onto; its alpha is ignored.
    pub background: Rgba8,
    /// Constant rate factor, 0..=51.
    pub crf: u8,
    pub preset: String,
}

impl Mp4Settings {
    pub fn for_config(cfg: &TrailerConfig) -> Self {
        Self {
            canvas: cfg.canvas,
            fps: cfg.fps,
            background: cfg.background(),
            crf: 23,
            preset: "medium".to_owned(),
        }
    }

    pub fn validate(&self) -> TrailerResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        // yuv420p subsamples chroma 2x2.
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(TrailerError::validation(format!(
                "mp4 output needs an even canvas, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.crf > 51 {
            return Err(TrailerError::validation(format!(
                "crf must be in 0..=51, got {}",
                self.crf
            )));
        }
        Ok(())
    }
}

/// What a finished MP4 contains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mp4Summary {
    pub frames: u64,
    /// Playback length implied by the frame count and rate.
    pub video_secs: f64,
    /// Size of the file on disk.
    pub bytes: u64,
}

/// First line of `ffmpeg -version`, or `None` when `ffmpeg` cannot be run.
pub fn ffmpeg_version() -> Option<String> {
    let out = Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .map(str::to_owned)
}

/// Create the directory an output file will land in.
pub(crate) fn prepare_output(path: &Path) -> TrailerResult<()> {
    if path.is_dir() {
        return Err(TrailerError::validation(format!(
            "output '{}' is a directory",
            path.display()
        )));
    }
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))?,
        _ => {}
    }
    Ok(())
}

/// A running `ffmpeg` writing one MP4.
///
/// Dropping the writer without [`Mp4Writer::finish`] kills `ffmpeg` and deletes the partial file,
/// so a failed render never leaves a truncated video behind.
pub struct Mp4Writer {
    path: PathBuf,
    settings: Mp4Settings,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    rgb: Vec<u8>,
    frames: u64,
    finished: bool,
}

impl Mp4Writer {
    #[tracing::instrument(skip(path, settings), fields(out = %path.display()))]
    pub fn create(path: &Path, settings: Mp4Settings) -> TrailerResult<Self> {
        settings.validate()?;
        prepare_output(path)?;
        let version = ffmpeg_version().ok_or_else(|| {
            TrailerError::encode("ffmpeg was not found on PATH; install it to render mp4")
        })?;
        tracing::debug!(%version, "using ffmpeg");

        let Canvas { width, height } = settings.canvas;
        let mut child = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-nostats", "-y"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-video_size", &format!("{width}x{height}")])
            .args(["-framerate", &format!("{}/{}", settings.fps.num, settings.fps.den)])
            .args(["-i", "-", "-an"])
            .args(["-c:v", "libx264", "-preset", &settings.preset])
            .args(["-crf", &settings.crf.to_string()])
            .args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TrailerError::encode(format!("failed to start ffmpeg: {e}")))?;
        let stdin = child.stdin.take();

        Ok(Self {
            path: path.to_path_buf(),
            rgb: Vec::with_capacity(width as usize * height as usize * 3),
            settings,
            child: Some(child),
            stdin,
            frames: 0,
            finished: false,
        })
    }

    /// Append one frame; it must match the canvas size.
    pub fn push(&mut self, frame: &FrameRGBA) -> TrailerResult<()> {
        let Canvas { width, height } = self.settings.canvas;
        if (frame.width, frame.height) != (width, height) {
            return Err(TrailerError::validation(format!(
                "frame is {}x{} but the video is {width}x{height}",
                frame.width, frame.height
            )));
        }
        frame.write_rgb24_over(self.settings.background, &mut self.rgb);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TrailerError::encode("mp4 writer has no open pipe"));
        };
        if let Err(e) = stdin.write_all(&self.rgb) {
            // ffmpeg most likely exited; its stderr says why.
            let reason = self.reap().err().map_or_else(|| e.to_string(), |err| err.to_string());
            return Err(TrailerError::encode(format!(
                "ffmpeg stopped accepting frames after {}: {reason}",
                self.frames
            )));
        }
        self.frames += 1;
        Ok(())
    }

    /// Close the pipe, wait for `ffmpeg` and report what was written.
    pub fn finish(mut self) -> TrailerResult<Mp4Summary> {
        self.reap()?;
        let bytes = std::fs::metadata(&self.path)
            .with_context(|| format!("stat '{}'", self.path.display()))?
            .len();
        let summary = Mp4Summary {
            frames: self.frames,
            video_secs: self.frames as f64 / self.settings.fps.as_f64(),
            bytes,
        };
        self.finished = true;
        tracing::debug!(frames = summary.frames, bytes, "mp4 complete");
        Ok(summary)
    }

    /// Close stdin and wait for the child; an error carries ffmpeg's own stderr.
    fn reap(&mut self) -> TrailerResult<()> {
        drop(self.stdin.take());
        let Some(child) = self.child.take() else {
            return Ok(());
        };
        let out = child
            .wait_with_output()
            .map_err(|e| TrailerError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        if out.status.success() {
            return Ok(());
        }
        Err(TrailerError::encode(format!(
            "ffmpeg exited with {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )))
    }
}

impl Drop for Mp4Writer {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if self.finished {
            return;
        }
        if std::fs::remove_file(&self.path).is_ok() {
            tracing::warn!(out = %self.path.display(), frames = self.frames, "discarded unfinished mp4");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
