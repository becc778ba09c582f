//! Timeline engine for the Signet trailer.
//!
//! A fixed set of timed cues (a scattered "UNBREAK" headline, the title, a divider, three
//! paragraphs, a glowing tagline and a scan line) is evaluated as a pure function of time since
//! mount. A single white flash is the only mutable state, switched on and off by two one-shot
//! timers.
//!
//! # Pipeline overview
//!
//! 1. **Mount**: [`TimelinePresenter::mount`] builds the [`Scene`] (with per-mount letter scatter),
//!    schedules the flash timers and acquires a [`LoopHandle`] for the infinite glow pulse.
//! 2. **Tick**: once per host frame, fire due timers and evaluate the scene into an
//!    [`EvaluatedFrame`].
//! 3. **Render** (optional): [`column_layout`] places elements, [`frame_to_svg`] writes an SVG
//!    document and [`SvgRasterizer`] turns it into premultiplied RGBA8.
//! 4. **Encode** (optional): stream frames to the system `ffmpeg` binary for MP4 output.
//! 5. **Unmount**: cancel pending timers and release every loop; nothing fires afterwards.
//!
//! The presenter is single-threaded and cooperative: there are no background threads, only
//! deadlines checked during [`TimelinePresenter::tick`].
#![forbid(unsafe_code)]

mod animation;
mod composition;
mod config;
mod encode;
mod eval;
mod foundation;
mod layout;
mod presenter;
mod render;
mod schedule;

pub use animation::anim::{Keyframe, Keyframes, Lerp};
pub use animation::ease::Ease;
pub use animation::timing::{LoopMode, Phase, Progress, Repeat, RepeatCount, Timing};
pub use composition::dsl::{CueBuilder, SceneBuilder};
pub use composition::model::{
    Channel, ChannelAnim, Cue, CueId, CueRole, Element, ElementId, ElementKind, FontSize, Fringe,
    Glow, GradientStop, LoopKey, Scene, TextShadow, TextStyle, VisualProps,
};
pub use composition::trailer::{
    DEFAULT_EASE, GLOW_DELAY, GLOW_PERIOD, HEADLINE, LETTER_DURATION, LETTER_STAGGER,
    LetterScatter, SCATTER_ROTATION_DEG, SCATTER_X, SCATTER_Y, TAGLINE, TAGLINE_CHAR_DURATION,
    TAGLINE_CHAR_STAGGER, TAGLINE_DELAY, build_trailer, glow_high, glow_low,
};
pub use config::TrailerConfig;
pub use encode::ffmpeg::{Mp4Settings, Mp4Summary, Mp4Writer, ffmpeg_version};
pub use eval::evaluator::{EvaluatedFrame, EvaluatedNode, Evaluator};
pub use foundation::core::{Canvas, Fps, FrameIndex, Rgba8, Vec2};
pub use foundation::error::{TrailerError, TrailerResult};
pub use layout::column::{Layout, LayoutBox, column_layout};
pub use presenter::flash::{
    FLASH_FADE_SECS, FLASH_HOLD, FLASH_ON_AT, FlashCommand, FlashOverlay, FlashState,
    FlashTransition,
};
pub use presenter::timeline::TimelinePresenter;
pub use render::pipeline::{RenderStats, TrailerRenderer, save_png};
pub use render::raster::{FrameRGBA, SvgRasterizer};
pub use render::svg::{SvgOptions, frame_to_svg};
pub use schedule::clock::{Clock, ManualClock, SystemClock};
pub use schedule::loops::{LoopHandle, LoopRegistry};
pub use schedule::timer::{Fired, TimerId, TimerQueue};
