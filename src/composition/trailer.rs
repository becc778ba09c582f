//! The Signet trailer scene.
//!
//! Every delay, duration and curve here is fixed. The only per-mount variance is where each
//! headline letter starts, drawn from the caller's RNG.

use rand::Rng;

use crate::{
    animation::anim::Keyframes,
    animation::ease::Ease,
    animation::timing::{Repeat, Timing},
    composition::dsl::{CueBuilder, SceneBuilder},
    composition::model::{
        Channel, CueRole, ElementKind, FontSize, Fringe, Glow, GradientStop, Scene, TextShadow,
        TextStyle, VisualProps,
    },
    foundation::core::{Canvas, Rgba8, Vec2},
    foundation::error::TrailerResult,
};

pub const HEADLINE: &str = "UNBREAK";
pub const TITLE_LINES: [&str; 2] = ["THE", "INTERNET"];
pub const SUBTITLE: &str = "The internet has a credibility crisis and polarization problem";
pub const STATEMENT: &str = "Signet helps you see what matters and why";
pub const TAGLINE: &str = "With receipts";

pub const LETTER_STAGGER: f64 = 0.15;
pub const LETTER_DURATION: f64 = 1.8;
pub const TITLE_DELAY: f64 = 1.8;
pub const TITLE_DURATION: f64 = 1.5;
pub const DIVIDER_DELAY: f64 = 2.5;
pub const DIVIDER_DURATION: f64 = 1.2;
pub const SUBTITLE_DELAY: f64 = 3.2;
pub const STATEMENT_DELAY: f64 = 5.2;
pub const TAGLINE_DELAY: f64 = 7.7;
pub const PARAGRAPH_DURATION: f64 = 1.0;
pub const TAGLINE_CHAR_STAGGER: f64 = 0.05;
pub const TAGLINE_CHAR_DURATION: f64 = 0.1;
pub const GLOW_DELAY: f64 = 8.4;
pub const GLOW_PERIOD: f64 = 2.0;
pub const SCAN_DELAY: f64 = 0.5;
pub const SCAN_DURATION: f64 = 3.0;

/// Half-extents of the random starting scatter for headline letters.
pub const SCATTER_X: f64 = 600.0;
pub const SCATTER_Y: f64 = 450.0;
pub const SCATTER_ROTATION_DEG: f64 = 540.0;

/// Curve for tweens that do not name one.
pub const DEFAULT_EASE: Ease = Ease::EaseOut;

// Stops of the blur/fringe filter curve shared by every headline letter.
const FILTER_TIMES: [f64; 10] = [0.0, 0.25, 0.5, 0.6, 0.65, 0.7, 0.75, 0.85, 0.95, 1.0];
const FILTER_BLUR: [f64; 10] = [20.0, 8.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];

const PURPLE_100: Rgba8 = Rgba8::rgb(243, 232, 255);
const PURPLE_300: Rgba8 = Rgba8::rgb(216, 180, 254);
const PURPLE_400: Rgba8 = Rgba8::rgb(192, 132, 252);
const PURPLE_500: Rgba8 = Rgba8::rgb(168, 85, 247);
const PURPLE_600: Rgba8 = Rgba8::rgb(147, 51, 234);
const PURPLE_900: Rgba8 = Rgba8::rgb(88, 28, 135);
const VIOLET_900: Rgba8 = Rgba8::rgb(76, 29, 149);

/// Starting pose of one headline letter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LetterScatter {
    pub offset: Vec2,
    pub rotation_deg: f64,
}

impl LetterScatter {
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            offset: Vec2::new(
                rng.random_range(-SCATTER_X..SCATTER_X),
                rng.random_range(-SCATTER_Y..SCATTER_Y),
            ),
            rotation_deg: rng.random_range(-SCATTER_ROTATION_DEG..SCATTER_ROTATION_DEG),
        }
    }
}

pub fn headline_style() -> TextStyle {
    TextStyle {
        size: FontSize {
            min: 64.0,
            vw: 0.15,
            max: 192.0,
        },
        weight: 900,
        italic: false,
        color: Rgba8::WHITE,
        letter_spacing_em: -0.02,
        line_height: 1.0,
        shadow: Some(Glow {
            near: TextShadow {
                blur: 60.0,
                color: PURPLE_500.with_alpha(0.8),
            },
            far: TextShadow {
                blur: 120.0,
                color: PURPLE_600.with_alpha(0.6),
            },
        }),
    }
}

fn subtitle_style() -> TextStyle {
    TextStyle {
        size: FontSize {
            min: 17.6,
            vw: 0.025,
            max: 28.0,
        },
        weight: 400,
        italic: false,
        color: PURPLE_100.with_alpha(0.8),
        letter_spacing_em: 0.0,
        line_height: 1.4,
        shadow: None,
    }
}

fn statement_style() -> TextStyle {
    TextStyle {
        size: FontSize {
            min: 20.8,
            vw: 0.03,
            max: 36.0,
        },
        weight: 700,
        italic: false,
        color: Rgba8::WHITE,
        letter_spacing_em: 0.0,
        line_height: 1.3,
        shadow: None,
    }
}

pub fn tagline_style() -> TextStyle {
    TextStyle {
        size: FontSize {
            min: 19.2,
            vw: 0.028,
            max: 32.0,
        },
        weight: 600,
        italic: true,
        color: PURPLE_300,
        letter_spacing_em: 0.02,
        line_height: 1.5,
        shadow: None,
    }
}

/// Resting and peak bloom of the tagline pulse.
pub fn glow_low() -> Glow {
    Glow {
        near: TextShadow {
            blur: 20.0,
            color: PURPLE_300.with_alpha(0.6),
        },
        far: TextShadow {
            blur: 40.0,
            color: PURPLE_500.with_alpha(0.4),
        },
    }
}

pub fn glow_high() -> Glow {
    Glow {
        near: TextShadow {
            blur: 30.0,
            color: PURPLE_300.with_alpha(0.8),
        },
        far: TextShadow {
            blur: 60.0,
            color: PURPLE_500.with_alpha(0.6),
        },
    }
}

fn filter_fringe() -> Vec<Fringe> {
    vec![
        Fringe::NONE,
        Fringe::NONE,
        Fringe::NONE,
        Fringe::NONE,
        Fringe::split(12.0, 0.0, 1.0),
        Fringe::split(15.0, 2.0, 1.0),
        Fringe::split(10.0, 0.0, 1.0),
        Fringe::split(4.0, 0.0, 0.6),
        Fringe::NONE,
        Fringe::NONE,
    ]
}

/// Build the trailer scene for `canvas`, drawing letter scatter from `rng`.
#[tracing::instrument(skip(rng))]
pub fn build_trailer<R: Rng>(canvas: Canvas, rng: &mut R) -> TrailerResult<Scene> {
    let mut b = SceneBuilder::new(canvas);

    let backdrop = b.element(
        "backdrop",
        ElementKind::Backdrop {
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: PURPLE_900,
                },
                GradientStop {
                    offset: 0.5,
                    color: VIOLET_900,
                },
                GradientStop {
                    offset: 1.0,
                    color: Rgba8::BLACK,
                },
            ],
        },
    )?;
    let halo = b.element(
        "halo",
        ElementKind::Halo {
            diameter: 600.0,
            blur: 150.0,
            color: PURPLE_600,
        },
    )?;
    b.element_with_base(
        "flash",
        ElementKind::FlashOverlay {
            color: Rgba8::WHITE,
        },
        VisualProps {
            opacity: 0.0,
            ..VisualProps::default()
        },
    )?;

    b.cue(
        CueBuilder::new(CueRole::Backdrop, backdrop, Timing::new(0.0, 2.0, DEFAULT_EASE))
            .opacity(0.0, 0.2)
            .build(),
    );
    b.cue(
        CueBuilder::new(CueRole::Halo, halo, Timing::new(0.5, 2.0, DEFAULT_EASE))
            .scale_uniform(0.0, 2.0)
            .opacity(0.0, 0.15)
            .build(),
    );

    for (index, ch) in HEADLINE.chars().enumerate() {
        let letter = b.element(
            format!("letter-{index}"),
            ElementKind::Glyph {
                ch,
                style: headline_style(),
            },
        )?;
        let scatter = LetterScatter::draw(rng);
        let timing = Timing::new(index as f64 * LETTER_STAGGER, LETTER_DURATION, Ease::SNAP_OUT);
        let filter_timing = Timing::new(timing.delay, LETTER_DURATION, Ease::Linear);

        b.cue(
            CueBuilder::new(CueRole::HeadlineLetter(index), letter, timing)
                .offset(scatter.offset, Vec2::ZERO)
                .rotation(scatter.rotation_deg, 0.0)
                .opacity(0.0, 1.0)
                .scale_uniform(0.1, 1.0)
                .channel_timed(
                    Channel::Blur(Keyframes::stops(
                        &FILTER_TIMES,
                        FILTER_BLUR.to_vec(),
                        Ease::EaseInOut,
                    )?),
                    filter_timing,
                )
                .channel_timed(
                    Channel::Fringe(Keyframes::stops(
                        &FILTER_TIMES,
                        filter_fringe(),
                        Ease::EaseInOut,
                    )?),
                    filter_timing,
                )
                .build(),
        );
    }

    let title = b.element(
        "title",
        ElementKind::TextBlock {
            lines: TITLE_LINES.iter().map(|s| (*s).to_owned()).collect(),
            style: headline_style(),
        },
    )?;
    b.cue(
        CueBuilder::new(
            CueRole::TitleBlock,
            title,
            Timing::new(TITLE_DELAY, TITLE_DURATION, Ease::SNAP_OUT),
        )
        .opacity(0.0, 1.0)
        .offset(Vec2::new(0.0, 100.0), Vec2::ZERO)
        .scale_uniform(0.8, 1.0)
        .blur(10.0, 0.0)
        .build(),
    );

    let divider = b.element(
        "divider",
        ElementKind::Divider {
            max_width: 768.0,
            thickness: 4.0,
            color: PURPLE_400,
        },
    )?;
    b.cue(
        CueBuilder::new(
            CueRole::Divider,
            divider,
            Timing::new(DIVIDER_DELAY, DIVIDER_DURATION, Ease::EaseInOut),
        )
        .scale(Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0))
        .build(),
    );

    for (role, name, text, style, delay) in [
        (
            CueRole::Subtitle,
            "subtitle",
            SUBTITLE,
            subtitle_style(),
            SUBTITLE_DELAY,
        ),
        (
            CueRole::Statement,
            "statement",
            STATEMENT,
            statement_style(),
            STATEMENT_DELAY,
        ),
    ] {
        let id = b.element(
            name,
            ElementKind::TextBlock {
                lines: vec![text.to_owned()],
                style,
            },
        )?;
        b.cue(
            CueBuilder::new(role, id, Timing::new(delay, PARAGRAPH_DURATION, DEFAULT_EASE))
                .opacity(0.0, 1.0)
                .offset(Vec2::new(0.0, 20.0), Vec2::ZERO)
                .build(),
        );
    }

    let tagline = b.element(
        "tagline",
        ElementKind::TextRun {
            text: TAGLINE.to_owned(),
            style: tagline_style(),
        },
    )?;
    b.cue(
        CueBuilder::new(
            CueRole::Tagline,
            tagline,
            Timing::new(TAGLINE_DELAY, PARAGRAPH_DURATION, Ease::SNAP_OUT),
        )
        .opacity(0.0, 1.0)
        .scale_uniform(0.95, 1.0)
        .channel_timed(
            Channel::Glow(Keyframes::stops(
                &[0.0, 0.5, 1.0],
                vec![glow_low(), glow_high(), glow_low()],
                Ease::EaseInOut,
            )?),
            Timing::new(GLOW_DELAY, GLOW_PERIOD, Ease::Linear).with_repeat(Repeat::PING_PONG_FOREVER),
        )
        .build(),
    );

    for (index, ch) in TAGLINE.chars().enumerate() {
        let glyph = b.child(
            tagline,
            format!("tagline-{index}"),
            ElementKind::Glyph {
                ch,
                style: tagline_style(),
            },
        )?;
        b.cue(
            CueBuilder::new(
                CueRole::TaglineChar(index),
                glyph,
                Timing::new(
                    TAGLINE_DELAY + index as f64 * TAGLINE_CHAR_STAGGER,
                    TAGLINE_CHAR_DURATION,
                    DEFAULT_EASE,
                ),
            )
            .opacity(0.0, 1.0)
            .build(),
        );
    }

    let band = 128.0;
    let scan = b.element(
        "scan-line",
        ElementKind::ScanLine {
            height: band,
            color: Rgba8::WHITE.with_alpha(0.1),
        },
    )?;
    b.cue(
        CueBuilder::new(
            CueRole::ScanLine,
            scan,
            Timing::new(SCAN_DELAY, SCAN_DURATION, Ease::EaseInOut),
        )
        .offset(
            Vec2::new(0.0, -band),
            Vec2::new(0.0, f64::from(canvas.height)),
        )
        .opacity(0.8, 0.0)
        .build(),
    );

    let scene = b.build()?;
    tracing::debug!(
        elements = scene.elements.len(),
        cues = scene.cues.len(),
        "built trailer scene"
    );
    Ok(scene)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/trailer.rs"]
mod tests;
