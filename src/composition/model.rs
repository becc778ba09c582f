use crate::{
    animation::anim::{Keyframes, Lerp},
    animation::timing::Timing,
    foundation::core::{Canvas, Rgba8, Vec2},
    foundation::error::{TrailerError, TrailerResult},
};

/// Index of an [`Element`] inside its [`Scene`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub usize);

/// Index of a [`Cue`] inside its [`Scene`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CueId(pub usize);

/// Red/cyan chromatic split drawn as two hard-edged copies of the element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fringe {
    /// Offset of the red copy.
    pub red: Vec2,
    /// Offset of the cyan copy.
    pub cyan: Vec2,
    /// Opacity of both copies.
    pub alpha: f64,
}

impl Fringe {
    pub const NONE: Self = Self {
        red: Vec2::ZERO,
        cyan: Vec2::ZERO,
        alpha: 0.0,
    };

    /// Symmetric split: red at `(dx, dy)`, cyan mirrored at `(-dx, -dy)`.
    pub fn split(dx: f64, dy: f64, alpha: f64) -> Self {
        Self {
            red: Vec2::new(dx, dy),
            cyan: Vec2::new(-dx, -dy),
            alpha,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0 && (self.red != Vec2::ZERO || self.cyan != Vec2::ZERO)
    }
}

impl Lerp for Fringe {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            red: <Vec2 as Lerp>::lerp(&a.red, &b.red, t),
            cyan: <Vec2 as Lerp>::lerp(&a.cyan, &b.cyan, t),
            alpha: a.alpha + (b.alpha - a.alpha) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextShadow {
    /// CSS blur radius in px.
    pub blur: f64,
    pub color: Rgba8,
}

/// Two-layer text bloom (a tight inner shadow plus a wide outer one).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Glow {
    pub near: TextShadow,
    pub far: TextShadow,
}

impl Lerp for Glow {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn shadow(a: &TextShadow, b: &TextShadow, t: f64) -> TextShadow {
            TextShadow {
                blur: a.blur + (b.blur - a.blur) * t,
                color: Rgba8::lerp(&a.color, &b.color, t),
            }
        }

        Self {
            near: shadow(&a.near, &b.near, t),
            far: shadow(&a.far, &b.far, t),
        }
    }
}

/// Every animatable property of an element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualProps {
    /// Translation from the laid-out position, px.
    pub offset: Vec2,
    pub rotation_deg: f64,
    pub opacity: f64,
    /// Scale around the element centre (default `(1, 1)`).
    pub scale: Vec2,
    /// Gaussian blur radius, px.
    pub blur: f64,
    pub fringe: Fringe,
    /// Text-shadow bloom; `None` keeps the element style's static shadow.
    pub glow: Option<Glow>,
}

impl Default for VisualProps {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation_deg: 0.0,
            opacity: 1.0,
            scale: Vec2::new(1.0, 1.0),
            blur: 0.0,
            fringe: Fringe::NONE,
            glow: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, `[0, 1]`.
    pub offset: f64,
    pub color: Rgba8,
}

/// Responsive font size, CSS `clamp(min, vw, max)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSize {
    pub min: f64,
    /// Fraction of canvas width.
    pub vw: f64,
    pub max: f64,
}

impl FontSize {
    pub fn resolve(self, canvas: Canvas) -> f64 {
        canvas.clamp_vw(self.min, self.vw, self.max)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub size: FontSize,
    pub weight: u16,
    pub italic: bool,
    pub color: Rgba8,
    /// Extra tracking in em.
    pub letter_spacing_em: f64,
    /// Line box height as a multiple of the font size.
    pub line_height: f64,
    /// Static text shadow applied when no glow channel overrides it.
    pub shadow: Option<Glow>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum ElementKind {
    /// Full-canvas diagonal gradient.
    Backdrop { stops: Vec<GradientStop> },
    /// Soft radial light centred on the canvas.
    Halo {
        diameter: f64,
        blur: f64,
        color: Rgba8,
    },
    /// Full-canvas solid fill driven by the flash state rather than by cues.
    FlashOverlay { color: Rgba8 },
    /// A single headline character.
    Glyph { ch: char, style: TextStyle },
    /// Multi-line centred text.
    TextBlock { lines: Vec<String>, style: TextStyle },
    /// Horizontal rule with a transparent-colour-transparent gradient.
    Divider {
        max_width: f64,
        thickness: f64,
        color: Rgba8,
    },
    /// Text drawn through its child glyphs.
    TextRun { text: String, style: TextStyle },
    /// Horizontal light band sweeping the viewport.
    ScanLine { height: f64, color: Rgba8 },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    /// Parent whose opacity, offset and scale compose with this element's.
    pub parent: Option<ElementId>,
    /// Props before any cue applies.
    pub base: VisualProps,
}

/// One animated property of a cue.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "property", content = "track", rename_all = "snake_case")]
pub enum Channel {
    Offset(Keyframes<Vec2>),
    Rotation(Keyframes<f64>),
    Opacity(Keyframes<f64>),
    Scale(Keyframes<Vec2>),
    Blur(Keyframes<f64>),
    Fringe(Keyframes<Fringe>),
    Glow(Keyframes<Glow>),
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Offset(_) => "offset",
            Self::Rotation(_) => "rotation",
            Self::Opacity(_) => "opacity",
            Self::Scale(_) => "scale",
            Self::Blur(_) => "blur",
            Self::Fringe(_) => "fringe",
            Self::Glow(_) => "glow",
        }
    }

    pub fn validate(&self) -> TrailerResult<()> {
        match self {
            Self::Offset(kf) | Self::Scale(kf) => kf.validate(),
            Self::Rotation(kf) | Self::Opacity(kf) | Self::Blur(kf) => kf.validate(),
            Self::Fringe(kf) => kf.validate(),
            Self::Glow(kf) => kf.validate(),
        }
    }

    /// Write this channel's value at track progress `p` into `props`.
    pub fn apply(&self, p: f64, props: &mut VisualProps) -> TrailerResult<()> {
        match self {
            Self::Offset(kf) => props.offset = kf.sample(p)?,
            Self::Rotation(kf) => props.rotation_deg = kf.sample(p)?,
            Self::Opacity(kf) => props.opacity = kf.sample(p)?.clamp(0.0, 1.0),
            Self::Scale(kf) => props.scale = kf.sample(p)?,
            Self::Blur(kf) => props.blur = kf.sample(p)?.max(0.0),
            Self::Fringe(kf) => props.fringe = kf.sample(p)?,
            Self::Glow(kf) => props.glow = Some(kf.sample(p)?),
        }
        Ok(())
    }
}

/// A channel plus an optional timing that replaces the cue's own.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelAnim {
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

/// What a cue is for; lets callers find cues without relying on their index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "role", content = "index", rename_all = "snake_case")]
pub enum CueRole {
    Backdrop,
    Halo,
    HeadlineLetter(usize),
    TitleBlock,
    Divider,
    Subtitle,
    Statement,
    Tagline,
    TaglineChar(usize),
    ScanLine,
}

/// A single timed visual transition. Immutable once part of a [`Scene`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    pub role: CueRole,
    pub target: ElementId,
    pub timing: Timing,
    pub channels: Vec<ChannelAnim>,
}

impl Cue {
    /// Effective timing of channel `idx` (its override, or the cue's own).
    pub fn channel_timing(&self, idx: usize) -> Option<&Timing> {
        self.channels
            .get(idx)
            .map(|c| c.timing.as_ref().unwrap_or(&self.timing))
    }

    pub fn validate(&self) -> TrailerResult<()> {
        self.timing.validate()?;
        if self.channels.is_empty() {
            return Err(TrailerError::validation(format!(
                "cue {:?} animates no channels",
                self.role
            )));
        }
        for c in &self.channels {
            if let Some(t) = &c.timing {
                t.validate()?;
            }
            c.channel.validate()?;
        }
        Ok(())
    }
}

/// Identifies one infinitely repeating channel.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LoopKey {
    pub cue: CueId,
    pub channel: usize,
}

/// The whole presentation: elements in painter's order and the cues that animate them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub canvas: Canvas,
    pub elements: Vec<Element>,
    pub cues: Vec<Cue>,
}

impl Scene {
    pub fn validate(&self) -> TrailerResult<()> {
        self.canvas.validate()?;
        for (idx, el) in self.elements.iter().enumerate() {
            if let Some(parent) = el.parent
                && parent.0 >= idx
            {
                return Err(TrailerError::validation(format!(
                    "element '{}' must come after its parent",
                    el.name
                )));
            }
        }
        for cue in &self.cues {
            if cue.target.0 >= self.elements.len() {
                return Err(TrailerError::validation(format!(
                    "cue {:?} targets missing element {}",
                    cue.role, cue.target.0
                )));
            }
            cue.validate()?;
        }
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> TrailerResult<&Element> {
        self.elements
            .get(id.0)
            .ok_or_else(|| TrailerError::validation(format!("unknown element {}", id.0)))
    }

    pub fn element_by_name(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.name == name)
            .map(ElementId)
    }

    pub fn cue(&self, id: CueId) -> TrailerResult<&Cue> {
        self.cues
            .get(id.0)
            .ok_or_else(|| TrailerError::validation(format!("unknown cue {}", id.0)))
    }

    pub fn cue_by_role(&self, role: CueRole) -> Option<(CueId, &Cue)> {
        self.cues_matching(move |r| *r == role).next()
    }

    /// Cues whose role satisfies `pred`, in scene order.
    pub fn cues_matching<'a>(
        &'a self,
        pred: impl Fn(&CueRole) -> bool + 'a,
    ) -> impl Iterator<Item = (CueId, &'a Cue)> + 'a {
        self.cues
            .iter()
            .enumerate()
            .filter(move |(_, c)| pred(&c.role))
            .map(|(i, c)| (CueId(i), c))
    }

    /// Channels that repeat forever and so need a live handle while mounted.
    pub fn infinite_channels(&self) -> Vec<LoopKey> {
        let mut out = Vec::new();
        for (ci, cue) in self.cues.iter().enumerate() {
            for ch in 0..cue.channels.len() {
                if cue.channel_timing(ch).is_some_and(Timing::is_infinite) {
                    out.push(LoopKey {
                        cue: CueId(ci),
                        channel: ch,
                    });
                }
            }
        }
        out
    }

    /// Latest end time over every finite channel; after this only loops still move.
    pub fn settle_time(&self) -> f64 {
        self.cues
            .iter()
            .flat_map(|c| (0..c.channels.len()).filter_map(move |i| c.channel_timing(i)))
            .filter_map(Timing::end)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
