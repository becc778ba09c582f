use std::collections::BTreeSet;

use crate::{
    animation::anim::Keyframes,
    animation::timing::Timing,
    composition::model::{
        Channel, ChannelAnim, Cue, CueId, CueRole, Element, ElementId, ElementKind, Scene,
        VisualProps,
    },
    foundation::core::{Canvas, Vec2},
    foundation::error::{TrailerError, TrailerResult},
};

/// Builder for [`Scene`](crate::Scene).
///
/// Elements are appended in painter's order; the returned [`ElementId`] is what cues target.
pub struct SceneBuilder {
    canvas: Canvas,
    names: BTreeSet<String>,
    elements: Vec<Element>,
    cues: Vec<Cue>,
}

impl SceneBuilder {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            names: BTreeSet::new(),
            elements: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Append a top-level element with identity base props.
    pub fn element(&mut self, name: impl Into<String>, kind: ElementKind) -> TrailerResult<ElementId> {
        self.push_element(name.into(), kind, None, VisualProps::default())
    }

    /// Append an element whose props compose with `parent`'s.
    pub fn child(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
        kind: ElementKind,
    ) -> TrailerResult<ElementId> {
        if parent.0 >= self.elements.len() {
            return Err(TrailerError::validation(format!(
                "parent element {} does not exist",
                parent.0
            )));
        }
        self.push_element(name.into(), kind, Some(parent), VisualProps::default())
    }

    /// Append a top-level element with explicit resting props.
    pub fn element_with_base(
        &mut self,
        name: impl Into<String>,
        kind: ElementKind,
        base: VisualProps,
    ) -> TrailerResult<ElementId> {
        self.push_element(name.into(), kind, None, base)
    }

    fn push_element(
        &mut self,
        name: String,
        kind: ElementKind,
        parent: Option<ElementId>,
        base: VisualProps,
    ) -> TrailerResult<ElementId> {
        if !self.names.insert(name.clone()) {
            return Err(TrailerError::validation(format!(
                "duplicate element name '{name}'"
            )));
        }
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            name,
            kind,
            parent,
            base,
        });
        Ok(id)
    }

    pub fn cue(&mut self, cue: Cue) -> CueId {
        let id = CueId(self.cues.len());
        self.cues.push(cue);
        id
    }

    /// Build and validate the final [`Scene`](crate::Scene).
    pub fn build(self) -> TrailerResult<Scene> {
        let scene = Scene {
            canvas: self.canvas,
            elements: self.elements,
            cues: self.cues,
        };
        scene.validate()?;
        Ok(scene)
    }
}

/// Fluent construction of a single [`Cue`](crate::Cue).
pub struct CueBuilder {
    cue: Cue,
}

impl CueBuilder {
    pub fn new(role: CueRole, target: ElementId, timing: Timing) -> Self {
        Self {
            cue: Cue {
                role,
                target,
                timing,
                channels: Vec::new(),
            },
        }
    }

    /// Add a channel that follows the cue's timing.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.cue.channels.push(ChannelAnim {
            channel,
            timing: None,
        });
        self
    }

    /// Add a channel with its own timing.
    pub fn channel_timed(mut self, channel: Channel, timing: Timing) -> Self {
        self.cue.channels.push(ChannelAnim {
            channel,
            timing: Some(timing),
        });
        self
    }

    pub fn offset(self, from: Vec2, to: Vec2) -> Self {
        self.channel(Channel::Offset(Keyframes::tween(from, to)))
    }

    pub fn rotation(self, from: f64, to: f64) -> Self {
        self.channel(Channel::Rotation(Keyframes::tween(from, to)))
    }

    pub fn opacity(self, from: f64, to: f64) -> Self {
        self.channel(Channel::Opacity(Keyframes::tween(from, to)))
    }

    pub fn scale(self, from: Vec2, to: Vec2) -> Self {
        self.channel(Channel::Scale(Keyframes::tween(from, to)))
    }

    /// Uniform scale shorthand.
    pub fn scale_uniform(self, from: f64, to: f64) -> Self {
        self.scale(Vec2::new(from, from), Vec2::new(to, to))
    }

    pub fn blur(self, from: f64, to: f64) -> Self {
        self.channel(Channel::Blur(Keyframes::tween(from, to)))
    }

    pub fn build(self) -> Cue {
        self.cue
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
