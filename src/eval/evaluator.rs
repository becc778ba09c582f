use crate::{
    animation::timing::Phase,
    composition::model::{Channel, CueId, ElementId, ElementKind, LoopKey, Scene, VisualProps},
    foundation::error::{TrailerError, TrailerResult},
};

#[derive(Clone, Debug, serde::Serialize)]
/// Every element's resolved props at one instant.
pub struct EvaluatedFrame {
    /// Seconds since mount.
    pub t: f64,
    /// Opacity of the flash overlay element.
    pub flash_opacity: f64,
    /// One node per scene element, in painter's order.
    pub nodes: Vec<EvaluatedNode>,
}

#[derive(Clone, Debug, serde::Serialize)]
/// Resolved state of one element.
pub struct EvaluatedNode {
    /// Element this node renders.
    pub element: ElementId,
    /// Element-local props after every cue has been applied.
    pub props: VisualProps,
    /// Opacity multiplied through all ancestors.
    pub world_opacity: f64,
}

impl EvaluatedFrame {
    /// Node for `id`, if the element exists.
    pub fn node(&self, id: ElementId) -> Option<&EvaluatedNode> {
        self.nodes.get(id.0).filter(|n| n.element == id)
    }
}

/// Stateless evaluator from scene timeline to frame state.
pub struct Evaluator;

impl Evaluator {
    #[tracing::instrument(skip(scene))]
    /// Evaluate `scene` at `t` seconds after mount, with every loop considered running.
    pub fn eval(scene: &Scene, t: f64, flash_opacity: f64) -> TrailerResult<EvaluatedFrame> {
        scene.validate()?;
        Self::eval_with_loops(scene, t, flash_opacity, |_| true)
    }

    /// Evaluate with explicit loop liveness.
    ///
    /// An infinite channel whose loop is not live shows its resting (first) value.
    pub fn eval_with_loops(
        scene: &Scene,
        t: f64,
        flash_opacity: f64,
        is_live: impl Fn(LoopKey) -> bool,
    ) -> TrailerResult<EvaluatedFrame> {
        if !t.is_finite() {
            return Err(TrailerError::validation("evaluation time must be finite"));
        }

        let mut props: Vec<VisualProps> = scene.elements.iter().map(|e| e.base).collect();

        for (ci, cue) in scene.cues.iter().enumerate() {
            let Some(target) = props.get_mut(cue.target.0) else {
                return Err(TrailerError::validation(format!(
                    "cue {ci} targets missing element {}",
                    cue.target.0
                )));
            };
            for (chi, anim) in cue.channels.iter().enumerate() {
                let timing = anim.timing.as_ref().unwrap_or(&cue.timing);
                let key = LoopKey {
                    cue: CueId(ci),
                    channel: chi,
                };
                let progress = timing.progress(t);
                if progress.phase == Phase::Pending {
                    // Glow has no resting look; it only exists once its own timing starts.
                    if matches!(anim.channel, Channel::Glow(_)) {
                        continue;
                    }
                    tracing::trace!(cue = ci, channel = anim.channel.name(), "pending");
                }
                let p = if timing.is_infinite() && !is_live(key) {
                    timing.ease.apply(0.0)
                } else {
                    progress.value
                };
                anim.channel.apply(p, target)?;
            }
        }

        let mut nodes: Vec<EvaluatedNode> = Vec::with_capacity(scene.elements.len());
        for (idx, (el, mut p)) in scene.elements.iter().zip(props).enumerate() {
            if matches!(el.kind, ElementKind::FlashOverlay { .. }) {
                p.opacity = flash_opacity.clamp(0.0, 1.0);
            }
            let parent_opacity = el
                .parent
                .and_then(|pid| nodes.get(pid.0))
                .map_or(1.0, |n| n.world_opacity);
            nodes.push(EvaluatedNode {
                element: ElementId(idx),
                props: p,
                world_opacity: p.opacity * parent_opacity,
            });
        }

        Ok(EvaluatedFrame {
            t,
            flash_opacity,
            nodes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
