use std::time::Duration;

use crate::{animation::ease::Ease, animation::timing::Timing};

/// Mount-relative time at which the flash turns on.
pub const FLASH_ON_AT: Duration = Duration::from_millis(1600);
/// How long the flash stays on.
pub const FLASH_HOLD: Duration = Duration::from_millis(200);
/// Overlay fade time whenever the flash state flips.
pub const FLASH_FADE_SECS: f64 = 0.1;

/// Deferred mutations the presenter schedules against [`FlashState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashCommand {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FlashTransition {
    /// Mount-relative time of the change.
    pub at: Duration,
    pub active: bool,
}

/// The scene's single mutable flag.
///
/// Starts off, may pulse on and back off once; a second pulse in the same lifetime is refused.
#[derive(Clone, Debug, Default)]
pub struct FlashState {
    active: bool,
    pulses: u32,
    transitions: Vec<FlashTransition>,
}

impl FlashState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    pub fn transitions(&self) -> &[FlashTransition] {
        &self.transitions
    }

    /// Returns whether the state changed.
    pub(crate) fn turn_on(&mut self, at: Duration) -> bool {
        if self.active || self.pulses > 0 {
            return false;
        }
        self.active = true;
        self.pulses += 1;
        self.transitions.push(FlashTransition { at, active: true });
        true
    }

    /// Returns whether the state changed.
    pub(crate) fn turn_off(&mut self, at: Duration) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.transitions.push(FlashTransition { at, active: false });
        true
    }
}

/// Opacity of the white overlay, easing toward the flash state after each flip.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlashOverlay {
    fade: Option<(Timing, f64, f64)>, // timing, from, to
}

impl FlashOverlay {
    /// Start fading from the current opacity toward `to` at mount-relative `t`.
    pub fn retarget(&mut self, t: f64, to: f64) {
        let from = self.opacity(t);
        self.fade = Some((Timing::new(t, FLASH_FADE_SECS, Ease::EaseOut), from, to));
    }

    pub fn opacity(&self, t: f64) -> f64 {
        let Some((timing, from, to)) = self.fade else {
            return 0.0;
        };
        let p = timing.progress(t).value;
        from + (to - from) * p
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presenter/flash.rs"]
mod tests;
