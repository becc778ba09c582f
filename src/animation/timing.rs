use crate::{
    animation::ease::Ease,
    foundation::error::{TrailerError, TrailerResult},
};

/// When and how a cue (or one of its channels) advances.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    /// Seconds from mount before the first iteration starts.
    pub delay: f64,
    /// Seconds per iteration.
    pub duration: f64,
    /// Curve applied to each iteration's progress.
    pub ease: Ease,
    /// Extra iterations after the first one, if any.
    pub repeat: Option<Repeat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Repeat {
    pub count: RepeatCount,
    pub mode: LoopMode,
}

impl Repeat {
    /// Oscillate forever, flipping direction every iteration.
    pub const PING_PONG_FOREVER: Self = Self {
        count: RepeatCount::Infinite,
        mode: LoopMode::PingPong,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RepeatCount {
    Finite(u32),
    Infinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopMode {
    /// Restart from the beginning each iteration.
    Repeat,
    /// Play odd iterations backwards.
    PingPong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Phase {
    /// Before `delay`; the channel shows its initial value.
    Pending,
    Running,
    /// Every iteration has played out; the channel holds its final value.
    Complete,
}

/// Result of resolving a [`Timing`] at an elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub phase: Phase,
    /// Eased progress of the current iteration, in track space.
    pub value: f64,
    /// Zero-based iteration index.
    pub iteration: u64,
}

impl Timing {
    pub fn new(delay: f64, duration: f64, ease: Ease) -> Self {
        Self {
            delay,
            duration,
            ease,
            repeat: None,
        }
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn is_infinite(&self) -> bool {
        matches!(
            self.repeat,
            Some(Repeat {
                count: RepeatCount::Infinite,
                ..
            })
        )
    }

    /// Seconds from mount until the final iteration ends, or `None` when it never does.
    pub fn end(&self) -> Option<f64> {
        match self.repeat {
            None => Some(self.delay + self.duration),
            Some(Repeat {
                count: RepeatCount::Finite(n),
                ..
            }) => Some(self.delay + self.duration * f64::from(n + 1)),
            Some(Repeat {
                count: RepeatCount::Infinite,
                ..
            }) => None,
        }
    }

    pub fn validate(&self) -> TrailerResult<()> {
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(TrailerError::validation("cue delay must be finite and >= 0"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(TrailerError::validation("cue duration must be finite and > 0"));
        }
        Ok(())
    }

    /// Resolve progress at `t` seconds after mount.
    pub fn progress(&self, t: f64) -> Progress {
        let local = t - self.delay;
        if local < 0.0 {
            return Progress {
                phase: Phase::Pending,
                value: self.ease.apply(0.0),
                iteration: 0,
            };
        }

        let (iterations, mode) = match self.repeat {
            None => (Some(1u64), LoopMode::Repeat),
            Some(Repeat {
                count: RepeatCount::Finite(n),
                mode,
            }) => (Some(u64::from(n) + 1), mode),
            Some(Repeat {
                count: RepeatCount::Infinite,
                mode,
            }) => (None, mode),
        };

        let cycles = local / self.duration;
        let iteration = cycles.floor() as u64;
        let (phase, iteration, raw) = match iterations {
            Some(total) if iteration >= total => (Phase::Complete, total - 1, 1.0),
            _ => (Phase::Running, iteration, cycles.fract()),
        };

        let forward = match mode {
            LoopMode::PingPong if iteration % 2 == 1 => 1.0 - raw,
            _ => raw,
        };

        Progress {
            phase,
            value: self.ease.apply(forward),
            iteration,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
