use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    composition::model::{LoopKey, Scene},
    composition::trailer::build_trailer,
    eval::evaluator::{EvaluatedFrame, Evaluator},
    foundation::core::Canvas,
    foundation::error::{TrailerError, TrailerResult},
    presenter::flash::{FLASH_HOLD, FLASH_ON_AT, FlashCommand, FlashOverlay, FlashState},
    schedule::clock::Clock,
    schedule::loops::{LoopHandle, LoopRegistry},
    schedule::timer::TimerQueue,
};

/// State that exists only between mount and unmount.
///
/// Dropping it cancels every pending timer and releases every loop handle.
struct Mounted {
    epoch: Duration,
    scene: Scene,
    timers: TimerQueue<FlashCommand>,
    overlay: FlashOverlay,
    loops: Vec<LoopHandle>,
}

/// Drives the trailer timeline against a monotonic [`Clock`].
///
/// The host mounts it, calls [`TimelinePresenter::tick`] once per frame, and unmounts it when the
/// screen goes away. Cue progress is a pure function of elapsed time; the flash flag is the only
/// state that changes, and only through the two timers scheduled at mount.
pub struct TimelinePresenter<C: Clock> {
    clock: C,
    canvas: Canvas,
    flash: FlashState,
    loops: LoopRegistry,
    mounted: Option<Mounted>,
}

impl<C: Clock> TimelinePresenter<C> {
    pub fn new(clock: C, canvas: Canvas) -> Self {
        Self {
            clock,
            canvas,
            flash: FlashState::default(),
            loops: LoopRegistry::new(),
            mounted: None,
        }
    }

    /// Mount with letter scatter seeded from the OS.
    pub fn mount(&mut self) -> TrailerResult<()> {
        self.mount_with_rng(&mut StdRng::from_os_rng())
    }

    /// Mount with reproducible letter scatter.
    pub fn mount_with_seed(&mut self, seed: u64) -> TrailerResult<()> {
        self.mount_with_rng(&mut StdRng::seed_from_u64(seed))
    }

    pub fn mount_with_rng<R: Rng>(&mut self, rng: &mut R) -> TrailerResult<()> {
        if self.mounted.is_some() {
            return Err(TrailerError::lifecycle("presenter is already mounted"));
        }

        let scene = build_trailer(self.canvas, rng)?;
        let mut timers = TimerQueue::new();
        timers.schedule(FLASH_ON_AT, FlashCommand::On);

        let loops = scene
            .infinite_channels()
            .into_iter()
            .map(|key| self.loops.acquire(key))
            .collect::<TrailerResult<Vec<_>>>()?;

        let epoch = self.clock.now();
        tracing::debug!(
            epoch_ms = epoch.as_millis() as u64,
            cues = scene.cues.len(),
            loops = loops.len(),
            "mounted trailer"
        );

        self.flash = FlashState::default();
        self.mounted = Some(Mounted {
            epoch,
            scene,
            timers,
            overlay: FlashOverlay::default(),
            loops,
        });
        Ok(())
    }

    /// Tear down: cancel pending timers and stop every loop. Returns whether it was mounted.
    pub fn unmount(&mut self) -> bool {
        let Some(mut m) = self.mounted.take() else {
            return false;
        };
        let cancelled = m.timers.cancel_all();
        let released: Vec<LoopKey> = m.loops.iter().map(LoopHandle::key).collect();
        tracing::debug!(cancelled_timers = cancelled, ?released, "unmounted trailer");
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Fire due timers and evaluate the scene at the current clock time.
    pub fn tick(&mut self) -> TrailerResult<EvaluatedFrame> {
        let now = self.clock.now();
        let Some(m) = self.mounted.as_mut() else {
            return Err(TrailerError::lifecycle("tick called while unmounted"));
        };
        let elapsed = now.saturating_sub(m.epoch);

        while let Some(fired) = m.timers.pop_due(elapsed) {
            let at = fired.deadline;
            match fired.action {
                FlashCommand::On => {
                    if self.flash.turn_on(at) {
                        m.overlay.retarget(at.as_secs_f64(), 1.0);
                        m.timers.schedule(at + FLASH_HOLD, FlashCommand::Off);
                    }
                }
                FlashCommand::Off => {
                    if self.flash.turn_off(at) {
                        m.overlay.retarget(at.as_secs_f64(), 0.0);
                    }
                }
            }
            tracing::debug!(
                at_ms = at.as_millis() as u64,
                action = ?fired.action,
                active = self.flash.is_active(),
                "flash timer fired"
            );
        }

        let t = elapsed.as_secs_f64();
        tracing::trace!(t, "tick");
        let loops = &self.loops;
        Evaluator::eval_with_loops(&m.scene, t, m.overlay.opacity(t), |key| {
            loops.is_live(key)
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Flash state of the current (or most recent) mount.
    pub fn flash(&self) -> &FlashState {
        &self.flash
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.mounted.as_ref().map(|m| &m.scene)
    }

    /// Time since mount, if mounted.
    pub fn elapsed(&self) -> Option<Duration> {
        self.mounted
            .as_ref()
            .map(|m| self.clock.now().saturating_sub(m.epoch))
    }

    pub fn pending_timers(&self) -> usize {
        self.mounted.as_ref().map_or(0, |m| m.timers.pending())
    }

    pub fn active_loops(&self) -> Vec<LoopKey> {
        self.loops.live()
    }

    pub fn is_loop_active(&self, key: LoopKey) -> bool {
        self.loops.is_live(key)
    }
}

impl<C: Clock> Drop for TimelinePresenter<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presenter/timeline.rs"]
mod tests;
