use std::{
    cell::RefCell,
    collections::BTreeSet,
    rc::{Rc, Weak},
};

use crate::{
    composition::model::LoopKey,
    foundation::error::{TrailerError, TrailerResult},
};

type LiveSet = RefCell<BTreeSet<LoopKey>>;

/// Tracks which infinitely repeating channels are currently scheduled.
///
/// A loop is live exactly while its [`LoopHandle`] exists; dropping the handle ends it.
#[derive(Clone, Debug, Default)]
pub struct LoopRegistry {
    live: Rc<LiveSet>,
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, key: LoopKey) -> TrailerResult<LoopHandle> {
        if !self.live.borrow_mut().insert(key) {
            return Err(TrailerError::lifecycle(format!(
                "loop for cue {} channel {} is already running",
                key.cue.0, key.channel
            )));
        }
        Ok(LoopHandle {
            key,
            registry: Rc::downgrade(&self.live),
        })
    }

    pub fn is_live(&self, key: LoopKey) -> bool {
        self.live.borrow().contains(&key)
    }

    pub fn live(&self) -> Vec<LoopKey> {
        self.live.borrow().iter().copied().collect()
    }
}

/// Ownership token for one running loop.
#[derive(Debug)]
pub struct LoopHandle {
    key: LoopKey,
    registry: Weak<LiveSet>,
}

impl LoopHandle {
    pub fn key(&self) -> LoopKey {
        self.key
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        if let Some(live) = self.registry.upgrade() {
            live.borrow_mut().remove(&self.key);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/loops.rs"]
mod tests;
