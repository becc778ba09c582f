use std::time::Duration;

/// Identity of a scheduled timer, echoed back in [`Fired`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Clone, Debug)]
struct Pending<A> {
    id: TimerId,
    deadline: Duration,
    action: A,
}

/// A timer that reached its deadline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<A> {
    pub id: TimerId,
    pub deadline: Duration,
    pub action: A,
}

/// One-shot timers keyed by deadline (time since mount).
///
/// Timers fire in deadline order, ties in scheduling order. [`TimerQueue::cancel_all`] empties the
/// queue, so nothing cancelled can ever be returned by [`TimerQueue::pop_due`].
#[derive(Clone, Debug)]
pub struct TimerQueue<A> {
    next_id: u64,
    pending: Vec<Pending<A>>, // sorted by (deadline, id)
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Duration, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let at = self
            .pending
            .partition_point(|p| (p.deadline, p.id) <= (deadline, id));
        self.pending.insert(
            at,
            Pending {
                id,
                deadline,
                action,
            },
        );
        id
    }

    /// Cancel everything; returns how many timers were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// Remove and return the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<A>> {
        if self.pending.first()?.deadline > now {
            return None;
        }
        let p = self.pending.remove(0);
        Some(Fired {
            id: p.id,
            deadline: p.deadline,
            action: p.action,
        })
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/timer.rs"]
mod tests;
