//! Single-threaded deferred task queue.
//!
//! Deferred work runs on the same serial scheduler as everything else, a
//! whole number of ticks later. Tasks due on the same tick run in the order
//! they were scheduled.

use std::collections::BTreeMap;

use condperm_contracts::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    Resolve(EntityId),
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    /// Keyed by (due tick, scheduling sequence).
    queue: BTreeMap<(u64, u64), ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue `task` to run `delay` ticks from now (at least one).
    ///
    /// An identical task already due on the same tick absorbs this one;
    /// returns false in that case.
    pub fn schedule(&mut self, delay: u64, task: ScheduledTask) -> bool {
        let due = self.now + delay.max(1);
        let pending = self
            .queue
            .range((due, 0)..=(due, u64::MAX))
            .any(|(_, queued)| *queued == task);
        if pending {
            return false;
        }
        self.queue.insert((due, self.next_seq), task);
        self.next_seq += 1;
        true
    }

    /// Advance one tick and take every task now due, in order.
    pub fn advance(&mut self) -> Vec<ScheduledTask> {
        self.now += 1;
        let later = self.queue.split_off(&(self.now + 1, 0));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values().collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }
}
