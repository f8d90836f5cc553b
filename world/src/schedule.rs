//! Frame-keyed queue of deferred world events.

use std::collections::BTreeMap;

/// Deferred occurrences the world resolves on a later frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Deferred {
    StageClear,
    HarvestPrompt,
}

/// Entries only become due while ticks advance the frame counter, so pausing
/// the world suspends them.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScheduledQueue {
    entries: BTreeMap<u64, Vec<Deferred>>,
}

impl ScheduledQueue {
    pub(crate) fn schedule(&mut self, due_frame: u64, deferred: Deferred) {
        self.entries.entry(due_frame).or_default().push(deferred);
    }

    pub(crate) fn contains(&self, deferred: Deferred) -> bool {
        self.entries
            .values()
            .any(|pending| pending.contains(&deferred))
    }

    /// Removes and returns every entry due at or before `frame`, oldest first.
    pub(crate) fn drain_due(&mut self, frame: u64) -> Vec<Deferred> {
        let later = self.entries.split_off(&frame.saturating_add(1));
        let due = std::mem::replace(&mut self.entries, later);
        due.into_values().flatten().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
