use std::time::Duration;

/// Point-in-time view of one reconciliation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerSnapshot {
	/// Stream name used in logs and errors.
	pub name: String,
	/// Quiet period before a scheduled task may start.
	pub debounce: Duration,
	/// A task is waiting for its debounce window.
	pub pending: bool,
	/// Tasks past their window waiting for the running slot.
	pub queued: usize,
	/// A task is inside `run`.
	pub running: bool,
	/// `dispose` was called; new tasks are rejected.
	pub disposed: bool,
	/// Lifetime counters.
	pub totals: StreamTotals,
}

impl ReconcilerSnapshot {
	/// Returns true if nothing is pending, queued or running.
	pub fn is_idle(&self) -> bool {
		!self.pending && self.queued == 0 && !self.running
	}
}

/// Lifetime counters of one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamTotals {
	pub scheduled: u64,
	pub completed: u64,
	pub failed: u64,
	pub superseded: u64,
	/// Ran to completion after disposal; the result was dropped.
	pub discarded: u64,
}

impl StreamTotals {
	/// Tasks that reached a terminal outcome.
	pub fn settled(&self) -> u64 {
		self.completed + self.failed + self.superseded + self.discarded
	}
}
