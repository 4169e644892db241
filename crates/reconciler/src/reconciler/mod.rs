//! The reconciliation engine.
//!
//! # State machine
//!
//! Every entry moves through at most three places, all guarded by one mutex:
//!
//! - `pending`: the single entry waiting for its debounce window. Each
//!   `schedule` takes this slot and restarts the window.
//! - `ready`: entries whose window elapsed (or that were flushed by a newer,
//!   non-conflicting `schedule`), in submission order, waiting for the running
//!   slot.
//! - `running`: the one entry whose `run` is in flight.
//!
//! Transitions happen only on `schedule`, on a debounce timer firing, and on a
//! run settling. The lock is never held across an await; task callbacks other
//! than `conflicts`/`is_cancelled` and every outcome delivery happen after it is
//! released.
//!
//! # Cancellation
//!
//! Conflicting entries that have not started are cancelled and resolve
//! [`ReconcileError::Superseded`] immediately. A running task is only flagged;
//! the engine never aborts `run` and never resolves a caller twice.

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::config::ReconcilerConfig;
use crate::error::{ReconcileError, Result};
use crate::scheduled::Scheduled;
use crate::snapshot::{ReconcilerSnapshot, StreamTotals};
use crate::spawn::{panic_message, spawn};
use crate::task::Task;
use crate::token::TicketClock;


/// Owner of one reconciliation stream.
///
/// Handles are cheap to clone and share the stream. Dropping the last handle
/// disposes it.
pub struct Reconciler<T: Task> {
	inner: Arc<Inner<T>>,
}

impl<T: Task> Clone for Reconciler<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T: Task> std::fmt::Debug for Reconciler<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Reconciler")
			.field("name", &self.inner.name)
			.field("debounce", &self.inner.debounce)
			.finish_non_exhaustive()
	}
}

struct Inner<T: Task> {
	name: Arc<str>,
	debounce: Duration,
	tickets: TicketClock,
	state: Mutex<State<T>>,
	idle: Notify,
}

struct State<T: Task> {
	pending: Option<Entry<T>>,
	ready: VecDeque<Entry<T>>,
	running: Option<RunningSlot<T>>,
	timer: Option<DebounceTimer>,
	timer_generation: u64,
	disposed: bool,
	totals: StreamTotals,
}

impl<T: Task> State<T> {
	fn is_idle(&self) -> bool {
		self.pending.is_none() && self.ready.is_empty() && self.running.is_none()
	}
}

struct Entry<T: Task> {
	ticket: u64,
	task: Arc<T>,
	reply: oneshot::Sender<Result<T::Output>>,
}

impl<T: Task> Entry<T> {
	/// Cancels the task and resolves its caller with `Superseded`.
	fn supersede(self, stream: &str) {
		self.task.cancel();
		trace!(reconciler = stream, ticket = self.ticket, "reconciler.superseded");
		let _ = self.reply.send(Err(ReconcileError::Superseded));
	}
}

struct RunningSlot<T> {
	ticket: u64,
	task: Arc<T>,
}

struct DebounceTimer {
	generation: u64,
	handle: JoinHandle<()>,
}

impl<T: Task> Reconciler<T> {
	/// Creates an idle stream with a fixed debounce interval.
	pub fn new(name: impl Into<String>, debounce: Duration) -> Self {
		let name: Arc<str> = Arc::from(name.into());
		debug!(reconciler = %name, ?debounce, "reconciler.new");
		Self {
			inner: Arc::new(Inner {
				name,
				debounce,
				tickets: TicketClock::new(),
				state: Mutex::new(State {
					pending: None,
					ready: VecDeque::new(),
					running: None,
					timer: None,
					timer_generation: 0,
					disposed: false,
					totals: StreamTotals::default(),
				}),
				idle: Notify::new(),
			}),
		}
	}

	/// Creates an idle stream from its config section.
	pub fn from_config(name: impl Into<String>, config: &ReconcilerConfig) -> Self {
		Self::new(name, config.debounce())
	}

	/// Returns the stream name used in logs and errors.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// Returns the debounce interval.
	pub fn debounce(&self) -> Duration {
		self.inner.debounce
	}

	/// Submits a task.
	///
	/// Queued entries that conflict with `task` are cancelled and resolve
	/// [`ReconcileError::Superseded`] before this returns. A non-conflicting
	/// entry still waiting for its window is released to run as soon as the
	/// running slot is free, ahead of `task`. `task` then waits for a full quiet
	/// period before it may start.
	///
	/// Fails synchronously with [`ReconcileError::Disposed`] after [`Self::dispose`].
	/// A task that is already cancelled is not queued and resolves `Superseded`.
	pub fn schedule(&self, task: T) -> Result<Scheduled<T::Output>> {
		let inner = &self.inner;
		let ticket = inner.tickets.next();
		let (reply, rx) = oneshot::channel();
		let scheduled = Scheduled::new(ticket, Arc::clone(&inner.name), rx);
		let entry = Entry {
			ticket,
			task: Arc::new(task),
			reply,
		};

		let superseded = {
			let mut guard = inner.state.lock();
			let state = &mut *guard;
			if state.disposed {
				debug!(reconciler = %inner.name, ticket, "reconciler.schedule.disposed");
				return Err(ReconcileError::disposed(&inner.name));
			}
			state.totals.scheduled += 1;

			if entry.task.is_cancelled() {
				state.totals.superseded += 1;
				vec![entry]
			} else {
				let mut superseded = Vec::new();
				for queued in std::mem::take(&mut state.ready) {
					if queued.task.conflicts(&entry.task) {
						superseded.push(queued);
					} else {
						state.ready.push_back(queued);
					}
				}
				if let Some(previous) = state.pending.take() {
					if previous.task.conflicts(&entry.task) {
						superseded.push(previous);
					} else {
						trace!(reconciler = %inner.name, ticket = previous.ticket, "reconciler.flush");
						state.ready.push_back(previous);
					}
				}
				state.totals.superseded += superseded.len() as u64;
				debug!(
					reconciler = %inner.name,
					ticket,
					superseded = superseded.len(),
					queued = state.ready.len(),
					"reconciler.schedule"
				);

				state.pending = Some(entry);
				inner.arm_timer(state);
				superseded.extend(inner.promote(state));
				superseded
			}
		};

		inner.settle(superseded, false);
		Ok(scheduled)
	}

	/// Tears the stream down.
	///
	/// Every entry that has not started is cancelled and resolves
	/// [`ReconcileError::Superseded`] before this returns. A running task is
	/// flagged as cancelled; when it settles its result is dropped and its caller
	/// receives [`ReconcileError::Disposed`]. Idempotent.
	pub fn dispose(&self) {
		self.inner.dispose();
	}

	/// Returns true once [`Self::dispose`] was called.
	pub fn is_disposed(&self) -> bool {
		self.inner.state.lock().disposed
	}

	/// Returns true if nothing is pending, queued or running.
	pub fn is_idle(&self) -> bool {
		self.inner.state.lock().is_idle()
	}

	/// Waits until nothing is pending, queued or running.
	pub async fn idle(&self) {
		loop {
			let notified = self.inner.idle.notified();
			if self.is_idle() {
				return;
			}
			notified.await;
		}
	}

	/// Returns a point-in-time view of the stream.
	pub fn snapshot(&self) -> ReconcilerSnapshot {
		let state = self.inner.state.lock();
		ReconcilerSnapshot {
			name: self.inner.name.to_string(),
			debounce: self.inner.debounce,
			pending: state.pending.is_some(),
			queued: state.ready.len(),
			running: state.running.is_some(),
			disposed: state.disposed,
			totals: state.totals,
		}
	}
}

impl<T: Task> Inner<T> {
	/// Restarts the single debounce window.
	///
	/// The previous timer is aborted; its generation check covers a timer that
	/// already woke and is waiting for the lock.
	fn arm_timer(self: &Arc<Self>, state: &mut State<T>) {
		if let Some(timer) = state.timer.take() {
			timer.handle.abort();
		}
		state.timer_generation = state.timer_generation.wrapping_add(1);
		let generation = state.timer_generation;
		let debounce = self.debounce;
		let weak = Arc::downgrade(self);
		let handle = spawn(&self.name, async move {
			tokio::time::sleep(debounce).await;
			if let Some(inner) = weak.upgrade() {
				inner.on_timer(generation);
			}
		});
		state.timer = Some(DebounceTimer { generation, handle });
	}

	fn on_timer(self: &Arc<Self>, generation: u64) {
		let (skipped, idle) = {
			let mut guard = self.state.lock();
			let state = &mut *guard;
			if state.disposed || state.timer.as_ref().map(|t| t.generation) != Some(generation) {
				return;
			}
			state.timer = None;
			if let Some(entry) = state.pending.take() {
				trace!(reconciler = %self.name, ticket = entry.ticket, "reconciler.debounced");
				state.ready.push_back(entry);
			}
			// Every entry may have been cancelled from outside, leaving the stream idle.
			let skipped = self.promote(state);
			(skipped, state.is_idle())
		};
		self.settle(skipped, idle);
	}

	/// Starts the oldest live entry in `ready` if the running slot is free.
	///
	/// Cancelled entries are skipped and returned so the caller can resolve them
	/// after releasing the lock.
	fn promote(self: &Arc<Self>, state: &mut State<T>) -> Vec<Entry<T>> {
		let mut skipped = Vec::new();
		if state.disposed || state.running.is_some() {
			return skipped;
		}
		while let Some(entry) = state.ready.pop_front() {
			if entry.task.is_cancelled() {
				state.totals.superseded += 1;
				skipped.push(entry);
				continue;
			}
			self.start(state, entry);
			break;
		}
		skipped
	}

	fn start(self: &Arc<Self>, state: &mut State<T>, entry: Entry<T>) {
		let Entry { ticket, task, reply } = entry;
		state.running = Some(RunningSlot {
			ticket,
			task: Arc::clone(&task),
		});
		debug!(reconciler = %self.name, ticket, "reconciler.run");

		let weak = Arc::downgrade(self);
		let name = Arc::clone(&self.name);
		spawn(&self.name, async move {
			let outcome = match AssertUnwindSafe(task.run()).catch_unwind().await {
				Ok(outcome) => outcome,
				Err(payload) => Err(anyhow::anyhow!("task panicked: {}", panic_message(payload.as_ref()))),
			};
			drop(task);
			match weak.upgrade() {
				Some(inner) => inner.finish(ticket, outcome, reply),
				None => {
					trace!(reconciler = %name, ticket, "reconciler.discarded");
					let _ = reply.send(Err(ReconcileError::disposed(&name)));
				}
			}
		});
	}

	fn finish(self: &Arc<Self>, ticket: u64, outcome: anyhow::Result<T::Output>, reply: oneshot::Sender<Result<T::Output>>) {
		let disposed = self.state.lock().disposed;
		let failed = outcome.is_err();
		let delivered = if disposed {
			trace!(reconciler = %self.name, ticket, "reconciler.discarded");
			Err(ReconcileError::disposed(&self.name))
		} else {
			outcome.map_err(|err| {
				debug!(reconciler = %self.name, ticket, error = %err, "reconciler.failed");
				ReconcileError::Failed(err)
			})
		};
		// The caller settles while the slot is still held, so the next run
		// cannot start before it.
		let _ = reply.send(delivered);

		let (skipped, idle) = {
			let mut guard = self.state.lock();
			let state = &mut *guard;
			if state.running.as_ref().is_some_and(|slot| slot.ticket == ticket) {
				state.running = None;
			}
			match (disposed, failed) {
				(true, _) => state.totals.discarded += 1,
				(false, true) => state.totals.failed += 1,
				(false, false) => state.totals.completed += 1,
			}
			trace!(reconciler = %self.name, ticket, "reconciler.settled");
			let skipped = self.promote(state);
			(skipped, state.is_idle())
		};
		self.settle(skipped, idle);
	}

	fn dispose(&self) {
		let (superseded, running) = {
			let mut guard = self.state.lock();
			let state = &mut *guard;
			if state.disposed {
				return;
			}
			state.disposed = true;
			if let Some(timer) = state.timer.take() {
				timer.handle.abort();
			}
			let mut superseded: Vec<_> = state.ready.drain(..).collect();
			superseded.extend(state.pending.take());
			state.totals.superseded += superseded.len() as u64;
			(superseded, state.running.as_ref().map(|slot| Arc::clone(&slot.task)))
		};

		info!(
			reconciler = %self.name,
			superseded = superseded.len(),
			running = running.is_some(),
			"reconciler.dispose"
		);
		if let Some(task) = &running {
			task.cancel();
		}
		self.settle(superseded, running.is_none());
	}

	/// Resolves superseded entries and wakes idle waiters. Never called under the lock.
	fn settle(&self, superseded: Vec<Entry<T>>, idle: bool) {
		for entry in superseded {
			entry.supersede(&self.name);
		}
		if idle {
			self.idle.notify_waiters();
		}
	}
}

impl<T: Task> Drop for Inner<T> {
	fn drop(&mut self) {
		self.dispose();
	}
}
