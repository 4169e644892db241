use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic ticket clock numbering the entries of one reconciliation stream.
#[derive(Debug, Default, Clone)]
pub(crate) struct TicketClock {
	next: Arc<AtomicU64>,
}

impl TicketClock {
	/// Creates a new clock whose first ticket is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next ticket.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Cooperative cancellation flag for [`Task`](crate::Task) implementations.
///
/// Cancellation is a request, never a preemption: the engine sets the flag and a
/// running task is expected to poll [`CancelFlag::is_cancelled`] at its own
/// checkpoints, or race its suspension points against [`CancelFlag::cancelled`].
/// Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
	token: CancellationToken,
}

impl CancelFlag {
	/// Creates an unset flag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests cancellation. Idempotent and non-blocking.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Returns true once [`Self::cancel`] was called on this flag or a parent.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.token.cancelled().await;
	}

	/// Creates a child flag, cancelled along with this one but not the reverse.
	pub fn child(&self) -> Self {
		Self {
			token: self.token.child_token(),
		}
	}
}
