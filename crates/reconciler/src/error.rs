//! Terminal outcomes other than success.

use thiserror::Error;

/// Why a scheduled task did not deliver its own result.
#[derive(Debug, Error)]
pub enum ReconcileError {
	/// Cancelled before it started because a conflicting task was scheduled, or
	/// because the reconciler was disposed while it was still queued.
	///
	/// Not a failure: call sites normally ignore it.
	#[error("task superseded by a conflicting submission")]
	Superseded,

	/// The reconciler was torn down: either `schedule` was called after
	/// disposal, or the task was running when disposal happened and its result
	/// was discarded.
	#[error("reconciler `{name}` is disposed")]
	Disposed {
		/// Name of the disposed stream.
		name: String,
	},

	/// The task's `run` failed; the cause is propagated unchanged.
	#[error(transparent)]
	Failed(anyhow::Error),
}

impl ReconcileError {
	pub(crate) fn disposed(name: &str) -> Self {
		Self::Disposed { name: name.to_owned() }
	}

	/// Returns true for [`ReconcileError::Superseded`].
	pub fn is_superseded(&self) -> bool {
		matches!(self, Self::Superseded)
	}

	/// Returns true for [`ReconcileError::Disposed`].
	pub fn is_disposed(&self) -> bool {
		matches!(self, Self::Disposed { .. })
	}

	/// Returns the task's own error, if it failed.
	pub fn failure(&self) -> Option<&anyhow::Error> {
		match self {
			Self::Failed(err) => Some(err),
			_ => None,
		}
	}
}

/// Result delivered by a [`Scheduled`](crate::Scheduled) future.
pub type Result<T> = std::result::Result<T, ReconcileError>;
