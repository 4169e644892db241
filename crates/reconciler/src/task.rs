use async_trait::async_trait;

/// A cancellable, conflict-aware unit of asynchronous work.
///
/// A [`Reconciler`](crate::Reconciler) is generic over one task type. Families
/// of work that share a stream are expressed as an enum implementing this
/// trait, so any kind-specific behavior lives in the task and never in the
/// engine.
#[async_trait]
pub trait Task: Send + Sync + 'static {
	/// Value delivered to the caller of `schedule` when the task runs.
	type Output: Send + 'static;

	/// Performs the work.
	///
	/// This is the only operation the engine awaits. It is never aborted:
	/// after [`Task::cancel`] the task should notice [`Task::is_cancelled`] at its
	/// next checkpoint and return early.
	async fn run(&self) -> anyhow::Result<Self::Output>;

	/// Returns true if scheduling `other` makes this queued task obsolete.
	///
	/// Called on the queued task with the newly scheduled one as argument, under
	/// the engine lock, on every `schedule`. Must be cheap and must not call back
	/// into the reconciler.
	fn conflicts(&self, other: &Self) -> bool;

	/// Requests cancellation. Must be idempotent and must not block.
	fn cancel(&self);

	/// Returns true once [`Task::cancel`] was called.
	fn is_cancelled(&self) -> bool;
}
