use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{ReconcileError, Result};

/// Future returned by [`Reconciler::schedule`](crate::Reconciler::schedule).
///
/// Resolves with the output of the task once it ran, or with the reason it did
/// not. Dropping it does not cancel the task.
#[must_use = "dropping a Scheduled discards the task outcome, not the task"]
#[derive(Debug)]
pub struct Scheduled<O> {
	ticket: u64,
	stream: Arc<str>,
	rx: oneshot::Receiver<Result<O>>,
}

impl<O> Scheduled<O> {
	pub(crate) fn new(ticket: u64, stream: Arc<str>, rx: oneshot::Receiver<Result<O>>) -> Self {
		Self { ticket, stream, rx }
	}

	/// Returns the ticket assigned to the task within its stream.
	pub fn ticket(&self) -> u64 {
		self.ticket
	}
}

impl<O> Future for Scheduled<O> {
	type Output = Result<O>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = &mut *self;
		match Pin::new(&mut this.rx).poll(cx) {
			Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
			// The sender only disappears without a reply when the engine is
			// gone while the task was still owned by it.
			Poll::Ready(Err(_)) => Poll::Ready(Err(ReconcileError::disposed(&this.stream))),
			Poll::Pending => Poll::Pending,
		}
	}
}
