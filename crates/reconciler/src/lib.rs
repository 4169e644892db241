//! Debounced, conflict-aware single-flight task reconciliation.
//!
//! A [`Reconciler`] owns one logical stream of asynchronous work (say, pushing
//! edits to an analysis service) and enforces three rules on it:
//!
//! - Tasks wait for a quiet period before starting. Every new submission
//!   restarts the window.
//! - Scheduling a task cancels every queued task it [conflicts](Task::conflicts)
//!   with, so only the newest of a burst of equivalent requests runs.
//! - At most one task of a stream runs at a time. Tasks that survive run in
//!   the order they were scheduled.
//!
//! Each [`Reconciler::schedule`] returns a [`Scheduled`] future that resolves
//! exactly once, with the task's output or a [`ReconcileError`] saying why it
//! did not run or did not succeed. Disposal (explicit, or by dropping the last
//! handle) settles every queued task immediately.
//!
//! ```ignore
//! let details = Reconciler::new("details", Duration::from_millis(800));
//! match details.schedule(task)?.await {
//!     Ok(report) => apply(report),
//!     Err(e) if e.is_superseded() => {}
//!     Err(e) => tracing::warn!(error = %e, "details update failed"),
//! }
//! ```

mod config;
mod error;
pub(crate) mod invariants;
mod reconciler;
mod scheduled;
mod snapshot;
mod spawn;
mod task;
mod token;

pub use async_trait::async_trait;
pub use config::ReconcilerConfig;
pub use error::{ReconcileError, Result};
pub use reconciler::Reconciler;
pub use scheduled::Scheduled;
pub use snapshot::{ReconcilerSnapshot, StreamTotals};
pub use task::Task;
pub use token::CancelFlag;
