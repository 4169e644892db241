//! Reconciler tasks behind the editor tools.
//!
//! Every task captures an [`EditorContext`](crate::EditorContext) when it is
//! created and checks its cancel flag before each service call and after each
//! suspension.

mod detail;
mod details;
mod document;
mod occurrences;
mod outline;

pub use detail::UpdateDetailTask;
pub use details::DetailsTask;
pub use document::PushDocumentTask;
pub use occurrences::{MarkOccurrencesTask, OccurrencesOutcome};
pub use outline::RefreshOutlineTask;
use weft_reconciler::CancelFlag;

use crate::error::ToolsError;

fn checkpoint(cancel: &CancelFlag) -> Result<(), ToolsError> {
	if cancel.is_cancelled() {
		return Err(ToolsError::Cancelled);
	}
	Ok(())
}
