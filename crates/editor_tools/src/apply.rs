use weft_primitives::{ChangedDocument, CharIdx, EditError, fold_changes};

use crate::host::EditorHost;

/// Applies remote document changes to the host's active document.
///
/// Every change targeting the active document is folded into one text, which is
/// set once with `caret`. Changes for other documents are ignored. Returns true
/// if the host text was replaced.
pub fn apply_changed_documents(
	host: &dyn EditorHost,
	changes: &[ChangedDocument],
	caret: Option<CharIdx>,
) -> Result<bool, EditError> {
	let Some(uri) = host.path() else {
		return Ok(false);
	};
	match fold_changes(&uri, &host.text(), changes)? {
		Some(text) => {
			tracing::debug!(%uri, changes = changes.len(), ?caret, "editor_tools.apply_changes");
			host.set_text(&text, caret);
			Ok(true)
		}
		None => Ok(false),
	}
}
