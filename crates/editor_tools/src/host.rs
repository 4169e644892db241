//! The editor the tools decorate.

use weft_primitives::{CharIdx, DocumentUri, PositionRange};

/// Synchronous view of the active editor.
///
/// Implementations are called from reconciler tasks on runtime worker threads,
/// so they must be cheap and must not block on the UI.
pub trait EditorHost: Send + Sync + 'static {
	/// URI of the active document, if any.
	fn path(&self) -> Option<DocumentUri>;

	/// Current text of the active document.
	fn text(&self) -> String;

	/// Caret position as a char offset.
	fn cursor_offset(&self) -> CharIdx;

	/// Replaces the active document's text and optionally moves the caret.
	fn set_text(&self, text: &str, caret: Option<CharIdx>);

	/// Replaces the occurrence highlights.
	fn highlight_occurrences(&self, ranges: &[PositionRange]);

	/// Removes all occurrence highlights.
	fn clear_occurrences(&self);
}
