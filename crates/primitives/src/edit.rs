use ropey::Rope;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::{CharIdx, OffsetRange};

/// Replacement of one char range with new text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
	/// Range replaced, in pre-edit offsets.
	pub range: OffsetRange,
	/// Replacement text.
	pub text: String,
}

impl TextEdit {
	/// Creates a replacement edit.
	pub fn new(range: OffsetRange, text: impl Into<String>) -> Self {
		Self { range, text: text.into() }
	}

	/// Creates a pure insertion at `offset`.
	pub fn insert(offset: CharIdx, text: impl Into<String>) -> Self {
		Self::new(OffsetRange::point(offset), text)
	}

	/// Creates a pure deletion of `range`.
	pub fn delete(range: OffsetRange) -> Self {
		Self::new(range, String::new())
	}
}

/// Errors rejecting a batch of edits. A rejected batch leaves the text untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// Edit range end precedes its start.
	#[error("edit range {start}..{end} is inverted")]
	Inverted { start: CharIdx, end: CharIdx },

	/// Edit range extends past the end of the document.
	#[error("edit range {start}..{end} exceeds document length {len}")]
	OutOfBounds { start: CharIdx, end: CharIdx, len: usize },

	/// Two edits touch the same characters.
	#[error("edits overlap at offset {0}")]
	Overlap(CharIdx),
}

/// Applies a batch of edits expressed in pre-edit offsets.
///
/// The batch is validated first, then applied from the highest offset down so
/// earlier offsets stay valid. Insertions at the same offset keep their batch order.
pub fn apply_text_edits(text: &mut Rope, edits: &[TextEdit]) -> Result<(), EditError> {
	let len = text.len_chars();
	let mut order: Vec<&TextEdit> = edits.iter().collect();
	order.sort_by_key(|edit| (edit.range.start, edit.range.end));

	let mut prev_end = 0;
	for edit in &order {
		let OffsetRange { start, end } = edit.range;
		if end < start {
			return Err(EditError::Inverted { start, end });
		}
		if end > len {
			return Err(EditError::OutOfBounds { start, end, len });
		}
		if start < prev_end {
			return Err(EditError::Overlap(start));
		}
		prev_end = end;
	}

	for edit in order.into_iter().rev() {
		text.remove(edit.range.start..edit.range.end);
		text.insert(edit.range.start, &edit.text);
	}
	Ok(())
}

/// [`apply_text_edits`] over a plain string.
pub fn apply_text_edits_str(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
	let mut rope = Rope::from_str(text);
	apply_text_edits(&mut rope, edits)?;
	Ok(rope.to_string())
}
