use ropey::Rope;
use serde::{Deserialize, Serialize};

/// A position in the text, measured in characters (not bytes).
///
/// The analysis service and the host both speak char offsets; row/column
/// positions only exist at the host boundary.
pub type CharIdx = usize;

/// Zero-based row/column position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
	/// Zero-based line index.
	pub row: usize,
	/// Zero-based character offset in the line.
	pub column: usize,
}

impl Position {
	/// Creates a new position.
	pub const fn new(row: usize, column: usize) -> Self {
		Self { row, column }
	}
}

/// Half-open char offset range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetRange {
	/// Start offset (inclusive).
	pub start: CharIdx,
	/// End offset (exclusive).
	pub end: CharIdx,
}

impl OffsetRange {
	/// Creates a new offset range.
	pub const fn new(start: CharIdx, end: CharIdx) -> Self {
		Self { start, end }
	}

	/// Creates a zero-length range at an offset.
	pub const fn point(offset: CharIdx) -> Self {
		Self { start: offset, end: offset }
	}

	/// Returns the number of characters covered, or zero for inverted ranges.
	pub const fn len(&self) -> usize {
		self.end.saturating_sub(self.start)
	}

	/// Returns true if the range covers no characters.
	pub const fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Converts this range to host positions.
	///
	/// Returns `None` if either end lies outside `text`.
	pub fn to_positions(&self, text: &Rope) -> Option<PositionRange> {
		Some(PositionRange {
			start: position_for_offset(text, self.start)?,
			end: position_for_offset(text, self.end)?,
		})
	}
}

/// Row/column range as handed to the editor host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionRange {
	/// Start position (inclusive).
	pub start: Position,
	/// End position (exclusive).
	pub end: Position,
}

/// Converts a row/column position to a char offset.
///
/// Columns past the end of the line clamp to the end of the line content (the
/// line break is never addressable). Returns `None` for rows past the last line.
pub fn offset_for_position(text: &Rope, pos: Position) -> Option<CharIdx> {
	if pos.row >= text.len_lines() {
		return None;
	}
	let line_start = text.line_to_char(pos.row);
	Some(line_start + pos.column.min(line_content_len(text, pos.row)))
}

/// Converts a char offset to a row/column position.
///
/// `text.len_chars()` is a valid offset (end of document); anything past it is `None`.
pub fn position_for_offset(text: &Rope, offset: CharIdx) -> Option<Position> {
	if offset > text.len_chars() {
		return None;
	}
	let row = text.char_to_line(offset);
	Some(Position::new(row, offset - text.line_to_char(row)))
}

fn line_content_len(text: &Rope, row: usize) -> usize {
	let line = text.line(row);
	let mut len = line.len_chars();
	while len > 0 && matches!(line.char(len - 1), '\n' | '\r') {
		len -= 1;
	}
	len
}
