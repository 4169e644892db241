//! Core text types shared between the reconciliation call sites and their
//! collaborators: char-offset coordinates, text edits, and the changed-document
//! payloads returned by the analysis service.

/// Changed-document payloads and document identity.
pub mod document;
/// Offset-based text edits.
pub mod edit;
/// Char offsets, row/column positions and conversions over a rope.
pub mod position;

pub use document::{ChangedDocument, DocumentUri, fold_changes};
pub use edit::{EditError, TextEdit, apply_text_edits, apply_text_edits_str};
pub use position::{CharIdx, OffsetRange, Position, PositionRange, offset_for_position, position_for_offset};
pub use ropey::Rope;
