use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edit::{EditError, TextEdit, apply_text_edits_str};

/// Identity of a document as known to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentUri(String);

impl DocumentUri {
	/// Wraps a URI or path string.
	pub fn new(uri: impl Into<String>) -> Self {
		Self(uri.into())
	}

	/// Returns the URI as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocumentUri {
	fn from(uri: &str) -> Self {
		Self::new(uri)
	}
}

impl From<String> for DocumentUri {
	fn from(uri: String) -> Self {
		Self(uri)
	}
}

/// One document changed by a remote operation.
///
/// Carries either a full replacement text or a list of incremental edits. When
/// both are present the full text wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedDocument {
	pub uri: DocumentUri,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text_edits: Option<Vec<TextEdit>>,
}

impl ChangedDocument {
	/// A change replacing the whole document.
	pub fn full(uri: impl Into<DocumentUri>, text: impl Into<String>) -> Self {
		Self {
			uri: uri.into(),
			text: Some(text.into()),
			text_edits: None,
		}
	}

	/// A change made of incremental edits.
	pub fn edits(uri: impl Into<DocumentUri>, edits: Vec<TextEdit>) -> Self {
		Self {
			uri: uri.into(),
			text: None,
			text_edits: Some(edits),
		}
	}
}

/// Folds every change targeting `uri` into a single text, starting from `current`.
///
/// Changes apply in order: a full text replaces the accumulated content, edits
/// apply on top of it. Returns `Ok(None)` when nothing targets `uri`.
pub fn fold_changes(uri: &DocumentUri, current: &str, changes: &[ChangedDocument]) -> Result<Option<String>, EditError> {
	let mut content: Option<String> = None;
	for change in changes.iter().filter(|c| &c.uri == uri) {
		let base = content.take().unwrap_or_else(|| current.to_owned());
		content = Some(match (&change.text, &change.text_edits) {
			(Some(text), _) => text.clone(),
			(None, Some(edits)) => apply_text_edits_str(&base, edits)?,
			(None, None) => base,
		});
	}
	Ok(content)
}
