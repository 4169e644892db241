//! The remote analysis service the editor tools talk to, and its payloads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use weft_primitives::{ChangedDocument, CharIdx, DocumentUri, OffsetRange};

/// Errors reported by an [`AnalysisService`] implementation.
#[derive(Debug, Error)]
pub enum ServiceError {
	/// The service is not running or not reachable.
	#[error("analysis service unavailable: {0}")]
	Unavailable(String),

	/// The service answered with an error.
	#[error("{method} rejected: {message}")]
	Rejected {
		/// Service operation that failed.
		method: &'static str,
		/// Message returned by the service.
		message: String,
	},

	/// The service answered with a payload that could not be decoded.
	#[error("malformed service payload: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Language analysis backend.
///
/// Every method addresses a document by URI and positions by char offset.
#[async_trait]
pub trait AnalysisService: Send + Sync + 'static {
	/// Replaces the service's copy of a document.
	async fn document_changed(&self, uri: &DocumentUri, text: &str) -> Result<(), ServiceError>;

	/// Tells the service where the caret is.
	async fn position_changed(&self, uri: &DocumentUri, offset: CharIdx) -> Result<(), ServiceError>;

	/// Returns the outline of a document.
	async fn get_structure(&self, uri: &DocumentUri) -> Result<StructureNode, ServiceError>;

	/// Returns the editable properties of the node at `offset`.
	async fn get_details(&self, uri: &DocumentUri, offset: CharIdx) -> Result<DetailsNode, ServiceError>;

	/// Changes one property of the node at `offset` and returns the resulting document changes.
	async fn change_detail_value(
		&self,
		uri: &DocumentUri,
		offset: CharIdx,
		item_id: &str,
		value: &DetailValue,
	) -> Result<Vec<ChangedDocument>, ServiceError>;

	/// Returns every occurrence of the symbol at `offset`.
	async fn mark_occurrences(&self, uri: &DocumentUri, offset: CharIdx) -> Result<Vec<OffsetRange>, ServiceError>;

	/// Returns the newest document version the service has seen.
	async fn latest_version(&self, uri: &DocumentUri) -> Result<u64, ServiceError>;
}

/// One node of a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureNode {
	pub text: String,
	#[serde(default)]
	pub category: Option<String>,
	pub range: OffsetRange,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<StructureNode>,
}

impl StructureNode {
	/// Number of nodes in this subtree, including `self`.
	pub fn node_count(&self) -> usize {
		1 + self.children.iter().map(StructureNode::node_count).sum::<usize>()
	}
}

/// Value of one editable property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
	Bool(bool),
	Number(f64),
	Text(String),
}

impl From<bool> for DetailValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for DetailValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<&str> for DetailValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for DetailValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// An editable property tree for the node under the caret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsNode {
	pub id: String,
	pub title: String,
	#[serde(default)]
	pub value: Option<DetailValue>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<DetailsNode>,
}

/// Details pushed by the service without a request.
///
/// Reports can arrive out of order; `version` is compared with
/// [`AnalysisService::latest_version`] to drop stale ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsReport {
	pub uri: DocumentUri,
	#[serde(default)]
	pub version: Option<u64>,
	pub position: CharIdx,
	pub details: DetailsNode,
}
