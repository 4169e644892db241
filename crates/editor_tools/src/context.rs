use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use weft_primitives::{CharIdx, DocumentUri};

use crate::host::EditorHost;
use crate::service::{AnalysisService, DetailValue};

/// Everything a task needs to reach its collaborators.
///
/// Captured when the task is created. `position` is the caret offset at that
/// moment, not a live value.
#[derive(Clone)]
pub struct EditorContext {
	pub uri: DocumentUri,
	pub position: CharIdx,
	/// When set, detail edits are written here instead of being sent to the service.
	pub local_model: Option<LocalModel>,
	pub service: Arc<dyn AnalysisService>,
	pub host: Arc<dyn EditorHost>,
}

impl EditorContext {
	pub fn new(uri: DocumentUri, position: CharIdx, service: Arc<dyn AnalysisService>, host: Arc<dyn EditorHost>) -> Self {
		Self {
			uri,
			position,
			local_model: None,
			service,
			host,
		}
	}

	/// Routes detail edits to `model`.
	pub fn with_local_model(mut self, model: LocalModel) -> Self {
		self.local_model = Some(model);
		self
	}
}

impl std::fmt::Debug for EditorContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EditorContext")
			.field("uri", &self.uri)
			.field("position", &self.position)
			.field("local_model", &self.local_model.is_some())
			.finish_non_exhaustive()
	}
}

/// In-memory property values edited without a backing document. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct LocalModel {
	values: Arc<Mutex<HashMap<String, DetailValue>>>,
}

impl LocalModel {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&self, item_id: impl Into<String>, value: DetailValue) {
		self.values.lock().insert(item_id.into(), value);
	}

	pub fn get(&self, item_id: &str) -> Option<DetailValue> {
		self.values.lock().get(item_id).cloned()
	}

	pub fn len(&self) -> usize {
		self.values.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
