//! Scripted host and service doubles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use weft_primitives::{ChangedDocument, CharIdx, DocumentUri, OffsetRange, PositionRange};

use crate::host::EditorHost;
use crate::service::{AnalysisService, DetailValue, DetailsNode, ServiceError, StructureNode};

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub(crate) struct FakeHost {
	path: Mutex<Option<DocumentUri>>,
	text: Mutex<String>,
	cursor: AtomicUsize,
	set_text_calls: Mutex<Vec<Option<CharIdx>>>,
	highlights: Mutex<Vec<Vec<PositionRange>>>,
	clears: AtomicUsize,
}

impl FakeHost {
	pub(crate) fn new(uri: &str, text: &str) -> Self {
		Self {
			path: Mutex::new(Some(DocumentUri::from(uri))),
			text: Mutex::new(text.to_owned()),
			cursor: AtomicUsize::new(0),
			set_text_calls: Mutex::new(Vec::new()),
			highlights: Mutex::new(Vec::new()),
			clears: AtomicUsize::new(0),
		}
	}

	pub(crate) fn shared(uri: &str, text: &str) -> Arc<Self> {
		Arc::new(Self::new(uri, text))
	}

	pub(crate) fn text_now(&self) -> String {
		self.text.lock().clone()
	}

	pub(crate) fn set_text_calls(&self) -> Vec<Option<CharIdx>> {
		self.set_text_calls.lock().clone()
	}

	pub(crate) fn highlights(&self) -> Vec<Vec<PositionRange>> {
		self.highlights.lock().clone()
	}

	pub(crate) fn clears(&self) -> usize {
		self.clears.load(Ordering::SeqCst)
	}

	pub(crate) fn move_cursor(&self, offset: CharIdx) {
		self.cursor.store(offset, Ordering::SeqCst);
	}

	pub(crate) fn close(&self) {
		*self.path.lock() = None;
	}
}

impl EditorHost for FakeHost {
	fn path(&self) -> Option<DocumentUri> {
		self.path.lock().clone()
	}

	fn text(&self) -> String {
		self.text.lock().clone()
	}

	fn cursor_offset(&self) -> CharIdx {
		self.cursor.load(Ordering::SeqCst)
	}

	fn set_text(&self, text: &str, caret: Option<CharIdx>) {
		*self.text.lock() = text.to_owned();
		if let Some(caret) = caret {
			self.cursor.store(caret, Ordering::SeqCst);
		}
		self.set_text_calls.lock().push(caret);
	}

	fn highlight_occurrences(&self, ranges: &[PositionRange]) {
		self.highlights.lock().push(ranges.to_vec());
	}

	fn clear_occurrences(&self) {
		self.clears.fetch_add(1, Ordering::SeqCst);
	}
}

/// Service double answering from scripted state after `latency` of (paused) time.
#[derive(Default)]
pub(crate) struct FakeService {
	latency: Duration,
	calls: Mutex<Vec<String>>,
	occurrences: Mutex<Vec<OffsetRange>>,
	structure: Mutex<Option<StructureNode>>,
	changes: Mutex<Vec<ChangedDocument>>,
	latest_version: AtomicU64,
	rejecting: AtomicBool,
}

impl FakeService {
	pub(crate) fn shared() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub(crate) fn with_latency(ms: u64) -> Arc<Self> {
		Arc::new(Self {
			latency: Duration::from_millis(ms),
			..Self::default()
		})
	}

	pub(crate) fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	pub(crate) fn calls_to(&self, method: &str) -> usize {
		self.calls.lock().iter().filter(|c| c.split(' ').next() == Some(method)).count()
	}

	pub(crate) fn answer_occurrences(&self, ranges: Vec<OffsetRange>) {
		*self.occurrences.lock() = ranges;
	}

	pub(crate) fn answer_structure(&self, node: StructureNode) {
		*self.structure.lock() = Some(node);
	}

	pub(crate) fn answer_changes(&self, changes: Vec<ChangedDocument>) {
		*self.changes.lock() = changes;
	}

	pub(crate) fn set_latest_version(&self, version: u64) {
		self.latest_version.store(version, Ordering::SeqCst);
	}

	pub(crate) fn reject_all(&self) {
		self.rejecting.store(true, Ordering::SeqCst);
	}

	async fn call(&self, method: &'static str, detail: String) -> Result<(), ServiceError> {
		self.calls.lock().push(format!("{method} {detail}"));
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
		if self.rejecting.load(Ordering::SeqCst) {
			return Err(ServiceError::Rejected {
				method,
				message: "scripted rejection".into(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl AnalysisService for FakeService {
	async fn document_changed(&self, uri: &DocumentUri, text: &str) -> Result<(), ServiceError> {
		self.call("document_changed", format!("{uri} {}", text.len())).await
	}

	async fn position_changed(&self, uri: &DocumentUri, offset: CharIdx) -> Result<(), ServiceError> {
		self.call("position_changed", format!("{uri} {offset}")).await
	}

	async fn get_structure(&self, uri: &DocumentUri) -> Result<StructureNode, ServiceError> {
		self.call("get_structure", uri.to_string()).await?;
		self.structure
			.lock()
			.clone()
			.ok_or_else(|| ServiceError::Unavailable("no structure scripted".into()))
	}

	async fn get_details(&self, uri: &DocumentUri, offset: CharIdx) -> Result<DetailsNode, ServiceError> {
		self.call("get_details", format!("{uri} {offset}")).await?;
		Ok(DetailsNode {
			id: format!("node@{offset}"),
			title: "Node".into(),
			value: None,
			children: Vec::new(),
		})
	}

	async fn change_detail_value(
		&self,
		uri: &DocumentUri,
		offset: CharIdx,
		item_id: &str,
		value: &DetailValue,
	) -> Result<Vec<ChangedDocument>, ServiceError> {
		self.call("change_detail_value", format!("{uri} {offset} {item_id}={value:?}")).await?;
		Ok(self.changes.lock().clone())
	}

	async fn mark_occurrences(&self, uri: &DocumentUri, offset: CharIdx) -> Result<Vec<OffsetRange>, ServiceError> {
		self.call("mark_occurrences", format!("{uri} {offset}")).await?;
		Ok(self.occurrences.lock().clone())
	}

	async fn latest_version(&self, uri: &DocumentUri) -> Result<u64, ServiceError> {
		self.call("latest_version", uri.to_string()).await?;
		Ok(self.latest_version.load(Ordering::SeqCst))
	}
}
