//! Call sites wiring editor events to the three tool streams.

use std::sync::Arc;

use tracing::{debug, warn};
use weft_primitives::{ChangedDocument, DocumentUri, Position, Rope, offset_for_position};
use weft_reconciler::{Reconciler, ReconcilerSnapshot, Scheduled};

use crate::apply::apply_changed_documents;
use crate::config::ToolsConfig;
use crate::context::{EditorContext, LocalModel};
use crate::error::{Result, ToolsError};
use crate::host::EditorHost;
use crate::service::{AnalysisService, DetailValue, DetailsNode, DetailsReport, StructureNode};
use crate::tasks::{DetailsTask, MarkOccurrencesTask, OccurrencesOutcome, PushDocumentTask, RefreshOutlineTask, UpdateDetailTask};


/// Owns the occurrence, details and outline streams of one editor session.
///
/// Dropping it disposes all three streams.
pub struct EditorTools {
	service: Arc<dyn AnalysisService>,
	host: Arc<dyn EditorHost>,
	occurrences: Reconciler<MarkOccurrencesTask>,
	details: Reconciler<DetailsTask>,
	outline: Reconciler<RefreshOutlineTask>,
}

impl EditorTools {
	pub fn new(config: &ToolsConfig, service: Arc<dyn AnalysisService>, host: Arc<dyn EditorHost>) -> Self {
		Self {
			service,
			host,
			occurrences: Reconciler::from_config("occurrences", &config.occurrences),
			details: Reconciler::from_config("details", &config.details),
			outline: Reconciler::from_config("outline", &config.outline),
		}
	}

	/// Captures the active document and caret into a task context.
	pub fn context(&self) -> Result<EditorContext> {
		let uri = self.host.path().ok_or(ToolsError::NoActiveDocument)?;
		Ok(EditorContext::new(
			uri,
			self.host.cursor_offset(),
			Arc::clone(&self.service),
			Arc::clone(&self.host),
		))
	}

	/// Like [`Self::context`], with detail edits routed to `model`.
	pub fn local_context(&self, model: LocalModel) -> Result<EditorContext> {
		Ok(self.context()?.with_local_model(model))
	}

	/// Reacts to a caret move.
	///
	/// Clears the current highlights, schedules a new occurrence search for
	/// `position` and reports the new offset to the service. A failed position
	/// report is logged and does not fail the call.
	pub async fn cursor_moved(&self, position: Position) -> Result<Scheduled<OccurrencesOutcome>> {
		let mut ctx = self.context()?;
		let text = Rope::from_str(&self.host.text());
		ctx.position = offset_for_position(&text, position).unwrap_or_else(|| text.len_chars());

		self.host.clear_occurrences();
		let scheduled = self.occurrences.schedule(MarkOccurrencesTask::new(&ctx))?;

		if let Err(error) = self.service.position_changed(&ctx.uri, ctx.position).await {
			warn!(uri = %ctx.uri, offset = ctx.position, %error, "editor_tools.position_changed.failed");
		}
		Ok(scheduled)
	}

	/// Sends an edited property value and applies the resulting changes.
	///
	/// Returns the changed documents, or nothing if a newer edit of the same
	/// document superseded this one. With a local model nothing is sent and
	/// nothing is applied.
	pub async fn detail_value_changed(
		&self,
		ctx: &EditorContext,
		item_id: impl Into<String>,
		value: DetailValue,
	) -> Result<Vec<ChangedDocument>> {
		let scheduled = self.details.schedule(UpdateDetailTask::new(ctx, item_id, value).into())?;
		match scheduled.await {
			Ok(changes) => {
				if ctx.local_model.is_none() {
					apply_changed_documents(&*self.host, &changes, Some(ctx.position))?;
				}
				Ok(changes)
			}
			Err(e) if e.is_superseded() => Ok(Vec::new()),
			Err(e) => {
				warn!(uri = %ctx.uri, error = %e, "editor_tools.detail_value.failed");
				Err(e.into())
			}
		}
	}

	/// Refreshes the outline of the active document.
	///
	/// Returns `None` when superseded by a newer edit or when the service
	/// failed; failures are logged.
	pub async fn document_edited(&self) -> Result<Option<StructureNode>> {
		let ctx = self.context()?;
		match self.outline.schedule(RefreshOutlineTask::new(&ctx))?.await {
			Ok(structure) => Ok(Some(structure)),
			Err(e) if e.is_superseded() => Ok(None),
			Err(e) if e.is_disposed() => Err(e.into()),
			Err(e) => {
				warn!(uri = %ctx.uri, error = %e, "editor_tools.outline.failed");
				Ok(None)
			}
		}
	}

	/// Schedules a full-text push of `uri` on the details stream.
	pub fn push_document(&self, uri: DocumentUri, text: impl Into<String>) -> Result<Scheduled<Vec<ChangedDocument>>> {
		let ctx = EditorContext::new(uri, self.host.cursor_offset(), Arc::clone(&self.service), Arc::clone(&self.host));
		Ok(self.details.schedule(PushDocumentTask::new(&ctx, text).into())?)
	}

	/// Fetches the details of the node under the caret.
	pub async fn details(&self) -> Result<DetailsNode> {
		let ctx = self.context()?;
		Ok(self.service.get_details(&ctx.uri, ctx.position).await?)
	}

	/// Filters a details report pushed by the service.
	///
	/// Returns the report if it targets the active document and is not older
	/// than the newest version the service knows; `None` otherwise.
	pub async fn details_report(&self, report: DetailsReport) -> Result<Option<DetailsReport>> {
		if self.host.path().as_ref() != Some(&report.uri) {
			debug!(uri = %report.uri, "editor_tools.details_report.inactive");
			return Ok(None);
		}
		let latest = self.service.latest_version(&report.uri).await?;
		if report.version.is_some_and(|version| version < latest) {
			debug!(uri = %report.uri, version = ?report.version, latest, "editor_tools.details_report.stale");
			return Ok(None);
		}
		Ok(Some(report))
	}

	/// Disposes all three streams. Idempotent.
	pub fn dispose(&self) {
		self.occurrences.dispose();
		self.details.dispose();
		self.outline.dispose();
	}

	/// Returns true once every stream is idle.
	pub fn is_idle(&self) -> bool {
		self.occurrences.is_idle() && self.details.is_idle() && self.outline.is_idle()
	}

	/// Waits until every stream is idle.
	pub async fn idle(&self) {
		self.occurrences.idle().await;
		self.details.idle().await;
		self.outline.idle().await;
	}

	/// Snapshots of the occurrence, details and outline streams, in that order.
	pub fn snapshots(&self) -> [ReconcilerSnapshot; 3] {
		[self.occurrences.snapshot(), self.details.snapshot(), self.outline.snapshot()]
	}
}

impl std::fmt::Debug for EditorTools {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EditorTools")
			.field("occurrences", &self.occurrences)
			.field("details", &self.details)
			.field("outline", &self.outline)
			.finish_non_exhaustive()
	}
}
