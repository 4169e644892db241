use weft_primitives::{ChangedDocument, DocumentUri};
use weft_reconciler::{CancelFlag, Task, async_trait};

use super::checkpoint;
use crate::context::EditorContext;
use crate::service::DetailValue;

/// Pushes one edited property value.
///
/// Conflicts with any other detail edit of the same document, so a burst of
/// edits only sends the last value.
#[derive(Debug)]
pub struct UpdateDetailTask {
	ctx: EditorContext,
	item_id: String,
	value: DetailValue,
	cancel: CancelFlag,
}

impl UpdateDetailTask {
	pub fn new(ctx: &EditorContext, item_id: impl Into<String>, value: DetailValue) -> Self {
		Self {
			ctx: ctx.clone(),
			item_id: item_id.into(),
			value,
			cancel: CancelFlag::new(),
		}
	}

	pub fn uri(&self) -> &DocumentUri {
		&self.ctx.uri
	}
}

#[async_trait]
impl Task for UpdateDetailTask {
	type Output = Vec<ChangedDocument>;

	async fn run(&self) -> anyhow::Result<Vec<ChangedDocument>> {
		checkpoint(&self.cancel)?;
		if let Some(model) = &self.ctx.local_model {
			model.set(self.item_id.clone(), self.value.clone());
			return Ok(Vec::new());
		}
		let changes = self
			.ctx
			.service
			.change_detail_value(&self.ctx.uri, self.ctx.position, &self.item_id, &self.value)
			.await?;
		checkpoint(&self.cancel)?;
		tracing::trace!(uri = %self.ctx.uri, item = %self.item_id, changes = changes.len(), "editor_tools.detail_updated");
		Ok(changes)
	}

	fn conflicts(&self, other: &Self) -> bool {
		self.ctx.uri == other.ctx.uri
	}

	fn cancel(&self) {
		self.cancel.cancel();
	}

	fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}
}
