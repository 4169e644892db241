use weft_primitives::DocumentUri;
use weft_reconciler::{CancelFlag, Task, async_trait};

use super::checkpoint;
use crate::context::EditorContext;

/// Sends a whole document text to the service.
#[derive(Debug)]
pub struct PushDocumentTask {
	ctx: EditorContext,
	text: String,
	cancel: CancelFlag,
}

impl PushDocumentTask {
	pub fn new(ctx: &EditorContext, text: impl Into<String>) -> Self {
		Self {
			ctx: ctx.clone(),
			text: text.into(),
			cancel: CancelFlag::new(),
		}
	}

	pub fn uri(&self) -> &DocumentUri {
		&self.ctx.uri
	}
}

#[async_trait]
impl Task for PushDocumentTask {
	type Output = ();

	async fn run(&self) -> anyhow::Result<()> {
		checkpoint(&self.cancel)?;
		self.ctx.service.document_changed(&self.ctx.uri, &self.text).await?;
		tracing::trace!(uri = %self.ctx.uri, len = self.text.len(), "editor_tools.document_pushed");
		Ok(())
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
