use weft_primitives::DocumentUri;
use weft_reconciler::{CancelFlag, Task, async_trait};

use super::checkpoint;
use crate::context::EditorContext;
use crate::service::StructureNode;

/// Pushes the current host text, then fetches the document outline.
#[derive(Debug)]
pub struct RefreshOutlineTask {
	ctx: EditorContext,
	cancel: CancelFlag,
}

impl RefreshOutlineTask {
	pub fn new(ctx: &EditorContext) -> Self {
		Self {
			ctx: ctx.clone(),
			cancel: CancelFlag::new(),
		}
	}

	pub fn uri(&self) -> &DocumentUri {
		&self.ctx.uri
	}
}

#[async_trait]
impl Task for RefreshOutlineTask {
	type Output = StructureNode;

	async fn run(&self) -> anyhow::Result<StructureNode> {
		checkpoint(&self.cancel)?;
		// Text is read when the run starts, not when the task was scheduled.
		let text = self.ctx.host.text();
		self.ctx.service.document_changed(&self.ctx.uri, &text).await?;
		checkpoint(&self.cancel)?;
		let structure = self.ctx.service.get_structure(&self.ctx.uri).await?;
		checkpoint(&self.cancel)?;
		tracing::trace!(uri = %self.ctx.uri, nodes = structure.node_count(), "editor_tools.outline_refreshed");
		Ok(structure)
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
