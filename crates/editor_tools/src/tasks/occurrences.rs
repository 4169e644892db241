use weft_primitives::{DocumentUri, PositionRange, Rope};
use weft_reconciler::{CancelFlag, Task, async_trait};

use super::checkpoint;
use crate::context::EditorContext;

/// What a finished [`MarkOccurrencesTask`] did to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccurrencesOutcome {
	/// The host now highlights these ranges.
	Highlighted(Vec<PositionRange>),
	/// The caret moved or the document changed while the service answered;
	/// nothing was highlighted.
	Stale,
}

/// Recomputes occurrence highlights for the caret position captured at creation.
///
/// Conflicts with any other occurrence request for the same document.
#[derive(Debug)]
pub struct MarkOccurrencesTask {
	ctx: EditorContext,
	cancel: CancelFlag,
}

impl MarkOccurrencesTask {
	pub fn new(ctx: &EditorContext) -> Self {
		Self {
			ctx: ctx.clone(),
			cancel: CancelFlag::new(),
		}
	}

	pub fn path(&self) -> &DocumentUri {
		&self.ctx.uri
	}

	fn is_stale(&self) -> bool {
		let host = &self.ctx.host;
		host.path().as_ref() != Some(&self.ctx.uri) || host.cursor_offset() != self.ctx.position
	}
}

#[async_trait]
impl Task for MarkOccurrencesTask {
	type Output = OccurrencesOutcome;

	async fn run(&self) -> anyhow::Result<OccurrencesOutcome> {
		checkpoint(&self.cancel)?;
		let ranges = self.ctx.service.mark_occurrences(&self.ctx.uri, self.ctx.position).await?;
		checkpoint(&self.cancel)?;

		if self.is_stale() {
			tracing::debug!(uri = %self.ctx.uri, offset = self.ctx.position, "editor_tools.occurrences.stale");
			return Ok(OccurrencesOutcome::Stale);
		}

		let text = Rope::from_str(&self.ctx.host.text());
		let positions: Vec<_> = ranges.iter().filter_map(|range| range.to_positions(&text)).collect();
		if positions.len() != ranges.len() {
			tracing::debug!(
				uri = %self.ctx.uri,
				dropped = ranges.len() - positions.len(),
				"editor_tools.occurrences.out_of_bounds"
			);
		}
		self.ctx.host.highlight_occurrences(&positions);
		Ok(OccurrencesOutcome::Highlighted(positions))
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
