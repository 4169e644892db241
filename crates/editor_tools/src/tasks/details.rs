use weft_primitives::{ChangedDocument, DocumentUri};
use weft_reconciler::{Task, async_trait};

use super::{PushDocumentTask, UpdateDetailTask};

/// Work sharing the details stream.
///
/// Variants only conflict with the same variant for the same document: a
/// document push never supersedes a pending value edit, and the reverse.
#[derive(Debug)]
pub enum DetailsTask {
	Update(UpdateDetailTask),
	Push(PushDocumentTask),
}

impl DetailsTask {
	pub fn uri(&self) -> &DocumentUri {
		match self {
			Self::Update(task) => task.uri(),
			Self::Push(task) => task.uri(),
		}
	}
}

impl From<UpdateDetailTask> for DetailsTask {
	fn from(task: UpdateDetailTask) -> Self {
		Self::Update(task)
	}
}

impl From<PushDocumentTask> for DetailsTask {
	fn from(task: PushDocumentTask) -> Self {
		Self::Push(task)
	}
}

#[async_trait]
impl Task for DetailsTask {
	/// Documents changed by a value edit; empty for pushes.
	type Output = Vec<ChangedDocument>;

	async fn run(&self) -> anyhow::Result<Vec<ChangedDocument>> {
		match self {
			Self::Update(task) => task.run().await,
			Self::Push(task) => task.run().await.map(|()| Vec::new()),
		}
	}

	fn conflicts(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Update(a), Self::Update(b)) => a.conflicts(b),
			(Self::Push(a), Self::Push(b)) => a.conflicts(b),
			_ => false,
		}
	}

	fn cancel(&self) {
		match self {
			Self::Update(task) => task.cancel(),
			Self::Push(task) => task.cancel(),
		}
	}

	fn is_cancelled(&self) -> bool {
		match self {
			Self::Update(task) => task.is_cancelled(),
			Self::Push(task) => task.is_cancelled(),
		}
	}
}
