//! Editor call sites built on [`weft_reconciler`].
//!
//! [`EditorTools`] turns raw editor events into reconciled requests against an
//! [`AnalysisService`]:
//!
//! - caret moves schedule occurrence searches, highlighted only if the caret is
//!   still where the search started;
//! - property edits in the details panel are coalesced per document, sent, and
//!   the returned document changes applied to the [`EditorHost`];
//! - document edits refresh the outline.
//!
//! Each concern has its own stream and debounce interval ([`ToolsConfig`]).

mod apply;
mod config;
mod context;
mod error;
mod host;
mod manager;
mod service;
pub mod tasks;
#[cfg(test)]
mod test_support;

pub use apply::apply_changed_documents;
pub use config::ToolsConfig;
pub use context::{EditorContext, LocalModel};
pub use error::{ConfigError, Result, ToolsError};
pub use host::EditorHost;
pub use manager::EditorTools;
pub use service::{AnalysisService, DetailValue, DetailsNode, DetailsReport, ServiceError, StructureNode};
