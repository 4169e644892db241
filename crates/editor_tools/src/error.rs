//! Error types for the editor tool call sites.

use std::path::PathBuf;

use thiserror::Error;
use weft_primitives::EditError;
use weft_reconciler::ReconcileError;

use crate::service::ServiceError;

/// Errors that can occur when loading [`ToolsConfig`](crate::ToolsConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Errors surfaced by [`EditorTools`](crate::EditorTools) operations and tasks.
#[derive(Debug, Error)]
pub enum ToolsError {
	/// The host has no active document.
	#[error("no active document")]
	NoActiveDocument,

	/// A task noticed its cancel flag at a checkpoint.
	#[error("task cancelled")]
	Cancelled,

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Service(#[from] ServiceError),

	#[error("failed to apply changed documents: {0}")]
	Edit(#[from] EditError),

	#[error(transparent)]
	Reconcile(#[from] ReconcileError),
}

/// Result type for editor tool operations.
pub type Result<T> = std::result::Result<T, ToolsError>;
