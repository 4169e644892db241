//! Per-stream debounce settings for the editor tools.

use std::path::Path;

use serde::{Deserialize, Serialize};
use weft_reconciler::ReconcilerConfig;

use crate::error::ConfigError;

/// Debounce settings of the three editor tool streams.
///
/// ```toml
/// [occurrences]
/// debounce-ms = 200
///
/// [details]
/// debounce-ms = 800
/// ```
///
/// A missing section takes its stream default. A section that is present but
/// empty takes [`ReconcilerConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ToolsConfig {
	/// Occurrence highlighting after cursor moves.
	pub occurrences: ReconcilerConfig,
	/// Detail value edits and document pushes.
	pub details: ReconcilerConfig,
	/// Outline refreshes after document edits.
	pub outline: ReconcilerConfig,
}

impl Default for ToolsConfig {
	fn default() -> Self {
		Self {
			occurrences: ReconcilerConfig::from_millis(200),
			details: ReconcilerConfig::from_millis(800),
			outline: ReconcilerConfig::from_millis(500),
		}
	}
}

impl ToolsConfig {
	/// Parses a config from TOML text.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), ?config, "editor_tools.config.loaded");
		Ok(config)
	}
}
