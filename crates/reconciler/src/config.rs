use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-stream reconciler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ReconcilerConfig {
	/// Quiet period, in milliseconds, before a scheduled task may start.
	pub debounce_ms: u64,
}

impl ReconcilerConfig {
	const DEFAULT_DEBOUNCE_MS: u64 = 200;

	/// Default quiet period.
	pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(Self::DEFAULT_DEBOUNCE_MS);

	/// Creates a config with the given quiet period in milliseconds.
	pub const fn from_millis(debounce_ms: u64) -> Self {
		Self { debounce_ms }
	}

	/// Returns the quiet period.
	pub const fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

impl Default for ReconcilerConfig {
	fn default() -> Self {
		Self::from_millis(Self::DEFAULT_DEBOUNCE_MS)
	}
}
