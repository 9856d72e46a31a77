use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::multigram_model::MAX_ORDER;

/// Settings used once, when the model is built from its corpus.
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```toml
/// max_order = 3
/// skip_prefix_lines = 282
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
	/// Longest history used by the backoff search (1..=MAX_ORDER).
	pub max_order: usize,

	/// Number of front-matter lines dropped from the corpus.
	pub skip_prefix_lines: usize,

	/// Keep `. , ! ? ;` as tokens instead of stripping them.
	pub keep_punctuation: bool,
}

impl ModelConfig {
	/// # Errors
	/// Returns `InvalidParameter` if `max_order` is outside `[1, MAX_ORDER]`.
	pub fn validate(&self) -> Result<()> {
		if !(1..=MAX_ORDER).contains(&self.max_order) {
			return Err(Error::InvalidParameter(format!(
				"max_order must be between 1 and {MAX_ORDER}, got {}",
				self.max_order
			)));
		}
		Ok(())
	}
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			max_order: 2,
			skip_prefix_lines: 0,
			keep_punctuation: true,
		}
	}
}
