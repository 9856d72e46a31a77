use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a corpus or serving a generation request.
#[derive(Debug, Error)]
pub enum Error {
	/// The corpus file could not be opened or read as UTF-8.
	///
	/// Fatal at load time: no model is constructed.
	#[error("failed to load corpus {}: {source}", .path.display())]
	CorpusLoad {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The corpus produced no token after cleaning.
	#[error("corpus contains no token")]
	EmptyCorpus,

	/// A parameter was rejected at the component boundary.
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	/// Every token of the seed phrase is missing from the vocabulary
	/// and the policy asks to fail.
	#[error("seed phrase '{0}' has no token in the vocabulary")]
	UnseenSeed(String),
}

/// Result type for every fallible core operation.
pub type Result<T> = std::result::Result<T, Error>;
