use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn one analyser node into a usable surface form.
///
/// Raised per token by a [`Tokenizer`](crate::tokenize::Tokenizer); the
/// adapter decides, through its [`DecodePolicy`](crate::tokenize::DecodePolicy),
/// whether such a failure skips the token, skips the chunk, or aborts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
	#[error("token at byte {offset} is not valid text")]
	InvalidSurface { offset: usize },

	#[error("analyser failed: {0}")]
	Analyser(String),
}

/// Errors raised while building, persisting or sampling a model.
#[derive(Error, Debug)]
pub enum LearnError {
	#[error("i/o error on {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("{} is neither UTF-8 nor Shift-JIS", .path.display())]
	Decode { path: PathBuf },

	#[error("invalid file pattern: {0}")]
	Pattern(#[from] glob::PatternError),

	#[error("tokenizer error: {0}")]
	Tokenize(#[from] TokenizeError),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("malformed model artifact {}: {source}", .path.display())]
	Deserialization {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("invalid model: {0}")]
	InvalidModel(String),
}

impl LearnError {
	/// Wraps an `io::Error` with the path it happened on.
	pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
		LearnError::Io { path: path.into(), source }
	}
}

pub type Result<T> = std::result::Result<T, LearnError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = LearnError::Decode { path: PathBuf::from("text/a.txt") };
		assert!(err.to_string().contains("neither UTF-8 nor Shift-JIS"));
		assert!(err.to_string().contains("text/a.txt"));

		let err = LearnError::InvalidConfig("state_size must be >= 1".to_owned());
		assert!(err.to_string().contains("invalid configuration"));

		let err = LearnError::InvalidModel("state size mismatch".to_owned());
		assert!(err.to_string().contains("invalid model"));

		let err: LearnError = TokenizeError::InvalidSurface { offset: 3 }.into();
		assert!(err.to_string().contains("byte 3"));
	}

	#[test]
	fn test_from_serde_error() {
		let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
		if let Err(e) = bad {
			let err: LearnError = e.into();
			assert!(matches!(err, LearnError::Serialization(_)));
		}
	}
}
