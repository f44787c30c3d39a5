use std::path::{Path, PathBuf};

use crate::error::{LearnError, Result};
use crate::model::chain::Originality;
use crate::tokenize::DecodePolicy;

/// Markov order used when none is given.
pub const DEFAULT_STATE_SIZE: usize = 2;

/// Soft character cap applied to sampled sentences.
pub const DEFAULT_MAX_CHARS: usize = 140;

/// Number of sampling attempts before giving up with an empty message.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Explicit configuration shared by every component.
///
/// All paths are resolved by the caller. Nothing here looks at the location
/// of the executable or of the current module.
///
/// # Layout
/// - `corpus_dir/*.txt`: corpus inputs
/// - `corpus_dir/*.csv`: chat exports
/// - `corpus_dir/discord.txt`: chat importer output
/// - `artifact_path`: trained model (JSON)
#[derive(Debug, Clone)]
pub struct Config {
	pub corpus_dir: PathBuf,
	pub artifact_path: PathBuf,

	/// Markov order (number of preceding words used as context).
	pub state_size: usize,

	/// Character cap passed to the chain for each sampled sentence.
	pub max_chars: usize,

	/// Sampling attempts before the sampler gives up.
	pub max_attempts: usize,

	pub decode_policy: DecodePolicy,

	/// When set, sampled sentences that copy too much of the corpus are rejected.
	pub originality: Option<Originality>,
}

impl Config {
	/// Builds a configuration rooted at `root`:
	/// `root/text` for the corpus and `root/learned_data.json` for the model.
	pub fn from_root<P: AsRef<Path>>(root: P) -> Self {
		let root = root.as_ref();
		Self {
			corpus_dir: root.join("text"),
			artifact_path: root.join("learned_data.json"),
			state_size: DEFAULT_STATE_SIZE,
			max_chars: DEFAULT_MAX_CHARS,
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			decode_policy: DecodePolicy::default(),
			originality: None,
		}
	}

	/// Checks the numeric settings.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `state_size` or `max_attempts` is zero.
	pub fn validate(&self) -> Result<()> {
		if self.state_size == 0 {
			return Err(LearnError::InvalidConfig("state_size must be >= 1".to_owned()));
		}
		if self.max_attempts == 0 {
			return Err(LearnError::InvalidConfig("max_attempts must be >= 1".to_owned()));
		}
		Ok(())
	}

	/// Glob matching the plain-text corpus files.
	pub fn text_pattern(&self) -> String {
		self.corpus_pattern("*.txt")
	}

	/// Glob matching the chat export files.
	pub fn chat_pattern(&self) -> String {
		self.corpus_pattern("*.csv")
	}

	/// File the chat importer writes its utterances to.
	pub fn chat_output(&self) -> PathBuf {
		self.corpus_dir.join("discord.txt")
	}

	fn corpus_pattern(&self, file_glob: &str) -> String {
		let dir = glob::Pattern::escape(&self.corpus_dir.to_string_lossy());
		format!("{}/{}", dir.trim_end_matches('/'), file_glob)
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::from_root(".")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_root_layout() {
		let config = Config::from_root("/srv/bot");
		assert_eq!(config.corpus_dir, PathBuf::from("/srv/bot/text"));
		assert_eq!(config.artifact_path, PathBuf::from("/srv/bot/learned_data.json"));
		assert_eq!(config.chat_output(), PathBuf::from("/srv/bot/text/discord.txt"));
		assert_eq!(config.text_pattern(), "/srv/bot/text/*.txt");
		assert_eq!(config.chat_pattern(), "/srv/bot/text/*.csv");
		assert_eq!(config.state_size, 2);
		assert_eq!(config.max_chars, 140);
		assert_eq!(config.max_attempts, 100);
		assert!(config.originality.is_none());
	}

	#[test]
	fn test_pattern_escapes_directory() {
		let mut config = Config::default();
		config.corpus_dir = PathBuf::from("data[1]");
		assert_eq!(config.text_pattern(), "data[[]1[]]/*.txt");
	}

	#[test]
	fn test_validate() {
		let mut config = Config::default();
		assert!(config.validate().is_ok());

		config.state_size = 0;
		assert!(matches!(config.validate(), Err(LearnError::InvalidConfig(_))));

		config.state_size = 2;
		config.max_attempts = 0;
		assert!(matches!(config.validate(), Err(LearnError::InvalidConfig(_))));
	}
}
