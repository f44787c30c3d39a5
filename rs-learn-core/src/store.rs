use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LearnError, Result};
use crate::io;
use crate::model::chain::MarkovChain;

/// JSON artifact holding a trained chain, used as a training cache.
///
/// # Notes
/// - Single writer, single reader; no locking
/// - The artifact is never checked against the corpus: delete it (or
///   retrain) after the corpus changes
#[derive(Debug, Clone)]
pub struct ModelStore {
	path: PathBuf,
}

impl ModelStore {
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn exists(&self) -> bool {
		self.path.is_file()
	}

	/// Writes the chain, replacing any previous artifact.
	pub fn save(&self, chain: &MarkovChain) -> Result<()> {
		let json = chain.to_json()?;
		io::write_text(&self.path, &json)?;
		tracing::info!("model saved to {} ({} bytes)", self.path.display(), json.len());
		Ok(())
	}

	/// Reads the artifact.
	///
	/// # Errors
	/// - `Io` if the artifact is missing or unreadable
	/// - `Deserialization` if it is not a valid chain document
	pub fn read(&self) -> Result<MarkovChain> {
		let json = fs::read_to_string(&self.path).map_err(|e| LearnError::io(&self.path, e))?;
		serde_json::from_str(&json)
			.map_err(|source| LearnError::Deserialization { path: self.path.clone(), source })
	}

	/// Reads the artifact, running `train` and saving its result first when
	/// the artifact does not exist yet.
	///
	/// A malformed existing artifact is an error; `train` is not invoked.
	pub fn load_or_train<F>(&self, train: F) -> Result<MarkovChain>
	where
		F: FnOnce() -> Result<MarkovChain>,
	{
		if !self.exists() {
			tracing::info!("no model at {}, training", self.path.display());
			let chain = train()?;
			self.save(&chain)?;
		}
		self.read()
	}

	/// Deletes the artifact. Returns whether one existed.
	pub fn remove(&self) -> Result<bool> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(true),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
			Err(e) => Err(LearnError::io(&self.path, e)),
		}
	}
}
