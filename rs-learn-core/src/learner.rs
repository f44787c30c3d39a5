use std::path::Path;

use rand::Rng;

use crate::config::Config;
use crate::corpus;
use crate::error::Result;
use crate::model::chain::{MarkovChain, SentenceOptions};
use crate::sampler::Sampler;
use crate::store::ModelStore;
use crate::tokenize::{self, ScriptTokenizer, Tokenizer};

/// End-to-end pipeline: import, load, tokenize, train, persist, sample.
///
/// # Responsibilities
/// - `compile_text`: always retrain from the corpus and overwrite the artifact
/// - `get_message`: load the artifact (training first if it is missing) and
///   sample one message
#[derive(Debug)]
pub struct Learner<T: Tokenizer = ScriptTokenizer> {
	config: Config,
	tokenizer: T,
	store: ModelStore,
}

impl Learner<ScriptTokenizer> {
	/// Creates a learner using the built-in [`ScriptTokenizer`].
	pub fn new(config: Config) -> Result<Self> {
		Self::with_tokenizer(config, ScriptTokenizer)
	}
}

impl<T: Tokenizer> Learner<T> {
	/// Creates a learner around a custom analyser.
	///
	/// # Errors
	/// Returns `InvalidConfig` if the configuration does not validate.
	pub fn with_tokenizer(config: Config, tokenizer: T) -> Result<Self> {
		config.validate()?;
		let store = ModelStore::new(config.artifact_path.clone());
		Ok(Self { config, tokenizer, store })
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn tokenizer(&self) -> &T {
		&self.tokenizer
	}

	pub fn store(&self) -> &ModelStore {
		&self.store
	}

	/// Imports chat exports into the corpus directory.
	///
	/// Returns the number of utterances written.
	pub fn import_chat_logs(&self) -> Result<usize> {
		corpus::import_chat_logs(&self.config.chat_pattern(), self.config.chat_output())
	}

	/// Runs import, load, tokenization and training, without saving.
	pub fn train(&self, state_size: usize) -> Result<MarkovChain> {
		self.import_chat_logs()?;
		let raw = corpus::load_from_files(&self.config.text_pattern())?;
		let splitted = tokenize::split_for_chain(&raw, &self.tokenizer, self.config.decode_policy)?;
		MarkovChain::from_newline_text(&splitted, state_size)
	}

	/// Retrains from the corpus and overwrites the artifact.
	pub fn compile_text(&self, state_size: usize) -> Result<MarkovChain> {
		let chain = self.train(state_size)?;
		self.store.save(&chain)?;
		Ok(chain)
	}

	/// Reads the artifact, training with the configured order if it is missing.
	pub fn load(&self) -> Result<MarkovChain> {
		self.store.load_or_train(|| self.train(self.config.state_size))
	}

	/// Deletes the artifact so the next load trains again.
	///
	/// Returns whether an artifact existed.
	pub fn forget(&self) -> Result<bool> {
		let removed = self.store.remove()?;
		if removed {
			tracing::info!("model {} removed", self.store.path().display());
		}
		Ok(removed)
	}

	/// Merges the chains stored at `others` into the model and saves it.
	///
	/// The model is loaded (or trained) first. All chains must share its order.
	pub fn merge_models<P: AsRef<Path>>(&self, others: &[P]) -> Result<MarkovChain> {
		let mut chain = self.load()?;
		for other in others {
			chain.combine(&ModelStore::new(other.as_ref()).read()?)?;
		}
		self.store.save(&chain)?;
		Ok(chain)
	}

	/// Samples one message of at most `max_chars` characters.
	///
	/// Returns an empty string when no sentence fits after the configured
	/// number of attempts.
	pub fn get_message(&self, max_chars: usize) -> Result<String> {
		self.get_message_with(max_chars, &mut rand::rng())
	}

	/// [`get_message`](Self::get_message) with a caller-provided generator.
	pub fn get_message_with<R: Rng>(&self, max_chars: usize, rng: &mut R) -> Result<String> {
		let chain = self.load()?;
		Ok(self.sampler().message(&chain, max_chars, rng))
	}

	/// Samples `count` messages from a single load of the artifact.
	pub fn get_messages(&self, max_chars: usize, count: usize) -> Result<Vec<String>> {
		self.get_messages_with(max_chars, count, &mut rand::rng())
	}

	/// [`get_messages`](Self::get_messages) with a caller-provided generator.
	pub fn get_messages_with<R: Rng>(
		&self,
		max_chars: usize,
		count: usize,
		rng: &mut R,
	) -> Result<Vec<String>> {
		let chain = self.load()?;
		let sampler = self.sampler();
		Ok((0..count).map(|_| sampler.message(&chain, max_chars, &mut *rng)).collect())
	}

	fn sampler(&self) -> Sampler {
		let options =
			SentenceOptions { originality: self.config.originality, ..SentenceOptions::default() };
		Sampler::new(self.config.max_attempts, options)
	}
}
