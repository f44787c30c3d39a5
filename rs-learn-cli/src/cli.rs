use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rs_learn_core::config::{Config, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_CHARS, DEFAULT_STATE_SIZE};
use rs_learn_core::model::Originality;
use rs_learn_core::tokenize::DecodePolicy;

/// Learns a Markov chain from a text corpus and prints generated messages.
#[derive(Parser, Debug)]
#[command(name = "rs-learn", version, about)]
pub struct Cli {
	#[command(flatten)]
	pub global: GlobalArgs,

	/// Defaults to printing one message
	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
	/// Directory holding `text/` and `learned_data.json`
	#[arg(long, global = true, default_value = ".")]
	pub root: PathBuf,

	/// Corpus directory (defaults to `<root>/text`)
	#[arg(long, global = true)]
	pub corpus_dir: Option<PathBuf>,

	/// Model artifact (defaults to `<root>/learned_data.json`)
	#[arg(long, global = true)]
	pub artifact: Option<PathBuf>,

	/// Markov order used when the model is trained on demand
	#[arg(long, global = true, default_value_t = DEFAULT_STATE_SIZE)]
	pub state: usize,

	/// Sampling attempts before giving up with an empty message
	#[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
	pub attempts: usize,

	/// Reject sentences copying long runs of the corpus
	#[arg(long, global = true)]
	pub original_only: bool,

	/// What to do with a chunk the tokenizer fails on
	#[arg(long, global = true, value_enum, default_value_t = OnDecodeError::SkipChunk)]
	pub on_decode_error: OnDecodeError,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print generated messages, training first if no model exists
	Message {
		/// Character cap of each message
		#[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
		max_chars: usize,

		/// Number of messages
		#[arg(long, default_value_t = 1)]
		count: usize,

		/// Delete the model first so it is trained again
		#[arg(long)]
		retrain: bool,
	},

	/// Retrain from the corpus and overwrite the model
	Compile,

	/// Only import chat exports into the corpus directory
	Import,

	/// Merge other saved models of the same order into the model
	Merge {
		#[arg(required = true)]
		models: Vec<PathBuf>,
	},
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OnDecodeError {
	SkipToken,
	SkipChunk,
	Abort,
}

impl From<OnDecodeError> for DecodePolicy {
	fn from(value: OnDecodeError) -> Self {
		match value {
			OnDecodeError::SkipToken => DecodePolicy::SkipToken,
			OnDecodeError::SkipChunk => DecodePolicy::SkipChunk,
			OnDecodeError::Abort => DecodePolicy::Abort,
		}
	}
}

impl From<&GlobalArgs> for Config {
	fn from(args: &GlobalArgs) -> Self {
		let mut config = Config::from_root(&args.root);
		if let Some(dir) = &args.corpus_dir {
			config.corpus_dir = dir.clone();
		}
		if let Some(artifact) = &args.artifact {
			config.artifact_path = artifact.clone();
		}
		config.state_size = args.state;
		config.max_attempts = args.attempts;
		config.decode_policy = args.on_decode_error.into();
		config.originality = args.original_only.then(Originality::default);
		config
	}
}
