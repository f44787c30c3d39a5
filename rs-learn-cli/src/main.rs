mod cli;

use anyhow::Context;
use clap::Parser;

use rs_learn_core::Learner;
use rs_learn_core::config::{Config, DEFAULT_MAX_CHARS};

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
	// Logs go to stderr so stdout only carries messages
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
				tracing_subscriber::EnvFilter::new("rs_learn=info,rs_learn_core=info")
			}),
		)
		.init();

	let cli = Cli::parse();
	let config = Config::from(&cli.global);
	let learner = Learner::new(config).context("invalid configuration")?;

	let model_path = learner.store().path().display().to_string();
	let default = Command::Message { max_chars: DEFAULT_MAX_CHARS, count: 1, retrain: false };

	match cli.command.unwrap_or(default) {
		Command::Message { max_chars, count, retrain } => {
			if retrain {
				learner.forget().with_context(|| format!("cannot remove model {model_path}"))?;
			}
			let messages = learner
				.get_messages(max_chars, count)
				.with_context(|| format!("cannot load model {model_path}"))?;
			for message in messages {
				println!("{message}");
			}
		}
		Command::Compile => {
			let state_size = learner.config().state_size;
			let chain = learner.compile_text(state_size).context("training failed")?;
			tracing::info!(
				"compiled {} sentences into {} ({} states)",
				chain.sentences().len(),
				learner.store().path().display(),
				chain.len()
			);
		}
		Command::Import => {
			let count = learner.import_chat_logs().context("chat import failed")?;
			tracing::info!("{} utterances imported", count);
		}
		Command::Merge { models } => {
			let chain = learner.merge_models(&models).context("merge failed")?;
			tracing::info!("{} now holds {} states", model_path, chain.len());
		}
	}

	Ok(())
}
