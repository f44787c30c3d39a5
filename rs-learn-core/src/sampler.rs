use rand::Rng;

use crate::config::DEFAULT_MAX_ATTEMPTS;
use crate::model::chain::SentenceOptions;

/// Anything able to propose a length-bounded sentence.
///
/// Proposals are space-delimited words; `None` means no acceptable
/// sentence was found for this call.
pub trait SentenceSource {
	fn make_short_sentence<R: Rng>(
		&self,
		max_chars: usize,
		options: &SentenceOptions,
		rng: &mut R,
	) -> Option<String>;
}

/// Bounded rejection sampler producing display-ready messages.
///
/// # Behavior
/// - Asks the source for a sentence at most `max_attempts` times
/// - Stops at the first non-empty proposal
/// - Removes the spaces between words, since the output language is unspaced
#[derive(Debug, Clone)]
pub struct Sampler {
	max_attempts: usize,
	options: SentenceOptions,
}

impl Sampler {
	pub fn new(max_attempts: usize, options: SentenceOptions) -> Self {
		Self { max_attempts, options }
	}

	pub fn max_attempts(&self) -> usize {
		self.max_attempts
	}

	/// Draws one message, or `None` once every attempt came back empty.
	pub fn generate<S, R>(&self, source: &S, max_chars: usize, rng: &mut R) -> Option<String>
	where
		S: SentenceSource,
		R: Rng,
	{
		for attempt in 1..=self.max_attempts {
			let sentence = source.make_short_sentence(max_chars, &self.options, rng);
			if let Some(sentence) = sentence.filter(|s| !s.is_empty()) {
				tracing::debug!("sentence found after {} attempts", attempt);
				return Some(unspace(&sentence));
			}
		}

		tracing::debug!(
			"no sentence within {} chars after {} attempts",
			max_chars,
			self.max_attempts
		);
		None
	}

	/// Like [`generate`](Self::generate), giving up with an empty string.
	pub fn message<S, R>(&self, source: &S, max_chars: usize, rng: &mut R) -> String
	where
		S: SentenceSource,
		R: Rng,
	{
		self.generate(source, max_chars, rng).unwrap_or_default()
	}
}

impl Default for Sampler {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_ATTEMPTS, SentenceOptions::default())
	}
}

/// Joins the words of a sentence without separators.
pub fn unspace(sentence: &str) -> String {
	sentence.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	/// Returns a fixed answer once `succeed_at` calls have been made.
	struct ScriptedSource {
		calls: Cell<usize>,
		succeed_at: Option<usize>,
		answer: &'static str,
	}

	impl ScriptedSource {
		fn never() -> Self {
			Self { calls: Cell::new(0), succeed_at: None, answer: "" }
		}

		fn at(call: usize, answer: &'static str) -> Self {
			Self { calls: Cell::new(0), succeed_at: Some(call), answer }
		}
	}

	impl SentenceSource for ScriptedSource {
		fn make_short_sentence<R: Rng>(
			&self,
			_max_chars: usize,
			_options: &SentenceOptions,
			_rng: &mut R,
		) -> Option<String> {
			self.calls.set(self.calls.get() + 1);
			match self.succeed_at {
				Some(n) if self.calls.get() >= n => Some(self.answer.to_owned()),
				_ => None,
			}
		}
	}

	#[test]
	fn test_unspace() {
		assert_eq!(unspace("猫 が 、歩 いた"), "猫が、歩いた");
		assert_eq!(unspace(""), "");
	}

	#[test]
	fn test_gives_up_after_max_attempts() {
		let sampler = Sampler::default();
		let mut rng = StdRng::seed_from_u64(0);
		for _ in 0..100 {
			let source = ScriptedSource::never();
			assert_eq!(sampler.message(&source, 5, &mut rng), "");
			assert_eq!(source.calls.get(), 100);
		}
	}

	#[test]
	fn test_stops_at_first_sentence() {
		let sampler = Sampler::default();
		let source = ScriptedSource::at(3, "猫 が 歩いた");
		let message = sampler.generate(&source, 140, &mut StdRng::seed_from_u64(0));
		assert_eq!(message.as_deref(), Some("猫が歩いた"));
		assert_eq!(source.calls.get(), 3);
	}

	#[test]
	fn test_success_after_limit_is_not_reached() {
		let sampler = Sampler::new(2, SentenceOptions::default());
		let source = ScriptedSource::at(3, "猫");
		assert_eq!(sampler.generate(&source, 140, &mut StdRng::seed_from_u64(0)), None);
		assert_eq!(source.calls.get(), 2);
	}

	#[test]
	fn test_empty_proposal_is_retried() {
		let sampler = Sampler::new(4, SentenceOptions::default());
		let source = ScriptedSource::at(1, "");
		assert_eq!(sampler.generate(&source, 140, &mut StdRng::seed_from_u64(0)), None);
		assert_eq!(source.calls.get(), 4);
	}
}
