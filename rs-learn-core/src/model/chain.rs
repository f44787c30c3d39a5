use std::collections::HashMap;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::state::State;
use crate::error::{LearnError, Result};
use crate::sampler::SentenceSource;

/// Padding word opening every training sentence.
pub const BEGIN: &str = "___BEGIN__";

/// Word closing every training sentence.
pub const END: &str = "___END__";

/// Number of walks `make_sentence` attempts before giving up.
pub const DEFAULT_TRIES: usize = 10;

/// Lines are separated by a newline and any surrounding whitespace.
static SENTENCE_SPLIT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("valid sentence split"));

/// Sentences containing quotes or brackets cannot be represented.
static REJECT_SENTENCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"(^')|('$)|\s'|'\s|["()\[\]]"#).expect("valid reject pattern"));

/// Limits on how much of the training text a generated sentence may copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Originality {
	/// Longest copied run, as a fraction of the sentence's word count.
	pub max_overlap_ratio: f64,
	/// Longest copied run, in words.
	pub max_overlap_total: usize,
}

impl Default for Originality {
	fn default() -> Self {
		Self { max_overlap_ratio: 0.7, max_overlap_total: 15 }
	}
}

/// Generation settings of a single `make_sentence` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceOptions {
	pub tries: usize,
	pub originality: Option<Originality>,
}

impl Default for SentenceOptions {
	fn default() -> Self {
		Self { tries: DEFAULT_TRIES, originality: None }
	}
}

/// Word-level Markov chain trained on newline-delimited sentences.
///
/// # Responsibilities
/// - Count context → next-word transitions over every training line
/// - Walk the chain from the begin context to the end word
/// - Produce whole sentences, optionally bounded in length and originality
/// - Round-trip through a JSON document
///
/// # Invariants
/// - `state_size >= 1`
/// - Every state key holds exactly `state_size` words
/// - Every training line contributes one transition into `END`
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(try_from = "ChainDocument", into = "ChainDocument")]
pub struct MarkovChain {
	state_size: usize,
	states: HashMap<Vec<String>, State>,
	parsed_sentences: Vec<Vec<String>>,
	/// Training sentences rejoined, for the originality test.
	rejoined_text: String,
}

/// On-disk layout of a [`MarkovChain`].
#[derive(Serialize, Deserialize)]
struct ChainDocument {
	state_size: usize,
	chain: Vec<State>,
	parsed_sentences: Vec<Vec<String>>,
}

impl MarkovChain {
	/// Creates an empty chain of the given order.
	///
	/// # Errors
	/// Returns `InvalidModel` if `state_size` is 0.
	pub fn new(state_size: usize) -> Result<Self> {
		if state_size == 0 {
			return Err(LearnError::InvalidModel("state_size must be >= 1".to_owned()));
		}
		Ok(Self {
			state_size,
			states: HashMap::new(),
			parsed_sentences: Vec::new(),
			rejoined_text: String::new(),
		})
	}

	/// Trains a chain on newline-delimited, space-delimited text.
	///
	/// Each non-empty line is one sentence. Lines holding a double quote,
	/// a bracket, or a single quote at a word edge are skipped.
	pub fn from_newline_text(text: &str, state_size: usize) -> Result<Self> {
		let mut chain = Self::new(state_size)?;
		let mut rejected = 0usize;

		for sentence in SENTENCE_SPLIT.split(text) {
			if sentence.trim().is_empty() {
				continue;
			}
			if REJECT_SENTENCE.is_match(sentence) {
				rejected += 1;
				continue;
			}
			let words: Vec<String> = sentence.split_whitespace().map(str::to_owned).collect();
			chain.add_sentence(&words);
			chain.parsed_sentences.push(words);
		}
		chain.rejoin();

		if rejected > 0 {
			tracing::debug!("{} training lines rejected", rejected);
		}
		tracing::info!(
			"chain trained: {} sentences, {} states, order {}",
			chain.parsed_sentences.len(),
			chain.states.len(),
			state_size
		);
		Ok(chain)
	}

	pub fn state_size(&self) -> usize {
		self.state_size
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Training sentences, as word lists.
	pub fn sentences(&self) -> &[Vec<String>] {
		&self.parsed_sentences
	}

	/// Looks up the state for a context.
	pub fn state(&self, key: &[String]) -> Option<&State> {
		self.states.get(key)
	}

	/// Context every walk starts from.
	fn begin_key(&self) -> Vec<String> {
		vec![BEGIN.to_owned(); self.state_size]
	}

	/// Counts the transitions of one sentence.
	fn add_sentence(&mut self, words: &[String]) {
		let mut items = self.begin_key();
		items.extend(words.iter().cloned());
		items.push(END.to_owned());

		for window in items.windows(self.state_size + 1) {
			let (key, follow) = window.split_at(self.state_size);
			self.states
				.entry(key.to_vec())
				.or_insert_with(|| State::new(key.to_vec()))
				.add_transition(&follow[0]);
		}
	}

	fn rejoin(&mut self) {
		self.rejoined_text = self
			.parsed_sentences
			.iter()
			.map(|words| words.join(" "))
			.collect::<Vec<_>>()
			.join(" ");
	}

	/// Walks the chain from the begin context until the end word.
	///
	/// Returns the visited words; empty if the chain was never trained.
	pub fn walk<R: Rng>(&self, rng: &mut R) -> Vec<String> {
		let mut key = self.begin_key();
		let mut words = Vec::new();

		while let Some(next) = self.states.get(&key).and_then(|state| state.predict(rng)) {
			if next == END {
				break;
			}
			words.push(next.to_owned());
			key.remove(0);
			key.push(next.to_owned());
		}

		words
	}

	/// Whether `words` copies no run longer than the originality limit
	/// from the training text.
	fn is_original(&self, words: &[String], originality: &Originality) -> bool {
		let by_ratio =
			(originality.max_overlap_ratio * words.len() as f64).round_ties_even() as usize;
		let overlap_max = originality.max_overlap_total.min(by_ratio);
		let overlap_over = overlap_max + 1;
		let gram_count = words.len().saturating_sub(overlap_max).max(1);

		(0..gram_count).all(|i| {
			let end = (i + overlap_over).min(words.len());
			!self.rejoined_text.contains(&words[i..end].join(" "))
		})
	}

	/// Generates one sentence, retrying up to `options.tries` walks.
	///
	/// Without an originality limit the first non-empty walk is returned.
	/// Returns `None` if every walk is empty or rejected.
	pub fn make_sentence<R: Rng>(&self, rng: &mut R, options: &SentenceOptions) -> Option<String> {
		for _ in 0..options.tries {
			let words = self.walk(rng);
			if words.is_empty() {
				continue;
			}
			if let Some(originality) = &options.originality {
				if !self.parsed_sentences.is_empty() && !self.is_original(&words, originality) {
					continue;
				}
			}
			return Some(words.join(" "));
		}
		None
	}

	/// Merges another chain of the same order into this one.
	///
	/// # Errors
	/// Returns `InvalidModel` if the orders differ.
	pub fn combine(&mut self, other: &Self) -> Result<()> {
		if self.state_size != other.state_size {
			return Err(LearnError::InvalidModel(format!(
				"state size mismatch: {} vs {}",
				self.state_size, other.state_size
			)));
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state).map_err(LearnError::InvalidModel)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		self.parsed_sentences.extend(other.parsed_sentences.iter().cloned());
		self.rejoin();
		Ok(())
	}

	/// Serializes the chain to its JSON document.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Rebuilds a chain from its JSON document.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

impl SentenceSource for MarkovChain {
	/// Generates a sentence of at most `max_chars` characters (spaces included),
	/// retrying up to `options.tries` times.
	fn make_short_sentence<R: Rng>(
		&self,
		max_chars: usize,
		options: &SentenceOptions,
		rng: &mut R,
	) -> Option<String> {
		for _ in 0..options.tries {
			if let Some(sentence) = self.make_sentence(rng, options) {
				if sentence.chars().count() <= max_chars {
					return Some(sentence);
				}
			}
		}
		None
	}
}

/// Two chains are equal when their order and transition tables are.
impl PartialEq for MarkovChain {
	fn eq(&self, other: &Self) -> bool {
		self.state_size == other.state_size && self.states == other.states
	}
}

impl From<MarkovChain> for ChainDocument {
	fn from(chain: MarkovChain) -> Self {
		let mut states: Vec<State> = chain.states.into_values().collect();
		states.sort_by(|a, b| a.key().cmp(b.key()));
		Self {
			state_size: chain.state_size,
			chain: states,
			parsed_sentences: chain.parsed_sentences,
		}
	}
}

impl TryFrom<ChainDocument> for MarkovChain {
	type Error = String;

	fn try_from(document: ChainDocument) -> std::result::Result<Self, Self::Error> {
		if document.state_size == 0 {
			return Err("state_size must be >= 1".to_owned());
		}

		let mut states = HashMap::with_capacity(document.chain.len());
		for state in document.chain {
			if state.key().len() != document.state_size {
				return Err(format!(
					"state {:?} does not match state_size {}",
					state.key(),
					document.state_size
				));
			}
			if states.insert(state.key().to_vec(), state).is_some() {
				return Err("duplicate state in chain".to_owned());
			}
		}

		let mut chain = Self {
			state_size: document.state_size,
			states,
			parsed_sentences: document.parsed_sentences,
			rejoined_text: String::new(),
		};
		chain.rejoin();
		Ok(chain)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const TWO_LINES: &str = "猫 が 歩いた\n犬 も 歩いた\n";

	fn key(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	#[test]
	fn test_zero_state_size_rejected() {
		assert!(matches!(MarkovChain::new(0), Err(LearnError::InvalidModel(_))));
		assert!(MarkovChain::from_newline_text(TWO_LINES, 0).is_err());
	}

	#[test]
	fn test_transitions_with_begin_and_end() {
		let chain = MarkovChain::from_newline_text(TWO_LINES, 2).unwrap();

		let begin = chain.state(&key(&[BEGIN, BEGIN])).unwrap();
		assert_eq!(begin.transitions().get("猫"), Some(&1));
		assert_eq!(begin.transitions().get("犬"), Some(&1));

		let cat = chain.state(&key(&[BEGIN, "猫"])).unwrap();
		assert_eq!(cat.transitions().get("が"), Some(&1));

		let end = chain.state(&key(&["が", "歩いた"])).unwrap();
		assert_eq!(end.transitions().get(END), Some(&1));

		assert_eq!(chain.sentences().len(), 2);
		// 2 begin contexts shared + 3 per line
		assert_eq!(chain.len(), 1 + 2 * 3);
	}

	#[test]
	fn test_blank_and_unrepresentable_lines_skipped() {
		let text = "\n  \n猫 が (歩いた)\n犬 \"も\"\n犬 も 歩いた \n it's fine\n 'quoted\n";
		let chain = MarkovChain::from_newline_text(text, 2).unwrap();
		assert_eq!(chain.sentences(), &[key(&["犬", "も", "歩いた"]), key(&["it's", "fine"])]);
	}

	#[test]
	fn test_walk_reproduces_lines_without_shared_context() {
		let chain = MarkovChain::from_newline_text(TWO_LINES, 2).unwrap();
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..50 {
			let words = chain.walk(&mut rng);
			assert!(
				words == key(&["猫", "が", "歩いた"]) || words == key(&["犬", "も", "歩いた"]),
				"{words:?}"
			);
		}
	}

	#[test]
	fn test_walk_on_empty_chain() {
		let chain = MarkovChain::new(2).unwrap();
		assert!(chain.walk(&mut StdRng::seed_from_u64(0)).is_empty());
		let options = SentenceOptions::default();
		assert_eq!(chain.make_sentence(&mut StdRng::seed_from_u64(0), &options), None);
	}

	#[test]
	fn test_short_sentence_respects_bound() {
		let chain = MarkovChain::from_newline_text("あ\nい う え お か き く け こ\n", 1).unwrap();
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..50 {
			if let Some(s) = chain.make_short_sentence(3, &SentenceOptions::default(), &mut rng) {
				assert!(s.chars().count() <= 3, "{s}");
			}
		}
	}

	#[test]
	fn test_short_sentence_unsatisfiable() {
		let chain = MarkovChain::from_newline_text("とても 長い 文 です\n", 2).unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		assert_eq!(chain.make_short_sentence(3, &SentenceOptions::default(), &mut rng), None);
	}

	#[test]
	fn test_originality_rejects_copies() {
		let chain = MarkovChain::from_newline_text(TWO_LINES, 2).unwrap();
		let options = SentenceOptions { tries: 10, originality: Some(Originality::default()) };
		let mut rng = StdRng::seed_from_u64(9);
		assert_eq!(chain.make_sentence(&mut rng, &options), None);
	}

	#[test]
	fn test_originality_accepts_new_combination() {
		let chain = MarkovChain::from_newline_text("a b c d e f\nx c d y\n", 1).unwrap();
		let words = key(&["a", "b", "c", "y"]);
		let originality = Originality { max_overlap_ratio: 0.7, max_overlap_total: 3 };
		assert!(chain.is_original(&words, &originality));
		assert!(!chain.is_original(&key(&["a", "b", "c", "d", "e", "f"]), &originality));
	}

	#[test]
	fn test_json_round_trip_preserves_table() {
		let chain = MarkovChain::from_newline_text(TWO_LINES, 2).unwrap();
		let json = chain.to_json().unwrap();

		let value: serde_json::Value = serde_json::from_str(&json).unwrap();
		assert_eq!(value["state_size"], 2);
		assert!(value["chain"].is_array());
		assert_eq!(value["parsed_sentences"].as_array().unwrap().len(), 2);

		let restored = MarkovChain::from_json(&json).unwrap();
		assert_eq!(restored, chain);
		assert_eq!(restored.sentences(), chain.sentences());
	}

	#[test]
	fn test_json_rejects_inconsistent_state() {
		let json = r#"{
			"state_size": 2,
			"chain": [{"key": ["a"], "transitions": {"b": 1}}],
			"parsed_sentences": []
		}"#;
		assert!(matches!(MarkovChain::from_json(json), Err(LearnError::Serialization(_))));
	}

	#[test]
	fn test_combine() {
		let mut a = MarkovChain::from_newline_text("猫 が 歩いた\n", 2).unwrap();
		let b = MarkovChain::from_newline_text("猫 が 走った\n", 2).unwrap();
		a.combine(&b).unwrap();

		let state = a.state(&key(&[BEGIN, "猫"])).unwrap();
		assert_eq!(state.transitions().get("が"), Some(&2));
		let state = a.state(&key(&["猫", "が"])).unwrap();
		assert_eq!(state.transitions().len(), 2);
		assert_eq!(a.sentences().len(), 2);

		let c = MarkovChain::from_newline_text("猫 が 走った\n", 1).unwrap();
		assert!(matches!(a.combine(&c), Err(LearnError::InvalidModel(_))));
	}
}
