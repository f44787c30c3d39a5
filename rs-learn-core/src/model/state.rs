use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

/// Represents a state in a word-level Markov chain.
///
/// A `State` corresponds to a fixed-length word context (`key`) and stores
/// all observed transitions from this context to the next word.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Predict the next word using weighted random sampling
/// - Merge with another state having the same key (combining chains)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct State {
	/// Context words, oldest first. Its length is the chain's state size.
	key: Vec<String>,
	/// Outgoing transitions indexed by the next word, in word order so that
	/// a given draw always picks the same successor.
	/// Example: { "歩いた" => 2, "走った" => 1 }
	transitions: BTreeMap<String, usize>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(key: Vec<String>) -> Self {
		Self { key, transitions: BTreeMap::new() }
	}

	pub fn key(&self) -> &[String] {
		&self.key
	}

	/// Observed successors and their counts.
	pub fn transitions(&self) -> &BTreeMap<String, usize> {
		&self.transitions
	}

	/// Records an occurrence of a transition toward `next_word`.
	pub fn add_transition(&mut self, next_word: &str) {
		*self.transitions.entry(next_word.to_owned()).or_insert(0) += 1;
	}

	/// Predicts the next word using weighted random sampling.
	///
	/// The probability of selecting a word is proportional to its
	/// occurrence count. Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total: usize = self.transitions.values().sum();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&str> = None;
		for (next_word, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_word.as_str());
			}
			r -= occurrence;
			fallback = Some(next_word.as_str());
		}

		fallback
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same context. Occurrence counts are summed.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err(format!("Key mismatch: {:?} vs {:?}", self.key, other.key));
		}

		for (next_word, occurrence) in &other.transitions {
			*self.transitions.entry(next_word.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn key(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	#[test]
	fn test_empty_state_predicts_nothing() {
		let state = State::new(key(&["猫", "が"]));
		assert_eq!(state.predict(&mut StdRng::seed_from_u64(1)), None);
	}

	#[test]
	fn test_single_transition_is_certain() {
		let mut state = State::new(key(&["猫", "が"]));
		state.add_transition("歩いた");
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..20 {
			assert_eq!(state.predict(&mut rng), Some("歩いた"));
		}
	}

	#[test]
	fn test_predict_follows_weights() {
		let mut state = State::new(key(&["a"]));
		for _ in 0..9 {
			state.add_transition("x");
		}
		state.add_transition("y");

		let mut rng = StdRng::seed_from_u64(42);
		let xs = (0..1000).filter(|_| state.predict(&mut rng) == Some("x")).count();
		assert!(xs > 800, "x drawn {xs} times out of 1000");
	}

	#[test]
	fn test_same_seed_same_prediction() {
		let build = || {
			let mut state = State::new(key(&["a"]));
			for word in ["abc", "def", "ghi", "jkl", "mno", "pqr", "stu", "vwx"] {
				state.add_transition(word);
			}
			state
		};
		let (a, b) = (build(), build());
		let mut rng_a = StdRng::seed_from_u64(42);
		let mut rng_b = StdRng::seed_from_u64(42);
		for _ in 0..50 {
			assert_eq!(a.predict(&mut rng_a), b.predict(&mut rng_b));
		}
	}

	#[test]
	fn test_merge_sums_counts() {
		let mut a = State::new(key(&["a"]));
		a.add_transition("x");
		let mut b = State::new(key(&["a"]));
		b.add_transition("x");
		b.add_transition("y");

		a.merge(&b).unwrap();
		assert_eq!(a.transitions().get("x"), Some(&2));
		assert_eq!(a.transitions().get("y"), Some(&1));
	}

	#[test]
	fn test_merge_key_mismatch() {
		let mut a = State::new(key(&["a"]));
		let b = State::new(key(&["b"]));
		assert!(a.merge(&b).is_err());
	}
}
