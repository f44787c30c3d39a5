//! Word-level Markov chain.
//!
//! - Fixed-order chain trained on newline-delimited sentences (`MarkovChain`)
//! - Internal per-context transition counts (`State`)

/// Word-level Markov chain: training, walking, sentence generation,
/// combination and JSON (de)serialization.
pub mod chain;

/// A single context and its weighted successors.
pub mod state;

pub use chain::{MarkovChain, Originality, SentenceOptions};
