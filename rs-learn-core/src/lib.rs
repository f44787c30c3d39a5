//! Markov-chain sentence generation from Japanese text corpora.
//!
//! This crate provides the full learn / speak cycle:
//! - Chat export import and corpus loading with encoding fallback and cleaning
//! - Tokenization into word- and sentence-delimited training text
//! - A word-level Markov chain with JSON persistence
//! - A bounded rejection sampler producing unspaced messages
//!
//! [`learner::Learner`] ties the pieces together.

/// Explicit paths and tuning knobs.
pub mod config;

/// Error types shared by all components.
pub mod error;

/// Chat export import and text corpus loading.
pub mod corpus;

/// Analyser seam and training-text adapter.
pub mod tokenize;

/// Markov chain and its states.
pub mod model;

/// On-disk model artifact.
pub mod store;

/// Bounded retry sampling.
pub mod sampler;

/// End-to-end pipeline and public entry points.
pub mod learner;

/// File discovery, decoding and writing.
///
/// Not exposed
pub(crate) mod io;

pub use config::Config;
pub use error::{LearnError, Result};
pub use learner::Learner;
