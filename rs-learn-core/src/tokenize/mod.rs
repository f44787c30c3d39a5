//! Tokenization layer.
//!
//! A morphological analyser is consumed through the [`Tokenizer`] trait as a
//! lazy sequence of [`Token`]s. The [`adapter`] turns that sequence into the
//! newline-delimited, space-delimited text the chain is trained on.

use crate::error::TokenizeError;

/// Turns analyser output into chain training text.
pub mod adapter;

/// Default offline tokenizer splitting on script changes.
pub mod script;

pub use adapter::split_for_chain;
pub use script::ScriptTokenizer;

/// Role of a node in the analyser output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// Sentinel opening a parsed chunk (empty surface).
	Begin,
	/// A morphological unit.
	Word,
	/// Sentinel closing a parsed chunk (empty surface).
	End,
}

/// One analyser node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub surface: String,
	pub kind: TokenKind,
}

impl Token {
	pub fn word<S: Into<String>>(surface: S) -> Self {
		Self { surface: surface.into(), kind: TokenKind::Word }
	}

	pub fn begin() -> Self {
		Self { surface: String::new(), kind: TokenKind::Begin }
	}

	pub fn end() -> Self {
		Self { surface: String::new(), kind: TokenKind::End }
	}
}

/// Lazy token sequence produced by a [`Tokenizer`].
pub type Tokens<'a> = Box<dyn Iterator<Item = Result<Token, TokenizeError>> + 'a>;

/// A morphological analyser.
///
/// Implementations yield the nodes of `text` in order, starting with a
/// [`TokenKind::Begin`] sentinel and ending with a [`TokenKind::End`] one.
/// A node whose surface cannot be produced is reported as an `Err` item;
/// iteration may continue after it.
pub trait Tokenizer {
	fn tokenize<'a>(&'a self, text: &'a str) -> Tokens<'a>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
	fn tokenize<'a>(&'a self, text: &'a str) -> Tokens<'a> {
		(**self).tokenize(text)
	}
}

/// What the adapter does when a token fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
	/// Drop the failing token and keep the rest of the chunk.
	SkipToken,
	/// Drop everything produced for the chunk and continue with the next one.
	#[default]
	SkipChunk,
	/// Stop and return the error.
	Abort,
}
