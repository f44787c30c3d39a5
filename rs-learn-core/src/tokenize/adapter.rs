use super::{DecodePolicy, Tokenizer};
use crate::error::Result;

/// Characters that corrupt the chain's line/word format; dropped from output.
pub const BREAKING_CHARS: [&str; 8] = ["(", ")", "[", "]", "\"", "'", "<", ">"];

/// Sentence terminator: ends the current training line and is not emitted.
pub const PERIOD: &str = "。";

/// Clause separator: emitted without a trailing word boundary.
pub const COMMA: &str = "、";

/// Converts a raw corpus into chain training text.
///
/// The corpus is cut on whitespace and every chunk is analysed on its own.
/// For each node of a chunk:
/// - a breaking character is dropped, but still closes the word with a space
/// - `。` closes the line with a newline and is not emitted
/// - `、` is emitted without a trailing space
/// - anything else is emitted followed by a space
///
/// # Errors
/// Only with [`DecodePolicy::Abort`], when a token fails to decode. The other
/// policies log the failure and carry on.
pub fn split_for_chain<T: Tokenizer>(
	text: &str,
	tokenizer: &T,
	policy: DecodePolicy,
) -> Result<String> {
	let mut splitted = String::new();
	let mut skipped_chunks = 0usize;

	for chunk in text.split_whitespace() {
		match split_chunk(chunk, tokenizer, policy) {
			Ok(Some(part)) => splitted.push_str(&part),
			Ok(None) => skipped_chunks += 1,
			Err(e) => return Err(e),
		}
	}

	if skipped_chunks > 0 {
		tracing::warn!("{} chunks skipped on decode errors", skipped_chunks);
	}
	Ok(splitted)
}

/// Processes one whitespace-delimited chunk.
///
/// Returns `Ok(None)` when the chunk is dropped under [`DecodePolicy::SkipChunk`].
fn split_chunk<T: Tokenizer>(
	chunk: &str,
	tokenizer: &T,
	policy: DecodePolicy,
) -> Result<Option<String>> {
	let mut part = String::new();

	for token in tokenizer.tokenize(chunk) {
		let token = match token {
			Ok(token) => token,
			Err(e) => match policy {
				DecodePolicy::SkipToken => {
					tracing::warn!("skipping token in {:?}: {}", chunk, e);
					continue;
				}
				DecodePolicy::SkipChunk => {
					tracing::warn!("skipping chunk {:?}: {}", chunk, e);
					return Ok(None);
				}
				DecodePolicy::Abort => return Err(e.into()),
			},
		};

		let surface = token.surface.as_str();
		if surface == PERIOD {
			part.push('\n');
			continue;
		}
		if !BREAKING_CHARS.contains(&surface) {
			part.push_str(surface);
		}
		if surface != COMMA {
			part.push(' ');
		}
	}

	Ok(Some(part))
}
