use std::path::Path;

use crate::error::{LearnError, Result};
use crate::io;

/// Field delimiter of the chat export.
const DELIMITER: char = '"';

/// Index of the utterance among the quote-delimited fields.
const UTTERANCE_FIELD: usize = 7;

/// Extracts the utterance of one exported line.
///
/// Returns `None` when the line has fewer than eight quote-delimited fields.
pub fn parse_line(line: &str) -> Option<&str> {
	line.split(DELIMITER).nth(UTTERANCE_FIELD)
}

/// Imports chat exports matching `pattern` into `output`.
///
/// # Behavior
/// - Utterances are collected file by file, line by line
/// - Lines without an utterance field are skipped
/// - Files that cannot be read or decoded are logged and skipped
/// - If anything was collected, `output` is overwritten with the utterances
///   joined by newlines; otherwise `output` is left untouched
///
/// # Returns
/// The number of utterances written.
pub fn import_chat_logs<P: AsRef<Path>>(pattern: &str, output: P) -> Result<usize> {
	let mut utterances: Vec<String> = Vec::new();

	for path in io::list_matching(pattern)? {
		let content = match io::read_text(&path) {
			Ok(content) => content,
			Err(e @ (LearnError::Io { .. } | LearnError::Decode { .. })) => {
				tracing::warn!("skipping chat export: {}", e);
				continue;
			}
			Err(e) => return Err(e),
		};
		let mut skipped = 0usize;
		for line in content.lines() {
			match parse_line(line) {
				Some(utterance) => utterances.push(utterance.to_owned()),
				None => skipped += 1,
			}
		}
		if skipped > 0 {
			tracing::debug!("{}: skipped {} lines without utterance", path.display(), skipped);
		}
	}

	if utterances.is_empty() {
		return Ok(0);
	}

	io::write_text(&output, &utterances.join("\n"))?;
	tracing::info!(
		"imported {} chat utterances into {}",
		utterances.len(),
		output.as_ref().display()
	);
	Ok(utterances.len())
}
