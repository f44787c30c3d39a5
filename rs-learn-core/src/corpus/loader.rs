use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::io;

/// Characters deleted outright from the corpus:
/// carriage return, ideographic space, en-dash, full-width vertical bar.
pub const NOISE_CHARS: [char; 4] = ['\r', '\u{3000}', '\u{2013}', '｜'];

/// Aozora Bunko annotations: ruby readings `《…》` and editorial notes `［＃…］`.
static ANNOTATIONS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
	[
		Regex::new(r"《.*?》").expect("valid ruby pattern"),
		Regex::new(r"［＃.*?］").expect("valid editorial pattern"),
	]
});

/// Reads and merges every file matching `pattern` into one raw corpus.
///
/// # Behavior
/// - Each file is decoded as UTF-8, falling back to Shift-JIS
/// - Each content is trimmed, then appended without separator
/// - The concatenation goes through [`clean`]
///
/// # Returns
/// The cleaned corpus, or an empty string when nothing matches.
///
/// # Errors
/// - `Pattern` if `pattern` is not a valid glob
/// - `Io` / `Decode` if a matching file cannot be read in either encoding
pub fn load_from_files(pattern: &str) -> Result<String> {
	let mut text = String::new();

	let files = io::list_matching(pattern)?;
	for path in &files {
		let content = io::read_text(path)?;
		tracing::debug!("loaded {} ({} chars)", path.display(), content.chars().count());
		text.push_str(content.trim());
	}

	let cleaned = clean(&text);
	tracing::info!("corpus loaded from {} files ({} chars)", files.len(), cleaned.chars().count());
	Ok(cleaned)
}

/// Removes noise characters, then annotation spans.
pub fn clean(text: &str) -> String {
	let mut cleaned: String = text.chars().filter(|c| !NOISE_CHARS.contains(c)).collect();
	for pattern in ANNOTATIONS.iter() {
		cleaned = pattern.replace_all(&cleaned, "").into_owned();
	}
	cleaned
}
