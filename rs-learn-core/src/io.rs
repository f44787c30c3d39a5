use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::SHIFT_JIS;

use crate::error::{LearnError, Result};

/// Lists the files matching a glob pattern, in enumeration order.
///
/// - Entries that cannot be read while walking are skipped with a warning
/// - Directories are ignored
/// - No match is not an error (empty list)
pub(crate) fn list_matching(pattern: &str) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in glob::glob(pattern)? {
		match entry {
			Ok(path) if path.is_file() => files.push(path),
			Ok(_) => (),
			Err(e) => tracing::warn!("skipping unreadable entry {}: {}", e.path().display(), e),
		}
	}

	Ok(files)
}

/// Decodes raw file bytes.
///
/// UTF-8 is tried first, then Shift-JIS. Returns `None` when the bytes are
/// valid in neither encoding.
pub(crate) fn decode(bytes: &[u8]) -> Option<String> {
	if let Ok(text) = std::str::from_utf8(bytes) {
		return Some(text.to_owned());
	}
	SHIFT_JIS
		.decode_without_bom_handling_and_without_replacement(bytes)
		.map(|text| text.into_owned())
}

/// Reads a text file under the UTF-8 / Shift-JIS fallback policy.
///
/// # Errors
/// - `Io` if the file cannot be read
/// - `Decode` if the content is valid in neither encoding
pub(crate) fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
	let path = path.as_ref();
	let bytes = fs::read(path).map_err(|e| LearnError::io(path, e))?;
	decode(&bytes).ok_or_else(|| LearnError::Decode { path: path.to_owned() })
}

/// Writes `contents` to `path`, creating parent directories and replacing
/// any previous content.
pub(crate) fn write_text<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
	let path = path.as_ref();
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| LearnError::io(parent, e))?;
	}
	fs::write(path, contents).map_err(|e| LearnError::io(path, e))
}
