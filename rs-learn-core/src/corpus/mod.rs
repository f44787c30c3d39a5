//! Corpus acquisition: chat export import and text file loading.

/// Line-oriented, quote-delimited chat export importer.
pub mod chat_log;

/// Text file discovery, decoding and cleaning.
pub mod loader;

pub use chat_log::import_chat_logs;
pub use loader::load_from_files;
