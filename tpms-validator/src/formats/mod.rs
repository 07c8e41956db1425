//! Record source formats
//!
//! This module contains the JSON-lines parser and the recursive file discovery
//! used for reference-decoder trees. The parser yields one `Result` per line so
//! a bad line never aborts a source.

pub mod discovery;
pub mod jsonl;

// Re-export parser types
pub use discovery::discover_json_files;
pub use jsonl::{JsonlParser, JsonlRecordIterator, ParsedLine};
