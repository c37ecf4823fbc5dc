//! Marked-document codec and partial-update engine for rules-manager
//!
//! Serializes merged rule lists into self-describing marked documents,
//! parses such documents back into raw per-source regions, and refreshes a
//! subset of regions in place while leaving everything else byte-for-byte
//! untouched. The codec is total: every operation produces some
//! well-formed document, degrading to full regeneration instead of
//! erroring.

pub mod generate;
pub mod marker;
pub mod parse;
pub mod update;

pub use generate::{GenerateOptions, UserRulesMarkers, generate_marked_file};
pub use marker::{GLOBAL_BEGIN, GLOBAL_END, USER_RULES_SOURCE};
pub use parse::{ParsedDocument, SourceBlock, parse_marked_file, supports_partial_update};
pub use update::{
    PartialUpdateOutcome, UpdateOptions, delete_source_block, partial_update, replace_source_block,
};
