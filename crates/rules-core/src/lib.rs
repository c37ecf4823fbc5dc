//! Rule model, indexing, merge policy, and protection for rules-manager
//!
//! This crate is the synchronous, I/O-free heart of the workspace: it owns
//! the [`Rule`] value type, the duplicate-id conflict machinery, the
//! ordering/de-duplication policy shared by every output adapter, and the
//! identifier-namespace protection that tells generated content apart from
//! user-owned content.

pub mod config;
pub mod error;
pub mod index;
pub mod protect;
pub mod rule;
pub mod selection;
pub mod sort;
pub mod validate;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use index::{Conflict, ConflictKind, MergeStrategy, RuleIndex};
pub use protect::{
    PrefixRange, ProtectionConfig, extract_id_from_filename, merge_rule_lists, numeric_prefix,
};
pub use rule::{Metadata, Priority, Rule};
pub use selection::SelectionState;
pub use sort::{SortBy, SortConfig, SortOrder, merge_with_user_rules, sort_rules};
pub use validate::{ValidationIssue, validate_rules};
