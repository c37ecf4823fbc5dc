//! Protection classifier: decides which rules and files are user-owned
//! and therefore exempt from automatic deletion or overwrite.
//!
//! Ownership is encoded in the identifier namespace: ids carrying a
//! numeric prefix inside the configured range (e.g. `85000-custom` with a
//! range of 80000..=99999) belong to the user. Ids without a numeric
//! prefix are never classified as protected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rule::Rule;

/// Inclusive numeric-prefix interval designating user-owned identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRange {
    pub min: u32,
    pub max: u32,
}

impl Default for PrefixRange {
    fn default() -> Self {
        Self {
            min: 80000,
            max: 99999,
        }
    }
}

impl PrefixRange {
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Protection configuration, loaded as part of [`crate::config::SyncConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtectionConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "range")]
    pub user_prefix_range: PrefixRange,
}

impl ProtectionConfig {
    /// Fail fast on an inverted range; called at configuration load time.
    pub fn validate(&self) -> Result<()> {
        let range = &self.user_prefix_range;
        if range.min > range.max {
            return Err(Error::InvalidConfig(format!(
                "protection range min ({}) exceeds max ({})",
                range.min, range.max
            )));
        }
        Ok(())
    }

    /// True iff protection is enabled and the id carries a numeric prefix
    /// inside the configured range.
    pub fn is_user_defined(&self, id: &str) -> bool {
        if !self.enabled {
            return false;
        }
        numeric_prefix(id).is_some_and(|n| self.user_prefix_range.contains(n))
    }
}

/// Leading digits of an identifier, accepted only when followed by the end
/// of the id or a `-suffix`. `"85000-custom"` → `Some(85000)`,
/// `"typescript-guide"` → `None`.
pub fn numeric_prefix(id: &str) -> Option<u32> {
    let digits: &str = {
        let end = id
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(id.len(), |(i, _)| i);
        &id[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let rest = &id[digits.len()..];
    if !(rest.is_empty() || rest.starts_with('-')) {
        return None;
    }
    digits.parse().ok()
}

/// Derive a candidate identifier from a bare filename: strip the
/// extension, lowercase, collapse non-alphanumeric runs into single
/// hyphens. Used for files that exist on disk without a parsed rule.
pub fn extract_id_from_filename(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => filename,
    };

    let mut id = String::with_capacity(stem.len());
    let mut pending_hyphen = false;
    for c in stem.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            id.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    id
}

/// Union of the user's explicit selection and protection-flagged rules,
/// by id, selected entries winning collisions. The result is the rule set
/// that must survive directory reconciliation.
pub fn merge_rule_lists(selected: &[Rule], protected: &[Rule]) -> Vec<Rule> {
    let mut merged: Vec<Rule> = selected.to_vec();
    let mut seen: HashSet<&str> = selected.iter().map(|r| r.id.as_str()).collect();
    for rule in protected {
        if seen.insert(rule.id.as_str()) {
            merged.push(rule.clone());
        }
    }
    merged
}
