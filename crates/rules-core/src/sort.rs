//! Ordering and de-duplication policy shared by every output adapter.
//!
//! Consumers deliberately render rules in ascending priority so the
//! highest-priority rule lands physically last in the document, where
//! downstream LLM attention is strongest. The ascending default is a
//! functional requirement, not a cosmetic choice.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rule::Rule;

/// Sort key for rule lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Id,
    #[default]
    Priority,
    None,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortBy::Id),
            "priority" => Ok(SortBy::Priority),
            "none" => Ok(SortBy::None),
            other => Err(Error::InvalidSortBy(other.to_string())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Id => write!(f, "id"),
            SortBy::Priority => write!(f, "priority"),
            SortBy::None => write!(f, "none"),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Active ordering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    #[serde(default)]
    pub by: SortBy,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortConfig {
    pub fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }
}

/// Compare two rules under a configuration. `Desc` reverses the entire
/// comparison, tie-breaks included.
fn compare(a: &Rule, b: &Rule, config: &SortConfig) -> Ordering {
    // An empty id is the smallest possible key; `str::cmp` already orders
    // "" before any non-empty id, which is exactly the convention callers
    // rely on.
    let ascending = match config.by {
        SortBy::Id => a.id.cmp(&b.id),
        SortBy::Priority => a
            .priority_weight()
            .cmp(&b.priority_weight())
            .then_with(|| a.id.cmp(&b.id)),
        SortBy::None => Ordering::Equal,
    };
    match config.order {
        SortOrder::Asc => ascending,
        SortOrder::Desc => ascending.reverse(),
    }
}

/// Return the rules arranged under the configuration. `SortBy::None`
/// preserves input order (the sort is stable).
pub fn sort_rules(rules: &[Rule], config: &SortConfig) -> Vec<Rule> {
    let mut sorted = rules.to_vec();
    sorted.sort_by(|a, b| compare(a, b, config));
    sorted
}

/// Merge remote and user rules under the active sort configuration.
///
/// The lists are concatenated, sorted, and de-duplicated by id keeping the
/// first occurrence *in sorted order*. Which side wins a same-id collision
/// therefore depends on the configuration: ascending priority lets the
/// lower-priority duplicate win, descending the higher-priority one.
/// Downstream golden tests rely on this coupling.
pub fn merge_with_user_rules(remote: &[Rule], user: &[Rule], config: &SortConfig) -> Vec<Rule> {
    let combined: Vec<Rule> = remote.iter().chain(user.iter()).cloned().collect();
    let sorted = sort_rules(&combined, config);

    let mut seen = HashSet::new();
    sorted
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}
