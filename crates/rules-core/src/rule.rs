//! Rule value type and its open metadata map.
//!
//! A [`Rule`] is produced once by the (external) front-matter parser and is
//! never mutated afterward; every transformation in this workspace builds
//! new `Rule` values or new lists.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A single parsed coding-assistant instruction document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier, kebab-case, optionally carrying a leading
    /// numeric prefix (e.g. `"85000-custom"`).
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Document body without front-matter.
    pub content: String,
    /// Full original document including front-matter, reproduced verbatim
    /// when a rule file must be written back unchanged.
    pub raw_content: String,
    /// Open metadata map from the document's front-matter.
    #[serde(default)]
    pub metadata: Metadata,
    /// Identifier of the source this rule was fetched from.
    pub source_id: String,
    /// Path of the rule file relative to its source root.
    pub file_path: String,
}

impl Rule {
    /// Priority declared in metadata, if any and well-formed.
    pub fn priority(&self) -> Option<Priority> {
        self.metadata.priority()
    }

    /// Numeric priority weight; a rule without a priority weighs 0.
    pub fn priority_weight(&self) -> u8 {
        self.priority().map_or(0, |p| p.weight())
    }
}

/// Rule priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Comparison weight: high > medium > low. A missing priority is
    /// weighted 0 by callers, below `Low`.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Open string-keyed metadata attached to a rule.
///
/// Backed by a `BTreeMap` so iteration (and therefore the rendered
/// metadata summary table) is deterministic. Well-known keys get typed
/// accessors; every other key is preserved and re-emitted as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The `priority` key, parsed. Returns `None` when the key is absent
    /// or not a valid priority string; validation reports the latter case
    /// separately.
    pub fn priority(&self) -> Option<Priority> {
        self.0
            .get("priority")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// The `tags` key as a string list, when present and well-formed.
    pub fn tags(&self) -> Option<Vec<String>> {
        let values = self.0.get("tags")?.as_array()?;
        values
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn version(&self) -> Option<&str> {
        self.0.get("version").and_then(Value::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.0.get("author").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn priority_ordering_and_weights() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::High.weight(), 3);
        assert_eq!(Priority::Medium.weight(), 2);
        assert_eq!(Priority::Low.weight(), 1);
    }

    #[test]
    fn priority_round_trips_through_strings() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            let parsed: Priority = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn metadata_priority_accessor_is_lenient() {
        let mut meta = Metadata::new();
        assert_eq!(meta.priority(), None);

        meta.insert("priority", json!("high"));
        assert_eq!(meta.priority(), Some(Priority::High));

        meta.insert("priority", json!("urgent"));
        assert_eq!(meta.priority(), None);
    }

    #[test]
    fn metadata_tags_rejects_non_string_entries() {
        let mut meta = Metadata::new();
        meta.insert("tags", json!(["a", "b"]));
        assert_eq!(meta.tags(), Some(vec!["a".to_string(), "b".to_string()]));

        meta.insert("tags", json!(["a", 2]));
        assert_eq!(meta.tags(), None);
    }

    #[test]
    fn metadata_preserves_arbitrary_keys_in_order() {
        let mut meta = Metadata::new();
        meta.insert("zeta", json!(1));
        meta.insert("alpha", json!("x"));
        meta.insert("custom-key", json!({"nested": true}));

        let keys: Vec<&str> = meta.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "custom-key", "zeta"]);
    }

    #[test]
    fn missing_priority_weighs_zero() {
        let rule = Rule {
            id: "r1".into(),
            title: "R1".into(),
            content: "body".into(),
            raw_content: "body".into(),
            metadata: Metadata::new(),
            source_id: "src".into(),
            file_path: "r1.md".into(),
        };
        assert_eq!(rule.priority_weight(), 0);
    }
}
