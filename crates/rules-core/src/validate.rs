//! Per-rule validation.
//!
//! Invalid rules are excluded from the merged set; the remaining rules
//! proceed. Issues are collected per rule rather than raised, so one bad
//! document never blocks a sync.

use serde_json::Value;

use crate::rule::Rule;

/// Validation problems found in a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Id of the offending rule (may be empty when the id itself is missing).
    pub rule_id: String,
    /// Source the rule came from.
    pub source_id: String,
    /// File the rule was parsed from.
    pub file_path: String,
    /// One message per failed check.
    pub problems: Vec<String>,
}

/// Partition rules into valid ones and per-rule issue reports.
///
/// Checks: `id`, `title`, `source_id`, and `file_path` must be non-empty,
/// `content` must not be blank, a `priority` metadata value must be one of
/// low/medium/high, and a `tags` metadata value must be an array of strings.
pub fn validate_rules(rules: &[Rule]) -> (Vec<Rule>, Vec<ValidationIssue>) {
    let mut valid = Vec::with_capacity(rules.len());
    let mut issues = Vec::new();

    for rule in rules {
        let problems = check_rule(rule);
        if problems.is_empty() {
            valid.push(rule.clone());
        } else {
            tracing::warn!(
                rule_id = %rule.id,
                source_id = %rule.source_id,
                ?problems,
                "excluding invalid rule"
            );
            issues.push(ValidationIssue {
                rule_id: rule.id.clone(),
                source_id: rule.source_id.clone(),
                file_path: rule.file_path.clone(),
                problems,
            });
        }
    }

    (valid, issues)
}

fn check_rule(rule: &Rule) -> Vec<String> {
    let mut problems = Vec::new();

    for (field, value) in [
        ("id", &rule.id),
        ("title", &rule.title),
        ("sourceId", &rule.source_id),
        ("filePath", &rule.file_path),
    ] {
        if value.trim().is_empty() {
            problems.push(format!("missing required field: {field}"));
        }
    }

    if rule.content.trim().is_empty() {
        problems.push("content is empty".to_string());
    }

    if let Some(value) = rule.metadata.get("priority") {
        let valid_priority = value
            .as_str()
            .is_some_and(|s| matches!(s, "low" | "medium" | "high"));
        if !valid_priority {
            problems.push(format!("invalid priority: {value}"));
        }
    }

    if let Some(value) = rule.metadata.get("tags") {
        let valid_tags = value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string));
        if !valid_tags {
            problems.push("tags must be an array of strings".to_string());
        }
    }

    problems
}
