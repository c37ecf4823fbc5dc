//! In-memory rule store grouped by source, with duplicate-id conflict
//! detection and merge strategies.
//!
//! The conflict report is cached and the cache is invalidated inside every
//! mutating call, so a reader can never observe a report computed from a
//! partially-updated index.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::error::Error;
use crate::rule::Rule;

/// How [`RuleIndex::merge_rules`] resolves duplicate ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Keep the highest-priority rule per id (ties broken by id ascending).
    Priority,
    /// Keep the first-encountered rule per id in source-iteration order.
    SkipDuplicates,
    /// Return every rule, duplicates included.
    #[default]
    Passthrough,
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "priority" => Ok(MergeStrategy::Priority),
            "skip-duplicates" => Ok(MergeStrategy::SkipDuplicates),
            "passthrough" => Ok(MergeStrategy::Passthrough),
            other => Err(Error::InvalidMergeStrategy(other.to_string())),
        }
    }
}

/// Kind of conflict detected between rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    DuplicateId,
}

/// A duplicate-id conflict: every rule sharing one id, plus the member the
/// index recommends keeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub rule_id: String,
    pub rules: Vec<Rule>,
    pub recommended: Rule,
    pub kind: ConflictKind,
}

/// Rule store keyed by source id, preserving source insertion order.
#[derive(Debug, Default)]
pub struct RuleIndex {
    source_order: Vec<String>,
    rules: HashMap<String, Vec<Rule>>,
    conflicts: OnceCell<Vec<Conflict>>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule set for a source. Invalidates the conflict cache.
    pub fn add_rules(&mut self, source_id: impl Into<String>, rules: Vec<Rule>) {
        let source_id = source_id.into();
        if !self.rules.contains_key(&source_id) {
            self.source_order.push(source_id.clone());
        }
        self.rules.insert(source_id, rules);
        self.conflicts = OnceCell::new();
    }

    /// Drop a source and its rules. Invalidates the conflict cache.
    pub fn remove_source(&mut self, source_id: &str) -> Option<Vec<Rule>> {
        let removed = self.rules.remove(source_id);
        if removed.is_some() {
            self.source_order.retain(|s| s != source_id);
            self.conflicts = OnceCell::new();
        }
        removed
    }

    /// Source ids in insertion order.
    pub fn source_ids(&self) -> &[String] {
        &self.source_order
    }

    /// Every rule, in source-insertion order then per-source order.
    pub fn all_rules(&self) -> Vec<Rule> {
        self.source_order
            .iter()
            .filter_map(|s| self.rules.get(s))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn rules_by_source(&self, source_id: &str) -> &[Rule] {
        self.rules.get(source_id).map_or(&[], Vec::as_slice)
    }

    /// Detect duplicate-id conflicts across all sources.
    ///
    /// The result is cached until the next mutation. The recommended rule
    /// is the group's highest-priority member, a missing priority ranking
    /// below `low`; priority ties are broken by id ascending (the same
    /// tie-break [`RuleIndex::merge_rules`] applies).
    pub fn detect_conflicts(&self) -> &[Conflict] {
        self.conflicts.get_or_init(|| {
            group_by_id(self.all_rules())
                .into_iter()
                .filter(|(_, group)| group.len() > 1)
                .map(|(rule_id, group)| {
                    let recommended = best_of(&group).clone();
                    Conflict {
                        rule_id,
                        rules: group,
                        recommended,
                        kind: ConflictKind::DuplicateId,
                    }
                })
                .collect()
        })
    }

    /// Merge all sources into one de-duplicated rule list.
    pub fn merge_rules(&self, strategy: MergeStrategy) -> Vec<Rule> {
        let all = self.all_rules();
        match strategy {
            MergeStrategy::Passthrough => all,
            MergeStrategy::SkipDuplicates => {
                let mut seen = HashSet::new();
                all.into_iter()
                    .filter(|r| seen.insert(r.id.clone()))
                    .collect()
            }
            MergeStrategy::Priority => group_by_id(all)
                .into_iter()
                .map(|(_, group)| best_of(&group).clone())
                .collect(),
        }
    }
}

/// Group rules by id, preserving first-appearance order of the ids.
fn group_by_id(rules: Vec<Rule>) -> Vec<(String, Vec<Rule>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Rule>> = HashMap::new();
    for rule in rules {
        if !groups.contains_key(&rule.id) {
            order.push(rule.id.clone());
        }
        groups.entry(rule.id.clone()).or_default().push(rule);
    }
    order
        .into_iter()
        .map(|id| {
            let group = groups.remove(&id).unwrap_or_default();
            (id, group)
        })
        .collect()
}

/// Highest-priority member of a non-empty group, priority ties broken by
/// id ascending.
fn best_of(group: &[Rule]) -> &Rule {
    group
        .iter()
        .min_by(|a, b| {
            b.priority_weight()
                .cmp(&a.priority_weight())
                .then_with(|| a.id.cmp(&b.id))
        })
        .expect("conflict groups are never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Metadata;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rule(id: &str, source: &str, priority: Option<&str>) -> Rule {
        let mut metadata = Metadata::new();
        if let Some(p) = priority {
            metadata.insert("priority", json!(p));
        }
        Rule {
            id: id.into(),
            title: format!("Title {id}"),
            content: format!("Body of {id}"),
            raw_content: format!("Body of {id}"),
            metadata,
            source_id: source.into(),
            file_path: format!("{id}.md"),
        }
    }

    #[test]
    fn add_rules_replaces_a_sources_set() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("a1", "alpha", None)]);
        index.add_rules("alpha", vec![rule("a2", "alpha", None)]);

        assert_eq!(index.all_rules().len(), 1);
        assert_eq!(index.rules_by_source("alpha")[0].id, "a2");
        assert_eq!(index.source_ids(), ["alpha"]);
    }

    #[test]
    fn all_rules_preserves_source_insertion_order() {
        let mut index = RuleIndex::new();
        index.add_rules("beta", vec![rule("b1", "beta", None)]);
        index.add_rules("alpha", vec![rule("a1", "alpha", None)]);

        let ids: Vec<String> = index.all_rules().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["b1", "a1"]);
    }

    #[test]
    fn detect_conflict_recommends_highest_priority() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("r3", "alpha", Some("low"))]);
        index.add_rules("beta", vec![rule("r3", "beta", Some("high"))]);

        let conflicts = index.detect_conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].rule_id, "r3");
        assert_eq!(conflicts[0].rules.len(), 2);
        assert_eq!(conflicts[0].recommended.source_id, "beta");
        assert_eq!(conflicts[0].kind, ConflictKind::DuplicateId);
    }

    #[test]
    fn missing_priority_ranks_below_low() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("r1", "alpha", None)]);
        index.add_rules("beta", vec![rule("r1", "beta", Some("low"))]);

        let conflicts = index.detect_conflicts();
        assert_eq!(conflicts[0].recommended.source_id, "beta");
    }

    #[test]
    fn conflict_cache_is_invalidated_on_mutation() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("dup", "alpha", None)]);
        index.add_rules("beta", vec![rule("dup", "beta", None)]);
        assert_eq!(index.detect_conflicts().len(), 1);

        index.remove_source("beta");
        assert!(index.detect_conflicts().is_empty());
    }

    #[test]
    fn merge_skip_duplicates_keeps_first_in_source_order() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("dup", "alpha", Some("low"))]);
        index.add_rules("beta", vec![rule("dup", "beta", Some("high"))]);

        let merged = index.merge_rules(MergeStrategy::SkipDuplicates);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_id, "alpha");
    }

    #[test]
    fn merge_priority_keeps_highest_priority_member() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("dup", "alpha", Some("low"))]);
        index.add_rules("beta", vec![rule("dup", "beta", Some("high"))]);

        let merged = index.merge_rules(MergeStrategy::Priority);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_id, "beta");
    }

    #[test]
    fn merge_passthrough_keeps_duplicates() {
        let mut index = RuleIndex::new();
        index.add_rules("alpha", vec![rule("dup", "alpha", None)]);
        index.add_rules("beta", vec![rule("dup", "beta", None)]);

        assert_eq!(index.merge_rules(MergeStrategy::Passthrough).len(), 2);
    }

    #[test]
    fn merge_strategy_parses_from_strings() {
        assert_eq!(
            "skip-duplicates".parse::<MergeStrategy>().unwrap(),
            MergeStrategy::SkipDuplicates
        );
        assert_eq!(
            "priority".parse::<MergeStrategy>().unwrap(),
            MergeStrategy::Priority
        );
        assert!("first-wins".parse::<MergeStrategy>().is_err());
    }
}
