//! Per-source file selection state.
//!
//! The (external) UI mutates this; the core only reads it to decide which
//! parsed rules are eligible to enter the merge. A source with no recorded
//! state is treated as all-files-selected.

use std::collections::{BTreeSet, HashMap};

use crate::rule::Rule;

/// Set of relative file paths currently selected, per source.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashMap<String, BTreeSet<String>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the selection for a source, replacing any previous set.
    pub fn set_selection<I, S>(&mut self, source_id: impl Into<String>, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.insert(
            source_id.into(),
            paths.into_iter().map(Into::into).collect(),
        );
    }

    /// Forget a source's selection, reverting it to all-selected.
    pub fn clear_selection(&mut self, source_id: &str) {
        self.selected.remove(source_id);
    }

    /// Whether a file is selected. A source without recorded state
    /// defaults to everything selected.
    pub fn is_selected(&self, source_id: &str, file_path: &str) -> bool {
        match self.selected.get(source_id) {
            Some(paths) => paths.contains(file_path),
            None => true,
        }
    }

    /// Explicitly recorded selection for a source, if any.
    pub fn selection_for(&self, source_id: &str) -> Option<&BTreeSet<String>> {
        self.selected.get(source_id)
    }

    /// Keep only the rules whose file is selected in their source.
    pub fn filter_rules(&self, rules: &[Rule]) -> Vec<Rule> {
        rules
            .iter()
            .filter(|r| self.is_selected(&r.source_id, &r.file_path))
            .cloned()
            .collect()
    }
}
