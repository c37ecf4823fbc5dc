//! Output target assembly.
//!
//! Two target shapes exist: a single marked document (kept current via the
//! partial-update engine) and a directory of one file per rule plus an
//! index document. Writing goes through the injected [`FileSystem`]
//! capability; the content itself is assembled purely.

use std::path::Path;

use rules_core::{ProtectionConfig, Rule};

use rules_content::update::{PartialUpdateOutcome, UpdateOptions, partial_update};

use crate::error::Result;
use crate::fs::FileSystem;
use crate::reconcile::{CleanReport, clean_directory_by_rules};

/// Name of the generated index document in directory targets.
pub const DIRECTORY_INDEX_FILE: &str = "index.md";

/// Bring a single-file target up to date.
///
/// Reads the existing document when there is one, refreshes the target
/// sources' regions (falling back to full regeneration for unstructured
/// content), and writes the result back.
pub fn sync_single_file<F: FileSystem>(
    fs: &F,
    path: &Path,
    rules: &[Rule],
    header_content: &str,
    opts: &UpdateOptions,
) -> Result<PartialUpdateOutcome> {
    let existing = if fs.exists(path) {
        fs.read_to_string(path)?
    } else {
        String::new()
    };

    let outcome = partial_update(&existing, rules, header_content, opts);
    fs.write(path, &outcome.content)?;

    tracing::info!(
        path = %path.display(),
        is_partial = outcome.is_partial_update,
        updated = ?outcome.updated_sources,
        "synced single-file target"
    );
    Ok(outcome)
}

/// Content of a directory target: per-rule files plus the index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOutput {
    /// `(relative path, verbatim raw content)` pairs, one per rule.
    pub files: Vec<(String, String)>,
    /// The generated index document.
    pub index: String,
}

/// Assemble a directory target's content without touching the disk.
///
/// Each rule becomes `<id>.md` carrying its original document verbatim;
/// the index lists every rule grouped by source.
pub fn build_directory_output(rules: &[Rule], title: &str) -> DirectoryOutput {
    let files = rules
        .iter()
        .map(|r| (format!("{}.md", r.id), r.raw_content.clone()))
        .collect();

    let mut groups: Vec<(&str, Vec<&Rule>)> = Vec::new();
    for rule in rules {
        match groups.iter_mut().find(|(s, _)| *s == rule.source_id) {
            Some((_, group)) => group.push(rule),
            None => groups.push((rule.source_id.as_str(), vec![rule])),
        }
    }

    let mut index = format!(
        "# {title}\n\n{} rules from {} sources.\n",
        rules.len(),
        groups.len()
    );
    for (source_id, group) in &groups {
        index.push_str(&format!("\n## {source_id}\n\n"));
        for rule in group {
            match rule.priority() {
                Some(p) => index.push_str(&format!(
                    "- [{id}]({id}.md): {title} ({p})\n",
                    id = rule.id,
                    title = rule.title
                )),
                None => index.push_str(&format!(
                    "- [{id}]({id}.md): {title}\n",
                    id = rule.id,
                    title = rule.title
                )),
            }
        }
    }

    DirectoryOutput { files, index }
}

/// Bring a directory target up to date: reconcile stale files, then write
/// the per-rule files and the index.
pub fn sync_directory<F: FileSystem>(
    fs: &F,
    dir: &Path,
    rules: &[Rule],
    protection: &ProtectionConfig,
    title: &str,
) -> Result<CleanReport> {
    let report = clean_directory_by_rules(fs, dir, rules, protection);

    let output = build_directory_output(rules, title);
    for (relative_path, content) in &output.files {
        fs.write(&dir.join(relative_path), content)?;
    }
    fs.write(&dir.join(DIRECTORY_INDEX_FILE), &output.index)?;

    tracing::info!(
        dir = %dir.display(),
        written = output.files.len(),
        deleted = report.deleted.len(),
        protected = report.protected_files.len(),
        "synced directory target"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rules_test_utils::{RuleBuilder, rule, rule_with_priority};

    #[test]
    fn directory_output_reproduces_raw_content_verbatim() {
        let rules = vec![
            RuleBuilder::new("a1", "alpha")
                .raw_content("---\nid: a1\npriority: high\n---\n# A1\n\nBody.")
                .build(),
        ];
        let output = build_directory_output(&rules, "Rules");

        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].0, "a1.md");
        assert!(output.files[0].1.starts_with("---\nid: a1"));
    }

    #[test]
    fn index_groups_rules_by_source() {
        let rules = vec![
            rule_with_priority("a1", "alpha", "high"),
            rule("b1", "beta"),
            rule("a2", "alpha"),
        ];
        let output = build_directory_output(&rules, "My Rules");

        assert!(output.index.starts_with("# My Rules\n\n3 rules from 2 sources."));
        let alpha = output.index.find("## alpha").unwrap();
        let beta = output.index.find("## beta").unwrap();
        assert!(alpha < beta);
        assert!(output.index.contains("- [a1](a1.md): Rule a1 (high)"));
        assert!(output.index.contains("- [b1](b1.md): Rule b1\n"));
    }
}
