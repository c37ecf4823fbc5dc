//! Directory reconciliation.
//!
//! Brings a directory-mode output target in line with the currently
//! selected rule set: files backing deselected rules are deleted, files
//! inside the protected identifier range survive, and everything still
//! selected is left alone. Deletions are independent and best-effort; one
//! failure never aborts the rest.

use std::path::Path;

use rules_core::{ProtectionConfig, Rule, extract_id_from_filename};

use crate::fs::FileSystem;

/// What a reconciliation pass did (or failed to do).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Files removed because no selected rule backs them.
    pub deleted: Vec<String>,
    /// Entries left in place (selected files, protected files, and all
    /// subdirectories).
    pub kept: Vec<String>,
    /// Subset of `kept` that survived only because of protection.
    pub protected_files: Vec<String>,
    /// Files whose deletion failed; logged and skipped.
    pub failed: Vec<String>,
}

/// Delete every direct file entry of `dir` that is neither backed by a
/// rule in `rules` nor classified user-defined by `protection`.
///
/// Subdirectories are always kept and never descended into. A missing
/// directory yields an empty report rather than an error.
pub fn clean_directory_by_rules<F: FileSystem>(
    fs: &F,
    dir: &Path,
    rules: &[Rule],
    protection: &ProtectionConfig,
) -> CleanReport {
    let mut report = CleanReport::default();

    if !fs.exists(dir) {
        return report;
    }

    let entries = match fs.list_entries(dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(dir = %dir.display(), %error, "cannot list directory, skipping reconciliation");
            return report;
        }
    };

    for entry in entries {
        if entry.is_dir {
            report.kept.push(entry.name);
            continue;
        }

        let id = extract_id_from_filename(&entry.name);
        if rules.iter().any(|r| r.id == id) {
            report.kept.push(entry.name);
            continue;
        }
        if protection.is_user_defined(&id) {
            tracing::debug!(file = %entry.name, "keeping protected file");
            report.protected_files.push(entry.name.clone());
            report.kept.push(entry.name);
            continue;
        }

        match fs.remove_file(&dir.join(&entry.name)) {
            Ok(()) => {
                tracing::info!(file = %entry.name, "deleted stale rule file");
                report.deleted.push(entry.name);
            }
            Err(error) => {
                tracing::warn!(file = %entry.name, %error, "failed to delete stale rule file");
                report.failed.push(entry.name);
            }
        }
    }

    report
}
