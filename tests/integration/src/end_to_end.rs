//! End-to-end flow: validate, index, merge, render, partially update, and
//! reconcile against a real temporary directory.

use std::fs;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use rules_content::{GenerateOptions, UpdateOptions, UserRulesMarkers, supports_partial_update};
use rules_core::{
    MergeStrategy, PrefixRange, ProtectionConfig, RuleIndex, SelectionState, SyncConfig,
    merge_with_user_rules, validate_rules,
};
use rules_sync::{StdFileSystem, sync_directory, sync_single_file};
use rules_test_utils::{RuleBuilder, rule, rule_with_priority};

fn fixed_generate() -> GenerateOptions {
    GenerateOptions {
        timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        user_rules_markers: Some(UserRulesMarkers {
            begin: "<!-- imported user rules -->".into(),
            end: "<!-- /imported user rules -->".into(),
        }),
        ..GenerateOptions::default()
    }
}

#[test]
fn full_pipeline_single_file_target() {
    // Parsed rules arrive from two sources; one document is broken.
    let mut broken = rule("broken", "git-hooks");
    broken.content = "  ".into();
    broken.raw_content = "  ".into();

    let git_hooks = vec![
        rule_with_priority("commit-style", "git-hooks", "medium"),
        broken,
    ];
    let style_guide = vec![
        rule_with_priority("commit-style", "style-guide", "high"),
        rule("naming", "style-guide"),
    ];

    let (valid_hooks, issues) = validate_rules(&git_hooks);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule_id, "broken");

    let mut index = RuleIndex::new();
    index.add_rules("git-hooks", valid_hooks);
    index.add_rules("style-guide", style_guide);

    // The duplicate id is reported, recommending the high-priority copy.
    let conflicts = index.detect_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].rule_id, "commit-style");
    assert_eq!(conflicts[0].recommended.source_id, "style-guide");

    let merged = index.merge_rules(MergeStrategy::Priority);
    assert_eq!(merged.len(), 2);

    // Imported user rules join under the reserved pseudo-source.
    let user = vec![rule_with_priority("naming", "user-rules", "high")];
    let config = SyncConfig::default();
    let final_rules = merge_with_user_rules(&merged, &user, &config.sort);
    // Ascending order: the remote, unprioritized "naming" sorts first and
    // wins the collision.
    let naming = final_rules.iter().find(|r| r.id == "naming").unwrap();
    assert_eq!(naming.source_id, "style-guide");

    // Write the single-file target, then refresh only one source.
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("RULES.md");
    let opts = UpdateOptions {
        target_source_ids: vec!["git-hooks".into()],
        generate: fixed_generate(),
        ..UpdateOptions::default()
    };

    let first = sync_single_file(&StdFileSystem, &path, &final_rules, "# Rules", &opts).unwrap();
    assert!(!first.is_partial_update);
    assert!(supports_partial_update(&first.content));

    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("\nManual footnote.\n");
    fs::write(&path, &content).unwrap();

    let refreshed = vec![rule_with_priority("commit-style-v2", "git-hooks", "high")];
    let second = sync_single_file(&StdFileSystem, &path, &refreshed, "# Rules", &opts).unwrap();
    assert!(second.is_partial_update);
    assert_eq!(second.updated_sources, ["git-hooks"]);
    assert_eq!(second.preserved_sources, ["style-guide"]);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("commit-style-v2"));
    assert!(written.contains("id=\"naming\""));
    assert!(written.ends_with("Manual footnote.\n"));
}

#[test]
fn full_pipeline_directory_target_with_protection() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("10000-stale.md"), "stale").unwrap();
    fs::write(temp.path().join("85000-mine.md"), "my own rule").unwrap();

    let mut selection = SelectionState::new();
    selection.set_selection("alpha", ["30000-selected.md"]);

    let parsed = vec![
        RuleBuilder::new("30000-selected", "alpha")
            .file_path("30000-selected.md")
            .raw_content("Selected raw body.")
            .build(),
        RuleBuilder::new("40000-deselected", "alpha")
            .file_path("40000-deselected.md")
            .build(),
    ];
    let selected = selection.filter_rules(&parsed);
    assert_eq!(selected.len(), 1);

    let protection = ProtectionConfig {
        enabled: true,
        user_prefix_range: PrefixRange {
            min: 80000,
            max: 99999,
        },
    };

    let report =
        sync_directory(&StdFileSystem, temp.path(), &selected, &protection, "Rules").unwrap();

    assert_eq!(report.deleted, ["10000-stale.md"]);
    assert_eq!(report.protected_files, ["85000-mine.md"]);
    assert!(temp.path().join("85000-mine.md").exists());
    assert!(temp.path().join("30000-selected.md").exists());
    assert!(!temp.path().join("40000-deselected.md").exists());
    assert!(temp.path().join("index.md").exists());
}

#[test]
fn sort_configuration_decides_user_rule_collisions() {
    let remote = vec![rule_with_priority("naming", "remote", "medium")];
    let user = vec![rule_with_priority("naming", "user-rules", "high")];

    let asc = SyncConfig::from_toml_str("[sort]\nby = \"priority\"\norder = \"asc\"\n").unwrap();
    let winner = merge_with_user_rules(&remote, &user, &asc.sort);
    assert_eq!(winner[0].source_id, "remote");

    let desc = SyncConfig::from_toml_str("[sort]\nby = \"priority\"\norder = \"desc\"\n").unwrap();
    let winner = merge_with_user_rules(&remote, &user, &desc.sort);
    assert_eq!(winner[0].source_id, "user-rules");
}
