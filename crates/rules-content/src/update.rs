//! Partial-update engine.
//!
//! Refreshes only the regions belonging to a chosen set of sources while
//! replaying every other source block and the trailing user-content region
//! byte-for-byte. Unstructured documents fall back to full regeneration,
//! the safe path for legacy or hand-edited files.

use std::collections::{BTreeSet, HashSet};

use rules_core::Rule;

use crate::generate::{
    GenerateOptions, assemble, generate_marked_file, group_by_source, header_line,
    render_source_block,
};
use crate::parse::parse_marked_file;

/// Options for a partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOptions {
    /// Sources whose regions are regenerated from the new rule list.
    pub target_source_ids: Vec<String>,
    /// Keep non-target source blocks verbatim (default true).
    pub preserve_other_sources: bool,
    /// Keep the trailing user-content region verbatim (default true).
    pub preserve_user_content: bool,
    /// Generation settings for regenerated regions and the fallback path.
    pub generate: GenerateOptions,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            target_source_ids: Vec::new(),
            preserve_other_sources: true,
            preserve_user_content: true,
            generate: GenerateOptions::default(),
        }
    }
}

impl UpdateOptions {
    pub fn targeting<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_source_ids: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Outcome of a partial update, with observability fields for callers and
/// tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialUpdateOutcome {
    /// The updated document.
    pub content: String,
    /// False when the existing document was unstructured and the engine
    /// fell back to full regeneration.
    pub is_partial_update: bool,
    /// Sources whose regions were regenerated, added, or removed.
    pub updated_sources: Vec<String>,
    /// Sources whose regions were replayed verbatim.
    pub preserved_sources: Vec<String>,
}

/// Update only the target sources' regions of `existing`.
///
/// Non-target blocks and the user-content region are preserved verbatim
/// (subject to the `preserve_*` options); target blocks are regenerated
/// from `new_rules`; sources present in `new_rules` but absent from the
/// document are appended. Applying the same update twice yields identical
/// output apart from the header timestamp.
pub fn partial_update(
    existing: &str,
    new_rules: &[Rule],
    header_content: &str,
    opts: &UpdateOptions,
) -> PartialUpdateOutcome {
    let Some(doc) = parse_marked_file(existing) else {
        tracing::debug!("existing document is unstructured, regenerating in full");
        let content = generate_marked_file(new_rules, header_content, &opts.generate);
        let updated_sources = group_by_source(new_rules)
            .into_iter()
            .map(|(s, _)| s.to_string())
            .collect();
        return PartialUpdateOutcome {
            content,
            is_partial_update: false,
            updated_sources,
            preserved_sources: Vec::new(),
        };
    };

    let groups = group_by_source(new_rules);
    let targets: HashSet<&str> = opts.target_source_ids.iter().map(String::as_str).collect();
    let in_document: HashSet<&str> = doc
        .source_blocks
        .iter()
        .map(|b| b.source_id.as_str())
        .collect();

    let mut blocks: Vec<String> = Vec::new();
    let mut source_ids: BTreeSet<String> = BTreeSet::new();
    let mut updated_sources = Vec::new();
    let mut preserved_sources = Vec::new();
    let mut rule_count = 0;

    // Existing blocks, in document order.
    for block in &doc.source_blocks {
        let source_id = block.source_id.as_str();
        if targets.contains(source_id) {
            // A target with no new rules is simply removed.
            if let Some((_, rules)) = groups.iter().find(|(s, _)| *s == source_id) {
                blocks.push(render_source_block(
                    source_id,
                    rules,
                    opts.generate.user_rules_markers.as_ref(),
                ));
                rule_count += rules.len();
            }
            updated_sources.push(source_id.to_string());
        } else if opts.preserve_other_sources {
            blocks.push(block.raw.clone());
            rule_count += block.declared_count;
            preserved_sources.push(source_id.to_string());
        }
    }

    // Sources that are new to the document are always added; they were
    // never anyone's to preserve.
    for (source_id, rules) in &groups {
        if !in_document.contains(source_id) {
            blocks.push(render_source_block(
                source_id,
                rules,
                opts.generate.user_rules_markers.as_ref(),
            ));
            rule_count += rules.len();
            updated_sources.push(source_id.to_string());
        }
    }

    source_ids.extend(preserved_sources.iter().cloned());
    source_ids.extend(
        updated_sources
            .iter()
            .filter(|s| groups.iter().any(|(g, _)| *g == s.as_str()))
            .cloned(),
    );
    let source_ids: Vec<String> = source_ids.into_iter().collect();

    let header = header_line(opts.generate.timestamp, rule_count, &source_ids);
    let user_content = if opts.preserve_user_content {
        doc.user_content.as_deref()
    } else {
        None
    };

    PartialUpdateOutcome {
        content: assemble(&header, header_content, &blocks, true, user_content),
        is_partial_update: true,
        updated_sources,
        preserved_sources,
    }
}

/// Regenerate exactly one source's block, preserving everything else.
pub fn replace_source_block(
    existing: &str,
    source_id: &str,
    rules: &[Rule],
    header_content: &str,
    generate: GenerateOptions,
) -> PartialUpdateOutcome {
    let opts = UpdateOptions {
        target_source_ids: vec![source_id.to_string()],
        generate,
        ..UpdateOptions::default()
    };
    partial_update(existing, rules, header_content, &opts)
}

/// Remove one source's block entirely, recomputing the header over the
/// remaining blocks and keeping user content.
pub fn delete_source_block(
    existing: &str,
    source_id: &str,
    header_content: &str,
    generate: GenerateOptions,
) -> PartialUpdateOutcome {
    let opts = UpdateOptions {
        target_source_ids: vec![source_id.to_string()],
        generate,
        ..UpdateOptions::default()
    };
    partial_update(existing, &[], header_content, &opts)
}
