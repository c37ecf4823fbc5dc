//! Marked-document generation.
//!
//! Serializes a rule list, grouped by source, into a single text document
//! with nested region markers: one global block wrapping per-source blocks,
//! each wrapping per-rule regions. Generation is pure: identical inputs
//! produce identical output, with only the header timestamp varying when no
//! fixed timestamp is supplied.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use rules_core::{Metadata, Rule};

use crate::marker::{
    GLOBAL_BEGIN, GLOBAL_END, USER_RULES_SOURCE, rule_begin, rule_end, source_begin, source_end,
};

/// Caller-supplied wrapper lines around the `user-rules` pseudo-source
/// block, letting imported user rules stand out inside the global block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRulesMarkers {
    pub begin: String,
    pub end: String,
}

/// Options controlling marked-document generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Emit the global begin/end marker pair. Without it the output is an
    /// unstructured document that cannot be partially updated later.
    pub block_markers: bool,
    /// Wrapper for the reserved `user-rules` pseudo-source.
    pub user_rules_markers: Option<UserRulesMarkers>,
    /// Fixed header timestamp; `None` uses the current time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            block_markers: true,
            user_rules_markers: None,
            timestamp: None,
        }
    }
}

/// Generate a complete marked document from `rules`.
///
/// `header_content` (title, description, table of contents) is emitted
/// verbatim between the global begin marker and the first source block.
pub fn generate_marked_file(rules: &[Rule], header_content: &str, opts: &GenerateOptions) -> String {
    let groups = group_by_source(rules);
    let blocks: Vec<String> = groups
        .iter()
        .map(|(source_id, group)| {
            render_source_block(source_id, group, opts.user_rules_markers.as_ref())
        })
        .collect();

    let mut source_ids: Vec<String> = groups.iter().map(|(s, _)| s.to_string()).collect();
    source_ids.sort();

    let header = header_line(opts.timestamp, rules.len(), &source_ids);
    assemble(&header, header_content, &blocks, opts.block_markers, None)
}

/// Group rules by source id, in order of each source's first appearance.
pub(crate) fn group_by_source(rules: &[Rule]) -> Vec<(&str, Vec<&Rule>)> {
    let mut groups: Vec<(&str, Vec<&Rule>)> = Vec::new();
    for rule in rules {
        match groups.iter_mut().find(|(s, _)| *s == rule.source_id) {
            Some((_, group)) => group.push(rule),
            None => groups.push((rule.source_id.as_str(), vec![rule])),
        }
    }
    groups
}

/// The file-level header comment: timestamp, total rule count, and the
/// sorted distinct source-id list.
pub(crate) fn header_line(
    timestamp: Option<DateTime<Utc>>,
    rule_count: usize,
    source_ids: &[String],
) -> String {
    let ts = timestamp
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let sources = if source_ids.is_empty() {
        "-".to_string()
    } else {
        source_ids.join(", ")
    };
    format!("<!-- rules-manager: generated {ts} | rules: {rule_count} | sources: {sources} -->")
}

/// Render one source block, marker to marker. The `user-rules`
/// pseudo-source additionally gets the caller's wrapper lines, emitted
/// inside the source markers so a preserved raw block replays them intact.
pub(crate) fn render_source_block(
    source_id: &str,
    rules: &[&Rule],
    user_wrapper: Option<&UserRulesMarkers>,
) -> String {
    let regions: Vec<String> = rules.iter().map(|r| render_rule_region(r)).collect();
    let body = regions.join("\n\n---\n\n");

    let body = match user_wrapper {
        Some(wrapper) if source_id == USER_RULES_SOURCE => {
            format!("{}\n\n{}\n\n{}", wrapper.begin, body, wrapper.end)
        }
        _ => body,
    };

    format!(
        "{}\n\n{}\n\n{}",
        source_begin(source_id, rules.len()),
        body,
        source_end(source_id)
    )
}

/// Stitch header, global markers, header content, source blocks, and the
/// trailing user-content region into the final document. Shared by full
/// generation and the partial-update engine so both produce byte-identical
/// layout around preserved blocks.
pub(crate) fn assemble(
    header_line: &str,
    header_content: &str,
    blocks: &[String],
    block_markers: bool,
    user_content: Option<&str>,
) -> String {
    let mut out = String::new();
    out.push_str(header_line);
    out.push('\n');
    if block_markers {
        out.push_str(GLOBAL_BEGIN);
        out.push('\n');
    }
    out.push('\n');

    if !header_content.trim().is_empty() {
        out.push_str(header_content.trim_end());
        out.push_str("\n\n");
    }

    for block in blocks {
        out.push_str(block);
        out.push_str("\n\n");
    }

    if block_markers {
        out.push_str(GLOBAL_END);
        // The captured user-content region starts with the newline that
        // originally followed the end marker, so it replaces the plain
        // newline rather than adding to it.
        match user_content {
            Some(user) => out.push_str(user),
            None => out.push('\n'),
        }
    } else {
        if out.ends_with("\n\n") {
            out.pop();
        }
        if let Some(user) = user_content {
            out.push_str(user);
        }
    }
    out
}

fn render_rule_region(rule: &Rule) -> String {
    let priority = rule.priority().map(|p| p.to_string());
    format!(
        "{}\n{}\n{}",
        rule_begin(&rule.source_id, &rule.id, priority.as_deref()),
        render_body(rule),
        rule_end(&rule.id)
    )
}

/// Rule body with the metadata summary table spliced in: the trimmed
/// front-matter-free content (falling back to the raw document), with the
/// table placed right after a leading heading line when one exists,
/// otherwise before the body.
fn render_body(rule: &Rule) -> String {
    let base = if rule.content.trim().is_empty() {
        rule.raw_content.trim()
    } else {
        rule.content.trim()
    };

    let Some(table) = metadata_table(&rule.metadata) else {
        return base.to_string();
    };

    match base.split_once('\n') {
        Some((head, rest)) if head.trim_start().starts_with('#') => {
            format!("{}\n\n{}\n\n{}", head.trim_end(), table, rest.trim_start_matches('\n'))
        }
        None if base.starts_with('#') => format!("{base}\n\n{table}"),
        _ => format!("{table}\n\n{base}"),
    }
}

/// One row per metadata key, in map order.
fn metadata_table(metadata: &Metadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    let mut table = String::from("| Key | Value |\n| --- | --- |");
    for (key, value) in metadata.iter() {
        table.push_str(&format!("\n| {key} | {} |", render_value(value)));
    }
    Some(table)
}

/// Arrays become comma-joined inline-code tokens, objects compact JSON,
/// everything else its plain string form.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| format!("`{}`", inline_token(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
        other => other.to_string(),
    }
}

fn inline_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
