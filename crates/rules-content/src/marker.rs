//! Marker vocabulary shared by the generator and the parser.
//!
//! One stable set of HTML-comment tokens delimits the nested regions of a
//! marked document (global ⊇ source ⊇ rule). HTML comments are invisible
//! in rendered Markdown and effectively never occur in rule prose, so the
//! markers cannot collide with content. This module is the single
//! definition site: nothing else spells a marker out by hand.

use std::sync::LazyLock;

use regex::Regex;

/// Opens the global block wrapping all machine-generated regions.
pub const GLOBAL_BEGIN: &str = "<!-- rules:begin -->";
/// Closes the global block; everything after it is user-owned.
pub const GLOBAL_END: &str = "<!-- rules:end -->";

/// Reserved pseudo-source id for imported user rules.
pub const USER_RULES_SOURCE: &str = "user-rules";

/// Matches a source block's begin marker, capturing `source` and `count`.
pub static SOURCE_BEGIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!-- rules:source:begin source="([^"]*)" count="(\d+)" -->"#)
        .expect("invalid source begin marker regex")
});

/// Matches a rule region's begin marker, capturing `source`, `id`, and an
/// optional `priority`.
pub static RULE_BEGIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!-- rules:rule:begin source="([^"]*)" id="([^"]*)"( priority="([^"]*)")? -->"#)
        .expect("invalid rule begin marker regex")
});

pub fn source_begin(source_id: &str, count: usize) -> String {
    format!("<!-- rules:source:begin source=\"{source_id}\" count=\"{count}\" -->")
}

pub fn source_end(source_id: &str) -> String {
    format!("<!-- rules:source:end source=\"{source_id}\" -->")
}

pub fn rule_begin(source_id: &str, rule_id: &str, priority: Option<&str>) -> String {
    match priority {
        Some(p) => format!(
            "<!-- rules:rule:begin source=\"{source_id}\" id=\"{rule_id}\" priority=\"{p}\" -->"
        ),
        None => format!("<!-- rules:rule:begin source=\"{source_id}\" id=\"{rule_id}\" -->"),
    }
}

pub fn rule_end(rule_id: &str) -> String {
    format!("<!-- rules:rule:end id=\"{rule_id}\" -->")
}
