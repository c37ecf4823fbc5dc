//! Shared test fixtures for the rules-manager workspace.
//!
//! Provides a [`RuleBuilder`] plus shorthand constructors so crate test
//! suites do not each re-implement rule assembly. Dev-dependency only,
//! never published.

use serde_json::Value;

use rules_core::{Metadata, Rule};

/// Builder for test rules. Fills every required field with a plausible
/// default derived from the id.
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    id: String,
    title: Option<String>,
    content: Option<String>,
    raw_content: Option<String>,
    metadata: Metadata,
    source_id: String,
    file_path: Option<String>,
}

impl RuleBuilder {
    pub fn new(id: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: None,
            raw_content: None,
            metadata: Metadata::new(),
            source_id: source_id.into(),
            file_path: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn raw_content(mut self, raw: impl Into<String>) -> Self {
        self.raw_content = Some(raw.into());
        self
    }

    pub fn priority(mut self, priority: &str) -> Self {
        self.metadata.insert("priority", Value::String(priority.into()));
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn build(self) -> Rule {
        let content = self
            .content
            .unwrap_or_else(|| format!("Guidance for {}.", self.id));
        Rule {
            title: self.title.unwrap_or_else(|| format!("Rule {}", self.id)),
            raw_content: self.raw_content.unwrap_or_else(|| content.clone()),
            content,
            metadata: self.metadata,
            file_path: self.file_path.unwrap_or_else(|| format!("{}.md", self.id)),
            id: self.id,
            source_id: self.source_id,
        }
    }
}

/// A minimal valid rule.
pub fn rule(id: &str, source_id: &str) -> Rule {
    RuleBuilder::new(id, source_id).build()
}

/// A minimal valid rule carrying a priority.
pub fn rule_with_priority(id: &str, source_id: &str, priority: &str) -> Rule {
    RuleBuilder::new(id, source_id).priority(priority).build()
}
