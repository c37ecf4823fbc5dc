//! Error types for rules-core

/// Result type for rules-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rules-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid sort key: {0}")]
    InvalidSortBy(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("Invalid merge strategy: {0}")]
    InvalidMergeStrategy(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
