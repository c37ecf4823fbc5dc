//! Sync configuration loaded from TOML.
//!
//! Malformed sort or protection settings surface here, at load time,
//! rather than deep inside the merge or codec paths.
//!
//! # Example TOML
//!
//! ```toml
//! [sort]
//! by = "priority"
//! order = "asc"
//!
//! [protection]
//! enabled = true
//!
//! [protection.range]
//! min = 80000
//! max = 99999
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protect::ProtectionConfig;
use crate::sort::SortConfig;

/// Top-level configuration for the reconciliation core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Ordering applied by every output adapter.
    #[serde(default)]
    pub sort: SortConfig,
    /// User-owned identifier protection.
    #[serde(default)]
    pub protection: ProtectionConfig,
}

impl SyncConfig {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on semantically invalid settings.
    pub fn validate(&self) -> Result<()> {
        self.protection.validate()
    }
}
