//! Directory reconciliation and output targets for rules-manager
//!
//! Applies the merged rule set to the outside world: single marked
//! documents refreshed in place, directory targets with one file per rule,
//! and reconciliation that deletes stale generated files while protected
//! user files survive. All disk access goes through the injected
//! [`FileSystem`] capability.

pub mod error;
pub mod fs;
pub mod logging;
pub mod reconcile;
pub mod target;

pub use error::{Error, Result};
pub use fs::{DirEntryInfo, FileSystem, StdFileSystem};
pub use reconcile::{CleanReport, clean_directory_by_rules};
pub use target::{
    DIRECTORY_INDEX_FILE, DirectoryOutput, build_directory_output, sync_directory,
    sync_single_file,
};
