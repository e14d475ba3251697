//! dirclean - tidy a directory by file type
//!
//! This library classifies the top-level files of a directory by extension,
//! using a category map loaded from JSON or TOML, and moves each file into a
//! subfolder named after its category. Unmapped extensions go to `Others`;
//! directories and hidden files are left alone.

pub mod category_map;
pub mod cli;
pub mod entry;
pub mod error;
pub mod organizer;
pub mod output;
pub mod report;

pub use category_map::{CategoryMap, DEFAULT_CATEGORY};
pub use entry::{FileEntry, SkipReason};
pub use error::{ConfigError, OrganizeError, OrganizeResult};
pub use organizer::{DirectoryOrganizer, FailurePolicy, OrganizeOptions, OrganizeSummary};
pub use report::{ConsoleReporter, LogReporter, Reporter};

pub use cli::{Cli, run_cli};
