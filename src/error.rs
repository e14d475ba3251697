//! Error types for loading category maps and organizing directories.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`CategoryMap`](crate::category_map::CategoryMap).
///
/// All of these are fatal at construction time, before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Category map file not found at the given path.
    #[error("Category map not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The category map exists but could not be read.
    #[error("Failed to read category map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source is not a `category -> [extensions]` structure.
    #[error("Malformed category map: {0}")]
    Malformed(String),

    /// A category name that cannot be used as a folder name.
    #[error("Invalid category name '{name}': {reason}")]
    InvalidCategory { name: String, reason: &'static str },
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Malformed(format!("JSON parse error: {}", e))
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Malformed(format!("TOML parse error: {}", e))
    }
}

/// Errors that can occur while organizing a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Building the category map failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The target directory is missing or not a directory.
    #[error("Invalid target directory {}: {source}", .path.display())]
    InvalidDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Listing the target directory failed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to move a file into its category directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// Something already sits at the destination path.
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
}

impl OrganizeError {
    /// Process exit code the binary reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::InvalidDirectory { .. } => 3,
            Self::DestinationExists(_) => 4,
            _ => 1,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/map.json"));
        assert_eq!(err.to_string(), "Category map not found: /tmp/map.json");

        let err = ConfigError::InvalidCategory {
            name: "..".to_string(),
            reason: "name refers to a relative directory",
        };
        assert!(err.to_string().contains("'..'"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: OrganizeError = ConfigError::Malformed("bad".to_string()).into();
        assert_eq!(err.to_string(), "Malformed category map: bad");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes() {
        let collision = OrganizeError::DestinationExists(PathBuf::from("Images/a.png"));
        assert_eq!(collision.exit_code(), 4);

        let io = OrganizeError::CreateDir {
            path: PathBuf::from("Images"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(io.exit_code(), 1);
    }
}
