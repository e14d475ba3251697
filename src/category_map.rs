//! Extension-to-category lookup table.
//!
//! A category map is read from a `category -> [extensions]` structure, either
//! JSON or TOML, and inverted into an extension-keyed table. Lookups are total:
//! any extension that is not configured resolves to [`DEFAULT_CATEGORY`].
//!
//! # Examples
//!
//! ```
//! use dirclean::category_map::CategoryMap;
//!
//! let map = CategoryMap::from_json_str(r#"{"Images": [".png", ".jpg"]}"#).unwrap();
//! assert_eq!(map.lookup(".png"), "Images");
//! assert_eq!(map.lookup(".xyz"), "Others");
//! assert_eq!(map.lookup(""), "Others");
//! ```
use crate::error::ConfigError;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Category used for unmapped and missing extensions.
pub const DEFAULT_CATEGORY: &str = "Others";

/// The mapping shipped with the crate.
const BUILTIN_MAP: &str = include_str!("../data/extensions.json");

/// File names probed in the working directory when no map is given.
const LOCAL_MAP_FILES: [&str; 2] = [".dirclean.json", ".dirclean.toml"];

/// Raw on-disk shape: category name to the extensions it owns, in file order.
///
/// Order matters because a later category takes over an extension already
/// claimed by an earlier one.
struct RawCategories(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for RawCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawVisitor;

        impl<'de> Visitor<'de> for RawVisitor {
            type Value = RawCategories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to lists of extensions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((category, extensions)) =
                    access.next_entry::<String, Vec<String>>()?
                {
                    entries.push((category, extensions));
                }
                Ok(RawCategories(entries))
            }
        }

        deserializer.deserialize_map(RawVisitor)
    }
}

/// Immutable extension-to-category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    extension_map: HashMap<String, String>,
}

impl CategoryMap {
    /// Builds a map from JSON text such as `{"Documents": [".pdf"]}`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if the text is not an object of string arrays,
    /// and the validation errors described on [`CategoryMap::from_categories`].
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawCategories = serde_json::from_str(content)?;
        Self::from_categories(raw.0)
    }

    /// Builds a map from TOML text such as `Documents = [".pdf"]`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawCategories = toml::from_str(content)?;
        Self::from_categories(raw.0)
    }

    /// Builds a map from an in-memory `category -> extensions` table.
    ///
    /// Extensions are given one leading `.`, so `"pdf"` and `".pdf"` are the same
    /// key. Case is kept: `".PDF"` is a different key from `".pdf"`.
    ///
    /// When two categories list the same extension, the later one wins.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidCategory` if a category name is not usable as a folder name
    /// * `ConfigError::Malformed` if an extension is empty
    pub fn from_categories<I, E>(categories: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, E)>,
        E: IntoIterator<Item = String>,
    {
        let mut extension_map: HashMap<String, String> = HashMap::new();

        for (category, extensions) in categories {
            validate_category_name(&category)?;

            for raw_ext in extensions {
                let ext = normalize_extension(&raw_ext).ok_or_else(|| {
                    ConfigError::Malformed(format!(
                        "empty extension listed under '{}'",
                        category
                    ))
                })?;

                if let Some(previous) = extension_map.insert(ext.clone(), category.clone())
                    && previous != category
                {
                    log::warn!(
                        "Extension '{}' is listed under both '{}' and '{}'; the later one wins",
                        ext, previous, category
                    );
                }
            }
        }

        Ok(Self { extension_map })
    }

    /// Reads a map from a file, choosing the parser by the file's extension.
    ///
    /// `.toml` files are parsed as TOML; everything else is parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Io` for any other read failure, and a parse/validation error otherwise.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Returns the mapping shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_MAP).unwrap_or_else(|e| {
            log::error!("Built-in category map is invalid: {}", e);
            Self {
                extension_map: HashMap::new(),
            }
        })
    }

    /// Resolves and loads the category map for a run.
    ///
    /// Sources are tried in this order:
    /// 1. `map_path`, if provided (a missing file is an error)
    /// 2. `.dirclean.json` or `.dirclean.toml` in the current directory
    /// 3. `~/.config/dirclean/extensions.json` or `extensions.toml`
    /// 4. The built-in map
    pub fn load(map_path: Option<&Path>) -> Result<Self, ConfigError> {
        let map = match map_path.map(Path::to_path_buf).or_else(discover_map_file) {
            Some(path) => {
                log::debug!("Using category map {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                log::debug!("Using built-in category map");
                Self::builtin()
            }
        };

        if map.is_empty() {
            log::warn!("Category map is empty; every file will go to {}", DEFAULT_CATEGORY);
        } else {
            log::debug!(
                "Loaded {} extensions in {} categories",
                map.len(),
                map.categories().len()
            );
        }
        Ok(map)
    }

    /// Returns the category for an extension, or [`DEFAULT_CATEGORY`].
    ///
    /// The extension may be given with or without its leading `.`; an empty
    /// string always resolves to the default. Matching is case-sensitive.
    pub fn lookup(&self, extension: &str) -> &str {
        self.get(extension).unwrap_or(DEFAULT_CATEGORY)
    }

    /// Returns the configured category for an extension, if any.
    pub fn get(&self, extension: &str) -> Option<&str> {
        let ext = normalize_extension(extension)?;
        self.extension_map.get(&ext).map(String::as_str)
    }

    /// Returns every configured category name, sorted and deduplicated.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.extension_map.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Number of configured extensions.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    /// Returns true if no extension is configured.
    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

/// Gives an extension exactly one leading `.`, keeping its case.
fn normalize_extension(extension: &str) -> Option<String> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed))
}

/// Rejects category names that would not map to a single child folder.
fn validate_category_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name refers to a relative directory")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidCategory {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Finds the first map file in the working directory or the user's config directory.
fn discover_map_file() -> Option<PathBuf> {
    let local = LOCAL_MAP_FILES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file());
    if local.is_some() {
        return local;
    }

    let home = std::env::var("HOME").ok()?;
    let config_dir = PathBuf::from(home).join(".config").join("dirclean");
    ["extensions.json", "extensions.toml"]
        .iter()
        .map(|name| config_dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_map_parses() {
        let map = CategoryMap::from_json_str(BUILTIN_MAP).expect("built-in map should parse");
        assert_eq!(map.lookup(".png"), "Images");
        assert_eq!(map.lookup(".pdf"), "Documents");
        assert_eq!(map.lookup(".mp3"), "Audio");
        assert_eq!(map, CategoryMap::builtin());
    }

    #[test]
    fn test_lookup_configured_extensions() {
        let map =
            CategoryMap::from_json_str(r#"{"Images": [".png", ".jpg"], "Documents": [".pdf"]}"#)
                .unwrap();
        assert_eq!(map.lookup(".png"), "Images");
        assert_eq!(map.lookup(".jpg"), "Images");
        assert_eq!(map.lookup(".pdf"), "Documents");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_lookup_defaults_to_others() {
        let map = CategoryMap::from_json_str(r#"{"Documents": [".pdf"]}"#).unwrap();
        assert_eq!(map.lookup(".xyz"), DEFAULT_CATEGORY);
        assert_eq!(map.lookup(""), DEFAULT_CATEGORY);
        assert_eq!(map.lookup("."), DEFAULT_CATEGORY);
        assert_eq!(map.get(".xyz"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let map = CategoryMap::from_json_str(r#"{"Images": [".jpg"]}"#).unwrap();
        assert_eq!(map.lookup(".jpg"), "Images");
        assert_eq!(map.lookup(".JPG"), DEFAULT_CATEGORY);
        assert_eq!(map.lookup(".Jpg"), DEFAULT_CATEGORY);

        let both = CategoryMap::from_json_str(r#"{"Images": [".jpg", ".JPG"]}"#).unwrap();
        assert_eq!(both.lookup(".JPG"), "Images");
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn test_extensions_without_leading_dot() {
        let map = CategoryMap::from_json_str(r#"{"Documents": ["pdf"]}"#).unwrap();
        assert_eq!(map.lookup(".pdf"), "Documents");
        assert_eq!(map.lookup("pdf"), "Documents");
    }

    #[test]
    fn test_from_toml_str() {
        let map = CategoryMap::from_toml_str(
            r#"
            Images = [".png"]
            "Office Files" = [".docx", ".xlsx"]
            "#,
        )
        .unwrap();
        assert_eq!(map.lookup(".png"), "Images");
        assert_eq!(map.lookup(".xlsx"), "Office Files");
        assert_eq!(map.categories(), vec!["Images", "Office Files"]);
    }

    #[test]
    fn test_malformed_json_structure() {
        let cases = [
            r#"["Images", ".png"]"#,
            r#"{"Images": ".png"}"#,
            r#"{"Images": [1, 2]}"#,
            r#"{"Images": [".png""#,
        ];
        for case in cases {
            let result = CategoryMap::from_json_str(case);
            assert!(
                matches!(result, Err(ConfigError::Malformed(_))),
                "expected malformed error for {}",
                case
            );
        }
    }

    #[test]
    fn test_malformed_toml_structure() {
        let result = CategoryMap::from_toml_str("Images = \".png\"");
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_empty_extension_rejected() {
        let result = CategoryMap::from_json_str(r#"{"Images": [""]}"#);
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_invalid_category_names_rejected() {
        for name in ["", "..", "a/b", "a\\b"] {
            let json = format!(r#"{{"{}": [".png"]}}"#, name.replace('\\', "\\\\"));
            let result = CategoryMap::from_json_str(&json);
            assert!(
                matches!(result, Err(ConfigError::InvalidCategory { .. })),
                "expected invalid category for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_duplicate_extension_last_category_wins() {
        let map = CategoryMap::from_json_str(r#"{"A": [".txt"], "B": [".txt"]}"#).unwrap();
        assert_eq!(map.lookup(".txt"), "B");

        let map = CategoryMap::from_json_str(r#"{"Text": [".txt"], "Documents": ["txt"]}"#)
            .unwrap();
        assert_eq!(map.lookup(".txt"), "Documents");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_duplicate_extension_in_toml_follows_file_order() {
        let map = CategoryMap::from_toml_str(
            r#"
            Text = [".txt"]
            Documents = [".txt"]
            "#,
        )
        .unwrap();
        assert_eq!(map.lookup(".txt"), "Documents");
    }

    #[test]
    fn test_repeated_extension_in_same_category_is_fine() {
        let map = CategoryMap::from_json_str(r#"{"Images": [".png", "png"]}"#).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing.json");
        assert!(matches!(
            CategoryMap::from_file(&path),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_from_file_unreadable_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        assert!(matches!(
            CategoryMap::from_file(temp_dir.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_from_file_picks_parser_by_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let json_path = temp_dir.path().join("map.json");
        fs::write(&json_path, r#"{"Images": [".png"]}"#).unwrap();
        assert_eq!(
            CategoryMap::from_file(&json_path).unwrap().lookup(".png"),
            "Images"
        );

        let toml_path = temp_dir.path().join("map.toml");
        fs::write(&toml_path, r#"Images = [".png"]"#).unwrap();
        assert_eq!(
            CategoryMap::from_file(&toml_path).unwrap().lookup(".png"),
            "Images"
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("map.json");
        fs::write(&path, r#"{"Docs": [".pdf"]}"#).unwrap();

        let map = CategoryMap::load(Some(&path)).unwrap();
        assert_eq!(map.lookup(".pdf"), "Docs");

        let missing = temp_dir.path().join("nope.json");
        assert!(CategoryMap::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_empty_map_sends_everything_to_others() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "{}").unwrap();

        let map = CategoryMap::load(Some(&path)).unwrap();
        assert!(map.is_empty());
        assert!(map.categories().is_empty());
        assert_eq!(map.lookup(".pdf"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PDF"), Some(".PDF".to_string()));
        assert_eq!(normalize_extension("pdf"), Some(".pdf".to_string()));
        assert_eq!(normalize_extension(" .gz "), Some(".gz".to_string()));
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("."), None);
    }
}
