//! Core data models for mod_sorter
//!
//! This module contains the fundamental data structures used throughout the sorter.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, ResultExt, SortError};

/// Identifier of this tool when it is installed as a mod itself
pub const SELF_MOD_ID: &str = "mod-client-or-server";

/// Name of the output subdirectory created under the mods directory
pub const DEFAULT_OUTPUT_DIR: &str = "mod-client-or-server";

/// Default mods directory, relative to the game directory
pub const DEFAULT_MODS_DIR: &str = "mods";

/// Default file name of the per-game-directory config
pub const CONFIG_FILE_NAME: &str = ".mod_sorter_config.json";

/// Upper bound on `-N` suffixes tried when an archive name is taken
pub const DEFAULT_MAX_UNIQUE_SUFFIX: u32 = 10_000;

/// Runtime side a mod declares it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Only needed on the client
    ClientOnly,
    /// Only needed on a dedicated server
    ServerOnly,
    /// Needed on both sides (fallback)
    #[default]
    Universal,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 3] = [Category::ClientOnly, Category::ServerOnly, Category::Universal];

    /// Short tag used in archive file names
    pub fn tag(&self) -> &'static str {
        match self {
            Category::ClientOnly => "client",
            Category::ServerOnly => "server",
            Category::Universal => "both",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::ClientOnly => "Client-only",
            Category::ServerOnly => "Server-only",
            Category::Universal => "Universal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized, immutable record of one installed mod
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDescriptor {
    id: String,
    name: String,
    version: String,
    source_path: PathBuf,
    category: Category,
}

impl ItemDescriptor {
    /// Create a descriptor. A blank `name` falls back to `id`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        source_path: impl Into<PathBuf>,
        category: Category,
    ) -> Self {
        let id = id.into();
        let name = name.into();
        let name = if name.trim().is_empty() { id.clone() } else { name };
        Self {
            id,
            name,
            version: version.into(),
            source_path: source_path.into(),
            category,
        }
    }

    /// Mod identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version label
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Jar file or directory the mod was loaded from
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Derived category
    pub fn category(&self) -> Category {
        self.category
    }
}

/// Outcome of one sorting run
///
/// Both maps hold an entry for every [`Category`], including empty ones.
#[derive(Debug, Clone, Serialize)]
pub struct SortResult {
    items: BTreeMap<Category, Vec<ItemDescriptor>>,
    archives: BTreeMap<Category, PathBuf>,
    output_dir: PathBuf,
    timestamp: DateTime<Local>,
}

impl SortResult {
    pub(crate) fn new(
        items: BTreeMap<Category, Vec<ItemDescriptor>>,
        archives: BTreeMap<Category, PathBuf>,
        output_dir: PathBuf,
        timestamp: DateTime<Local>,
    ) -> Self {
        debug_assert!(Category::ALL.iter().all(|c| archives.contains_key(c)));
        Self {
            items,
            archives,
            output_dir,
            timestamp,
        }
    }

    /// Descriptors in a category, sorted by id
    pub fn items(&self, category: Category) -> &[ItemDescriptor] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Archive written for a category
    pub fn archive_path(&self, category: Category) -> &Path {
        &self.archives[&category]
    }

    /// Number of mods in a category
    pub fn count(&self, category: Category) -> usize {
        self.items(category).len()
    }

    /// Number of mods across all categories
    pub fn total_items(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    /// Directory the archives were written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Time the run started; shared by every archive name
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Configuration loaded from .mod_sorter_config.json
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SorterConfig {
    /// Mods directory, relative to the game directory
    #[serde(default = "default_mods_dir")]
    pub mods_dir: String,
    /// Output subdirectory created under the mods directory
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Mod id excluded from sorting
    #[serde(default = "default_self_id")]
    pub self_id: String,
    /// Highest `-N` suffix tried before giving up on a file name
    #[serde(default = "default_max_unique_suffix")]
    pub max_unique_suffix: u32,
}

fn default_mods_dir() -> String {
    DEFAULT_MODS_DIR.to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_self_id() -> String {
    SELF_MOD_ID.to_string()
}

fn default_max_unique_suffix() -> u32 {
    DEFAULT_MAX_UNIQUE_SUFFIX
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            mods_dir: default_mods_dir(),
            output_dir: default_output_dir(),
            self_id: default_self_id(),
            max_unique_suffix: default_max_unique_suffix(),
        }
    }
}

impl SorterConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output subdirectory name
    pub fn with_output_dir(mut self, name: impl Into<String>) -> Self {
        self.output_dir = name.into();
        self
    }

    /// Set the excluded self id
    pub fn with_self_id(mut self, id: impl Into<String>) -> Self {
        self.self_id = id.into();
        self
    }

    /// Set the unique-name suffix bound
    pub fn with_max_unique_suffix(mut self, max: u32) -> Self {
        self.max_unique_suffix = max;
        self
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("reading config {}", path.display()))?;
        let config: SorterConfig = serde_json::from_str(&content)
            .context(format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<game_dir>/.mod_sorter_config.json` if present, defaults otherwise
    pub fn discover(game_dir: &Path) -> Result<Self> {
        let path = game_dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("Loading config from {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values that would escape the mods directory or disable the bound
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("mods_dir", &self.mods_dir),
            ("output_dir", &self.output_dir),
        ] {
            if value.trim().is_empty() {
                return Err(SortError::invalid_config(format!("{} cannot be empty", field)));
            }
            if value.contains('/') || value.contains('\\') || value == ".." || value == "." {
                return Err(SortError::invalid_config(format!(
                    "{} must be a plain directory name, got '{}'",
                    field, value
                )));
            }
        }
        if self.max_unique_suffix == 0 {
            return Err(SortError::invalid_config("max_unique_suffix must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_category_tags() {
        assert_eq!(Category::ClientOnly.tag(), "client");
        assert_eq!(Category::ServerOnly.tag(), "server");
        assert_eq!(Category::Universal.tag(), "both");
    }

    #[test]
    fn test_category_order_and_default() {
        let mut shuffled = vec![Category::Universal, Category::ClientOnly, Category::ServerOnly];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL.to_vec());
        assert_eq!(Category::default(), Category::Universal);
    }

    #[test]
    fn test_descriptor_name_fallback() {
        let blank = ItemDescriptor::new("sodium", "   ", "0.5.8", "mods/sodium.jar", Category::ClientOnly);
        assert_eq!(blank.name(), "sodium");

        let named = ItemDescriptor::new("sodium", "Sodium", "0.5.8", "mods/sodium.jar", Category::ClientOnly);
        assert_eq!(named.name(), "Sodium");
        assert_eq!(named.version(), "0.5.8");
        assert_eq!(named.source_path(), Path::new("mods/sodium.jar"));
    }

    #[test]
    fn test_sort_result_counts() {
        let mut items = BTreeMap::new();
        let mut archives = BTreeMap::new();
        for category in Category::ALL {
            items.insert(category, Vec::new());
            archives.insert(category, PathBuf::from(format!("{}.zip", category.tag())));
        }
        items.get_mut(&Category::ServerOnly).unwrap().push(ItemDescriptor::new(
            "lithium",
            "Lithium",
            "1.0",
            "mods/lithium.jar",
            Category::ServerOnly,
        ));
        let result = SortResult::new(items, archives, PathBuf::from("out"), Local::now());

        assert_eq!(result.total_items(), 1);
        assert_eq!(result.count(Category::ServerOnly), 1);
        assert_eq!(result.count(Category::ClientOnly), 0);
        assert_eq!(result.archive_path(Category::Universal), Path::new("both.zip"));
        assert_eq!(result.items(Category::ServerOnly)[0].id(), "lithium");
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: SorterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SorterConfig::default());
        assert_eq!(config.mods_dir, "mods");
        assert_eq!(config.output_dir, "mod-client-or-server");
        assert_eq!(config.max_unique_suffix, 10_000);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"output_dir": "sorted", "max_unique_suffix": 5}"#;
        let config: SorterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_dir, "sorted");
        assert_eq!(config.max_unique_suffix, 5);
        assert_eq!(config.self_id, SELF_MOD_ID);
    }

    #[test]
    fn test_config_validation() {
        assert!(SorterConfig::default().validate().is_ok());
        assert!(SorterConfig::new().with_output_dir("").validate().is_err());
        assert!(SorterConfig::new().with_output_dir("../escape").validate().is_err());
        assert!(SorterConfig::new().with_max_unique_suffix(0).validate().is_err());
    }

    #[test]
    fn test_config_discover() {
        let temp = TempDir::new().unwrap();
        assert_eq!(SorterConfig::discover(temp.path()).unwrap(), SorterConfig::default());

        fs::write(temp.path().join(CONFIG_FILE_NAME), r#"{"self_id": "my-tool"}"#).unwrap();
        let config = SorterConfig::discover(temp.path()).unwrap();
        assert_eq!(config.self_id, "my-tool");

        fs::write(temp.path().join(CONFIG_FILE_NAME), "not json").unwrap();
        let err = SorterConfig::discover(temp.path()).unwrap_err();
        assert!(matches!(err.root(), SortError::Json(_)));
    }
}
