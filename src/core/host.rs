//! Mod discovery for mod_sorter
//!
//! This module provides the ModHost trait, the seam through which the sorter
//! learns where mods live and which mods are installed, plus a filesystem
//! implementation that reads `fabric.mod.json` manifests from a mods directory.

use crate::core::error::{Result, ResultExt, SortError};
use crate::core::models::SorterConfig;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Manifest file every Fabric mod carries at its root
pub const MANIFEST_FILE: &str = "fabric.mod.json";

/// Metadata of one discoverable mod, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModInfo {
    /// Unique mod id
    pub id: String,
    /// Display name (may be blank)
    pub name: String,
    /// Version label
    pub version: String,
    /// Jar files or directories the mod was loaded from
    pub origins: Vec<PathBuf>,
    /// Declared environment (`client`, `server`, `*`), if any
    pub environment: Option<String>,
}

impl ModInfo {
    /// Create a ModInfo with an id and version
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an origin path
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origins.push(origin.into());
        self
    }

    /// Set the declared environment
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

/// Trait for the host environment that owns the installed mods
///
/// This trait allows for mocking in tests and alternative implementations
/// (e.g., a running mod loader instead of a directory scan).
#[cfg_attr(test, automock)]
pub trait ModHost: Send + Sync {
    /// Directory that holds the installed mods
    fn source_root(&self) -> PathBuf;

    /// Enumerate every mod the host knows about
    fn list_mods(&self) -> Result<Vec<ModInfo>>;
}

/// The subset of `fabric.mod.json` the sorter reads
#[derive(Debug, Deserialize)]
struct FabricManifest {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    environment: Option<String>,
}

/// Host that scans `<game_dir>/<mods_dir>` on disk
///
/// Direct children are considered: `.jar` files with a manifest inside the
/// archive, and directories with a manifest at their root. Anything else is
/// not a mod and is skipped.
pub struct FsModHost {
    source_root: PathBuf,
}

impl FsModHost {
    /// Create a host for a game directory
    pub fn new(game_dir: &Path, config: &SorterConfig) -> Self {
        Self {
            source_root: game_dir.join(&config.mods_dir),
        }
    }

    /// Create a host that scans the given mods directory directly
    pub fn from_mods_dir(mods_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: mods_dir.into(),
        }
    }

    /// Read the raw manifest of a mod, `None` when it has none
    fn read_manifest(path: &Path) -> Result<Option<String>> {
        let metadata = fs::metadata(path).context(format!("inspecting {}", path.display()))?;

        if metadata.is_dir() {
            let manifest = path.join(MANIFEST_FILE);
            if !manifest.is_file() {
                return Ok(None);
            }
            let content = fs::read_to_string(&manifest)
                .context(format!("reading {}", manifest.display()))?;
            return Ok(Some(content));
        }

        if !metadata.is_file() || !is_jar(path) {
            return Ok(None);
        }

        let file = fs::File::open(path).context(format!("opening {}", path.display()))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| SortError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
        let mut entry = match archive.by_name(MANIFEST_FILE) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(source) => {
                return Err(SortError::Archive {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| SortError::metadata(path, e.to_string()))?;
        Ok(Some(content))
    }

    fn parse_manifest(path: &Path, content: &str) -> Result<ModInfo> {
        let manifest: FabricManifest =
            serde_json::from_str(content).map_err(|e| SortError::metadata(path, e.to_string()))?;
        if manifest.id.trim().is_empty() {
            return Err(SortError::metadata(path, "empty mod id"));
        }

        let mut info = ModInfo::new(manifest.id, manifest.version.unwrap_or_default())
            .with_name(manifest.name.unwrap_or_default())
            .with_origin(path);
        info.environment = manifest.environment;
        Ok(info)
    }
}

impl ModHost for FsModHost {
    fn source_root(&self) -> PathBuf {
        self.source_root.clone()
    }

    fn list_mods(&self) -> Result<Vec<ModInfo>> {
        if !self.source_root.is_dir() {
            return Ok(Vec::new());
        }

        let mut children = Vec::new();
        for entry in fs::read_dir(&self.source_root)
            .context(format!("listing {}", self.source_root.display()))?
        {
            let entry = entry.context(format!("listing {}", self.source_root.display()))?;
            children.push(entry.path());
        }
        children.sort();

        let mut mods = Vec::new();
        for path in children {
            match Self::read_manifest(&path)? {
                Some(content) => mods.push(Self::parse_manifest(&path, &content)?),
                None => log::debug!("Skipping {} (no {})", path.display(), MANIFEST_FILE),
            }
        }

        log::debug!("Found {} mods in {}", mods.len(), self.source_root.display());
        Ok(mods)
    }
}

fn is_jar(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jar"))
        .unwrap_or(false)
}
