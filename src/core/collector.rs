//! Descriptor collection
//!
//! Turns the host's mod list into sorted [`ItemDescriptor`]s, keeping only
//! mods that were loaded from the mods directory and still exist on disk.

use crate::core::classifier::classify;
use crate::core::models::ItemDescriptor;
use crate::core::host::ModInfo;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into
/// their parent. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Build descriptors for every eligible mod, sorted by id (case-insensitive, stable).
///
/// A mod is skipped when its id equals `self_id`, when none of its origins
/// lies under `source_root`, or when the matching origin no longer exists.
pub fn collect_descriptors(mods: &[ModInfo], source_root: &Path, self_id: &str) -> Vec<ItemDescriptor> {
    let root = normalize_path(source_root);
    let mut descriptors = Vec::new();

    for info in mods {
        if info.id == self_id {
            continue;
        }

        let origin = info
            .origins
            .iter()
            .map(|path| normalize_path(path))
            .find(|path| path.starts_with(&root));

        let Some(source_path) = origin else {
            log::debug!("Skipping {}: not loaded from {}", info.id, root.display());
            continue;
        };

        if !source_path.exists() {
            log::debug!("Skipping {}: {} no longer exists", info.id, source_path.display());
            continue;
        }

        descriptors.push(ItemDescriptor::new(
            info.id.clone(),
            info.name.clone(),
            info.version.clone(),
            source_path,
            classify(info.environment.as_deref()),
        ));
    }

    descriptors.sort_by_cached_key(|d| d.id().to_lowercase());
    descriptors
}
