//! Collision-free output paths

use crate::core::error::{Result, SortError};
use std::fs;
use std::path::{Path, PathBuf};

/// Any directory entry counts as taken, including dangling symlinks
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Return `base` if it is free, otherwise the first free `name-N.ext`
/// sibling with `N` in `1..=max_suffix`.
///
/// The check is not atomic; two writers racing on the same directory can
/// pick the same name.
pub fn ensure_unique(base: &Path, max_suffix: u32) -> Result<PathBuf> {
    if !is_taken(base) {
        return Ok(base.to_path_buf());
    }

    let file_name = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, extension) = match file_name.rfind('.') {
        Some(dot) => file_name.split_at(dot),
        None => (file_name.as_str(), ""),
    };

    for index in 1..=max_suffix {
        let candidate = base.with_file_name(format!("{}-{}{}", stem, index, extension));
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SortError::PathExhausted {
        base: base.to_path_buf(),
        attempts: max_suffix,
    })
}
