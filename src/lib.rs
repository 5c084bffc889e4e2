//! mod_sorter - Sort installed mods into client, server and universal zip sets
//!
//! This library provides the pipeline that inspects a mods directory,
//! classifies every mod by the environment it declares, and writes one zip
//! archive per category. It is designed to be consumed by:
//! - The CLI binary (src/bin/mod_sorter.rs)
//! - Any other front-end that can supply a [`ModHost`]
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/mod_sorter.rs**: Thin wrapper that calls the library
//!
//! # Example
//!
//! ```no_run
//! use mod_sorter::{Category, FsModHost, ModSorter, SorterConfig};
//! use std::path::Path;
//!
//! let config = SorterConfig::default();
//! let host = FsModHost::new(Path::new("/home/me/.minecraft"), &config);
//! let result = ModSorter::with_config(host, config).sort()?;
//! println!("{} client-only mods", result.count(Category::ClientOnly));
//! # Ok::<(), mod_sorter::SortError>(())
//! ```

pub mod core;

pub use crate::core::{
    archive_file_name, classify, collect_descriptors, ensure_unique, write_archive, Category,
    FsModHost, ItemDescriptor, ModHost, ModInfo, ModSorter, Result, SortError, SortResult,
    SorterConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version of the mod_sorter library
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }
}
