//! Sort orchestration
//!
//! [`ModSorter`] is the single entry point: it validates the mods directory,
//! collects descriptors, and writes one archive per [`Category`].
//!
//! # Output layout
//!
//! ```text
//! <mods dir>/
//! └── mod-client-or-server/
//!     ├── client-mods-20240101-120000.zip
//!     ├── server-mods-20240101-120000.zip
//!     └── both-mods-20240101-120000.zip
//! ```

use crate::core::archive::write_archive;
use crate::core::collector::{collect_descriptors, normalize_path};
use crate::core::error::{Result, ResultExt, SortError};
use crate::core::host::ModHost;
use crate::core::models::{Category, ItemDescriptor, SortResult, SorterConfig};
use crate::core::unique_path::ensure_unique;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Timestamp format embedded in archive names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Noun between the category tag and the timestamp in archive names
const ITEMS_NOUN: &str = "mods";

/// Archive file name for a category at a given time
pub fn archive_file_name(category: Category, timestamp: &DateTime<Local>) -> String {
    format!(
        "{}-{}-{}.zip",
        category.tag(),
        ITEMS_NOUN,
        timestamp.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Sorts the mods of a host into per-category zip archives.
///
/// Runs are synchronous and must not overlap for the same mods directory.
pub struct ModSorter<H: ModHost> {
    host: H,
    config: SorterConfig,
}

impl<H: ModHost> ModSorter<H> {
    /// Create a sorter with default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, SorterConfig::default())
    }

    /// Create a sorter with a custom configuration
    pub fn with_config(host: H, config: SorterConfig) -> Self {
        Self { host, config }
    }

    /// Active configuration
    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Run the sort and return a snapshot of what was written.
    ///
    /// Fails without creating anything when the mods directory is missing.
    /// Any later failure aborts the run; archives already written stay on disk.
    pub fn sort(&self) -> Result<SortResult> {
        let source_root = normalize_path(&self.host.source_root());
        if !source_root.exists() {
            return Err(SortError::SourceNotFound { path: source_root });
        }
        log::info!("Sorting mods in {}", source_root.display());

        let mods = self.host.list_mods()?;
        let descriptors = collect_descriptors(&mods, &source_root, &self.config.self_id);
        let mut grouped = group_by_category(descriptors);

        let output_dir = source_root.join(&self.config.output_dir);
        fs::create_dir_all(&output_dir).context(format!("creating {}", output_dir.display()))?;
        let timestamp = Local::now();

        let mut archives: BTreeMap<Category, PathBuf> = BTreeMap::new();
        for category in Category::ALL {
            let base = output_dir.join(archive_file_name(category, &timestamp));
            let target = ensure_unique(&base, self.config.max_unique_suffix)?;
            let members = grouped.entry(category).or_default();
            write_archive(&target, members)?;
            log::info!(
                "{}: {} mods -> {}",
                category.label(),
                members.len(),
                target.display()
            );
            archives.insert(category, target);
        }

        Ok(SortResult::new(grouped, archives, output_dir, timestamp))
    }
}

/// Group sorted descriptors, keeping their order. Every category gets an entry.
fn group_by_category(descriptors: Vec<ItemDescriptor>) -> BTreeMap<Category, Vec<ItemDescriptor>> {
    let mut grouped: BTreeMap<Category, Vec<ItemDescriptor>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
    for descriptor in descriptors {
        grouped
            .entry(descriptor.category())
            .or_default()
            .push(descriptor);
    }
    grouped
}
