//! Core module for mod_sorter
//!
//! This module provides the types and components of the sorting pipeline.
//!
//! # Architecture
//!
//! - `models`: Core data structures (Category, ItemDescriptor, SortResult, SorterConfig)
//! - `error`: Error types using thiserror
//! - `host`: ModHost trait + filesystem host reading `fabric.mod.json`
//! - `classifier`: environment tag → Category
//! - `collector`: host mod list → sorted descriptors
//! - `unique_path`: collision-free archive names
//! - `archive`: zip writer
//! - `sorter`: ModSorter orchestration

pub mod models;
pub mod error;
pub mod host;
pub mod classifier;
pub mod collector;
pub mod unique_path;
pub mod archive;
pub mod sorter;

// Re-export commonly used types
pub use models::{Category, ItemDescriptor, SortResult, SorterConfig};
pub use error::{SortError, Result, ResultExt};
pub use host::{ModHost, ModInfo, FsModHost};
pub use classifier::classify;
pub use collector::collect_descriptors;
pub use unique_path::ensure_unique;
pub use archive::write_archive;
pub use sorter::{ModSorter, archive_file_name};
