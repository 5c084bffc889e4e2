//! Zip archive writer for mod_sorter
//!
//! Each descriptor becomes one entry (jar files) or one entry per regular
//! file (directory mods, stored under `<dir name>/`).

use crate::core::error::{Result, ResultExt, SortError};
use crate::core::models::ItemDescriptor;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Convert Windows backslashes to the forward slashes zip entry names use.
pub fn normalize_path_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Entries this large need ZIP64 headers
fn needs_zip64(size: u64) -> bool {
    size >= u64::from(u32::MAX)
}

/// A followed symlink whose target is gone. Loops are not included.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    if err.loop_ancestor().is_some() {
        return false;
    }
    let not_found = err
        .io_error()
        .map(|e| e.kind() == io::ErrorKind::NotFound)
        .unwrap_or(false);
    not_found
        && err
            .path()
            .and_then(|p| fs::symlink_metadata(p).ok())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}

/// Write every descriptor's source into a new zip at `target`.
///
/// An empty slice still produces a valid, empty archive. On failure the
/// partially written file is removed and the error is returned.
pub fn write_archive(target: &Path, descriptors: &[ItemDescriptor]) -> Result<()> {
    let result = write_entries(target, descriptors);
    if result.is_err() && target.exists() {
        if let Err(e) = fs::remove_file(target) {
            log::warn!("Could not remove partial archive {}: {}", target.display(), e);
        }
    }
    result
}

fn write_entries(target: &Path, descriptors: &[ItemDescriptor]) -> Result<()> {
    let file = File::create(target).context(format!("creating {}", target.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for descriptor in descriptors {
        add_source(&mut zip, target, descriptor.source_path(), options)?;
    }

    let mut writer = zip.finish().map_err(|source| SortError::Archive {
        path: target.to_path_buf(),
        source,
    })?;
    writer
        .flush()
        .context(format!("flushing {}", target.display()))?;
    Ok(())
}

fn add_source<W: Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    target: &Path,
    source: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let base_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            SortError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("source has no file name: {}", source.display()),
            ))
        })?;

    if !source.is_dir() {
        return add_file(zip, target, source, &base_name, options);
    }

    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_dangling_link(&err) => {
                log::debug!("Skipping dangling link {:?}", err.path());
                continue;
            }
            Err(err) => {
                return Err(SortError::from(io::Error::from(err))
                    .with_context(format!("walking {}", source.display())))
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let entry_name = format!(
            "{}/{}",
            base_name,
            normalize_path_separators(&relative.to_string_lossy())
        );
        add_file(zip, target, entry.path(), &entry_name, options)?;
    }

    Ok(())
}

fn add_file<W: Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    target: &Path,
    path: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut input = File::open(path).context(format!("opening {}", path.display()))?;
    let size = input
        .metadata()
        .context(format!("inspecting {}", path.display()))?
        .len();
    let options = options.large_file(needs_zip64(size));
    zip.start_file(entry_name, options)
        .map_err(|source| SortError::Archive {
            path: target.to_path_buf(),
            source,
        })?;
    io::copy(&mut input, zip).context(format!("copying {} into archive", path.display()))?;
    log::debug!("Added {} to {}", entry_name, target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Category;
    use std::io::Read;
    use tempfile::TempDir;

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    fn read_entry(path: &Path, name: &str) -> Vec<u8> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        bytes
    }

    fn descriptor(path: &Path) -> ItemDescriptor {
        ItemDescriptor::new("id", "", "1.0", path, Category::Universal)
    }

    #[test]
    fn test_normalize_path_separators() {
        assert_eq!(normalize_path_separators(r"assets\lang\en_us.json"), "assets/lang/en_us.json");
        assert_eq!(normalize_path_separators("already/fine"), "already/fine");
    }

    #[test]
    fn test_needs_zip64() {
        assert!(!needs_zip64(0));
        assert!(!needs_zip64(u64::from(u32::MAX) - 1));
        assert!(needs_zip64(u64::from(u32::MAX)));
        assert!(needs_zip64(5 * 1024 * 1024 * 1024));
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("empty.zip");
        write_archive(&target, &[]).unwrap();

        assert!(fs::metadata(&target).unwrap().len() > 0);
        assert!(entry_names(&target).is_empty());
    }

    #[test]
    fn test_single_file_entry() {
        let temp = TempDir::new().unwrap();
        let jar = temp.path().join("sodium.jar");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(&jar, &bytes).unwrap();

        let target = temp.path().join("out.zip");
        write_archive(&target, &[descriptor(&jar)]).unwrap();

        assert_eq!(entry_names(&target), vec!["sodium.jar"]);
        assert_eq!(read_entry(&target, "sodium.jar"), bytes);
    }

    #[test]
    fn test_directory_entries() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("devmod");
        fs::create_dir_all(dir.join("assets/lang")).unwrap();
        fs::create_dir_all(dir.join("empty")).unwrap();
        fs::write(dir.join("fabric.mod.json"), "{}").unwrap();
        fs::write(dir.join("assets/lang/en_us.json"), "{\"k\":\"v\"}").unwrap();

        let target = temp.path().join("out.zip");
        write_archive(&target, &[descriptor(&dir)]).unwrap();

        let mut names = entry_names(&target);
        names.sort();
        assert_eq!(names, vec!["devmod/assets/lang/en_us.json", "devmod/fabric.mod.json"]);
        assert_eq!(read_entry(&target, "devmod/assets/lang/en_us.json"), b"{\"k\":\"v\"}");
    }

    #[test]
    fn test_missing_source_fails_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.zip");
        let missing = temp.path().join("gone.jar");

        let err = write_archive(&target, &[descriptor(&missing)]).unwrap_err();
        assert!(err.to_string().contains("gone.jar"));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_followed() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("linked");
        fs::create_dir(&dir).unwrap();
        let real = temp.path().join("real.txt");
        fs::write(&real, "payload").unwrap();
        std::os::unix::fs::symlink(&real, dir.join("alias.txt")).unwrap();

        let target = temp.path().join("out.zip");
        write_archive(&target, &[descriptor(&dir)]).unwrap();
        assert_eq!(read_entry(&target, "linked/alias.txt"), b"payload");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("devmod");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("fabric.mod.json"), "{}").unwrap();
        std::os::unix::fs::symlink(temp.path().join("nowhere"), dir.join("broken")).unwrap();

        let target = temp.path().join("out.zip");
        write_archive(&target, &[descriptor(&dir)]).unwrap();
        assert_eq!(entry_names(&target), vec!["devmod/fabric.mod.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_is_skipped() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("devmod");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), "a").unwrap();
        let status = std::process::Command::new("mkfifo")
            .arg(dir.join("pipe"))
            .status()
            .unwrap();
        assert!(status.success());

        let target = temp.path().join("out.zip");
        write_archive(&target, &[descriptor(&dir)]).unwrap();
        assert_eq!(entry_names(&target), vec!["devmod/a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_fails_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("devmod");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(&dir, dir.join("z-loop")).unwrap();

        let target = temp.path().join("out.zip");
        let err = write_archive(&target, &[descriptor(&dir)]).unwrap_err();
        assert!(err.to_string().contains("walking"));
        assert!(!target.exists());
    }
}
