//! Archive inspection and extraction.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use zip::ZipArchive;

use crate::error::CodecError;
use crate::path::resolve_within;

/// Permission bits applied when an entry carries none.
const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIR_MODE: u32 = 0o755;

/// One entry of an archive's central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Position in the archive (0-based).
    pub index: usize,
    /// Stored entry name.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>, CodecError> {
    let file = File::open(path).map_err(|e| CodecError::open(path, e))?;
    ZipArchive::new(file).map_err(|e| CodecError::open(path, e))
}

/// List every entry of the archive at `path`, in archive order.
pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>, CodecError> {
    let mut archive = open_archive(path)?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| CodecError::open(path, e))?;
        entries.push(ArchiveEntry {
            index,
            name: entry.name().to_string(),
            is_dir: entry.is_dir(),
            size: entry.size(),
        });
    }

    Ok(entries)
}

/// Extract the entries at `selected` (0-based indices) from `archive_path`
/// into `destination`.
///
/// Entries are processed in archive order regardless of the order of
/// `selected`. The first entry that resolves outside `destination` aborts
/// the whole extraction with [`CodecError::PathTraversal`]; nothing after
/// it is written.
pub fn decompress(
    archive_path: &Path,
    destination: &Path,
    selected: &[usize],
) -> Result<(), CodecError> {
    let mut archive = open_archive(archive_path)?;

    let mut indices = selected.to_vec();
    indices.sort_unstable();
    indices.dedup();

    for index in indices {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| CodecError::entry(format!("#{}", index + 1), e))?;
        let name = entry.name().to_string();

        let out_path = resolve_within(destination, &name)
            .ok_or_else(|| CodecError::PathTraversal { name: name.clone() })?;

        let mode = entry.unix_mode().map(|m| m & 0o7777);

        if entry.is_dir() {
            create_dir(&out_path, mode.unwrap_or(DEFAULT_DIR_MODE))
                .map_err(|e| CodecError::entry(&name, e))?;
            tracing::debug!(path = %out_path.display(), "Directory created");
        } else {
            if let Some(parent) = out_path.parent() {
                create_dir(parent, DEFAULT_DIR_MODE).map_err(|e| CodecError::entry(&name, e))?;
            }
            let mut output = create_file(&out_path, mode.unwrap_or(DEFAULT_FILE_MODE))
                .map_err(|e| CodecError::entry(&name, e))?;
            let bytes = io::copy(&mut entry, &mut output).map_err(|e| CodecError::entry(&name, e))?;
            tracing::debug!(entry = %name, bytes, "File extracted");
        }
    }

    Ok(())
}

#[cfg(unix)]
fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn create_file(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn create_file(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
