//! Selection of the files or entries a job operates on.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use archive_codec::ArchiveEntry;
use archive_entity::job::{base_name, path_stem};

/// A regular file found in a job's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// File name relative to the directory.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// List the non-directory entries of `dir`, sorted by file name.
pub fn list_candidates(dir: &Path) -> io::Result<Vec<FileCandidate>> {
    let mut candidates = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            continue;
        }
        candidates.push(FileCandidate {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
        });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

/// Pick the files to compress.
///
/// With a name filter, the first candidate for each listed base name is
/// taken, in listing order. Without one, the largest candidates are taken, largest
/// first. Either way `target` is never included and at most `limit` names
/// are returned.
pub fn select_for_compress(
    candidates: &[FileCandidate],
    filter: &[String],
    target: &str,
    limit: usize,
) -> Vec<String> {
    let eligible = candidates.iter().filter(|c| c.name != target);

    if !filter.is_empty() {
        let mut wanted: HashSet<&str> = filter.iter().map(String::as_str).collect();
        return eligible
            .filter(|c| wanted.remove(base_name(&c.name)))
            .take(limit)
            .map(|c| c.name.clone())
            .collect();
    }

    let mut by_size: Vec<&FileCandidate> = eligible.collect();
    // Stable: equal sizes keep listing order.
    by_size.sort_by(|a, b| b.size.cmp(&a.size));
    by_size
        .into_iter()
        .take(limit)
        .map(|c| c.name.clone())
        .collect()
}

/// Pick the archive entries to extract, as 0-based indices in archive order.
///
/// A name filter wins over an index filter and selects every entry whose
/// extension-stripped name matches, either as the last path component or as
/// the full stored path. Index filter values are 1-based; values outside the
/// archive select nothing.
pub fn select_for_extract(
    entries: &[ArchiveEntry],
    filter: &[String],
    index_filter: &[usize],
) -> Vec<usize> {
    if !filter.is_empty() {
        let wanted: HashSet<&str> = filter.iter().map(String::as_str).collect();
        return entries
            .iter()
            .filter(|e| {
                wanted.contains(base_name(&e.name)) || wanted.contains(path_stem(&e.name))
            })
            .map(|e| e.index)
            .collect();
    }

    if !index_filter.is_empty() {
        let wanted: HashSet<usize> = index_filter
            .iter()
            .filter(|i| **i > 0)
            .map(|i| i - 1)
            .collect();
        return entries
            .iter()
            .filter(|e| wanted.contains(&e.index))
            .map(|e| e.index)
            .collect();
    }

    entries.iter().map(|e| e.index).collect()
}
