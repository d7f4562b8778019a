//! Parsing of the `|`-separated name and index filters.

use archive_core::error::AppError;

/// Separator used by the request surface for multi-valued filters.
pub const FILTER_SEPARATOR: char = '|';

/// Split a `|`-separated list of base names, dropping empty segments.
pub fn parse_name_filter(raw: &str) -> Vec<String> {
    raw.split(FILTER_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a `|`-separated list of 1-based entry indices.
///
/// Indices are plain base-10 integers. Empty segments are dropped; anything
/// that is not a positive integer up to `i32::MAX` is rejected.
pub fn parse_index_filter(raw: &str) -> Result<Vec<u32>, AppError> {
    raw.split(FILTER_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u32>() {
            Ok(i) if i > 0 && i32::try_from(i).is_ok() => Ok(i),
            _ => Err(AppError::validation(format!(
                "partialExtraction entry '{s}' is not a 1-based index"
            ))),
        })
        .collect()
}

/// Last path component of `name` with its final extension removed.
///
/// `docs/report.tar.gz` becomes `report.tar`; names without a dot are
/// returned unchanged. Both `/` and `\` count as separators because zip
/// entries written on Windows may use either.
pub fn base_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['/', '\\']);
    let file = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    match file.rfind('.') {
        Some(pos) => &file[..pos],
        None => file,
    }
}

/// Full stored name of an entry with the final extension of its last
/// component removed.
///
/// `docs/three.md` becomes `docs/three`; dots in directory names are kept.
pub fn path_stem(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['/', '\\']);
    let file_start = trimmed.rfind(['/', '\\']).map_or(0, |pos| pos + 1);
    match trimmed[file_start..].rfind('.') {
        Some(pos) => &trimmed[..file_start + pos],
        None => trimmed,
    }
}
