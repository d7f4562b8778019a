//! Archive creation.

use std::fs::File;
use std::io;
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::CodecError;

/// Write `file_names` from `source_dir` into a new zip archive at `destination`.
///
/// Any existing file at `destination` is truncated. Entries are written in
/// the order given, each under its exact file name. A failure leaves the
/// partially written archive in place; callers treat it as invalid.
pub fn compress(
    destination: &Path,
    source_dir: &Path,
    file_names: &[String],
) -> Result<(), CodecError> {
    let file = File::create(destination).map_err(|e| CodecError::open(destination, e))?;
    let mut writer = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for name in file_names {
        let source_path = source_dir.join(name);
        let mut source = File::open(&source_path).map_err(|e| CodecError::entry(name, e))?;

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| CodecError::entry(name, e))?;
        let bytes = io::copy(&mut source, &mut writer).map_err(|e| CodecError::entry(name, e))?;

        tracing::debug!(entry = %name, bytes, "Added archive entry");
    }

    writer
        .finish()
        .map_err(|e| CodecError::Finish {
            path: destination.to_path_buf(),
            source: e,
        })?;

    tracing::info!(
        archive = %destination.display(),
        entries = file_names.len(),
        "Archive written"
    );
    Ok(())
}
