//! Reads G-code files from disk and hands their text to the extractor.

use std::{io, path::Path};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::gcode::{extract_metadata, GcodeMetadata, MissingMetadataError};

/// File extensions slicers use for G-code output.
pub const GCODE_EXTENSIONS: [&str; 3] = ["gcode", "gco", "g"];

#[derive(Debug, Error)]
pub enum GcodeLoadError {
    #[error("could not read file: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    MissingMetadata(#[from] MissingMetadataError),
}

pub fn has_gcode_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            GCODE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Loads `path` and extracts its slicer metadata.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; slicer
/// comments are ASCII, so the markers survive.
pub async fn read_gcode_metadata(path: impl AsRef<Path>) -> Result<GcodeMetadata, GcodeLoadError> {
    let path = path.as_ref();
    if !has_gcode_extension(path) {
        warn!(path = %path.display(), "file does not have a G-code extension");
    }

    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "read g-code file");

    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), "g-code file is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };

    Ok(extract_metadata(&content)?)
}
