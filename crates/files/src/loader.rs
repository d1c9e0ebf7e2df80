//! Reading candidate files from the local filesystem.

use crate::constants::FALLBACK_MIME_TYPE;
use crate::{FileCandidate, FilesError};
use std::fs;
use std::path::Path;

/// Detect the media type from content (infer), falling back to the file extension
/// (mime_guess) and finally to `application/octet-stream`.
pub fn detect_mime_type(path: &Path, contents: &[u8]) -> String {
    if let Some(kind) = infer::get(contents) {
        return kind.mime_type().to_owned();
    }

    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.essence_str().to_owned();
    }

    FALLBACK_MIME_TYPE.to_owned()
}

/// Reads `path` into a [`FileCandidate`].
///
/// The candidate is not checked against any rules here; that happens when it is staged.
///
/// # Errors
///
/// Returns `FilesError` if:
/// - the path has no file name or is not a regular file
/// - the file cannot be read
pub fn load_candidate(path: &Path) -> Result<FileCandidate, FilesError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FilesError::InvalidPath(format!("No file name: {}", path.display())))?
        .to_owned();

    if !path.is_file() {
        return Err(FilesError::InvalidPath(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }

    let contents = fs::read(path).map_err(|e| {
        FilesError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    let mime_type = detect_mime_type(path, &contents);
    tracing::debug!("loaded {} as {} ({} bytes)", name, mime_type, contents.len());

    Ok(FileCandidate::new(name, mime_type, contents))
}
