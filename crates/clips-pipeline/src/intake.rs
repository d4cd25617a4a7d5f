//! Source intake validation.
//!
//! Two gates before a selection enters the pipeline: the declared
//! media type must be a video type, and the probed duration must be
//! finite. Either rejection returns the flow to source selection with
//! no partial state.

use std::path::{Path, PathBuf};

use crate::error::IntakeError;

/// A user's file selection, from a picker or a drag-drop.
#[derive(Debug, Clone)]
pub struct SourceSelection {
    /// Path of the selected file.
    pub path: PathBuf,
    /// Declared media type, e.g. `video/mp4`.
    pub media_type: String,
}

impl SourceSelection {
    /// Selection with the media type guessed from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = guess_media_type(&path);
        Self { path, media_type }
    }
}

/// Reject any selection whose declared type is not a video type.
pub fn validate_selection(selection: &SourceSelection) -> Result<(), IntakeError> {
    if !selection.media_type.starts_with("video/") {
        return Err(IntakeError::NotAVideo(selection.media_type.clone()));
    }
    Ok(())
}

/// Guess a media type from the file extension, the way a picker
/// declares one.
pub fn guess_media_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
    .to_string()
}
