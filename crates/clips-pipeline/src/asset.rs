//! Source asset handle.

use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

/// In-memory handle to the user-selected raw video.
///
/// Owns the locally-addressable preview URL for its lifetime. The URL
/// is released exactly once, on pipeline reset or terminal success —
/// never on intermediate stage transitions, since the preview element
/// needs it throughout.
#[derive(Debug)]
pub struct SourceAsset {
    path: PathBuf,
    media_type: String,
    duration: f64,
    preview_url: Option<Url>,
}

impl SourceAsset {
    /// Wrap an accepted selection whose duration has been probed.
    pub fn new(path: PathBuf, media_type: String, duration: f64) -> Self {
        let preview_url = Url::from_file_path(&path).ok();
        Self {
            path,
            media_type,
            duration,
            preview_url,
        }
    }

    /// Path of the raw source bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Probed duration in seconds (finite by construction).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Preview URL, `None` once released.
    pub fn preview_url(&self) -> Option<&Url> {
        self.preview_url.as_ref()
    }

    /// Revoke the preview URL. Returns `true` the first time; further
    /// calls are no-ops.
    pub fn release(&mut self) -> bool {
        match self.preview_url.take() {
            Some(url) => {
                debug!(%url, "preview URL released");
                true
            }
            None => false,
        }
    }
}
