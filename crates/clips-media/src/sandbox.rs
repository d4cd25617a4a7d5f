//! Sandboxed scratch filesystem for the transcode engine.
//!
//! Every invocation operates on the same three fixed entry names
//! inside a private temporary directory. The engine instance persists
//! for a whole session, so the sandbox is cleared after every
//! invocation, success or failure, and nothing leaks across runs.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::MediaResult;

/// Fixed name the source bytes are written under.
pub const INPUT_NAME: &str = "input.mp4";
/// Fixed name of the trimmed output container.
pub const OUTPUT_NAME: &str = "output.mp4";
/// Fixed name of the extracted still frame.
pub const THUMBNAIL_NAME: &str = "thumbnail.jpg";

/// Private scratch directory with the engine's fixed entry names.
#[derive(Debug)]
pub struct EngineSandbox {
    dir: tempfile::TempDir,
}

impl EngineSandbox {
    /// Create a fresh sandbox directory.
    pub fn new() -> MediaResult<Self> {
        let dir = tempfile::Builder::new().prefix("clips-engine-").tempdir()?;
        debug!(path = %dir.path().display(), "engine sandbox created");
        Ok(Self { dir })
    }

    /// Sandbox root path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the fixed input entry.
    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join(INPUT_NAME)
    }

    /// Path of the fixed trimmed-output entry.
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_NAME)
    }

    /// Path of the fixed thumbnail entry.
    pub fn thumbnail_path(&self) -> PathBuf {
        self.dir.path().join(THUMBNAIL_NAME)
    }

    /// Write the source bytes under the fixed input name.
    pub async fn write_input(&self, bytes: &[u8]) -> MediaResult<()> {
        fs::write(self.input_path(), bytes).await?;
        Ok(())
    }

    /// Read the trimmed output back out.
    pub async fn read_output(&self) -> MediaResult<Vec<u8>> {
        Ok(fs::read(self.output_path()).await?)
    }

    /// Read the thumbnail back out.
    pub async fn read_thumbnail(&self) -> MediaResult<Vec<u8>> {
        Ok(fs::read(self.thumbnail_path()).await?)
    }

    /// Remove all fixed entries, whichever of them exist.
    ///
    /// Idempotent: entries a failed invocation never produced are
    /// skipped; any other IO failure surfaces.
    pub async fn clear(&self) -> MediaResult<()> {
        for path in [self.input_path(), self.output_path(), self.thumbnail_path()] {
            match fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "sandbox entry removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
