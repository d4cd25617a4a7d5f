//! Processor seam between the pipeline and the transcode engine.

use std::path::Path;

use async_trait::async_trait;

use clips_media::{MediaResult, TranscodeEngine};
use clips_models::{ProcessedOutput, TimeRange};

/// The narrow surface the pipeline needs from a media engine: probe a
/// source's duration, trim + extract a still frame, and tear down.
#[async_trait]
pub trait ClipProcessor: Send + Sync + 'static {
    /// Probe the source's duration in seconds; must be finite.
    async fn probe(&self, source: &Path) -> MediaResult<f64>;

    /// Trim the selected range out of the source and extract a
    /// thumbnail. At most one invocation in flight per instance.
    async fn process(&self, source: &Path, range: TimeRange) -> MediaResult<ProcessedOutput>;

    /// Abort an in-flight invocation.
    fn cancel(&self);

    /// Release the engine's resources; called on every teardown path.
    async fn shutdown(&self);
}

#[async_trait]
impl ClipProcessor for TranscodeEngine {
    async fn probe(&self, source: &Path) -> MediaResult<f64> {
        clips_media::get_duration(source).await
    }

    async fn process(&self, source: &Path, range: TimeRange) -> MediaResult<ProcessedOutput> {
        let bytes = tokio::fs::read(source).await?;
        TranscodeEngine::process(self, &bytes, &range).await
    }

    fn cancel(&self) {
        TranscodeEngine::cancel(self);
    }

    async fn shutdown(&self) {
        TranscodeEngine::shutdown(self).await;
    }
}
