//! The staged upload pipeline.
//!
//! One forward-moving stage machine per upload session. The stage enum
//! is the single source of truth; there are no independent
//! `is_processing` / `is_uploading` / `is_success` flags to drift out
//! of agreement.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use clips_media::{MediaError, MediaResult};
use clips_models::{ClipMetadata, PipelineStage, ProcessedOutput, TimeRange};

use crate::asset::SourceAsset;
use crate::error::{IntakeError, PipelineError, PipelineResult};
use crate::intake::{validate_selection, SourceSelection};
use crate::processor::ClipProcessor;
use crate::submit::{CreatedClip, SubmitClient};

/// Drives one upload flow from source selection to completion.
///
/// Owns the engine handle, the source asset, and the processed output;
/// resource rules:
/// - the asset's preview URL is released exactly once, on reset or on
///   terminal success;
/// - processed output is discarded after a successful submission and
///   after a processing failure, but retained across a network failure
///   so resubmission skips the transcode;
/// - at most one transcode invocation is in flight at a time, and a
///   duplicate trim-confirm is dropped.
pub struct UploadPipeline<P: ClipProcessor> {
    processor: Arc<P>,
    client: SubmitClient,
    stage: PipelineStage,
    asset: Option<SourceAsset>,
    range: Option<TimeRange>,
    metadata: Option<ClipMetadata>,
    output: Option<ProcessedOutput>,
    in_flight: Option<JoinHandle<MediaResult<ProcessedOutput>>>,
    created: Option<CreatedClip>,
    last_error: Option<String>,
}

impl<P: ClipProcessor> UploadPipeline<P> {
    /// Create a pipeline around a loaded processor and a submission
    /// client.
    pub fn new(processor: P, client: SubmitClient) -> Self {
        Self {
            processor: Arc::new(processor),
            client,
            stage: PipelineStage::Selecting,
            asset: None,
            range: None,
            metadata: None,
            output: None,
            in_flight: None,
            created: None,
            last_error: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Selected trim range, once a source is loaded.
    pub fn range(&self) -> Option<TimeRange> {
        self.range
    }

    /// Source asset, once a selection has been accepted.
    pub fn asset(&self) -> Option<&SourceAsset> {
        self.asset.as_ref()
    }

    /// Confirmed metadata draft.
    pub fn metadata(&self) -> Option<&ClipMetadata> {
        self.metadata.as_ref()
    }

    /// The created clip after a successful submission.
    pub fn created_clip(&self) -> Option<&CreatedClip> {
        self.created.as_ref()
    }

    /// Most recent user-visible error message.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a transcode invocation is still pending.
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Accept a file selection: `Selecting -> Trimming`.
    ///
    /// Rejections (wrong declared type, unusable duration) leave the
    /// pipeline in `Selecting` with no partial state retained.
    pub async fn select_source(&mut self, selection: SourceSelection) -> PipelineResult<()> {
        if self.stage != PipelineStage::Selecting {
            return Err(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "select a source",
            });
        }

        validate_selection(&selection)?;

        let duration = match self.processor.probe(&selection.path).await {
            Ok(d) => d,
            Err(MediaError::NonFiniteDuration) => {
                self.record_error(IntakeError::UnusableDuration.to_string());
                return Err(IntakeError::UnusableDuration.into());
            }
            Err(e) => {
                let intake = IntakeError::Unreadable(e.to_string());
                self.record_error(intake.to_string());
                return Err(intake.into());
            }
        };

        self.asset = Some(SourceAsset::new(
            selection.path,
            selection.media_type,
            duration,
        ));
        self.range = Some(TimeRange::full(duration));
        self.stage = PipelineStage::Trimming;
        info!(duration, "source accepted, entering trim stage");
        Ok(())
    }

    /// Confirm the trim range: `Trimming -> Processing`.
    ///
    /// Spawns the single transcode invocation in the background so
    /// metadata entry continues while it runs. A duplicate confirm
    /// while one is pending is dropped.
    pub fn confirm_trim(&mut self, range: TimeRange) -> PipelineResult<()> {
        if self.stage == PipelineStage::Processing {
            debug!("trim confirm dropped: invocation already in flight");
            return Ok(());
        }
        if self.stage != PipelineStage::Trimming {
            return Err(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "confirm the trim range",
            });
        }

        let asset = self.asset.as_ref().ok_or(PipelineError::InvalidTransition {
            stage: self.stage,
            action: "confirm a trim without a source",
        })?;

        let mut range = range;
        range.clamp_to_duration(asset.duration());
        self.range = Some(range);

        let processor = Arc::clone(&self.processor);
        let source = asset.path().to_path_buf();
        self.in_flight = Some(tokio::spawn(async move {
            processor.process(&source, range).await
        }));
        self.stage = PipelineStage::Processing;
        info!(start = range.start, end = range.end, "processing started");
        Ok(())
    }

    /// Record the metadata draft, collected concurrently with
    /// processing. Immutable once submission begins.
    pub fn set_metadata(&mut self, metadata: ClipMetadata) -> PipelineResult<()> {
        if matches!(
            self.stage,
            PipelineStage::Uploading | PipelineStage::Succeeded
        ) {
            return Err(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "change metadata",
            });
        }
        metadata.validate()?;
        self.metadata = Some(metadata);
        Ok(())
    }

    /// Wait for a pending transcode invocation to settle.
    ///
    /// On success the output is stored and the stage advances to
    /// `AwaitingMetadata`. On failure the output is discarded and the
    /// pipeline returns to `Trimming` with the selected range
    /// preserved, so the user can adjust and retry.
    pub async fn wait_for_processing(&mut self) -> PipelineResult<()> {
        let Some(handle) = self.in_flight.take() else {
            return Ok(());
        };

        let result = handle.await.unwrap_or_else(|e| {
            Err(MediaError::Io(std::io::Error::other(format!(
                "processing task failed: {}",
                e
            ))))
        });

        match result {
            Ok(output) => {
                self.output = Some(output);
                if self.stage == PipelineStage::Processing {
                    self.stage = PipelineStage::AwaitingMetadata;
                }
                Ok(())
            }
            Err(e) => {
                self.output = None;
                self.record_error(format!("Video processing failed: {}", e));
                // Back to the trim stage; the range stays selected.
                self.stage = PipelineStage::Trimming;
                Err(PipelineError::Processing(e))
            }
        }
    }

    /// Submit the processed clip: `-> Uploading -> Succeeded | Failed`.
    ///
    /// Requires confirmed metadata; waits for processing if it is
    /// still pending. On a network or server failure the output is
    /// retained and `submit` may be called again without re-processing.
    pub async fn submit(&mut self) -> PipelineResult<CreatedClip> {
        if !matches!(
            self.stage,
            PipelineStage::Processing | PipelineStage::AwaitingMetadata | PipelineStage::Failed
        ) {
            return Err(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "submit",
            });
        }

        let metadata = self
            .metadata
            .clone()
            .ok_or(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "submit without metadata",
            })?;
        metadata.validate()?;

        // Waiting-indicator case: metadata was finished first.
        self.wait_for_processing().await?;

        let output = self
            .output
            .as_ref()
            .ok_or(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "submit without processed output",
            })?;

        self.stage = PipelineStage::Uploading;
        match self.client.upload(output, &metadata).await {
            Ok(created) => {
                self.stage = PipelineStage::Succeeded;
                self.output = None;
                if let Some(asset) = self.asset.as_mut() {
                    asset.release();
                }
                self.created = Some(created.clone());
                info!(clip_id = %created.clip_id, "upload succeeded");
                Ok(created)
            }
            Err(e) => {
                self.stage = PipelineStage::Failed;
                self.record_error(e.to_string());
                warn!(error = %e, "upload failed; output retained for resubmission");
                Err(e)
            }
        }
    }

    /// Cancel the flow and reset to `Selecting`.
    ///
    /// Any in-flight invocation's result is ignored when it arrives
    /// (the engine kills its child and still cleans its sandbox), and
    /// the preview URL is released.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            // Dropping the handle detaches the task; the processor
            // cancel below makes it wind down promptly, and its
            // cleanup still runs inside the task.
            drop(handle);
            self.processor.cancel();
        }
        if let Some(mut asset) = self.asset.take() {
            asset.release();
        }
        self.range = None;
        self.metadata = None;
        self.output = None;
        self.created = None;
        self.last_error = None;
        self.stage = PipelineStage::Selecting;
        info!("pipeline reset");
    }

    /// Tear the pipeline down entirely, terminating the engine.
    pub async fn shutdown(&mut self) {
        self.cancel();
        self.processor.shutdown().await;
    }

    fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::{SubmitClient, SubmitConfig};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Processor double: fixed duration, counted invocations, optional
    /// delay and scripted failure.
    struct FakeProcessor {
        duration: f64,
        delay: Duration,
        fail_next: AtomicBool,
        process_calls: AtomicU32,
    }

    impl FakeProcessor {
        fn with_duration(duration: f64) -> Self {
            Self {
                duration,
                delay: Duration::from_millis(0),
                fail_next: AtomicBool::new(false),
                process_calls: AtomicU32::new(0),
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(self: &Arc<Self>) -> u32 {
            self.process_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClipProcessor for Arc<FakeProcessor> {
        async fn probe(&self, _source: &Path) -> MediaResult<f64> {
            if !self.duration.is_finite() || self.duration <= 0.0 {
                return Err(MediaError::NonFiniteDuration);
            }
            Ok(self.duration)
        }

        async fn process(&self, _source: &Path, range: TimeRange) -> MediaResult<ProcessedOutput> {
            self.process_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(MediaError::ffmpeg_failed("scripted failure", None, Some(1)));
            }
            Ok(ProcessedOutput {
                video: b"trimmed".to_vec(),
                thumbnail: b"thumb".to_vec(),
                duration_seconds: range.span(),
            })
        }

        fn cancel(&self) {}

        async fn shutdown(&self) {}
    }

    async fn mock_upload_success(server: &MockServer, clip_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "clipId": clip_id})),
            )
            .mount(server)
            .await;
    }

    fn pipeline_for(
        server: &MockServer,
        processor: Arc<FakeProcessor>,
    ) -> UploadPipeline<Arc<FakeProcessor>> {
        let client = SubmitClient::new(SubmitConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        UploadPipeline::new(processor, client)
    }

    fn selection() -> SourceSelection {
        SourceSelection {
            path: "/tmp/source.mp4".into(),
            media_type: "video/mp4".into(),
        }
    }

    fn metadata(title: &str) -> ClipMetadata {
        ClipMetadata {
            title: title.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_happy_path_end_to_end() {
        let server = MockServer::start().await;
        mock_upload_success(&server, "abc").await;
        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        let mut pipeline = pipeline_for(&server, Arc::clone(&processor));

        pipeline.select_source(selection()).await.unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Trimming);
        assert_eq!(pipeline.range().unwrap().end, 30.0);

        pipeline
            .confirm_trim(TimeRange {
                start: 5.0,
                end: 15.0,
            })
            .unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Processing);

        pipeline.set_metadata(metadata("Test Clip")).unwrap();
        let created = pipeline.submit().await.unwrap();
        assert_eq!(created.clip_id, "abc");
        assert_eq!(pipeline.stage(), PipelineStage::Succeeded);
        // Output discarded, preview URL released on terminal success.
        assert!(pipeline.asset().unwrap().preview_url().is_none());
    }

    #[tokio::test]
    async fn test_non_video_selection_stays_selecting() {
        let server = MockServer::start().await;
        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        let mut pipeline = pipeline_for(&server, processor);

        let err = pipeline
            .select_source(SourceSelection {
                path: "/tmp/notes.txt".into(),
                media_type: "text/plain".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Intake(IntakeError::NotAVideo(_))
        ));
        assert_eq!(pipeline.stage(), PipelineStage::Selecting);
        assert!(pipeline.asset().is_none());
    }

    #[tokio::test]
    async fn test_non_finite_duration_rejected() {
        let server = MockServer::start().await;
        let processor = Arc::new(FakeProcessor::with_duration(f64::INFINITY));
        let mut pipeline = pipeline_for(&server, processor);

        let err = pipeline.select_source(selection()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Intake(IntakeError::UnusableDuration)
        ));
        assert_eq!(pipeline.stage(), PipelineStage::Selecting);
        assert!(pipeline.range().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_confirm_is_single_flight() {
        let server = MockServer::start().await;
        mock_upload_success(&server, "abc").await;
        let processor =
            Arc::new(FakeProcessor::with_duration(30.0).slow(Duration::from_millis(50)));
        let mut pipeline = pipeline_for(&server, Arc::clone(&processor));

        pipeline.select_source(selection()).await.unwrap();
        let range = TimeRange {
            start: 5.0,
            end: 15.0,
        };
        pipeline.confirm_trim(range).unwrap();
        // Second confirm while the first is in flight: dropped.
        pipeline.confirm_trim(range).unwrap();
        pipeline.wait_for_processing().await.unwrap();

        assert_eq!(processor.calls(), 1);
        assert_eq!(pipeline.stage(), PipelineStage::AwaitingMetadata);
    }

    #[tokio::test]
    async fn test_processing_failure_returns_to_trimming_with_range() {
        let server = MockServer::start().await;
        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        processor.fail_next.store(true, Ordering::SeqCst);
        let mut pipeline = pipeline_for(&server, Arc::clone(&processor));

        pipeline.select_source(selection()).await.unwrap();
        let range = TimeRange {
            start: 5.0,
            end: 15.0,
        };
        pipeline.confirm_trim(range).unwrap();
        let err = pipeline.wait_for_processing().await.unwrap_err();
        assert!(matches!(err, PipelineError::Processing(_)));

        assert_eq!(pipeline.stage(), PipelineStage::Trimming);
        assert_eq!(pipeline.range(), Some(range));
        assert!(pipeline.last_error().is_some());

        // Retry after adjusting nothing: a fresh invocation runs.
        pipeline.confirm_trim(range).unwrap();
        pipeline.wait_for_processing().await.unwrap();
        assert_eq!(processor.calls(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_retains_output_for_resubmit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "storage offline"})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mock_upload_success(&server, "abc").await;

        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        let mut pipeline = pipeline_for(&server, Arc::clone(&processor));

        pipeline.select_source(selection()).await.unwrap();
        pipeline
            .confirm_trim(TimeRange {
                start: 5.0,
                end: 15.0,
            })
            .unwrap();
        pipeline.set_metadata(metadata("Test Clip")).unwrap();

        let err = pipeline.submit().await.unwrap_err();
        assert!(err.is_resubmittable());
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
        assert_eq!(pipeline.last_error(), Some("storage offline"));

        // Resubmission succeeds without re-processing.
        let created = pipeline.submit().await.unwrap();
        assert_eq!(created.clip_id, "abc");
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_requires_metadata() {
        let server = MockServer::start().await;
        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        let mut pipeline = pipeline_for(&server, processor);

        pipeline.select_source(selection()).await.unwrap();
        pipeline
            .confirm_trim(TimeRange {
                start: 0.0,
                end: 10.0,
            })
            .unwrap();

        let err = pipeline.submit().await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_metadata_immutable_once_uploading() {
        let server = MockServer::start().await;
        mock_upload_success(&server, "abc").await;
        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        let mut pipeline = pipeline_for(&server, processor);

        pipeline.select_source(selection()).await.unwrap();
        pipeline
            .confirm_trim(TimeRange {
                start: 0.0,
                end: 10.0,
            })
            .unwrap();
        pipeline.set_metadata(metadata("Final Title")).unwrap();
        pipeline.submit().await.unwrap();

        let err = pipeline.set_metadata(metadata("Changed")).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_cancel_resets_and_releases() {
        let server = MockServer::start().await;
        let processor =
            Arc::new(FakeProcessor::with_duration(30.0).slow(Duration::from_millis(200)));
        let mut pipeline = pipeline_for(&server, Arc::clone(&processor));

        pipeline.select_source(selection()).await.unwrap();
        pipeline
            .confirm_trim(TimeRange {
                start: 0.0,
                end: 10.0,
            })
            .unwrap();
        pipeline.cancel();

        assert_eq!(pipeline.stage(), PipelineStage::Selecting);
        assert!(pipeline.asset().is_none());
        assert!(pipeline.range().is_none());
        assert!(!pipeline.is_processing());
        // A new flow starts clean.
        pipeline.select_source(selection()).await.unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Trimming);
    }

    #[tokio::test]
    async fn test_confirm_range_clamped_to_duration() {
        let server = MockServer::start().await;
        let processor = Arc::new(FakeProcessor::with_duration(30.0));
        let mut pipeline = pipeline_for(&server, Arc::clone(&processor));

        pipeline.select_source(selection()).await.unwrap();
        pipeline
            .confirm_trim(TimeRange {
                start: 5.0,
                end: 90.0,
            })
            .unwrap();
        pipeline.wait_for_processing().await.unwrap();
        assert_eq!(pipeline.range().unwrap().end, 30.0);
    }
}
