//! Transcode engine lifecycle.
//!
//! The engine is loaded once per pipeline session, invoked once per
//! trim confirmation, and terminated on teardown. Invocations are
//! single-flight: both outputs live under fixed sandbox names, so two
//! concurrent runs would trample each other.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use clips_models::{ProcessedOutput, TimeRange};

use crate::command::{check_ffmpeg, check_ffprobe, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::sandbox::EngineSandbox;
use crate::trim::{extract_clip, extract_still, still_frame_offset};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-invocation timeout in seconds, `None` to wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// Preferred still-frame offset into the trimmed clip.
    pub thumbnail_offset_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(600),
            thumbnail_offset_secs: 1.0,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: std::env::var("ENGINE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Some)
                .unwrap_or(defaults.timeout_secs),
            thumbnail_offset_secs: std::env::var("ENGINE_THUMBNAIL_OFFSET_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.thumbnail_offset_secs),
        }
    }
}

/// Sandboxed media-processing engine instance.
///
/// Owned by one pipeline instance; never shared across concurrent
/// pipelines. Termination is guaranteed on every teardown path: an
/// explicit [`TranscodeEngine::shutdown`] releases the sandbox, and
/// dropping the engine removes the scratch directory regardless.
pub struct TranscodeEngine {
    config: EngineConfig,
    /// `None` once the engine has been terminated.
    sandbox: Mutex<Option<EngineSandbox>>,
    in_flight: AtomicBool,
    cancel_tx: watch::Sender<bool>,
}

impl TranscodeEngine {
    /// Load the engine: resolve the runtime binaries and create the
    /// sandbox.
    ///
    /// Load failure is fatal for the upload feature this session; the
    /// caller surfaces a blocking error.
    pub fn load(config: EngineConfig) -> MediaResult<Self> {
        let ffmpeg = check_ffmpeg()?;
        check_ffprobe()?;
        let sandbox = EngineSandbox::new()?;
        let (cancel_tx, _) = watch::channel(false);

        info!(ffmpeg = %ffmpeg.display(), "transcode engine loaded");
        Ok(Self {
            config,
            sandbox: Mutex::new(Some(sandbox)),
            in_flight: AtomicBool::new(false),
            cancel_tx,
        })
    }

    /// Trim `[range.start, range.end]` out of `source` and extract a
    /// still-frame thumbnail from the trimmed clip.
    ///
    /// Single-flight: an overlapping call fails fast with
    /// [`MediaError::Busy`]. The sandbox is cleared before returning on
    /// every path, so a failed run never leaves entries behind for the
    /// next one.
    pub async fn process(&self, source: &[u8], range: &TimeRange) -> MediaResult<ProcessedOutput> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MediaError::Busy);
        }
        // Re-arm cancellation left over from a previous cancel.
        self.cancel_tx.send_replace(false);

        let guard = self.sandbox.lock().await;
        let result = match guard.as_ref() {
            Some(sandbox) => {
                let result = self.run(sandbox, source, range).await;
                if let Err(e) = sandbox.clear().await {
                    warn!(error = %e, "sandbox cleanup failed");
                    // A cleanup failure only surfaces when the run itself
                    // succeeded; a run error takes precedence.
                    result.and(Err(e))
                } else {
                    result
                }
            }
            None => Err(MediaError::EngineTerminated),
        };
        drop(guard);

        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run(
        &self,
        sandbox: &EngineSandbox,
        source: &[u8],
        range: &TimeRange,
    ) -> MediaResult<ProcessedOutput> {
        sandbox.write_input(source).await?;

        let mut runner = FfmpegRunner::new().with_cancel(self.cancel_tx.subscribe());
        if let Some(timeout) = self.config.timeout_secs {
            runner = runner.with_timeout(timeout);
        }

        let span = range.span();
        extract_clip(
            sandbox.input_path(),
            sandbox.output_path(),
            range.start,
            span,
            &runner,
        )
        .await?;

        let offset = still_frame_offset(span, self.config.thumbnail_offset_secs);
        extract_still(
            sandbox.output_path(),
            sandbox.thumbnail_path(),
            offset,
            &runner,
        )
        .await?;

        let video = sandbox.read_output().await?;
        let thumbnail = sandbox.read_thumbnail().await?;

        info!(
            video_bytes = video.len(),
            thumbnail_bytes = thumbnail.len(),
            duration = span,
            "transcode invocation complete"
        );

        Ok(ProcessedOutput {
            video,
            thumbnail,
            duration_seconds: span,
        })
    }

    /// Abort an in-flight invocation; its ffmpeg child is killed and
    /// the sandbox still gets cleared.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Terminate the engine, releasing the sandbox.
    ///
    /// Waits for an in-flight invocation to wind down (cancel first to
    /// make that prompt). Later invocations fail with
    /// [`MediaError::EngineTerminated`].
    pub async fn shutdown(&self) {
        self.cancel();
        let mut guard = self.sandbox.lock().await;
        if guard.take().is_some() {
            info!("transcode engine terminated");
        }
    }
}
