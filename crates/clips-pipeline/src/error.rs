//! Pipeline error taxonomy.
//!
//! Every variant maps to a user-visible message and an actionable next
//! step: intake errors re-prompt, engine load failure blocks the
//! session, processing errors return to the trim stage, submission
//! errors leave the pipeline resubmission-ready.

use clips_models::{MetadataError, PipelineStage};
use thiserror::Error;

use clips_media::MediaError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Intake rejections; the pipeline stays in (or resets to) the
/// selection stage with no partial state retained.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please select a valid video file (got {0})")]
    NotAVideo(String),

    #[error("Could not determine video duration. Please try a different video.")]
    UnusableDuration,

    #[error("Could not read video: {0}")]
    Unreadable(String),
}

/// Errors surfaced by the upload pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    /// Fatal for the session; no retry path other than a full reload.
    #[error("Failed to load video processing engine: {0}")]
    EngineLoad(MediaError),

    #[error("Video processing failed: {0}")]
    Processing(MediaError),

    /// Server-reported failure; the message is surfaced verbatim.
    #[error("{message}")]
    Submission { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Cannot {action} while {stage}")]
    InvalidTransition {
        stage: PipelineStage,
        action: &'static str,
    },

    #[error("Upload cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Whether submission may simply be re-attempted with the retained
    /// output (no re-processing needed).
    pub fn is_resubmittable(&self) -> bool {
        matches!(
            self,
            PipelineError::Submission { .. } | PipelineError::Network(_)
        )
    }
}
