//! Upload pipeline stage machine.
//!
//! One enumerated stage replaces the independent `isProcessing` /
//! `isUploading` / `isSuccess` booleans the flow could otherwise be
//! modelled with, so invalid combinations are unrepresentable.

use serde::{Deserialize, Serialize};

/// Current stage of an upload pipeline instance.
///
/// Progress is forward-only except `Failed`, which is reachable from
/// `Uploading` and retry-capable: submission may be re-attempted with
/// the already-produced output. A processing failure instead drops the
/// pipeline straight back to `Trimming` (output discarded), so
/// `Failed` never holds a stale transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Waiting for a source file selection.
    #[default]
    Selecting,
    /// Source accepted; trim range being adjusted.
    Trimming,
    /// Transcode invocation in flight.
    Processing,
    /// Output ready; waiting on metadata confirmation.
    AwaitingMetadata,
    /// Network submission in flight.
    Uploading,
    /// Terminal success; caller navigates to the created clip.
    Succeeded,
    /// Submission failed; resubmission allowed without re-processing.
    Failed,
}

impl PipelineStage {
    /// String representation of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Selecting => "selecting",
            PipelineStage::Trimming => "trimming",
            PipelineStage::Processing => "processing",
            PipelineStage::AwaitingMetadata => "awaiting_metadata",
            PipelineStage::Uploading => "uploading",
            PipelineStage::Succeeded => "succeeded",
            PipelineStage::Failed => "failed",
        }
    }

    /// Terminal stages expect no further transitions other than a reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Succeeded)
    }

    /// Whether `next` is a legal transition from this stage.
    ///
    /// A reset to `Selecting` (cancel) is legal from anywhere and is
    /// not encoded here.
    pub fn can_transition_to(&self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Selecting, Trimming)
                | (Trimming, Processing)
                | (Processing, AwaitingMetadata)
                // Processing failure returns control to the trim stage.
                | (Processing, Trimming)
                // Metadata confirmed while processing was still pending.
                | (Processing, Uploading)
                | (AwaitingMetadata, Uploading)
                | (Uploading, Succeeded)
                | (Uploading, Failed)
                // Resubmission reuses the retained output.
                | (Failed, Uploading)
        )
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
