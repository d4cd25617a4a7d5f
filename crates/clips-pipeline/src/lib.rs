//! Staged upload pipeline.
//!
//! Drives the flow from source selection through trim confirmation,
//! background transcoding, metadata entry, and network submission,
//! with retry and cleanup semantics at each stage:
//! - intake gates (declared type, finite duration)
//! - single-flight transcode invocations
//! - output retained across network failures, discarded on processing
//!   failures
//! - preview URL released exactly once, on reset or terminal success

pub mod asset;
pub mod config;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod processor;
pub mod submit;

pub use asset::SourceAsset;
pub use config::PipelineConfig;
pub use error::{IntakeError, PipelineError, PipelineResult};
pub use intake::{guess_media_type, validate_selection, SourceSelection};
pub use pipeline::UploadPipeline;
pub use processor::ClipProcessor;
pub use submit::{CreatedClip, SubmitClient, SubmitConfig};
