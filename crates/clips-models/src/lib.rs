//! Shared data models for the clips upload pipeline.
//!
//! This crate provides the pure data types the pipeline crates build on:
//! - Trim ranges over a media duration
//! - Playback state mirrored from the playback surface
//! - The upload pipeline stage machine
//! - Clip metadata and processed output
//! - Timecode parsing for manual range entry

pub mod metadata;
pub mod output;
pub mod playback;
pub mod stage;
pub mod time_range;
pub mod timecode;

// Re-export common types
pub use metadata::{Category, ClipMetadata, MetadataError};
pub use output::ProcessedOutput;
pub use playback::PlaybackState;
pub use stage::PipelineStage;
pub use time_range::{TimeRange, MIN_SPAN};
pub use timecode::{format_timecode, parse_timecode, TimecodeError};
