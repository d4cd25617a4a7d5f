//! FFmpeg-backed transcode engine for clip trimming.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and a runner with timeout and
//!   cancellation support
//! - FFprobe source inspection (duration gate for intake)
//! - A sandboxed scratch filesystem with fixed entry names
//! - The engine lifecycle: load once, trim + still-frame extraction
//!   per invocation, guaranteed teardown

pub mod command;
pub mod engine;
pub mod error;
pub mod probe;
pub mod sandbox;
pub mod trim;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use engine::{EngineConfig, TranscodeEngine};
pub use error::{MediaError, MediaResult};
pub use probe::{get_duration, probe_video, SourceInfo};
pub use sandbox::{EngineSandbox, INPUT_NAME, OUTPUT_NAME, THUMBNAIL_NAME};
pub use trim::{extract_clip, extract_still};
