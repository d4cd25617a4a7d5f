//! Stream-copy trim and still-frame extraction.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Minimum trimmed length at which the still frame is taken from the
/// one-second mark; shorter clips seek to zero instead, since seeking
/// past end-of-stream fails.
pub const STILL_FRAME_MIN_SPAN: f64 = 1.0;

/// Copy `[start, start + span]` of `input` into `output` without
/// re-encoding.
pub async fn extract_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start: f64,
    span: f64,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        input = %input.display(),
        output = %output.display(),
        start = format!("{:.2}", start),
        span = format!("{:.2}", span),
        "extracting clip (stream copy)"
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start)
        .duration(span)
        .codec_copy();

    runner.run(&cmd).await
}

/// Extract exactly one frame of `input` at `offset` seconds as an image.
pub async fn extract_still(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    offset: f64,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        input = %input.display(),
        output = %output.display(),
        offset = format!("{:.2}", offset),
        "extracting still frame"
    );

    let cmd = FfmpegCommand::new(input, output).seek(offset).single_frame();

    runner.run(&cmd).await
}

/// Still-frame offset for a trimmed clip of `span` seconds.
pub fn still_frame_offset(span: f64, preferred_offset: f64) -> f64 {
    if span < STILL_FRAME_MIN_SPAN {
        0.0
    } else {
        preferred_offset
    }
}
