//! Clip trim-and-upload binary.
//!
//! Drives one full pipeline pass: probe the source, trim the selected
//! range, extract a thumbnail, and submit the clip with its metadata.
//!
//! ```text
//! clips-upload <file> <start> <end> <title> [--private] [--category <id>]...
//! ```
//!
//! `<start>` and `<end>` accept seconds (`92.5`) or timecodes
//! (`1:32.5`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clips_media::TranscodeEngine;
use clips_models::{parse_timecode, ClipMetadata, TimeRange};
use clips_pipeline::{
    PipelineConfig, PipelineError, SourceSelection, SubmitClient, UploadPipeline,
};

struct Args {
    source: PathBuf,
    start: f64,
    end: f64,
    title: String,
    private: bool,
    category_ids: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut private = false;
    let mut category_ids = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--private" => private = true,
            "--category" => {
                let id = args.next().context("--category requires a value")?;
                category_ids.push(id);
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 4 {
        bail!("usage: clips-upload <file> <start> <end> <title> [--private] [--category <id>]...");
    }

    let start = parse_timecode(&positional[1])
        .with_context(|| format!("invalid start time {:?}", positional[1]))?;
    let end = parse_timecode(&positional[2])
        .with_context(|| format!("invalid end time {:?}", positional[2]))?;

    Ok(Args {
        source: PathBuf::from(&positional[0]),
        start,
        end,
        title: positional[3].clone(),
        private,
        category_ids,
    })
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clips=info,clips_upload=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn run(args: Args, config: PipelineConfig) -> Result<String> {
    // Engine load failure is fatal for the whole session.
    let engine = TranscodeEngine::load(config.engine).map_err(PipelineError::EngineLoad)?;
    let client = SubmitClient::new(config.submit)?;
    let mut pipeline = UploadPipeline::new(engine, client);

    pipeline
        .select_source(SourceSelection::from_path(&args.source))
        .await?;

    pipeline.confirm_trim(TimeRange {
        start: args.start,
        end: args.end,
    })?;

    pipeline.set_metadata(ClipMetadata {
        title: args.title,
        is_private: args.private,
        category_ids: args.category_ids.into_iter().collect(),
    })?;

    let created = pipeline.submit().await?;
    pipeline.shutdown().await;
    Ok(created.clip_id)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = PipelineConfig::from_env();
    info!(source = %args.source.display(), "starting clip upload");

    match run(args, config).await {
        Ok(clip_id) => {
            println!("{}", clip_id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("upload failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
