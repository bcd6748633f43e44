//! Tubely CLI: run the video ingestion pipeline from a shell.
//!
//! Storage and tool settings come from the environment (see `Config`).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tubely_cli::{init_tracing, JsonFileVideoRepository};
use tubely_core::constants::{VIDEO_FORM_FIELD, VIDEO_MP4_CONTENT_TYPE};
use tubely_core::{Config, FilePart, FormField, UploadRequest};
use tubely_processing::{
    FfmpegTranscoder, FfprobeInspector, MediaInspector, MediaTranscoder, Orientation,
    VideoIngestor,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tubely", about = "Tubely video ingestion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first video stream's dimensions and orientation
    Probe {
        /// Path to the video file
        file: PathBuf,
    },
    /// Remux a file for fast-start playback and print the output path
    Faststart {
        /// Path to the MP4 file
        file: PathBuf,
    },
    /// Run the full ingestion pipeline and persist the updated record
    Ingest {
        /// Path to the MP4 file to upload
        file: PathBuf,
        /// Target video record UUID
        #[arg(long)]
        video_id: Uuid,
        /// Owner identity performing the upload
        #[arg(long)]
        owner_id: Uuid,
        /// JSON file holding an array of video records
        #[arg(long)]
        records: PathBuf,
        /// Declared media type of the upload
        #[arg(long, default_value = VIDEO_MP4_CONTENT_TYPE)]
        content_type: String,
    },
}

#[derive(Serialize)]
struct ProbeReport {
    width: u32,
    height: u32,
    orientation: Orientation,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn upload_request(
    file: &Path,
    video_id: Uuid,
    content_type: String,
) -> anyhow::Result<UploadRequest> {
    let handle = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let size = handle
        .metadata()
        .await
        .with_context(|| format!("Failed to stat {}", file.display()))?
        .len();

    let mut part = FilePart::new(content_type, size, Box::pin(handle));
    if let Some(name) = file.file_name() {
        part = part.with_filename(name.to_string_lossy());
    }
    Ok(UploadRequest::new(
        video_id,
        vec![FormField::file(VIDEO_FORM_FIELD, part)],
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Probe { file } => {
            let inspector = FfprobeInspector::new(config.ingest.ffprobe_path.clone())?;
            let geometry = inspector.probe(&file).await?;
            print_json(&ProbeReport {
                width: geometry.width,
                height: geometry.height,
                orientation: Orientation::classify(geometry),
            })?;
        }
        Commands::Faststart { file } => {
            let transcoder = FfmpegTranscoder::new(config.ingest.ffmpeg_path.clone())?;
            let output = transcoder.fast_start(&file).await?;
            print_json(&serde_json::json!({ "output": output }))?;
        }
        Commands::Ingest {
            file,
            video_id,
            owner_id,
            records,
            content_type,
        } => {
            config.validate().context("Invalid configuration")?;

            let storage = tubely_storage::create_storage(&config.storage)
                .await
                .context("Failed to initialize storage")?;
            let videos = std::sync::Arc::new(JsonFileVideoRepository::new(records));
            let ingestor = VideoIngestor::with_ffmpeg(config.ingest.clone(), storage, videos)?;

            let request = upload_request(&file, video_id, content_type).await?;
            let record = ingestor.ingest_and_persist(request, owner_id).await?;
            tracing::info!(
                video_id = %record.id,
                video_url = ?record.video_url,
                "Video record updated"
            );
            print_json(&record)?;
        }
    }

    Ok(())
}
