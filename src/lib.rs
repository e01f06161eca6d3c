//! ytsound - A Rust CLI tool for grabbing the audio track of online videos
//!
//! This library resolves a video URL to its audio streams, downloads one, optionally crops it
//! to a `[start, end]` time window and converts it to the requested extension using yt-dlp and ffmpeg.

use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod extractors;
pub mod interval;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use extractors::{AudioStream, SourceInfo, SourceResolver, StreamDownloader};
pub use interval::{ClipDuration, Interval, TimeSpec};
pub use media::{MediaJob, MediaTool};
pub use pipeline::{Pipeline, PipelineOutcome, PipelineRequest};

/// Result type used by the external tool adapters
pub type Result<T> = anyhow::Result<T>;

/// Error types surfaced to the user by a run
#[derive(thiserror::Error, Debug)]
pub enum YtsoundError {
    #[error("{0}")]
    MalformedTime(String),

    #[error("{0}")]
    Range(String),

    #[error("Invalid url")]
    SourceResolution(String),

    #[error("Unfortunately video: \"{title}\" does not contain audio track")]
    NoAudioTrack { title: String },

    #[error("{0}")]
    Download(String),

    #[error("Cropping failed: {0}")]
    Trim(String),

    #[error("Conversion failed ({reason}), intermediate file kept at {}", .input.display())]
    Conversion { input: PathBuf, reason: String },

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}
