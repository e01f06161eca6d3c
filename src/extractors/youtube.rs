use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{AudioStream, SourceInfo, SourceResolver, StreamDownloader};
use crate::utils::{sanitize_filename, validate_and_normalize_url};
use crate::Result;

/// Video resolver and audio downloader backed by yt-dlp
pub struct YtDlp {
    yt_dlp_path: String,
    show_progress: bool,
}

impl YtDlp {
    pub fn new(yt_dlp_path: impl Into<String>) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
            show_progress: true,
        }
    }

    /// Hide the download spinner
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_progress = !quiet;
        self
    }

    /// Get video information using yt-dlp
    async fn get_video_info(&self, url: &str) -> Result<Value> {
        tracing::debug!("Extracting video info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-playlist", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        let info: Value = serde_json::from_slice(&output.stdout)?;
        Ok(info)
    }

    fn spinner(&self, message: &'static str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            progress.set_style(style);
        }
        progress.set_message(message);
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }
}

/// Build [`SourceInfo`] out of `yt-dlp --dump-json` output
pub fn parse_video_info(url: &str, info: &Value) -> Result<SourceInfo> {
    let title = info["title"].as_str().unwrap_or("Unknown title").to_string();

    let duration_secs = info["duration"]
        .as_f64()
        .map(|d| d.max(0.0) as u64)
        .ok_or_else(|| anyhow::anyhow!("yt-dlp did not report a duration for {}", url))?;

    let file_title = sanitize_filename(&title);
    let streams = info["formats"]
        .as_array()
        .map(|formats| {
            formats
                .iter()
                // Audio-only formats have no video codec
                .filter(|format| format["vcodec"].as_str() == Some("none"))
                .filter_map(|format| {
                    let format_id = format["format_id"].as_str()?.to_string();
                    let extension = format["ext"].as_str()?.to_string();
                    let includes_audio = format["acodec"]
                        .as_str()
                        .map(|codec| codec != "none")
                        .unwrap_or(false);

                    Some(AudioStream {
                        default_filename: format!("{}.{}", file_title, extension),
                        format_id,
                        extension,
                        includes_audio,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SourceInfo {
        url: url.to_string(),
        title,
        duration_secs,
        streams,
    })
}

#[async_trait]
impl SourceResolver for YtDlp {
    async fn resolve(&self, url: &str) -> Result<SourceInfo> {
        let url = validate_and_normalize_url(url)?;
        let info = self.get_video_info(&url).await?;
        let source = parse_video_info(&url, &info)?;

        tracing::debug!(
            "Resolved \"{}\" ({}s, {} audio stream(s))",
            source.title,
            source.duration_secs,
            source.streams.len()
        );

        Ok(source)
    }
}

#[async_trait]
impl StreamDownloader for YtDlp {
    async fn download(
        &self,
        source: &SourceInfo,
        stream: &AudioStream,
        output_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf> {
        let template = output_dir.join(format!("{}.%(ext)s", stem));
        tracing::debug!("Downloading format {} to {}", stream.format_id, template.display());

        let progress = self.spinner("Downloading music...");

        let output = Command::new(&self.yt_dlp_path)
            .args(["--no-playlist", "--force-overwrites", "--format", &stream.format_id])
            .arg("--output")
            .arg(&template)
            // --print alone would only simulate
            .args(["--no-simulate", "--print", "after_move:filepath"])
            .arg(&source.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            progress.finish_and_clear();
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{}", error.trim());
        }

        progress.finish_with_message("Download complete");

        let printed = String::from_utf8_lossy(&output.stdout);
        let path = printed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(PathBuf::from)
            .unwrap_or_else(|| output_dir.join(format!("{}.{}", stem, stream.extension)));

        if !path.exists() {
            anyhow::bail!("yt-dlp finished but {} was not created", path.display());
        }

        Ok(path)
    }
}
