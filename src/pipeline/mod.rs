use indicatif::ProgressBar;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extractors::{select_audio_stream, AudioStream, SourceInfo, SourceResolver, StreamDownloader};
use crate::interval::{ClipDuration, Interval};
use crate::media::{MediaJob, MediaTool};
use crate::utils::{normalize_extension, split_file_name};
use crate::YtsoundError;

/// Everything one run needs, fixed before the run starts
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    /// Video URL
    pub url: String,

    /// Raw interval tokens, `None` keeps the whole video
    pub interval: Option<Vec<String>>,

    /// Output file name, with or without extension
    pub filename: Option<String>,

    /// Directory the final file is written to
    pub output_dir: PathBuf,

    /// Final extension override
    pub extension: Option<String>,

    /// Extension used when neither the request nor the file name sets one
    pub default_extension: Option<String>,

    /// Source container preferred when picking the audio stream
    pub preferred_source_ext: Option<String>,
}

/// Steps of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ResolveSource,
    ValidateInterval,
    Download,
    Trim,
    Transcode,
    Cleanup,
    Report,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::ResolveSource => "resolve",
            PipelineStage::ValidateInterval => "validate-interval",
            PipelineStage::Download => "download",
            PipelineStage::Trim => "trim",
            PipelineStage::Transcode => "transcode",
            PipelineStage::Cleanup => "cleanup",
            PipelineStage::Report => "report",
        };
        write!(f, "{}", name)
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// The single file left on disk
    pub path: PathBuf,

    /// Length of the saved audio
    pub duration: ClipDuration,

    /// Title of the source video
    pub title: String,

    /// Whether a crop was applied
    pub trimmed: bool,
}

/// Resolve, download, crop and convert one video
pub struct Pipeline {
    resolver: Box<dyn SourceResolver>,
    downloader: Box<dyn StreamDownloader>,
    media: Box<dyn MediaTool>,
    show_progress: bool,
}

/// File names derived for one run
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputNames {
    stem: String,
    extension: String,
}

impl Pipeline {
    pub fn new(
        resolver: Box<dyn SourceResolver>,
        downloader: Box<dyn StreamDownloader>,
        media: Box<dyn MediaTool>,
    ) -> Self {
        Self {
            resolver,
            downloader,
            media,
            show_progress: true,
        }
    }

    /// Hide the per-stage spinners
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_progress = !quiet;
        self
    }

    /// Run every stage for `request`, stopping at the first error
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutcome, YtsoundError> {
        enter(PipelineStage::ResolveSource);
        let source = self.resolver.resolve(&request.url).await.map_err(|e| {
            tracing::debug!("Resolving {} failed: {:#}", request.url, e);
            YtsoundError::SourceResolution(format!("{:#}", e))
        })?;

        let stream = select_audio_stream(&source.streams, request.preferred_source_ext.as_deref())
            .ok_or_else(|| YtsoundError::NoAudioTrack {
                title: source.title.clone(),
            })?;
        tracing::debug!("Selected audio stream {} ({})", stream.format_id, stream.extension);

        enter(PipelineStage::ValidateInterval);
        let interval = match &request.interval {
            Some(tokens) => Interval::validate(tokens.as_slice())?,
            None => Interval::full(),
        };
        let duration = ClipDuration::compute(source.duration_secs, &interval)?;

        let names = output_names(request, stream);
        let final_path = request
            .output_dir
            .join(format!("{}.{}", names.stem, names.extension));

        enter(PipelineStage::Download);
        let mut current = self.download(request, &source, stream, &names).await?;

        if !interval.is_full() {
            enter(PipelineStage::Trim);
            current = self.trim(current, &interval, &names).await?;
        }

        enter(PipelineStage::Transcode);
        self.transcode(&current, &final_path).await?;

        enter(PipelineStage::Cleanup);
        remove_intermediates(&current, &request.output_dir, &names.stem).await;

        enter(PipelineStage::Report);
        Ok(PipelineOutcome {
            path: final_path,
            duration,
            title: source.title,
            trimmed: !interval.is_full(),
        })
    }

    async fn download(
        &self,
        request: &PipelineRequest,
        source: &SourceInfo,
        stream: &AudioStream,
        names: &OutputNames,
    ) -> Result<PathBuf, YtsoundError> {
        tokio::fs::create_dir_all(&request.output_dir).await?;

        let stem = format!("{}_src", names.stem);
        let path = self
            .downloader
            .download(source, stream, &request.output_dir, &stem)
            .await
            .map_err(|e| YtsoundError::Download(format!("{:#}", e)))?;

        tracing::info!("Downloaded {}", path.display());
        Ok(path)
    }

    /// Crop into a sibling copy, then drop the untrimmed download
    async fn trim(
        &self,
        downloaded: PathBuf,
        interval: &Interval,
        names: &OutputNames,
    ) -> Result<PathBuf, YtsoundError> {
        let copy = sibling(&downloaded, &format!("{}_cp", names.stem));
        let progress = self.spinner(format!("Cropping music with interval: {}", interval));

        let job = MediaJob::trim(downloaded.clone(), copy.clone(), interval.start, interval.end);
        let succeeded = self
            .media
            .run(&job)
            .await
            .map_err(|e| YtsoundError::Trim(format!("{:#}", e)))?;
        progress.finish_and_clear();

        if !succeeded {
            discard_partial(&copy).await;
            return Err(YtsoundError::Trim(format!(
                "ffmpeg could not crop {}",
                downloaded.display()
            )));
        }

        tokio::fs::remove_file(&downloaded).await?;
        tracing::debug!("Replaced {} with cropped copy {}", downloaded.display(), copy.display());
        Ok(copy)
    }

    /// Convert `input` into `final_path`; on failure the input is kept for the user
    async fn transcode(&self, input: &Path, final_path: &Path) -> Result<(), YtsoundError> {
        let progress = self.spinner("Saving music in desired format...".to_string());

        let job = MediaJob::transcode(input.to_path_buf(), final_path.to_path_buf());
        let outcome = self.media.run(&job).await;
        progress.finish_and_clear();

        let reason = match outcome {
            Ok(true) => return Ok(()),
            Ok(false) => "ffmpeg exited with an error".to_string(),
            Err(e) => format!("{:#}", e),
        };

        discard_partial(final_path).await;
        Err(YtsoundError::Conversion {
            input: input.to_path_buf(),
            reason,
        })
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        progress.set_message(message);
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }
}

fn enter(stage: PipelineStage) {
    tracing::debug!(stage = %stage, "Entering pipeline stage");
}

/// Work out the final stem and extension.
///
/// Extension precedence: explicit request, the file name's own extension,
/// the configured default, then the downloaded stream's container.
fn output_names(request: &PipelineRequest, stream: &AudioStream) -> OutputNames {
    let (stem, name_ext) = request
        .filename
        .as_deref()
        .and_then(split_file_name)
        .unwrap_or_else(|| (stream.default_stem().to_string(), None));

    let extension = request
        .extension
        .as_deref()
        .and_then(normalize_extension)
        .or(name_ext)
        .or_else(|| request.default_extension.as_deref().and_then(normalize_extension))
        .unwrap_or_else(|| stream.extension.clone());

    OutputNames { stem, extension }
}

/// `path` renamed to `stem`, keeping directory and extension
fn sibling(path: &Path, stem: &str) -> PathBuf {
    match path.extension() {
        Some(ext) => path.with_file_name(format!("{}.{}", stem, ext.to_string_lossy())),
        None => path.with_file_name(stem),
    }
}

/// Drop the converted input and any `<stem>_src.*` / `<stem>_cp.*` leftovers.
///
/// The final file already exists at this point, so failures only warn.
async fn remove_intermediates(current: &Path, output_dir: &Path, stem: &str) {
    discard_partial(current).await;

    let prefixes = [format!("{}_src.", stem), format!("{}_cp.", stem)];
    let mut entries = match tokio::fs::read_dir(output_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not list {}: {}", output_dir.display(), e);
            return;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        if prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
            discard_partial(&entry.path()).await;
        }
    }

    tracing::debug!("Removed intermediate files for {}", stem);
}

/// Best effort removal of a file that is no longer wanted
async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}
