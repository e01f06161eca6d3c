use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod youtube;

use crate::Result;

/// Metadata of a resolved video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Original URL that was resolved
    pub url: String,

    /// Display title of the video
    pub title: String,

    /// Total length in whole seconds
    pub duration_secs: u64,

    /// Audio-only candidate streams, in the order the site lists them
    pub streams: Vec<AudioStream>,
}

/// One downloadable audio stream of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStream {
    /// Site specific format identifier
    pub format_id: String,

    /// Container extension (m4a, webm, ...)
    pub extension: String,

    /// File name the stream would be saved under, extension included
    pub default_filename: String,

    /// Whether the stream actually carries an audio track
    pub includes_audio: bool,
}

impl AudioStream {
    /// Default filename without its extension
    pub fn default_stem(&self) -> &str {
        Path::new(&self.default_filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.default_filename)
    }
}

/// Looks a URL up and lists its audio streams
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<SourceInfo>;
}

/// Transfers a chosen stream to disk
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreamDownloader: Send + Sync {
    /// Download `stream` into `output_dir` as `<stem>.<ext>` and return the file path
    async fn download(
        &self,
        source: &SourceInfo,
        stream: &AudioStream,
        output_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf>;
}

/// Pick the stream to download: the first one carrying audio, preferring `preferred_ext`.
pub fn select_audio_stream<'a>(
    streams: &'a [AudioStream],
    preferred_ext: Option<&str>,
) -> Option<&'a AudioStream> {
    let mut with_audio = streams.iter().filter(|stream| stream.includes_audio);

    preferred_ext
        .and_then(|ext| {
            with_audio
                .clone()
                .find(|stream| stream.extension.eq_ignore_ascii_case(ext))
        })
        .or_else(|| with_audio.next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, ext: &str, includes_audio: bool) -> AudioStream {
        AudioStream {
            format_id: id.to_string(),
            extension: ext.to_string(),
            default_filename: format!("Some Song.{}", ext),
            includes_audio,
        }
    }

    #[test]
    fn test_selects_first_with_audio() {
        let streams = vec![stream("1", "webm", false), stream("2", "webm", true), stream("3", "m4a", true)];
        assert_eq!(select_audio_stream(&streams, None).unwrap().format_id, "2");
    }

    #[test]
    fn test_prefers_extension() {
        let streams = vec![stream("1", "webm", true), stream("2", "m4a", false), stream("3", "M4A", true)];
        assert_eq!(select_audio_stream(&streams, Some("m4a")).unwrap().format_id, "3");
    }

    #[test]
    fn test_falls_back_when_preferred_missing() {
        let streams = vec![stream("1", "webm", true)];
        assert_eq!(select_audio_stream(&streams, Some("m4a")).unwrap().format_id, "1");
    }

    #[test]
    fn test_no_audio() {
        let streams = vec![stream("1", "m4a", false)];
        assert!(select_audio_stream(&streams, Some("m4a")).is_none());
        assert!(select_audio_stream(&[], None).is_none());
    }

    #[test]
    fn test_default_stem() {
        assert_eq!(stream("1", "m4a", true).default_stem(), "Some Song");
    }
}
