use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::interval::TimeSpec;
use crate::Result;

/// One ffmpeg invocation: crop with stream copy, or convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start: Option<TimeSpec>,
    pub end: Option<TimeSpec>,
    /// Copy streams without re-encoding
    pub stream_copy: bool,
}

impl MediaJob {
    /// Lossless crop of `input` into `output`, open on whichever side is `None`
    pub fn trim(input: PathBuf, output: PathBuf, start: Option<TimeSpec>, end: Option<TimeSpec>) -> Self {
        Self {
            input,
            output,
            start,
            end,
            stream_copy: true,
        }
    }

    /// Convert `input` to the container implied by `output`'s extension
    pub fn transcode(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            start: None,
            end: None,
            stream_copy: false,
        }
    }

    pub fn is_trim(&self) -> bool {
        self.stream_copy
    }
}

/// Runs media jobs; `Ok(false)` means the tool ran and reported failure
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaTool: Send + Sync {
    async fn run(&self, job: &MediaJob) -> Result<bool>;
}

/// ffmpeg invoked directly with an argument vector
pub struct Ffmpeg {
    ffmpeg_path: String,
    loglevel: String,
}

impl Ffmpeg {
    pub fn new(ffmpeg_path: impl Into<String>, loglevel: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            loglevel: loglevel.into(),
        }
    }

    /// Arguments for `job`, markers given as whole seconds
    pub fn build_args(&self, job: &MediaJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-y", "-loglevel"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(self.loglevel.clone().into());

        // Input options, so seeking happens before decoding
        if let Some(start) = job.start {
            args.push("-ss".into());
            args.push(start.total_seconds().to_string().into());
        }
        if let Some(end) = job.end {
            args.push("-to".into());
            args.push(end.total_seconds().to_string().into());
        }

        args.push("-i".into());
        args.push(job.input.clone().into_os_string());

        if job.stream_copy {
            args.push("-codec".into());
            args.push("copy".into());
        }

        args.push(job.output.clone().into_os_string());
        args
    }
}

#[async_trait]
impl MediaTool for Ffmpeg {
    async fn run(&self, job: &MediaJob) -> Result<bool> {
        let args = self.build_args(job);
        tracing::debug!("Running {} {:?}", self.ffmpeg_path, args);

        // ffmpeg writes its log lines straight to the terminal
        let status = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run {}: {}", self.ffmpeg_path, e))?;

        if !status.success() {
            tracing::warn!("{} exited with {}", self.ffmpeg_path, status);
        }

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_trim_args_with_both_marks() {
        let ffmpeg = Ffmpeg::new("ffmpeg", "warning");
        let job = MediaJob::trim(
            PathBuf::from("/music/song_src.m4a"),
            PathBuf::from("/music/song_cp.m4a"),
            Some(TimeSpec::new(1, 0)),
            Some(TimeSpec::new(2, 30)),
        );

        assert_eq!(
            strings(ffmpeg.build_args(&job)),
            [
                "-hide_banner", "-nostdin", "-y", "-loglevel", "warning",
                "-ss", "60", "-to", "150",
                "-i", "/music/song_src.m4a",
                "-codec", "copy",
                "/music/song_cp.m4a",
            ]
        );
    }

    #[test]
    fn test_trim_args_open_start() {
        let ffmpeg = Ffmpeg::new("ffmpeg", "error");
        let job = MediaJob::trim(
            PathBuf::from("in.webm"),
            PathBuf::from("out.webm"),
            None,
            Some(TimeSpec::new(1, 0)),
        );

        let args = strings(ffmpeg.build_args(&job));
        assert!(!args.contains(&"-ss".to_string()));
        assert!(args.windows(2).any(|w| w == ["-to", "60"]));
        assert!(job.is_trim());
    }

    #[test]
    fn test_transcode_args_keep_spaces_intact() {
        let ffmpeg = Ffmpeg::new("ffmpeg", "warning");
        let job = MediaJob::transcode(PathBuf::from("My Song \"live\".m4a"), PathBuf::from("My Song.mp3"));

        let args = strings(ffmpeg.build_args(&job));
        assert!(!args.contains(&"-codec".to_string()));
        assert_eq!(args[args.len() - 3..], ["-i", "My Song \"live\".m4a", "My Song.mp3"]);
        assert!(!job.is_trim());
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let ffmpeg = Ffmpeg::new("ytsound-no-such-ffmpeg", "warning");
        let job = MediaJob::transcode(PathBuf::from("a.m4a"), PathBuf::from("a.mp3"));
        assert!(ffmpeg.run(&job).await.is_err());
    }
}
