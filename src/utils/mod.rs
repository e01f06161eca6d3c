use anyhow::Result;
use std::path::Path;
use url::Url;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Sanitize filename for safe filesystem usage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            match c {
                // Keep alphanumeric characters, spaces, hyphens, underscores, and dots
                c if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' => c,
                // Replace everything else with underscore
                _ => '_',
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowercase an extension and drop any leading dots (`.MP3` -> `mp3`)
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Split the file name part of `name` into its stem and normalized extension.
///
/// Directories are dropped so the result always lands in the output directory;
/// `None` when nothing usable is left (`..`, an empty name).
pub fn split_file_name(name: &str) -> Option<(String, Option<String>)> {
    let file_name = Path::new(name).file_name()?;
    let file_name = Path::new(file_name);

    let stem = file_name.file_stem()?.to_string_lossy().into_owned();
    let ext = file_name
        .extension()
        .and_then(|ext| normalize_extension(&ext.to_string_lossy()));

    Some((stem, ext))
}

/// Check if the current environment has required tools
pub async fn check_dependencies(yt_dlp: &str, ffmpeg: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp, "--version").await {
        missing.push(format!("{} - required for resolving and downloading videos", yt_dlp));
    }

    // ffmpeg only knows the single-dash form
    if !check_command_available(ffmpeg, "-version").await {
        missing.push(format!("{} - required for cropping and converting audio", ffmpeg));
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str, version_flag: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg(version_flag)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
