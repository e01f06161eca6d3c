use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ffmpeg `-loglevel` names
const FFMPEG_LOGLEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for saved music (defaults to the user's music directory)
    pub output_dir: Option<PathBuf>,

    /// Final extension when neither `--extension` nor the file name gives one
    pub default_extension: Option<String>,

    /// Source container to prefer when a video offers several audio streams
    pub preferred_source_ext: Option<String>,

    /// External tools
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// yt-dlp executable
    pub yt_dlp: String,

    /// ffmpeg executable
    pub ffmpeg: String,

    /// Value passed to ffmpeg's `-loglevel`
    pub ffmpeg_loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_extension: None,
            preferred_source_ext: Some("m4a".to_string()),
            tools: ToolsConfig {
                yt_dlp: "yt-dlp".to_string(),
                ffmpeg: "ffmpeg".to_string(),
                ffmpeg_loglevel: "warning".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config = Self::from_yaml(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            if let Err(e) = config.save().await {
                tracing::warn!("Could not write default config: {:#}", e);
            }
            Ok(config)
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("ytsound").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.tools.yt_dlp.trim().is_empty() {
            anyhow::bail!("tools.yt_dlp must name the yt-dlp executable");
        }

        if self.tools.ffmpeg.trim().is_empty() {
            anyhow::bail!("tools.ffmpeg must name the ffmpeg executable");
        }

        if !FFMPEG_LOGLEVELS.contains(&self.tools.ffmpeg_loglevel.as_str()) {
            anyhow::bail!(
                "Unknown ffmpeg log level '{}', expected one of: {}",
                self.tools.ffmpeg_loglevel,
                FFMPEG_LOGLEVELS.join(", ")
            );
        }

        Ok(())
    }

    /// Directory music is saved to when `--output` is not given
    pub fn music_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::audio_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Output Directory: {}", self.music_dir().display());
        println!(
            "  Default Extension: {}",
            self.default_extension.as_deref().unwrap_or("(same as source)")
        );
        println!(
            "  Preferred Source: {}",
            self.preferred_source_ext.as_deref().unwrap_or("(first with audio)")
        );
        println!("  yt-dlp: {}", self.tools.yt_dlp);
        println!("  ffmpeg: {} (loglevel {})", self.tools.ffmpeg, self.tools.ffmpeg_loglevel);
        if let Ok(path) = Self::config_path() {
            println!("  Config File: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.tools.ffmpeg_loglevel, "warning");
        assert_eq!(config.preferred_source_ext.as_deref(), Some("m4a"));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
output_dir: /srv/music
default_extension: mp3
preferred_source_ext: null
tools:
  yt_dlp: /usr/local/bin/yt-dlp
  ffmpeg: ffmpeg
  ffmpeg_loglevel: error
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.music_dir(), PathBuf::from("/srv/music"));
        assert_eq!(config.default_extension.as_deref(), Some("mp3"));
        assert!(config.preferred_source_ext.is_none());
    }

    #[test]
    fn test_rejects_unknown_loglevel() {
        let mut config = Config::default();
        config.tools.ffmpeg_loglevel = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_tool() {
        let mut config = Config::default();
        config.tools.yt_dlp = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_music_dir_falls_back() {
        let config = Config::default();
        assert!(!config.music_dir().as_os_str().is_empty());
    }
}
