use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::download::RetryPolicy;
use crate::pipeline::DriverSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the per-artist download folders. `~/` is expanded.
    pub music_directory: String,
    pub ytdlp_path: String,
    pub concurrency: usize,
    pub max_retries: u32,
    /// Durations use humantime syntax, e.g. "5s" or "1m 30s".
    pub retry_backoff_step: String,
    pub playlist_delay_min: String,
    pub playlist_delay_max: String,
    pub continue_on_playlist_error: bool,
    pub include_alternate_versions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_directory: "music".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
            concurrency: 5,
            max_retries: 3,
            retry_backoff_step: "5s".to_string(),
            playlist_delay_min: "10s".to_string(),
            playlist_delay_max: "20s".to_string(),
            continue_on_playlist_error: false,
            include_alternate_versions: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-ripper").join("config.toml"))
    }

    /// Load the default config file, or the built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the defaults to the config path unless a file is already there.
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| eyre!("No config directory available"))?;
        Self::write_default_to(&path)?;
        Ok(path)
    }

    fn write_default_to(path: &Path) -> Result<()> {
        if path.exists() {
            log::info!("Config file already exists at {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    pub fn music_directory_path(&self) -> PathBuf {
        self.expand_path(&self.music_directory)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy {
            max_attempts: self.max_retries,
            backoff_step: parse_duration("retry_backoff_step", &self.retry_backoff_step)?,
        })
    }

    pub fn playlist_delay_range(&self) -> Result<(Duration, Duration)> {
        let min = parse_duration("playlist_delay_min", &self.playlist_delay_min)?;
        let max = parse_duration("playlist_delay_max", &self.playlist_delay_max)?;
        if min > max {
            return Err(eyre!(
                "playlist_delay_min ({}) is larger than playlist_delay_max ({})",
                self.playlist_delay_min,
                self.playlist_delay_max
            ));
        }
        Ok((min, max))
    }

    pub fn driver_settings(&self) -> Result<DriverSettings> {
        if self.concurrency == 0 {
            return Err(eyre!("concurrency must be at least 1"));
        }
        let (playlist_delay_min, playlist_delay_max) = self.playlist_delay_range()?;
        Ok(DriverSettings {
            music_directory: self.music_directory_path(),
            concurrency: self.concurrency,
            retry: self.retry_policy()?,
            playlist_delay_min,
            playlist_delay_max,
            continue_on_playlist_error: self.continue_on_playlist_error,
            include_alternate_versions: self.include_alternate_versions,
        })
    }
}

fn parse_duration(key: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim())
        .wrap_err_with(|| format!("Invalid duration for {}: '{}'", key, value))
}
