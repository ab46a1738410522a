use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use tokio::process::Command;

use super::types::PlaylistListing;

/// Thin wrapper around the `yt-dlp` executable.
///
/// Children are killed when their future is dropped, so an interrupted run
/// does not leave downloads behind.
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    binary: PathBuf,
}

impl YtDlpClient {
    pub fn new(binary: &str) -> Result<Self> {
        let binary = which::which(binary).map_err(|_| {
            eyre!(
                "{} not found in PATH. Please install yt-dlp and ensure it's available.",
                binary
            )
        })?;
        log::debug!("Using yt-dlp at: {}", binary.display());
        Ok(Self { binary })
    }

    /// List a playlist without downloading anything.
    pub async fn playlist_listing(&self, playlist_url: &str) -> Result<PlaylistListing> {
        log::debug!("Listing playlist: {}", playlist_url);
        let output = self
            .command()
            .args(["-J", "--flat-playlist", playlist_url])
            .output()
            .await
            .wrap_err("Failed to run yt-dlp")?;
        check_status(&output, playlist_url)?;

        serde_json::from_slice(&output.stdout)
            .wrap_err_with(|| format!("Failed to parse yt-dlp listing for {}", playlist_url))
    }

    /// Download a track and convert it to mp3 inside `output_dir`.
    /// The file is named after the upload title.
    pub async fn extract_audio(&self, track_url: &str, output_dir: &Path) -> Result<()> {
        let template = output_dir.join("%(title)s.%(ext)s");
        log::debug!("Extracting audio for {} into {}", track_url, output_dir.display());

        let output = self
            .command()
            .args(["-x", "--audio-format", "mp3"])
            .args(["--sleep-interval", "3", "--max-sleep-interval", "7"])
            .args(["--retries", "10", "--fragment-retries", "10"])
            .arg("-o")
            .arg(&template)
            .arg(track_url)
            .output()
            .await
            .wrap_err("Failed to run yt-dlp")?;
        check_status(&output, track_url)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

fn check_status(output: &Output, url: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(eyre!(
        "yt-dlp exited with {} for {}: {}",
        output.status,
        url,
        stderr.trim()
    ))
}
