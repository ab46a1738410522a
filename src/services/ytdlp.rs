use std::path::Path;

use color_eyre::eyre::Result;

use crate::models::RawEntry;
use crate::ports::playlist_source::PlaylistSource;
use crate::ports::track_fetcher::TrackFetcher;
use crate::ytdlp::YtDlpClient;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Serves both the playlist listing and the per-track downloads from yt-dlp.
pub struct YtDlpAdapter {
    client: YtDlpClient,
}

impl YtDlpAdapter {
    pub fn new(client: YtDlpClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PlaylistSource for YtDlpAdapter {
    async fn list_entries(&self, playlist_url: &str) -> Result<Vec<RawEntry>> {
        let listing = self.client.playlist_listing(playlist_url).await?;
        log::debug!(
            "Playlist '{}' lists {} entries",
            listing.title.as_deref().unwrap_or(playlist_url),
            listing.entries.len()
        );
        Ok(listing.into_raw_entries())
    }

    fn track_url(&self, external_id: &str) -> String {
        format!("{}{}", YOUTUBE_WATCH_URL, external_id)
    }
}

#[async_trait::async_trait]
impl TrackFetcher for YtDlpAdapter {
    async fn fetch(&self, track_url: &str, output_dir: &Path) -> Result<()> {
        self.client.extract_audio(track_url, output_dir).await
    }
}
