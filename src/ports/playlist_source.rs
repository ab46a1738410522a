use color_eyre::eyre::Result;

use crate::models::RawEntry;

/// Port trait for listing the tracks of a playlist.
///
/// Implementations live in `services::ytdlp` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Entries in playlist order. An error aborts the playlist.
    async fn list_entries(&self, playlist_url: &str) -> Result<Vec<RawEntry>>;

    /// The URL the fetcher should download for an entry.
    fn track_url(&self, external_id: &str) -> String;
}
