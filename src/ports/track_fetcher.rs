use std::path::Path;

use color_eyre::eyre::Result;

/// Port trait for downloading a single track's audio.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackFetcher: Send + Sync {
    /// Write one audio file into `output_dir`, named however the fetcher
    /// sees fit. The error carries the fetcher's diagnostic output.
    async fn fetch(&self, track_url: &str, output_dir: &Path) -> Result<()>;
}
