use std::path::Path;

use color_eyre::eyre::Result;

/// Port trait for writing descriptive tags into an audio file in place.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TagWriter: Send + Sync {
    async fn write_tags(&self, path: &Path, artist: &str, album: &str, title: &str)
    -> Result<()>;
}
