use std::path::PathBuf;

use thiserror::Error;

/// One line of the playlist list file: a batch of tracks to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDescriptor {
    pub url: String,
    pub artist: String,
    pub album: String,
}

/// An entry as listed by the playlist source, before any cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub external_id: String,
    pub raw_title: String,
}

/// A track that survived filtering and is ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanEntry {
    pub external_id: String,
    /// The title as listed by the source. The fetcher names its output after this.
    pub raw_title: String,
    pub normalized_title: String,
    pub track_url: String,
}

/// Per-track failures. These never abort a playlist, they only shrink the
/// set of files that get tagged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("Download of {url} failed after {attempts} attempt(s): {last_error}")]
    DownloadFailed {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Could not find a downloaded file for '{name}' in {directory}")]
    FileNotFound { directory: String, name: String },

    #[error("Failed to rename {from} to {to}: {error_message}")]
    RenameFailed {
        from: String,
        to: String,
        error_message: String,
    },

    #[error("Failed to tag {path}: {error_message}")]
    TaggingFailed { path: String, error_message: String },
}

/// The result of scheduling one entry. Exactly one exists per entry.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub entry: CleanEntry,
    pub result: Result<PathBuf, TrackError>,
}

impl DownloadOutcome {
    pub fn path(&self) -> Option<&PathBuf> {
        self.result.as_ref().ok()
    }
}
