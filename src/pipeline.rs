use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::download::{DownloadScheduler, FileReconciler, RetryPolicy, SubstringReconciler};
use crate::metadata::tag_all;
use crate::models::{CleanEntry, PlaylistDescriptor, RawEntry};
use crate::ports::delay::DelayProvider;
use crate::ports::playlist_source::PlaylistSource;
use crate::ports::tag_writer::TagWriter;
use crate::ports::track_fetcher::TrackFetcher;
use crate::title::{filter_entries, is_alternate_version, normalize, sanitize_filename};

const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub music_directory: PathBuf,
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub playlist_delay_min: Duration,
    pub playlist_delay_max: Duration,
    /// Keep going with the next playlist when one can't be listed.
    pub continue_on_playlist_error: bool,
    pub include_alternate_versions: bool,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            music_directory: PathBuf::from("music"),
            concurrency: 5,
            retry: RetryPolicy::default(),
            playlist_delay_min: Duration::from_secs(10),
            playlist_delay_max: Duration::from_secs(20),
            continue_on_playlist_error: false,
            include_alternate_versions: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to retrieve playlist entries for {url}: {error_message}")]
    Source { url: String, error_message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistReport {
    pub url: String,
    pub artist: String,
    pub album: String,
    pub output_directory: PathBuf,
    pub listed: usize,
    pub skipped: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub tagged: usize,
    pub tag_failures: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPlaylist {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub playlists: Vec<PlaylistReport>,
    pub failed_playlists: Vec<FailedPlaylist>,
}

/// Processes playlists one after another: list, filter, download, tag.
pub struct PlaylistDriver {
    settings: DriverSettings,
    source: Arc<dyn PlaylistSource>,
    fetcher: Arc<dyn TrackFetcher>,
    tagger: Arc<dyn TagWriter>,
    delay: Arc<dyn DelayProvider>,
    reconciler: Arc<dyn FileReconciler>,
}

impl PlaylistDriver {
    pub fn new(
        settings: DriverSettings,
        source: Arc<dyn PlaylistSource>,
        fetcher: Arc<dyn TrackFetcher>,
        tagger: Arc<dyn TagWriter>,
        delay: Arc<dyn DelayProvider>,
    ) -> Self {
        Self {
            settings,
            source,
            fetcher,
            tagger,
            delay,
            reconciler: Arc::new(SubstringReconciler),
        }
    }

    pub fn with_reconciler(mut self, reconciler: Arc<dyn FileReconciler>) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Process every playlist in order, pausing between consecutive ones.
    ///
    /// An output directory that can't be created always ends the run. A
    /// playlist that can't be listed ends it too, unless
    /// `continue_on_playlist_error` is set.
    pub async fn run(&self, playlists: &[PlaylistDescriptor]) -> Result<RunReport, PlaylistError> {
        let mut report = RunReport::default();

        for (index, playlist) in playlists.iter().enumerate() {
            if index > 0 {
                self.pause_between_playlists().await;
            }

            match self.process_playlist(playlist).await {
                Ok(playlist_report) => report.playlists.push(playlist_report),
                Err(e @ PlaylistError::Source { .. }) if self.settings.continue_on_playlist_error => {
                    log::error!("{}; continuing with the next playlist", e);
                    report.failed_playlists.push(FailedPlaylist {
                        url: playlist.url.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    pub async fn process_playlist(
        &self,
        playlist: &PlaylistDescriptor,
    ) -> Result<PlaylistReport, PlaylistError> {
        let output_directory = self.output_directory(&playlist.artist);
        tokio::fs::create_dir_all(&output_directory)
            .await
            .map_err(|source| PlaylistError::OutputDirectory {
                path: output_directory.clone(),
                source,
            })?;

        log::info!(
            "Processing playlist: {} (Artist: {}, Album: {})",
            playlist.url,
            playlist.artist,
            playlist.album
        );

        let raw_entries = self
            .source
            .list_entries(&playlist.url)
            .await
            .map_err(|e| PlaylistError::Source {
                url: playlist.url.clone(),
                error_message: format!("{:#}", e),
            })?;

        let listed = raw_entries.len();
        let entries = self.clean_entries(raw_entries, &playlist.artist);
        let scheduled = entries.len();
        log::info!(
            "{} of {} entries left after filtering alternate versions",
            scheduled,
            listed
        );

        let scheduler = DownloadScheduler::new(
            self.fetcher.as_ref(),
            self.delay.as_ref(),
            self.reconciler.as_ref(),
            self.settings.retry,
            self.settings.concurrency,
        );
        let downloaded: Vec<PathBuf> = scheduler
            .run(entries, &output_directory)
            .await
            .into_iter()
            .filter_map(|outcome| outcome.result.ok())
            .collect();

        // Every download task has finished at this point.
        let tags = tag_all(
            self.tagger.as_ref(),
            &downloaded,
            &playlist.artist,
            &playlist.album,
        )
        .await;

        Ok(PlaylistReport {
            url: playlist.url.clone(),
            artist: playlist.artist.clone(),
            album: playlist.album.clone(),
            output_directory,
            listed,
            skipped: listed - scheduled,
            downloaded: downloaded.len(),
            failed: scheduled - downloaded.len(),
            tagged: tags.tagged,
            tag_failures: tags.failed,
        })
    }

    /// `<music directory>/<sanitized artist>`.
    pub fn output_directory(&self, artist: &str) -> PathBuf {
        let name = sanitize_filename(artist.trim());
        let name = if name.trim_matches('.').is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            name
        };
        self.settings.music_directory.join(name)
    }

    fn clean_entries(&self, raw_entries: Vec<RawEntry>, artist: &str) -> Vec<CleanEntry> {
        let include_alternates = self.settings.include_alternate_versions;
        let candidates = if include_alternates {
            raw_entries
        } else {
            filter_entries(raw_entries)
        };

        // Case-insensitive so that no two downloads share a file on any filesystem.
        let mut seen_titles = HashSet::new();
        candidates
            .into_iter()
            .filter_map(|entry| {
                let mut normalized_title = normalize(&entry.raw_title, artist);
                if normalized_title.is_empty() {
                    normalized_title = sanitize_filename(&entry.external_id);
                }
                if !include_alternates && is_alternate_version(&normalized_title) {
                    log::info!("Skipping alternate version: {}", normalized_title);
                    return None;
                }
                if !seen_titles.insert(normalized_title.to_lowercase()) {
                    log::warn!(
                        "Skipping '{}' ({}): another entry already downloads to '{}'",
                        entry.raw_title,
                        entry.external_id,
                        normalized_title
                    );
                    return None;
                }

                Some(CleanEntry {
                    track_url: self.source.track_url(&entry.external_id),
                    external_id: entry.external_id,
                    raw_title: entry.raw_title,
                    normalized_title,
                })
            })
            .collect()
    }

    async fn pause_between_playlists(&self) {
        let wait = self.delay.pick(
            self.settings.playlist_delay_min,
            self.settings.playlist_delay_max,
        );
        log::info!(
            "Sleeping for {} between playlists...",
            humantime::format_duration(wait)
        );
        self.delay.sleep(wait).await;
    }
}
