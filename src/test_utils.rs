use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::models::CleanEntry;
use crate::ports::delay::DelayProvider;
use crate::ports::track_fetcher::TrackFetcher;

pub fn clean_entry(id: &str, raw_title: &str, normalized_title: &str) -> CleanEntry {
    CleanEntry {
        external_id: id.to_string(),
        raw_title: raw_title.to_string(),
        normalized_title: normalized_title.to_string(),
        track_url: format!("https://example.test/watch?v={}", id),
    }
}

/// Records requested waits and returns immediately. `pick` always answers
/// with the lower bound.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    sleeps: Mutex<Vec<Duration>>,
    picks: Mutex<Vec<(Duration, Duration)>>,
}

impl RecordingDelay {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn picks(&self) -> Vec<(Duration, Duration)> {
        self.picks.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DelayProvider for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }

    fn pick(&self, min: Duration, max: Duration) -> Duration {
        self.picks.lock().unwrap().push((min, max));
        min
    }
}

/// Fetcher that writes a placeholder file per known URL and tracks how many
/// fetches overlap.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    files: HashMap<String, String>,
    failing: HashSet<String>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A successful fetch of `url` writes `file_name` into the output directory.
    pub fn with_file(mut self, url: &str, file_name: &str) -> Self {
        self.files.insert(url.to_string(), file_name.to_string());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TrackFetcher for FakeFetcher {
    async fn fetch(&self, track_url: &str, output_dir: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Give every other pending fetch a chance to start.
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let result = if self.failing.contains(track_url) {
            Err(eyre!("ERROR: [youtube] {}: Video unavailable", track_url))
        } else if let Some(file_name) = self.files.get(track_url) {
            tokio::fs::write(output_dir.join(file_name), b"audio")
                .await
                .wrap_err("Failed to write fake download")
        } else {
            Ok(())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
