use std::path::{Path, PathBuf};

use futures::future::join_all;
use tokio::sync::Semaphore;

use super::reconcile::FileReconciler;
use super::supervisor::{RetryPolicy, download_with_retry};
use crate::models::{CleanEntry, DownloadOutcome, TrackError};
use crate::ports::delay::DelayProvider;
use crate::ports::track_fetcher::TrackFetcher;

/// Runs the downloads of one playlist with a bounded number in flight.
pub struct DownloadScheduler<'a> {
    fetcher: &'a dyn TrackFetcher,
    delay: &'a dyn DelayProvider,
    reconciler: &'a dyn FileReconciler,
    policy: RetryPolicy,
    concurrency: usize,
}

impl<'a> DownloadScheduler<'a> {
    pub fn new(
        fetcher: &'a dyn TrackFetcher,
        delay: &'a dyn DelayProvider,
        reconciler: &'a dyn FileReconciler,
        policy: RetryPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            delay,
            reconciler,
            policy,
            concurrency: concurrency.max(1),
        }
    }

    /// Download and reconcile every entry, returning one outcome per entry in
    /// input order. Only returns once every task has finished; a failed entry
    /// never stops its siblings.
    pub async fn run(&self, entries: Vec<CleanEntry>, output_dir: &Path) -> Vec<DownloadOutcome> {
        let total = entries.len();
        log::debug!(
            "Scheduling {} download(s) into {} ({} at a time)",
            total,
            output_dir.display(),
            self.concurrency
        );

        let semaphore = Semaphore::new(self.concurrency);
        let tasks: Vec<_> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let semaphore = &semaphore;
                async move {
                    // The permit covers the download and the rename that follows it.
                    let _permit = semaphore
                        .acquire()
                        .await
                        .expect("download semaphore is never closed");
                    log::info!(
                        "Downloading ({}/{}): {}",
                        index + 1,
                        total,
                        entry.normalized_title
                    );

                    let result = self.download_and_reconcile(&entry, output_dir).await;
                    match &result {
                        Ok(path) => log::info!("Downloaded and renamed: {}", path.display()),
                        Err(e) => log::warn!("Skipping '{}': {}", entry.normalized_title, e),
                    }
                    DownloadOutcome { entry, result }
                }
            })
            .collect();

        let outcomes = join_all(tasks).await;

        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        log::info!(
            "Downloads complete for {}: {} succeeded, {} failed",
            output_dir.display(),
            succeeded,
            total - succeeded
        );
        outcomes
    }

    async fn download_and_reconcile(
        &self,
        entry: &CleanEntry,
        output_dir: &Path,
    ) -> Result<PathBuf, TrackError> {
        download_with_retry(
            self.fetcher,
            self.delay,
            self.policy,
            &entry.track_url,
            output_dir,
        )
        .await?;

        self.reconciler
            .reconcile(output_dir, &entry.raw_title, &entry.normalized_title)
            .await
    }
}
