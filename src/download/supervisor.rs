use std::path::Path;
use std::time::Duration;

use crate::models::TrackError;
use crate::ports::delay::DelayProvider;
use crate::ports::track_fetcher::TrackFetcher;

/// How often a download is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// The wait after failed attempt `n` is `n * backoff_step`.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Fetch one track, retrying with a linear backoff.
///
/// Returns the diagnostics of the last attempt once every attempt failed.
/// There is no wait after the final attempt.
pub async fn download_with_retry(
    fetcher: &dyn TrackFetcher,
    delay: &dyn DelayProvider,
    policy: RetryPolicy,
    track_url: &str,
    output_dir: &Path,
) -> Result<(), TrackError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match fetcher.fetch(track_url, output_dir).await {
            Ok(()) => {
                if attempt > 1 {
                    log::info!("Downloaded {} on try {}/{}", track_url, attempt, max_attempts);
                }
                return Ok(());
            }
            Err(e) => {
                log::warn!(
                    "Download failed (try {}/{}) for {}: {:#}",
                    attempt,
                    max_attempts,
                    track_url,
                    e
                );
                if attempt >= max_attempts {
                    return Err(TrackError::DownloadFailed {
                        url: track_url.to_string(),
                        attempts: attempt,
                        last_error: format!("{:#}", e),
                    });
                }

                let wait = policy.backoff_after(attempt);
                log::info!(
                    "Retrying {} in {}",
                    track_url,
                    humantime::format_duration(wait)
                );
                delay.sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
