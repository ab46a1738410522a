use std::time::Duration;

/// Source of waits for retry backoff and the pause between playlists.
///
/// Injected so that tests can record the requested waits instead of sleeping.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DelayProvider: Send + Sync {
    async fn sleep(&self, duration: Duration);

    /// A duration chosen uniformly from the inclusive range `min..=max`.
    fn pick(&self, min: Duration, max: Duration) -> Duration;
}
