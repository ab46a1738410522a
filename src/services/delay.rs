use std::time::Duration;

use rand::Rng;

use crate::ports::delay::DelayProvider;

/// Real waits on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait::async_trait]
impl DelayProvider for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn pick(&self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let millis = rand::rng().random_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }
}
