pub mod reconcile;
pub mod scheduler;
pub mod supervisor;

pub use reconcile::{FileReconciler, SubstringReconciler};
pub use scheduler::DownloadScheduler;
pub use supervisor::{RetryPolicy, download_with_retry};

/// Extension of the files the fetcher produces.
pub const AUDIO_EXTENSION: &str = "mp3";
