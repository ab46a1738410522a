pub mod client;
pub mod types;

pub use client::YtDlpClient;
pub use types::PlaylistListing;
