use serde::Deserialize;

use crate::models::RawEntry;

/// The subset of `yt-dlp -J --flat-playlist` output we read.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistListing {
    #[serde(default)]
    pub title: Option<String>,
    /// Unavailable videos show up as `null`.
    #[serde(default)]
    pub entries: Vec<Option<ListingEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl PlaylistListing {
    pub fn into_raw_entries(self) -> Vec<RawEntry> {
        self.entries
            .into_iter()
            .flatten()
            .filter_map(|entry| match entry.title {
                Some(title) if !title.trim().is_empty() => Some(RawEntry {
                    external_id: entry.id,
                    raw_title: title,
                }),
                _ => {
                    log::debug!("Skipping playlist entry {} without a title", entry.id);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_playlist_listing() {
        let json = r#"{
            "id": "PL123",
            "title": "Greatest Hits",
            "_type": "playlist",
            "entries": [
                {"id": "abc", "title": "Queen - Bohemian Rhapsody (Official Video)", "url": "https://www.youtube.com/watch?v=abc"},
                null,
                {"id": "def", "title": "Queen - Don't Stop Me Now"},
                {"id": "ghi"}
            ]
        }"#;

        let listing: PlaylistListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.title.as_deref(), Some("Greatest Hits"));

        let entries = listing.into_raw_entries();
        assert_eq!(
            entries,
            vec![
                RawEntry {
                    external_id: "abc".to_string(),
                    raw_title: "Queen - Bohemian Rhapsody (Official Video)".to_string(),
                },
                RawEntry {
                    external_id: "def".to_string(),
                    raw_title: "Queen - Don't Stop Me Now".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_listing_without_entries() {
        let listing: PlaylistListing = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(listing.into_raw_entries().is_empty());
    }
}
