use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::PlaylistDescriptor;

#[derive(Debug, Error)]
pub enum PlaylistFileError {
    #[error("Failed to read playlist file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line_number}: expected exactly one '|' between description and URL: {line}")]
    InvalidLine { line_number: usize, line: String },

    #[error("Line {line_number}: missing playlist URL: {line}")]
    MissingUrl { line_number: usize, line: String },
}

/// Load playlists from a text file.
///
/// Each non-blank, non-comment line looks like `Artist - Album|https://...`.
/// Any malformed line fails the whole file.
pub fn load_playlists(path: &Path) -> Result<Vec<PlaylistDescriptor>, PlaylistFileError> {
    log::debug!("Loading playlists from: {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| PlaylistFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let playlists = parse_playlists(&contents)?;
    log::info!(
        "Loaded {} playlist(s) from {}",
        playlists.len(),
        path.display()
    );
    Ok(playlists)
}

pub fn parse_playlists(contents: &str) -> Result<Vec<PlaylistDescriptor>, PlaylistFileError> {
    let mut playlists = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (description, url) = match line.split_once('|') {
            Some((description, url)) if !url.contains('|') => (description, url),
            _ => {
                return Err(PlaylistFileError::InvalidLine {
                    line_number,
                    line: line.to_string(),
                });
            }
        };

        let url = url.trim();
        if url.is_empty() {
            return Err(PlaylistFileError::MissingUrl {
                line_number,
                line: line.to_string(),
            });
        }

        let description = description.trim();
        let (artist, album) = match description.split_once(" - ") {
            Some((artist, album)) => (artist.trim(), album.trim()),
            None => (description, ""),
        };

        playlists.push(PlaylistDescriptor {
            url: url.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
        });
    }

    Ok(playlists)
}
