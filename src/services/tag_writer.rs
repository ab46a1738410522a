use std::path::Path;

use audiotags::{AudioTag, AudioTagEdit, AudioTagWrite, Id3v2Tag, Tag, TagType};
use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::ports::tag_writer::TagWriter;

/// Writes ID3v2 artist/album/title frames with `audiotags`.
///
/// Files that come without a tag get a fresh one.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudiotagsWriter;

#[async_trait::async_trait]
impl TagWriter for AudiotagsWriter {
    async fn write_tags(
        &self,
        path: &Path,
        artist: &str,
        album: &str,
        title: &str,
    ) -> Result<()> {
        let path = path.to_path_buf();
        let artist = artist.to_string();
        let album = album.to_string();
        let title = title.to_string();

        tokio::task::spawn_blocking(move || write_id3_tags(&path, &artist, &album, &title))
            .await
            .wrap_err("Tag writing task panicked")?
    }
}

fn write_id3_tags(path: &Path, artist: &str, album: &str, title: &str) -> Result<()> {
    let path_str = path
        .to_str()
        .ok_or_else(|| eyre!("Path is not valid UTF-8: {}", path.display()))?;

    let written = match Tag::new()
        .with_tag_type(TagType::Id3v2)
        .read_from_path(path)
    {
        Ok(mut tag) => set_fields_and_write(tag.as_mut(), path_str, artist, album, title),
        Err(e) => {
            log::debug!(
                "No readable tag in {} ({}), starting a new one",
                path.display(),
                e
            );
            set_fields_and_write(&mut Id3v2Tag::new(), path_str, artist, album, title)
        }
    };

    written.wrap_err_with(|| format!("Failed to save tags to {}", path.display()))
}

fn set_fields_and_write<T: AudioTag + ?Sized>(
    tag: &mut T,
    path: &str,
    artist: &str,
    album: &str,
    title: &str,
) -> audiotags::Result<()> {
    tag.set_artist(artist);
    // An empty album clears whatever album the file was tagged with before.
    if album.is_empty() {
        tag.remove_album_title();
    } else {
        tag.set_album_title(album);
    }
    tag.set_title(title);
    tag.write_to_path(path)
}
