use std::path::PathBuf;

use crate::models::TrackError;
use crate::ports::tag_writer::TagWriter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TagSummary {
    pub tagged: usize,
    pub failed: usize,
}

/// Tag every downloaded file with the playlist's artist and album. The title
/// is the file name without its extension.
///
/// Must only run once all downloads of the playlist have finished, since the
/// download tasks are still renaming files until then.
pub async fn tag_all(
    writer: &dyn TagWriter,
    paths: &[PathBuf],
    artist: &str,
    album: &str,
) -> TagSummary {
    let mut summary = TagSummary::default();

    for path in paths {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        match writer.write_tags(path, artist, album, &title).await {
            Ok(()) => {
                summary.tagged += 1;
                log::info!("Tagged metadata for: {}", path.display());
            }
            Err(e) => {
                summary.failed += 1;
                let error = TrackError::TaggingFailed {
                    path: path.display().to_string(),
                    error_message: format!("{:#}", e),
                };
                log::warn!("{}", error);
            }
        }
    }

    summary
}
