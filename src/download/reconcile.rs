use std::path::{Component, Path, PathBuf};

use futures::TryStreamExt;
use tokio::fs::DirEntry;
use tokio_stream::wrappers::ReadDirStream;

use super::AUDIO_EXTENSION;
use crate::models::TrackError;

/// Finds the file a finished download produced and moves it to its final name.
#[async_trait::async_trait]
pub trait FileReconciler: Send + Sync {
    async fn reconcile(
        &self,
        output_dir: &Path,
        expected_raw_name: &str,
        normalized_name: &str,
    ) -> Result<PathBuf, TrackError>;
}

/// Best-effort matching for fetchers that name files their own way.
///
/// The file named after the raw title wins. Otherwise the first `.mp3` in the
/// directory whose name contains the normalized title (case-insensitive) is
/// taken, in directory iteration order. This can pick the wrong file when
/// one normalized title is contained in another's, e.g. "Song" and "Song Two".
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringReconciler;

#[async_trait::async_trait]
impl FileReconciler for SubstringReconciler {
    async fn reconcile(
        &self,
        output_dir: &Path,
        expected_raw_name: &str,
        normalized_name: &str,
    ) -> Result<PathBuf, TrackError> {
        let target = output_dir.join(format!("{}.{}", normalized_name, AUDIO_EXTENSION));

        let source = if let Some(exact) = exact_raw_file(output_dir, expected_raw_name).await {
            exact
        } else {
            log::debug!(
                "'{}' not found as a file, scanning {} for '{}'",
                expected_raw_name,
                output_dir.display(),
                normalized_name
            );
            let candidate = find_candidate(output_dir, normalized_name)
                .await
                .unwrap_or_else(|e| {
                    log::warn!("Failed to scan {}: {}", output_dir.display(), e);
                    None
                });
            candidate.ok_or_else(|| TrackError::FileNotFound {
                directory: output_dir.display().to_string(),
                name: normalized_name.to_string(),
            })?
        };

        if source != target {
            log::debug!("Renaming {} to {}", source.display(), target.display());
            tokio::fs::rename(&source, &target)
                .await
                .map_err(|e| TrackError::RenameFailed {
                    from: source.display().to_string(),
                    to: target.display().to_string(),
                    error_message: e.to_string(),
                })?;
        }

        Ok(target)
    }
}

/// `<output_dir>/<raw name>.mp3` when the raw name is a single plain file
/// name and that file exists. Titles come from the remote listing and must
/// not point outside `output_dir`.
async fn exact_raw_file(output_dir: &Path, raw_name: &str) -> Option<PathBuf> {
    let file_name = format!("{}.{}", raw_name, AUDIO_EXTENSION);
    let mut components = Path::new(&file_name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        log::debug!("'{}' is not a plain file name, skipping exact lookup", raw_name);
        return None;
    }

    let path = output_dir.join(file_name);
    is_file(&path).await.then_some(path)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

async fn find_candidate(output_dir: &Path, normalized_name: &str) -> std::io::Result<Option<PathBuf>> {
    let needle = normalized_name.to_lowercase();
    let suffix = format!(".{}", AUDIO_EXTENSION);

    let entries: Vec<DirEntry> = ReadDirStream::new(tokio::fs::read_dir(output_dir).await?)
        .try_collect()
        .await?;

    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        if !file_name.ends_with(&suffix) || !file_name.contains(&needle) {
            continue;
        }
        if entry.file_type().await?.is_file() {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}
