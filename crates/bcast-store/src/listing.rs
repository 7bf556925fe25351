//! Extension-filtered directory listing.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{StoreError, StoreResult};

/// List files directly under `dir` whose extension case-insensitively
/// matches one of `extensions` (without the dot).
///
/// The result is sorted lexicographically by path, which pins down the
/// audio ordering of archive-sourced batches.
pub async fn list_by_extension(dir: &Path, extensions: &[&str]) -> StoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StoreError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_lowercase();
                extensions.iter().any(|want| want.to_lowercase() == e)
            })
            .unwrap_or(false);
        if matches {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn touch(path: &Path) {
        fs::write(path, b"x").await.unwrap();
    }

    #[tokio::test]
    async fn test_listing_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.mp3")).await;
        touch(&dir.path().join("a.MP3")).await;
        touch(&dir.path().join("c.jpg")).await;
        touch(&dir.path().join("notes.txt")).await;
        touch(&dir.path().join("noext")).await;

        let audio = list_by_extension(dir.path(), &["mp3"]).await.unwrap();
        let names: Vec<_> = audio
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.mp3"]);

        let images = list_by_extension(dir.path(), &["jpg", "jpeg", "png"])
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
    }

    #[tokio::test]
    async fn test_listing_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.mp3")).await.unwrap();
        touch(&dir.path().join("real.mp3")).await;

        let audio = list_by_extension(dir.path(), &["mp3"]).await.unwrap();
        assert_eq!(audio.len(), 1);
    }

    #[tokio::test]
    async fn test_listing_rejects_non_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.mp3");
        touch(&file).await;
        let err = list_by_extension(&file, &["mp3"]).await.unwrap_err();
        assert!(matches!(err, StoreError::NotADirectory(_)));
    }
}
