use crate::keys::{self, validate_key};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tuneshelf")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8080/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);
        if path.strip_prefix(&self.base_path).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    /// Directory to scan for a listing prefix, plus the filename prefix to match.
    ///
    /// `songs/` lists the whole `songs` directory; `songs/v3` lists `songs`
    /// entries whose names start with `v3`.
    fn prefix_to_dir<'p>(&self, prefix: &'p str) -> StorageResult<(PathBuf, &'p str)> {
        let dir_part = keys::prefix_of(prefix);
        let name_part = &prefix[dir_part.len()..];
        if dir_part.is_empty() {
            return Ok((self.base_path.clone(), name_part));
        }
        Ok((self.key_to_path(dir_part.trim_end_matches('/'))?, name_part))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let (dir, name_prefix) = self.prefix_to_dir(prefix)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            StorageError::ListFailed(format!("Failed to read directory {}: {}", dir.display(), e))
        })?;

        let dir_key = keys::prefix_of(prefix);
        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 filename");
                continue;
            };
            if !name.starts_with(name_prefix) {
                continue;
            }

            objects.push(StoredObject {
                key: keys::storage_key(dir_key, &name),
                size_bytes: metadata.len(),
                last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        tracing::debug!(
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage list successful"
        );

        Ok(objects)
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.public_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn copy(&self, from_key: &str, to_key: &str) -> StorageResult<String> {
        let from_path = self.key_to_path(from_key)?;
        let to_path = self.key_to_path(to_key)?;

        if !fs::try_exists(&from_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(from_key.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::copy(&from_path, &to_path).await.map_err(|e| {
            StorageError::BackendError(format!(
                "Failed to copy {} to {}: {}",
                from_path.display(),
                to_path.display(),
                e
            ))
        })?;

        tracing::info!(
            from_key = %from_key,
            to_key = %to_key,
            "Local storage copy successful"
        );

        Ok(self.public_url(to_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            keys::url_path(storage_key)
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:8080/media/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_upload_download() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;
        let data = b"test data".to_vec();

        let url = storage
            .upload_with_key("songs/test.mp3", data.clone(), "audio/mpeg")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8080/media/songs/test.mp3");

        let downloaded = storage.download("songs/test.mp3").await.unwrap();
        assert_eq!(data, downloaded);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.list("../").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_double_dot_inside_filename_allowed() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .upload_with_key("songs/a..b.mp3", b"x".to_vec(), "audio/mpeg")
            .await
            .unwrap();
        assert!(storage.exists("songs/a..b.mp3").await.unwrap());

        storage.delete("songs/a..b.mp3").await.unwrap();
        assert!(!storage.exists("songs/a..b.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_delete_nonexistent() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let result = storage.delete("songs/missing.mp3").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_local_storage_exists_and_delete() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .upload_with_key("songs/exists.mp3", b"x".to_vec(), "audio/mpeg")
            .await
            .unwrap();
        assert!(storage.exists("songs/exists.mp3").await.unwrap());
        assert!(!storage.exists("songs/nonexistent.mp3").await.unwrap());

        storage.delete("songs/exists.mp3").await.unwrap();
        assert!(!storage.exists("songs/exists.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_copy() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;
        let data = b"original content".to_vec();

        storage
            .upload_with_key("songs/original.mp3", data.clone(), "audio/mpeg")
            .await
            .unwrap();

        let url = storage
            .copy("songs/original.mp3", "songs/copied.mp3")
            .await
            .unwrap();
        assert!(url.ends_with("songs/copied.mp3"));

        let copied = storage.download("songs/copied.mp3").await.unwrap();
        assert_eq!(data, copied);

        let missing = storage.copy("songs/missing.mp3", "songs/x.mp3").await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_local_storage_list_prefix() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        for key in ["songs/a.mp3", "songs/b.flac", "videos/c.mp4"] {
            storage
                .upload_with_key(key, b"abc".to_vec(), "application/octet-stream")
                .await
                .unwrap();
        }

        let mut songs: Vec<String> = storage
            .list("songs/")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        songs.sort();
        assert_eq!(songs, vec!["songs/a.mp3", "songs/b.flac"]);

        let filtered = storage.list("songs/b").await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].key, "songs/b.flac");
        assert_eq!(filtered[0].size_bytes, 3);
        assert!(filtered[0].last_modified.is_some());

        assert!(storage.list("podcasts/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_public_url_encodes_legacy_names() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;
        assert_eq!(
            storage.public_url("songs/my song.mp3"),
            "http://localhost:8080/media/songs/my%20song.mp3"
        );
    }
}
