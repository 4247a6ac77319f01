use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tuneshelf_core::{AppError, KeyCodec, MediaKind};
use tuneshelf_services::{
    LocalStorage, MediaLibrary, Storage, StorageBackend, StorageError, StorageResult,
};
use tuneshelf_storage::StoredObject;

const BASE_URL: &str = "http://localhost:8080/media";

async fn local_storage(dir: &TempDir) -> Arc<LocalStorage> {
    Arc::new(
        LocalStorage::new(dir.path(), BASE_URL.to_string())
            .await
            .unwrap(),
    )
}

/// Local storage whose copy or delete can be made to fail.
struct FlakyStorage {
    inner: Arc<LocalStorage>,
    fail_copy: AtomicBool,
    fail_delete: AtomicBool,
}

impl FlakyStorage {
    fn new(inner: Arc<LocalStorage>) -> Self {
        Self {
            inner,
            fail_copy: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        self.inner.list(prefix).await
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.inner
            .upload_with_key(storage_key, data, content_type)
            .await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("injected".to_string()));
        }
        self.inner.delete(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    async fn copy(&self, from_key: &str, to_key: &str) -> StorageResult<String> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("injected".to_string()));
        }
        self.inner.copy(from_key, to_key).await
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.inner.public_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

async fn keys(storage: &dyn Storage, prefix: &str) -> Vec<String> {
    let mut keys: Vec<String> = storage
        .list(prefix)
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn upload_then_list_decodes_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let library = MediaLibrary::new(local_storage(&dir).await, "songs/", "videos/");

    let asset = library
        .upload(
            MediaKind::Song,
            b"ID3".to_vec(),
            "子夜 - 这辈子",
            &["DJ", "#伤感"],
            "mp3",
        )
        .await
        .unwrap();

    assert!(asset.key.starts_with("songs/v3-enc-"));
    assert!(asset.key.ends_with(".mp3"));
    assert!(asset.encoded);
    assert_eq!(asset.tags(), ["#DJ", "#伤感"]);
    assert_eq!(asset.url, format!("{}/{}", BASE_URL, asset.key));

    let listed = library.list(MediaKind::Song).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, asset.key);
    assert_eq!(listed[0].display_name(), "子夜 - 这辈子");
    assert_eq!(listed[0].tags(), ["#DJ", "#伤感"]);
    assert_eq!(listed[0].size_bytes, 3);

    assert!(library.list(MediaKind::Video).await.unwrap().is_empty());
}

#[tokio::test]
async fn legacy_keys_are_listed_with_translated_names() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(&dir).await;
    storage
        .upload_with_key("songs/qingtian.mp3", b"x".to_vec(), "audio/mpeg")
        .await
        .unwrap();
    storage
        .upload_with_key("songs/Unknown Track.mp3", b"x".to_vec(), "audio/mpeg")
        .await
        .unwrap();

    let library = MediaLibrary::new(storage, "songs/", "videos/");
    let mut assets = library.list(MediaKind::Song).await.unwrap();
    assets.sort_by(|a, b| a.key.cmp(&b.key));

    assert_eq!(assets[0].key, "songs/Unknown Track.mp3");
    assert_eq!(assets[0].display_name(), "Unknown Track");
    assert!(!assets[0].encoded);
    assert_eq!(
        assets[0].url,
        "http://localhost:8080/media/songs/Unknown%20Track.mp3"
    );

    assert_eq!(assets[1].display_name(), "晴天");
    assert!(assets[1].tags().is_empty());
}

#[tokio::test]
async fn list_all_returns_songs_before_videos() {
    let dir = tempfile::tempdir().unwrap();
    let library = MediaLibrary::new(local_storage(&dir).await, "songs/", "videos/");

    library
        .upload(MediaKind::Video, b"v".to_vec(), "晴天 MV", &["#MV"], "mp4")
        .await
        .unwrap();
    library
        .upload(MediaKind::Song, b"s".to_vec(), "晴天", &["#经典"], "mp3")
        .await
        .unwrap();

    let all = library.list_all().await.unwrap();
    let kinds: Vec<MediaKind> = all.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![MediaKind::Song, MediaKind::Video]);
}

#[tokio::test]
async fn rename_replaces_key_and_keeps_extension() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(&dir).await;
    let library = MediaLibrary::new(storage.clone(), "songs/", "videos/");

    let original = library
        .upload(MediaKind::Song, b"data".to_vec(), "旧名字", &["#DJ"], "flac")
        .await
        .unwrap();

    let renamed = library
        .rename(&original.key, "新名字", &["#经典", "#Live"])
        .await
        .unwrap();

    assert_ne!(renamed.key, original.key);
    assert!(renamed.key.starts_with("songs/"));
    assert!(renamed.key.ends_with(".flac"));
    assert_eq!(renamed.kind, MediaKind::Song);
    assert_eq!(renamed.size_bytes, 4);

    assert_eq!(keys(storage.as_ref(), "songs/").await, vec![renamed.key.clone()]);
    assert_eq!(storage.download(&renamed.key).await.unwrap(), b"data");

    let decoded = KeyCodec::default().decode(&renamed.filename);
    assert_eq!(decoded.display_name, "新名字");
    assert_eq!(decoded.tags, vec!["#经典", "#Live"]);
}

#[tokio::test]
async fn rename_keeps_old_key_when_copy_fails() {
    let dir = tempfile::tempdir().unwrap();
    let inner = local_storage(&dir).await;
    let flaky = Arc::new(FlakyStorage::new(inner.clone()));
    let library = MediaLibrary::new(flaky.clone(), "songs/", "videos/");

    let original = library
        .upload(MediaKind::Song, b"data".to_vec(), "晴天", &["#经典"], "mp3")
        .await
        .unwrap();

    flaky.fail_copy.store(true, Ordering::SeqCst);
    let result = library.rename(&original.key, "新名字", &["#DJ"]).await;

    assert!(matches!(result, Err(AppError::Storage(_))));
    assert_eq!(keys(inner.as_ref(), "songs/").await, vec![original.key]);
}

#[tokio::test]
async fn rename_succeeds_with_both_keys_when_delete_fails() {
    let dir = tempfile::tempdir().unwrap();
    let inner = local_storage(&dir).await;
    let flaky = Arc::new(FlakyStorage::new(inner.clone()));
    let library = MediaLibrary::new(flaky.clone(), "songs/", "videos/");

    let original = library
        .upload(MediaKind::Song, b"data".to_vec(), "晴天", &["#经典"], "mp3")
        .await
        .unwrap();

    flaky.fail_delete.store(true, Ordering::SeqCst);
    let renamed = library
        .rename(&original.key, "新名字", &["#DJ"])
        .await
        .unwrap();

    let mut expected = vec![original.key, renamed.key];
    expected.sort();
    assert_eq!(keys(inner.as_ref(), "songs/").await, expected);
}

#[tokio::test]
async fn calibrate_suggests_and_applies_inferred_tags() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(&dir).await;
    let library = MediaLibrary::new(storage.clone(), "songs/", "videos/");

    let original = library
        .upload(
            MediaKind::Song,
            b"data".to_vec(),
            "子夜 - 这辈子 (DJ版) 伤感",
            &["#经典"],
            "mp3",
        )
        .await
        .unwrap();

    let dry_run = library.calibrate(&original.key, false).await.unwrap();
    assert!(dry_run.changed);
    assert!(dry_run.applied.is_none());
    assert_eq!(dry_run.current.tags, vec!["#经典"]);
    assert_eq!(dry_run.suggested.tags, vec!["#经典", "#DJ", "#伤感"]);
    assert_eq!(keys(storage.as_ref(), "songs/").await, vec![original.key.clone()]);

    let applied = library.calibrate(&original.key, true).await.unwrap();
    let renamed = applied.applied.unwrap();
    assert_eq!(renamed.tags(), ["#经典", "#DJ", "#伤感"]);
    assert_eq!(renamed.display_name(), "子夜 - 这辈子 (DJ版) 伤感");
    assert_eq!(keys(storage.as_ref(), "songs/").await, vec![renamed.key.clone()]);

    // Already calibrated: nothing to apply.
    let again = library.calibrate(&renamed.key, true).await.unwrap();
    assert!(!again.changed);
    assert!(again.applied.is_none());
}

#[tokio::test]
async fn delete_removes_asset_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(&dir).await;
    let library = MediaLibrary::new(storage.clone(), "songs/", "videos/");

    let asset = library
        .upload(MediaKind::Video, b"v".to_vec(), "晴天 MV", &["#MV"], "mp4")
        .await
        .unwrap();
    assert!(asset.key.starts_with("videos/"));

    library.delete(&asset.key).await.unwrap();
    assert!(!storage.exists(&asset.key).await.unwrap());
    library.delete(&asset.key).await.unwrap();
}

#[tokio::test]
async fn public_url_delegates_to_storage() {
    let dir = tempfile::tempdir().unwrap();
    let library = MediaLibrary::new(local_storage(&dir).await, "songs/", "videos/");

    assert_eq!(
        library.public_url("songs/晴天.mp3"),
        "http://localhost:8080/media/songs/%E6%99%B4%E5%A4%A9.mp3"
    );
}

#[tokio::test]
async fn legacy_key_with_double_dot_can_be_renamed_and_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(&dir).await;
    storage
        .upload_with_key("songs/live..2019.mp3", b"x".to_vec(), "audio/mpeg")
        .await
        .unwrap();
    let library = MediaLibrary::new(storage.clone(), "songs/", "videos/");

    let renamed = library
        .rename("songs/live..2019.mp3", "Live 2019", &["#Live"])
        .await
        .unwrap();
    assert_eq!(keys(storage.as_ref(), "songs/").await, vec![renamed.key.clone()]);

    storage
        .upload_with_key("songs/a..b.mp3", b"y".to_vec(), "audio/mpeg")
        .await
        .unwrap();
    library.delete("songs/a..b.mp3").await.unwrap();
    assert!(!storage.exists("songs/a..b.mp3").await.unwrap());
}

#[tokio::test]
async fn legacy_names_use_spaces_for_separators() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(&dir).await;
    storage
        .upload_with_key("songs/My_Song-Final.mp3", b"x".to_vec(), "audio/mpeg")
        .await
        .unwrap();

    let library = MediaLibrary::new(storage, "songs/", "videos/");
    let assets = library.list(MediaKind::Song).await.unwrap();
    assert_eq!(assets[0].display_name(), "My Song Final");
    assert!(!assets[0].encoded);
}
