//! Media library workflows over a [`Storage`] backend.
//!
//! Keys are immutable: metadata lives in the filename, so editing an asset
//! means writing a new key and removing the old one.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tuneshelf_core::codec::split_extension;
use tuneshelf_core::content_type::{content_type_for_extension, kind_for_extension};
use tuneshelf_core::validation::{
    normalize_tags, validate_display_name, validate_extension, validate_tags,
};
use tuneshelf_core::{
    AppError, Config, KeyCodec, LocalLexicon, LogicalMetadata, MediaAsset, MediaKind,
};
use tuneshelf_storage::keys::{prefix_of, validate_key};
use tuneshelf_storage::{segment_of, storage_key, Storage, StoredObject};

/// Outcome of the calibrate action for one key.
#[derive(Debug, Clone, Serialize)]
pub struct Calibration {
    pub key: String,
    pub current: LogicalMetadata,
    pub suggested: LogicalMetadata,
    /// Whether the suggestion differs from the current metadata.
    pub changed: bool,
    /// The renamed asset, when the suggestion was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<MediaAsset>,
}

#[derive(Clone)]
pub struct MediaLibrary {
    storage: Arc<dyn Storage>,
    lexicon: Arc<LocalLexicon>,
    song_prefix: String,
    video_prefix: String,
}

impl MediaLibrary {
    pub fn new(
        storage: Arc<dyn Storage>,
        song_prefix: impl Into<String>,
        video_prefix: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            lexicon: LocalLexicon::builtin_shared(),
            song_prefix: song_prefix.into(),
            video_prefix: video_prefix.into(),
        }
    }

    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self::new(storage, config.song_prefix(), config.video_prefix())
    }

    /// Replace the built-in lexicon used for legacy names and tag inference.
    pub fn with_lexicon(mut self, lexicon: Arc<LocalLexicon>) -> Self {
        self.lexicon = lexicon;
        self
    }

    fn codec(&self) -> KeyCodec<'_> {
        KeyCodec::new(&self.lexicon)
    }

    pub fn prefix_for(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Song => &self.song_prefix,
            MediaKind::Video => &self.video_prefix,
        }
    }

    /// Kind of an existing key: by prefix first, then by extension.
    fn kind_of_key(&self, key: &str) -> MediaKind {
        let mut prefixes = [
            (self.song_prefix.as_str(), MediaKind::Song),
            (self.video_prefix.as_str(), MediaKind::Video),
        ];
        // Longest prefix first so an empty prefix never shadows a real one.
        prefixes.sort_by_key(|(prefix, _)| std::cmp::Reverse(prefix.len()));

        if let Some((_, kind)) = prefixes
            .iter()
            .find(|(prefix, _)| !prefix.is_empty() && key.starts_with(prefix))
        {
            return *kind;
        }

        let (_, extension) = split_extension(segment_of(key));
        extension
            .and_then(kind_for_extension)
            .unwrap_or(MediaKind::Song)
    }

    fn to_asset(&self, kind: MediaKind, object: StoredObject) -> MediaAsset {
        let filename = segment_of(&object.key).to_string();
        let metadata = self.codec().decode(&filename);
        let encoded = KeyCodec::is_encoded(&filename);
        let url = self.storage.public_url(&object.key);

        MediaAsset {
            key: object.key,
            filename,
            kind,
            metadata,
            encoded,
            url,
            size_bytes: object.size_bytes,
            last_modified: object.last_modified,
        }
    }

    /// List every asset of one kind with decoded metadata, newest first.
    #[tracing::instrument(skip(self), fields(library.kind = %kind))]
    pub async fn list(&self, kind: MediaKind) -> Result<Vec<MediaAsset>, AppError> {
        let prefix = self.prefix_for(kind);
        let objects = self.storage.list(prefix).await?;

        let mut assets: Vec<MediaAsset> = objects
            .into_iter()
            .filter(|object| !segment_of(&object.key).is_empty())
            .map(|object| self.to_asset(kind, object))
            .collect();

        assets.sort_by(|a, b| match (a.last_modified, b.last_modified) {
            (Some(a_time), Some(b_time)) => b_time.cmp(&a_time).then_with(|| a.key.cmp(&b.key)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.key.cmp(&b.key),
        });

        tracing::debug!(prefix = %prefix, count = assets.len(), "Listed library assets");

        Ok(assets)
    }

    /// List songs and videos concurrently; songs come first in the result.
    pub async fn list_all(&self) -> Result<Vec<MediaAsset>, AppError> {
        let (mut songs, videos) =
            futures::try_join!(self.list(MediaKind::Song), self.list(MediaKind::Video))?;
        songs.extend(videos);
        Ok(songs)
    }

    /// Upload a new asset under an encoded key.
    ///
    /// Tags are trimmed and `#`-prefixed; the extension is kept verbatim.
    pub async fn upload<S: AsRef<str>>(
        &self,
        kind: MediaKind,
        data: Vec<u8>,
        display_name: &str,
        tags: &[S],
        extension: &str,
    ) -> Result<MediaAsset, AppError> {
        validate_display_name(display_name)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validate_tags(tags).map_err(|e| AppError::InvalidInput(format!("{:#}", e)))?;
        validate_extension(extension).map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let display_name = display_name.trim();
        let tags = normalize_tags(tags);
        let filename = KeyCodec::encode(display_name, &tags, extension);
        let key = storage_key(self.prefix_for(kind), &filename);
        let size_bytes = data.len() as u64;

        let url = self
            .storage
            .upload_with_key(&key, data, content_type_for_extension(extension))
            .await?;

        tracing::info!(
            key = %key,
            kind = %kind,
            size_bytes = size_bytes,
            tag_count = tags.len(),
            "Uploaded library asset"
        );

        Ok(MediaAsset {
            key,
            filename,
            kind,
            metadata: LogicalMetadata::new(display_name, tags),
            encoded: true,
            url,
            size_bytes,
            last_modified: Some(Utc::now()),
        })
    }

    /// Give an asset a new display name and tags.
    ///
    /// Copies the object to a freshly encoded key in the same directory, then
    /// deletes the old key. If the copy fails the old key is untouched. If the
    /// delete fails both keys remain and the rename still succeeds.
    pub async fn rename<S: AsRef<str>>(
        &self,
        key: &str,
        display_name: &str,
        tags: &[S],
    ) -> Result<MediaAsset, AppError> {
        validate_key(key)?;
        validate_display_name(display_name)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validate_tags(tags).map_err(|e| AppError::InvalidInput(format!("{:#}", e)))?;

        let segment = segment_of(key);
        let extension = match split_extension(segment) {
            (_, Some(extension)) if !extension.is_empty() => extension,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Key '{}' has no file extension",
                    key
                )))
            }
        };

        if !self.storage.exists(key).await? {
            return Err(AppError::NotFound(key.to_string()));
        }

        let previous = self.codec().decode(segment);
        let display_name = display_name.trim();
        let tags = normalize_tags(tags);

        let mut filename = KeyCodec::encode(display_name, &tags, extension);
        while filename == segment {
            filename = KeyCodec::encode(display_name, &tags, extension);
        }
        let new_key = storage_key(prefix_of(key), &filename);

        let url = self.storage.copy(key, &new_key).await?;

        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(
                error = %e,
                old_key = %key,
                new_key = %new_key,
                "Failed to delete old key after rename, both keys remain"
            );
        }

        tracing::info!(
            old_key = %key,
            new_key = %new_key,
            old_name = %previous.display_name,
            new_name = %display_name,
            "Renamed library asset"
        );

        let stored = self.stat(&new_key).await;
        Ok(MediaAsset {
            kind: self.kind_of_key(&new_key),
            key: new_key,
            filename,
            metadata: LogicalMetadata::new(display_name, tags),
            encoded: true,
            url,
            size_bytes: stored.as_ref().map(|o| o.size_bytes).unwrap_or(0),
            last_modified: stored.and_then(|o| o.last_modified),
        })
    }

    /// Best-effort lookup of one object's listing entry.
    async fn stat(&self, key: &str) -> Option<StoredObject> {
        match self.storage.list(key).await {
            Ok(objects) => objects.into_iter().find(|o| o.key == key),
            Err(e) => {
                tracing::debug!(error = %e, key = %key, "Could not stat object");
                None
            }
        }
    }

    /// Delete an asset. Deleting a missing key succeeds.
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        validate_key(key)?;
        self.storage.delete(key).await?;
        tracing::info!(key = %key, "Deleted library asset");
        Ok(())
    }

    /// Compute the calibrate suggestion for a key and optionally apply it.
    ///
    /// Nothing is written when the suggestion matches the current metadata.
    pub async fn calibrate(&self, key: &str, apply: bool) -> Result<Calibration, AppError> {
        validate_key(key)?;
        let segment = segment_of(key);
        let codec = self.codec();

        let current = codec.decode(segment);
        let suggested = codec.calibrate(segment);
        let changed = current != suggested || !KeyCodec::is_encoded(segment);

        let applied = if apply && changed {
            Some(
                self.rename(key, &suggested.display_name, &suggested.tags)
                    .await?,
            )
        } else {
            None
        };

        tracing::debug!(
            key = %key,
            changed = changed,
            applied = applied.is_some(),
            "Calibrated library asset"
        );

        Ok(Calibration {
            key: key.to_string(),
            current,
            suggested,
            changed,
            applied,
        })
    }

    pub fn public_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }
}
