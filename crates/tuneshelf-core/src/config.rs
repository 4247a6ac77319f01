//! Configuration module
//!
//! Storage and library settings loaded from the environment (and `.env` via
//! dotenvy).

use std::env;

use crate::models::MediaKind;
use crate::storage_types::StorageBackend;

const DEFAULT_SONG_PREFIX: &str = "songs/";
const DEFAULT_VIDEO_PREFIX: &str = "videos/";

/// Library configuration
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    pub environment: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Key layout
    pub song_prefix: String,
    pub video_prefix: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<LibraryConfig>);

impl Config {
    fn as_library(&self) -> &LibraryConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_library().environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = LibraryConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_library().validate()
    }

    pub fn environment(&self) -> &str {
        &self.as_library().environment
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_library().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_library().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_library().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_library().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_library().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_library().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_library().local_storage_base_url.as_deref()
    }

    pub fn song_prefix(&self) -> &str {
        &self.as_library().song_prefix
    }

    pub fn video_prefix(&self) -> &str {
        &self.as_library().video_prefix
    }

    /// Storage prefix under which assets of `kind` live.
    pub fn prefix_for(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Song => self.song_prefix(),
            MediaKind::Video => self.video_prefix(),
        }
    }
}

/// Normalize a key prefix so it is either empty or ends with exactly one `/`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

impl LibraryConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => Some(raw.parse::<StorageBackend>()?),
            None => None,
        };

        let song_prefix = normalize_prefix(
            &lookup("SONG_PREFIX").unwrap_or_else(|| DEFAULT_SONG_PREFIX.to_string()),
        );
        let video_prefix = normalize_prefix(
            &lookup("VIDEO_PREFIX").unwrap_or_else(|| DEFAULT_VIDEO_PREFIX.to_string()),
        );

        Ok(LibraryConfig {
            environment,
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            song_prefix,
            video_prefix,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.song_prefix == self.video_prefix {
            return Err(anyhow::anyhow!(
                "SONG_PREFIX and VIDEO_PREFIX must differ (both are '{}')",
                self.song_prefix
            ));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
