//! TuneShelf Core Library
//!
//! This crate provides the domain models, the storage key codec, the offline
//! lexicon, error types, configuration and validation shared by all TuneShelf
//! components.
//!
//! # Key encoding
//!
//! The object store only offers a flat key namespace, so display names and
//! tags are stored inside the key itself:
//!
//! `v3-enc-{base64url(name)}-{base64url(tags joined by ',')}-{hash4}.{ext}`
//!
//! Keys without the `v3-enc-` prefix are legacy keys; their names are
//! recovered through [`LocalLexicon::translate`].

pub mod codec;
pub mod config;
pub mod content_type;
pub mod error;
pub mod lexicon;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use codec::{KeyCodec, ENCODED_KEY_PREFIX};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use lexicon::LocalLexicon;
pub use models::{LogicalMetadata, MediaAsset, MediaKind};
pub use storage_types::StorageBackend;
