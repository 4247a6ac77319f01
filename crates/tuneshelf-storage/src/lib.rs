//! TuneShelf Storage Library
//!
//! This crate provides the storage abstraction the library sits on, with
//! implementations for S3-compatible object stores and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are `{prefix}{filename}` where the prefix selects the media kind
//! (`songs/`, `videos/` by default) and the filename is produced by
//! [`tuneshelf_core::KeyCodec`]. Keys must not contain `..` or a leading `/`.
//! Key composition is centralized in the `keys` module so all backends stay
//! consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{segment_of, storage_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
pub use tuneshelf_core::StorageBackend;
