//! TuneShelf Services Layer
//!
//! This crate hosts the library workflows that combine the storage backends
//! with the key codec: listing assets with their decoded metadata, uploading
//! under encoded keys, renaming (copy + delete, since keys are immutable),
//! deleting, and the calibrate action. Front ends (the CLI) depend on this
//! single facade.

pub mod library;

pub use library::{Calibration, MediaLibrary};
#[cfg(feature = "storage-local")]
pub use tuneshelf_storage::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use tuneshelf_storage::S3Storage;
pub use tuneshelf_storage::{
    create_storage, segment_of, storage_key, Storage, StorageBackend, StorageError, StorageResult,
};
