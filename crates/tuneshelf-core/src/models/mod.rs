//! Data models for the library
//!
//! Logical metadata is what the user edits; assets are what a storage listing
//! yields once each key has been decoded.

mod asset;
mod metadata;

pub use asset::*;
pub use metadata::*;
