//! Storage key codec
//!
//! Maps logical metadata to and from the filename segment of a storage key.

mod key_codec;

pub use key_codec::{split_extension, KeyCodec, ENCODED_KEY_PREFIX, HASH_LEN};
