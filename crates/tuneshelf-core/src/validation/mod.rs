//! Validation modules

pub mod metadata;

pub use metadata::{
    normalize_tags, validate_display_name, validate_extension, validate_tag, validate_tags,
    MAX_DISPLAY_NAME_LENGTH, MAX_EXTENSION_LENGTH, MAX_TAGS,
};
