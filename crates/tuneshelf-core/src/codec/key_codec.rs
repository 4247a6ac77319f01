//! Versioned metadata encoding for storage key filenames.
//!
//! Format: `v3-enc-{name}-{tags}-{hash}.{ext}` where `name` and `tags` are
//! URL-safe, unpadded Base64 of the UTF-8 display name and of the tags joined
//! by `,`. `hash` is four random lowercase alphanumerics and carries no meaning.
//!
//! The URL-safe alphabet contains `-`, so the name/tags boundary cannot be
//! found by a plain split. Decoding tries every dash as the boundary and keeps
//! the candidates where both sides are canonical Base64 of valid UTF-8.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;

use crate::lexicon::LocalLexicon;
use crate::models::LogicalMetadata;

/// Prefix marking a filename that carries encoded metadata.
pub const ENCODED_KEY_PREFIX: &str = "v3-enc-";

/// Length of the random cache-busting suffix.
pub const HASH_LEN: usize = 4;

const HASH_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TAG_SEPARATOR: &str = ",";

/// Split a filename into `(stem, extension)` on the last `.`.
///
/// A leading dot alone (".hidden") is not treated as an extension separator.
pub fn split_extension(segment: &str) -> (&str, Option<&str>) {
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (segment, None),
    }
}

/// Encoder/decoder between [`LogicalMetadata`] and key filenames.
///
/// Decoding falls back to the lexicon for filenames without encoded metadata.
#[derive(Debug, Clone, Copy)]
pub struct KeyCodec<'a> {
    lexicon: &'a LocalLexicon,
}

impl Default for KeyCodec<'static> {
    fn default() -> Self {
        KeyCodec::new(LocalLexicon::builtin())
    }
}

impl<'a> KeyCodec<'a> {
    pub fn new(lexicon: &'a LocalLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &'a LocalLexicon {
        self.lexicon
    }

    /// Encode a display name and tags into a filename with the given extension.
    ///
    /// `extension` is used verbatim and must not include the leading dot.
    /// Never fails; empty names and tag lists encode as empty fields.
    pub fn encode<S: AsRef<str>>(display_name: &str, tags: &[S], extension: &str) -> String {
        Self::encode_with_rng(display_name, tags, extension, &mut rand::rng())
    }

    /// [`KeyCodec::encode`] with a caller-supplied random source for the hash.
    pub fn encode_with_rng<S, R>(
        display_name: &str,
        tags: &[S],
        extension: &str,
        rng: &mut R,
    ) -> String
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let joined_tags = tags
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(TAG_SEPARATOR);

        format!(
            "{}{}-{}-{}.{}",
            ENCODED_KEY_PREFIX,
            encode_field(display_name),
            encode_field(&joined_tags),
            random_hash(rng),
            extension
        )
    }

    /// Decode a filename (no path prefix) into logical metadata.
    ///
    /// Filenames without a decodable versioned encoding fall back to a lexicon
    /// translation of the stem with no tags. Never fails.
    pub fn decode(&self, segment: &str) -> LogicalMetadata {
        if let Some(metadata) = Self::parse_encoded(segment) {
            return metadata;
        }

        let (stem, _) = split_extension(segment);
        if stem.starts_with(ENCODED_KEY_PREFIX) {
            tracing::debug!(segment = %segment, "Malformed encoded key, using legacy name");
        }
        LogicalMetadata::untagged(self.lexicon.translate(&legacy_words(stem)))
    }

    /// Strict decode: `Some` only when the filename carries valid encoded metadata.
    pub fn parse_encoded(segment: &str) -> Option<LogicalMetadata> {
        let (stem, _) = split_extension(segment);
        let body = stem.strip_prefix(ENCODED_KEY_PREFIX)?;
        let (fields, _hash) = body.rsplit_once('-')?;

        let candidates: Vec<LogicalMetadata> = fields
            .match_indices('-')
            .filter_map(|(idx, _)| decode_fields(&fields[..idx], &fields[idx + 1..]))
            .collect();

        // Several boundaries can validate when the name's Base64 contains '-'.
        // Conventional `#` tags disambiguate; otherwise the last boundary wins
        // since tag lists are usually shorter than names.
        let chosen = candidates
            .iter()
            .position(|m| !m.tags.is_empty() && m.tags.iter().all(|t| t.starts_with('#')))
            .or_else(|| candidates.len().checked_sub(1));
        if let Some(index) = chosen {
            return candidates.into_iter().nth(index);
        }

        // Trailing junk after the hash: fall back to the 3rd and 4th dash tokens.
        let tokens: Vec<&str> = stem.split('-').collect();
        if tokens.len() > 5 {
            return decode_fields(tokens[2], tokens[3]);
        }
        None
    }

    /// Whether the filename carries decodable encoded metadata.
    pub fn is_encoded(segment: &str) -> bool {
        Self::parse_encoded(segment).is_some()
    }

    /// Suggested metadata for the calibrate action.
    ///
    /// Keeps the decoded (or translated) name and existing tags, then appends
    /// tags inferred from the name that are not already present.
    pub fn calibrate(&self, segment: &str) -> LogicalMetadata {
        let mut metadata = self.decode(segment);
        let (artist, title) = metadata.artist_and_title();
        let inferred = self.lexicon.extract_tags(title, artist.unwrap_or(""));

        for tag in inferred {
            if !metadata.tags.contains(&tag) {
                metadata.tags.push(tag);
            }
        }
        metadata
    }
}

/// Filename separators (`-`, `_`) become single spaces: `my-song_v2` -> `my song v2`.
fn legacy_words(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode_field(value: &str) -> String {
    URL_SAFE_NO_PAD.encode(value.as_bytes())
}

fn decode_field(field: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(field.trim_end_matches('=')).ok()?;
    String::from_utf8(bytes).ok()
}

fn decode_fields(name: &str, tags: &str) -> Option<LogicalMetadata> {
    let display_name = decode_field(name)?;
    let tags = decode_field(tags)?
        .split(TAG_SEPARATOR)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    Some(LogicalMetadata { display_name, tags })
}

fn random_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..HASH_LEN)
        .map(|_| HASH_CHARSET[rng.random_range(0..HASH_CHARSET.len())] as char)
        .collect()
}
