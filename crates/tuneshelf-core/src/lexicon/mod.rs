//! Offline lexicon: romanized -> native script translation and tag inference.
//!
//! Used when a storage key carries no encoded metadata (legacy uploads, files
//! copied in from elsewhere) and for the explicit calibrate action. Results are
//! best effort and never authoritative.

mod dictionary;
mod tags;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use dictionary::BUILTIN_ENTRIES;
use tags::BUILTIN_TAG_RULES;

/// Dictionary keys shorter than this (in characters) only match whole tokens.
const MIN_FRAGMENT_CHARS: usize = 3;

static BUILTIN: LazyLock<Arc<LocalLexicon>> = LazyLock::new(|| {
    Arc::new(LocalLexicon::new(
        BUILTIN_ENTRIES.iter().map(|(k, v)| (k.to_string(), v.to_string())),
        BUILTIN_TAG_RULES.iter().map(|(tag, keywords)| {
            (
                tag.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            )
        }),
    ))
});

/// A single tag inference rule.
#[derive(Debug, Clone)]
struct TagRule {
    tag: String,
    keywords: Vec<String>,
}

/// Immutable translation dictionary plus tag vocabulary.
#[derive(Debug, Clone)]
pub struct LocalLexicon {
    entries: HashMap<String, String>,
    /// Keys eligible for in-token replacement, longest first then alphabetical.
    fragment_keys: Vec<String>,
    tag_rules: Vec<TagRule>,
}

impl LocalLexicon {
    /// Build a lexicon from dictionary entries and ordered `(tag, keywords)` rules.
    ///
    /// Keys and keywords are lowercased. Later duplicate keys overwrite earlier ones.
    pub fn new<E, R>(entries: E, tag_rules: R) -> Self
    where
        E: IntoIterator<Item = (String, String)>,
        R: IntoIterator<Item = (String, Vec<String>)>,
    {
        let entries: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        let mut fragment_keys: Vec<String> = entries
            .keys()
            .filter(|k| k.chars().count() >= MIN_FRAGMENT_CHARS && !k.contains(char::is_whitespace))
            .cloned()
            .collect();
        fragment_keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let tag_rules = tag_rules
            .into_iter()
            .map(|(tag, keywords)| TagRule {
                tag,
                keywords: keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();

        Self {
            entries,
            fragment_keys,
            tag_rules,
        }
    }

    /// The built-in lexicon, constructed once on first use.
    pub fn builtin() -> &'static LocalLexicon {
        &BUILTIN
    }

    /// Shared handle to the built-in lexicon; every call returns the same allocation.
    pub fn builtin_shared() -> Arc<LocalLexicon> {
        Arc::clone(&*BUILTIN)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best-effort translation of romanized fragments into native script.
    ///
    /// Returns `text` unchanged when nothing in the dictionary matches.
    pub fn translate(&self, text: &str) -> String {
        let separated: String = text
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();
        let normalized = separated.to_lowercase();
        let normalized = normalized.trim();
        if normalized.is_empty() {
            return text.to_string();
        }

        if let Some(whole) = self.entries.get(normalized) {
            return whole.clone();
        }

        let originals: Vec<&str> = separated.split_whitespace().collect();
        let mut pieces = Vec::with_capacity(originals.len());
        let mut matched = false;

        for (index, token) in normalized.split_whitespace().enumerate() {
            let original = originals.get(index).copied().unwrap_or(token);
            if let Some(mapped) = self.entries.get(token) {
                pieces.push(mapped.clone());
                matched = true;
            } else if let Some(replaced) = self.replace_fragments(original) {
                pieces.push(replaced);
                matched = true;
            } else {
                pieces.push(original.to_string());
            }
        }

        if !matched {
            return text.to_string();
        }
        join_pieces(&pieces)
    }

    /// Leftmost-longest replacement of dictionary keys inside a single token.
    ///
    /// Keys match case-insensitively; characters outside a match keep their
    /// original casing. Replaced text is never rescanned. Returns `None` when
    /// no key matched.
    fn replace_fragments(&self, token: &str) -> Option<String> {
        let mut out = String::with_capacity(token.len());
        let mut rest = token;
        let mut hit = false;

        while let Some(ch) = rest.chars().next() {
            let found = self.fragment_keys.iter().find_map(|key| {
                let consumed = lowercase_prefix_len(rest, key)?;
                self.entries.get(key).map(|value| (consumed, value))
            });
            match found {
                Some((consumed, value)) => {
                    out.push_str(value);
                    rest = &rest[consumed..];
                    hit = true;
                }
                None => {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }

        hit.then_some(out)
    }

    /// Infer `#`-prefixed tags from a title and artist.
    ///
    /// Tags come out in rule order, each at most once. An empty result is normal.
    pub fn extract_tags(&self, title: &str, artist: &str) -> Vec<String> {
        let haystack = format!("{} {}", title, artist).to_lowercase();
        if haystack.trim().is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.tag_rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| haystack.contains(k.as_str())))
            .filter(|rule| seen.insert(rule.tag.as_str()))
            .map(|rule| rule.tag.clone())
            .collect()
    }
}

impl Default for LocalLexicon {
    fn default() -> Self {
        LocalLexicon::builtin().clone()
    }
}

/// Byte length of the prefix of `text` whose lowercase form equals `key`.
fn lowercase_prefix_len(text: &str, key: &str) -> Option<usize> {
    let mut lowered = String::with_capacity(key.len());
    for (idx, ch) in text.char_indices() {
        lowered.extend(ch.to_lowercase());
        if lowered.len() >= key.len() {
            return (lowered == key).then_some(idx + ch.len_utf8());
        }
        if !key.starts_with(lowered.as_str()) {
            return None;
        }
    }
    None
}

/// Concatenate translated pieces, keeping a space only between two ASCII words.
fn join_pieces(pieces: &[String]) -> String {
    let mut out = String::new();
    for piece in pieces {
        let ascii_joint = matches!(
            (out.chars().last(), piece.chars().next()),
            (Some(a), Some(b)) if a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric()
        );
        if ascii_joint {
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}
