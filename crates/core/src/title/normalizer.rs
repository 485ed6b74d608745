//! Filename/title normalizer.
//!
//! `normalize` is total and pure: any input string yields a (possibly empty)
//! token sequence, and the same input always yields the same tokens.

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Container extensions stripped from the end of a filename.
static CONTAINER_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(mkv|mp4|avi|mov|wmv|flv|webm)$").unwrap());

/// Bracketed release-group tags, e.g. `[YTS.MX]` or `[Dual Audio]`.
static BRACKET_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Scene-style group suffix glued to a codec/audio tag, e.g. `x264-SPARKS`.
/// The codec itself is kept here and removed by the release-tag pass.
/// `dts` is deliberately absent: `DTS-HD` is a tag, not a group marker.
static SCENE_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(x264|x265|h\.?264|h\.?265|hevc|xvid|aac|ac3)-[a-z0-9]+\b").unwrap());

/// Fixed catalog of release-descriptor patterns: resolution classes, codecs,
/// bit-depth markers, source tags, audio tags, subtitle tags.
static RELEASE_TAGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(480|720|1080|2160)[pi]\b",
        r"\b4k\b",
        r"\b8k\b",
        r"\bhevc\b",
        r"\bx26[45]\b",
        r"\bh\.?26[45]\b",
        r"\b(10|8)[\s.-]?bit\b",
        r"\bweb[\s.-]?dl\b",
        r"\bweb[\s.-]?rip\b",
        r"\bblu[\s.-]?ray\b",
        r"\bbdrip\b",
        r"\bhdtv\b",
        r"\bhd[\s.-]?rip\b",
        r"\bdvd[\s.-]?rip\b",
        r"\bdual[\s.-]?audio\b",
        r"\bmulti[\s.-]?audio\b",
        r"\btruehd\b",
        r"\bdts[\s.-]?hd\b",
        r"\bac3\b",
        r"\baac\b",
        r"\be?subs?\b",
        r"\beng[\s.-]?sub\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Anything that is not a letter or digit becomes token-separating whitespace.
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// First standalone 4-digit year in the plausible movie range.
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19[0-9]{2}|20[0-9]{2})\b").unwrap());

/// Articles, conjunctions, and common prepositions dropped from titles.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// A normalized title: ordered lowercase alphanumeric tokens.
///
/// Token order is preserved (not sorted) because the order-sensitive
/// similarity measure downstream depends on it. Derived on demand, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalTitle {
    tokens: Vec<String>,
}

impl CanonicalTitle {
    /// The tokens in their original order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True when normalization removed everything.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined with single spaces, the form similarity measures use.
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for CanonicalTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

/// Normalize a raw filename or title into its canonical token form.
pub fn normalize(raw: &str) -> CanonicalTitle {
    let lowered = raw.to_lowercase();

    let cleaned = CONTAINER_EXT.replace(&lowered, "");
    let cleaned = BRACKET_TAG.replace_all(&cleaned, " ");
    let mut cleaned = SCENE_GROUP.replace_all(&cleaned, "$1").into_owned();
    for pattern in RELEASE_TAGS.iter() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }
    let cleaned = NON_ALNUM.replace_all(&cleaned, " ");

    let tokens = cleaned
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect();

    CanonicalTitle { tokens }
}

/// Extract the first standalone 4-digit year (1900-2099) from a raw string.
pub fn extract_year(raw: &str) -> Option<i32> {
    YEAR.captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
