//! Beat metadata extraction from audio filenames.
//!
//! Producers name their files with an ad-hoc grammar along the lines of
//! `"<author> <bpm>BPM <key> - <title>.mp3"`, with every part optional and
//! the order loose. Extraction is best-effort and total: an unparseable
//! name yields empty fields, never an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `140BPM` / `140 bpm` collapsed into one token by the uploader.
static EXPLICIT_BPM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{2,3})\s?bpm$").expect("valid regex"));

/// Bare 2-3 digit token. In this grammar a bare number is always a tempo.
static BARE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,3}$").expect("valid regex"));

/// Musical key: letter A-G, optional accidental, optional mode suffix,
/// optional trailing cents offset digits (e.g. `C#min`, `Gb`, `Am`, `F3`).
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-g][#b]?(?:maj|min|m)?\d*$").expect("valid regex"));

/// Structured release metadata derived from an audio filename.
///
/// Invariant: `title`, `bpm` and `key` are never duplicated into `authors`;
/// every source token is attributed to at most one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatMetadata {
    /// Track title; empty when nothing in the name qualifies
    pub title: String,

    /// Tempo digits, e.g. `"140"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<String>,

    /// Musical key, space-joined when spread over several tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Producer credits, in encounter order; `@`-nicknames come last
    #[serde(default)]
    pub authors: Vec<String>,
}

impl BeatMetadata {
    /// True when no field was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.bpm.is_none() && self.key.is_none() && self.authors.is_empty()
    }
}

/// How a single token was classified during the left-to-right scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Nickname,
    Bpm,
    Key,
    Unclassified,
}

/// Extract release metadata from an audio filename.
///
/// Algorithm:
/// 1. Strip the file extension.
/// 2. If the stem contains `-`, the part after the *last* `-` is the title
///    and only the part before it is tokenized.
/// 3. Classify tokens left-to-right with first-match priority:
///    nickname (`@`) > explicit BPM (`140BPM`) > bare 2-3 digit number
///    (consuming a following `bpm` token) > key pattern (greedily absorbing
///    `maj`/`min`/`m`, `cent*` and `-`-prefixed neighbours) > unclassified.
/// 4. Without an explicit title, the first unclassified token becomes the
///    title. Remaining unclassified tokens become authors, followed by the
///    nicknames; single characters and purely numeric tokens are dropped.
///
/// Total and idempotent; never fails.
pub fn parse_beat_filename(filename: &str) -> BeatMetadata {
    let stem = strip_extension(filename);

    let (head, explicit_title) = match stem.rsplit_once('-') {
        Some((head, tail)) => (head, Some(tail.trim().to_string())),
        None => (stem, None),
    };

    let tokens: Vec<&str> = head.split_whitespace().collect();
    let mut classes: Vec<(String, TokenClass)> = Vec::with_capacity(tokens.len());

    let mut bpm: Option<String> = None;
    let mut key: Option<String> = None;
    let mut nicknames: Vec<String> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if token.starts_with('@') {
            nicknames.push(token.to_string());
            classes.push((token.to_string(), TokenClass::Nickname));
        } else if let Some(caps) = EXPLICIT_BPM_RE.captures(token) {
            bpm = Some(caps[1].to_string());
            classes.push((token.to_string(), TokenClass::Bpm));
        } else if BARE_NUMBER_RE.is_match(token) {
            // A bare number is assumed to be a tempo; swallow an adjacent
            // "bpm"-ish token so it does not leak into the authors.
            bpm = Some(token.to_string());
            classes.push((token.to_string(), TokenClass::Bpm));
            if let Some(next) = tokens.get(i + 1) {
                if next.to_lowercase().starts_with("bpm") {
                    classes.push((next.to_string(), TokenClass::Bpm));
                    i += 1;
                }
            }
        } else if KEY_RE.is_match(token) {
            let mut parts = vec![token.to_string()];
            classes.push((token.to_string(), TokenClass::Key));
            while let Some(next) = tokens.get(i + 1) {
                if is_key_continuation(next) {
                    parts.push(next.to_string());
                    classes.push((next.to_string(), TokenClass::Key));
                    i += 1;
                } else {
                    break;
                }
            }
            key = Some(parts.join(" "));
        } else {
            classes.push((token.to_string(), TokenClass::Unclassified));
        }

        i += 1;
    }

    // Title: explicit from the `-` split, else the first unclassified token.
    let title = match explicit_title {
        Some(t) => t,
        None => classes
            .iter()
            .find(|(_, c)| *c == TokenClass::Unclassified)
            .map(|(t, _)| t.clone())
            .unwrap_or_default(),
    };

    // Authors: unclassified tokens that are not the title, then nicknames.
    let mut authors: Vec<String> = classes
        .iter()
        .filter(|(t, c)| *c == TokenClass::Unclassified && *t != title)
        .map(|(t, _)| t.clone())
        .collect();
    authors.extend(nicknames);
    // Single characters and pure numbers (years, track numbers) are
    // never credits.
    authors.retain(|a| a.chars().count() > 1 && !a.chars().all(|c| c.is_ascii_digit()));

    BeatMetadata {
        title,
        bpm,
        key,
        authors,
    }
}

/// A token that extends a key already being collected: mode words,
/// cents offsets and `-`-prefixed adjustments.
fn is_key_continuation(token: &str) -> bool {
    let lower = token.to_lowercase();
    matches!(lower.as_str(), "maj" | "min" | "m") || lower.contains("cent") || token.starts_with('-')
}

/// Strip the final extension, keeping everything before the last `.`.
fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => filename,
    }
}
