//! Embedded audio tag reading.

use id3::TagLike;
use std::path::Path;

/// Read the embedded title tag (ID3 `TIT2`) from an audio file.
///
/// Best-effort: a missing or unreadable tag, or a blank title, yields
/// `None` and the caller falls back to filename-derived metadata.
pub fn read_title_tag(path: impl AsRef<Path>) -> Option<String> {
    let tag = id3::Tag::read_from_path(path.as_ref()).ok()?;
    let title = tag.title()?.trim();
    if title.is_empty() {
        return None;
    }
    Some(title.to_string())
}
