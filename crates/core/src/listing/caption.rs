//! Caption to file name derivation.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::RawPhotoRecord;

/// Captions can embed a trailing hyperlink; everything from the link onward
/// is dropped.
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://").expect("valid link regex"));

/// Longest caption prefix kept in a file name, in characters.
const MAX_CAPTION_CHARS: usize = 50;

/// Characters that cannot appear in a file name on common filesystems.
const ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Derive a filesystem-safe file name for a raw photo record.
///
/// The human caption is sanitized and truncated, then disambiguated with the
/// last two digits of the stable photo id, and finally given the real file
/// extension from the source file name. Returns `None` when the source file
/// name has no extension; such records are dropped by the caller.
pub fn derive_file_name(record: &RawPhotoRecord) -> Option<String> {
    let extension = file_extension(&record.pic_name)?;

    let caption = record.caption_render.as_deref().unwrap_or("");
    let caption = match LINK.find(caption) {
        Some(m) => &caption[..m.start()],
        None => caption,
    };

    let mut sanitized: String = caption
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .filter(|c| !ILLEGAL.contains(c))
        .filter(|c| *c != '\u{200b}' && *c != '\u{200c}')
        .take(MAX_CAPTION_CHARS)
        .collect();
    sanitized.truncate(sanitized.trim_end().len());

    Some(format!("{}_{}.{}", sanitized, record.photo_id % 100, extension))
}

/// Extension after the last dot of a source file name, if any.
fn file_extension(pic_name: &str) -> Option<&str> {
    match pic_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
