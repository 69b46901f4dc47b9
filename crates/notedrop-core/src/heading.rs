//! Markdown heading scanning
//!
//! Line-level heading detection and level-1 title extraction. Heading level
//! is purely the count of leading `#` characters; title extraction is
//! stricter and requires `# ` followed by non-empty text.

use std::fs;
use std::path::Path;

/// Return the heading level of a line, or `None` if it is not a heading
///
/// The level is the number of consecutive `#` characters after leading
/// whitespace. No space is required after the `#` run.
pub fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed.chars().take_while(|&c| c == '#').count())
}

/// Parse a line as a usable level-1 title
///
/// Requires exactly one `#`, at least one whitespace character, and
/// non-empty trailing text. Stray `#` characters around the captured text
/// are trimmed off.
fn h1_title(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix('#')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim().trim_matches('#').trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Extract the first level-1 heading from a file, if any
///
/// Scanning stops at the first match. The file is decoded permissively;
/// undecodable bytes are replaced rather than treated as an error. Returns
/// `None` when the file is unreadable or contains no usable title.
pub fn extract_h1_title(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    text.lines().find_map(h1_title)
}
