//! Note mutation and daily note lifecycle
//!
//! The mutation engine for daily notes: de-duplicated link insertion into a
//! located section, serialization back to disk, and creation of the per-day
//! note file. Every edit is a full read-modify-write cycle persisted with an
//! atomic write (write to temp file, then rename) so the note is never
//! observed in a partially written state.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{NoteError, NoteResult};
use crate::heading::heading_level;
use crate::normalize::normalize_target;
use crate::section::{locate_or_create, SectionBlock};

/// Inline Markdown link pattern; capture group 1 is the target
const INLINE_LINK_PATTERN: &str = r"\[[^\]]*\]\(([^)]+)\)";

/// Daily note filename stamp, e.g. 2025-08-18
const DAILY_STAMP_FORMAT: &str = "%Y-%m-%d";

/// Path of the daily note for `today` inside `daily_dir`
pub fn daily_note_path(daily_dir: &Path, today: NaiveDate) -> PathBuf {
    daily_dir.join(format!("{}.md", today.format(DAILY_STAMP_FORMAT)))
}

/// Make sure today's daily note exists and carries the inbox heading
///
/// Creates `<daily_dir>/<YYYY-MM-DD>.md` (and parent directories) with a
/// level-1 date heading and an empty inbox section when absent. When the
/// file exists but the heading literal appears nowhere in it, the heading is
/// appended with a blank separator. Idempotent; safe to call on every event.
pub fn ensure_daily_note(
    daily_dir: &Path,
    today: NaiveDate,
    inbox_heading: &str,
) -> NoteResult<PathBuf> {
    let path = daily_note_path(daily_dir, today);

    if !path.exists() {
        let stamp = today.format(DAILY_STAMP_FORMAT);
        let content = format!("# {}\n\n{}\n\n", stamp, inbox_heading);
        atomic_write(&path, content.as_bytes())?;
        return Ok(path);
    }

    let text = fs::read_to_string(&path).map_err(|e| NoteError::from_io(e, path.clone()))?;
    if !text.contains(inbox_heading) {
        let appended = format!("{}\n\n{}\n\n", text.trim_end(), inbox_heading);
        atomic_write(&path, appended.as_bytes())?;
    }

    Ok(path)
}

/// Insert `- [title](raw_target)` at the top of a section block
///
/// Existing inline-link targets inside the block are normalized against
/// `base_dir` and compared with the normalized `raw_target`; when the target
/// is already present the document is left untouched and `false` is
/// returned. At most one entry per normalized target per section. Otherwise
/// the block's first line is made blank (inserting one when the block is
/// non-empty and starts with content) and the bullet becomes the first
/// content line.
pub fn insert_link(
    lines: &mut Vec<String>,
    block: SectionBlock,
    title: &str,
    raw_target: &str,
    base_dir: &Path,
) -> NoteResult<bool> {
    let link_re = Regex::new(INLINE_LINK_PATTERN)?;

    let existing: HashSet<String> = lines[block.start..block.end]
        .iter()
        .filter_map(|line| link_re.captures(line))
        .map(|captures| normalize_target(captures[1].trim(), base_dir))
        .collect();

    if existing.contains(&normalize_target(raw_target, base_dir)) {
        return Ok(false);
    }

    let bullet = format!("- [{}]({})", title, raw_target);

    let mut at = block.start;
    let mut end = block.end;
    if at < end && !lines[at].trim().is_empty() {
        lines.insert(at, String::new());
        end += 1;
    }
    // Bullet goes right after the leading blank, as the first content line
    if at < end && lines[at].trim().is_empty() {
        at += 1;
    }
    lines.insert(at, bullet);

    Ok(true)
}

/// Insert a link into a note file, locating or creating the target section
///
/// The inbox section is found (or appended) first; when `sub_heading` is
/// given, the nested section is found (or appended) inside the inbox's
/// range and receives the link instead. Nothing is written when the link is
/// already present. Returns whether the file changed.
pub fn add_link_to_note(
    note_path: &Path,
    title: &str,
    raw_target: &str,
    inbox_heading: &str,
    sub_heading: Option<&str>,
) -> NoteResult<bool> {
    let text =
        fs::read_to_string(note_path).map_err(|e| NoteError::from_io(e, note_path.to_path_buf()))?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    let inbox = locate_or_create(
        &mut lines,
        inbox_heading,
        None,
        heading_level(inbox_heading).unwrap_or(1),
    );
    let block = match sub_heading {
        Some(heading) => {
            locate_or_create(
                &mut lines,
                heading,
                Some(inbox.block),
                heading_level(heading).unwrap_or(1),
            )
            .block
        }
        None => inbox.block,
    };

    let base_dir = note_path.parent().unwrap_or_else(|| Path::new("."));
    if !insert_link(&mut lines, block, title, raw_target, base_dir)? {
        return Ok(false);
    }

    atomic_write(note_path, serialize(&lines).as_bytes())?;
    Ok(true)
}

/// Join lines into file content with exactly one trailing newline
pub fn serialize(lines: &[String]) -> String {
    let mut text = lines.join("\n").trim_end().to_string();
    text.push('\n');
    text
}

/// Write data to a file atomically
///
/// 1. Write to a temporary sibling (`<name>.tmp`) in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub fn atomic_write(path: &Path, data: &[u8]) -> NoteResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| NoteError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = File::create(&temp_path).map_err(|e| NoteError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(data).map_err(|e| NoteError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| NoteError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| NoteError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
