//! Ingest filtering and dispatch
//!
//! Decides whether an observed file should become a link entry in today's
//! daily note, and performs the insertion when it should. Every judgment is
//! transient; a rejected event is simply dropped because another event for
//! the same file will typically follow.
//!
//! Filters, in order: the file must still exist as a regular file, carry a
//! recognized Markdown extension, lie outside the daily-notes directory
//! (unless overridden), not be today's daily note itself, lie inside the
//! watched root, be named `YYYYMMDDHHMM.<ext>` with today's date (after
//! stripping the editor temp prefix), and yield a level-1 title.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::config::Config;
use crate::error::{NoteError, NoteResult};
use crate::heading::extract_h1_title;
use crate::normalize::to_posix;
use crate::note::{add_link_to_note, daily_note_path, ensure_daily_note};

/// Filename date stamp of ingestible notes, e.g. 20250101
const NOTE_DATE_FORMAT: &str = "%Y%m%d";

/// Filters filesystem events and dispatches accepted files to the note mutator
pub struct Ingestor {
    watch_root: PathBuf,
    daily_dir: PathBuf,
    include_daily_dir: bool,
    inbox_heading: String,
    feed_heading: String,
    feed_subdir: PathBuf,
    extensions: Vec<String>,
    /// Unanchored temp-prefix pattern, stripped from link-target segments
    temp_prefix: Regex,
    /// Anchored temp-prefix pattern, stripped from filenames before the date check
    temp_prefix_name: Regex,
    /// Ingestible filename shape; capture group 1 is the 8-digit date
    note_name: Regex,
}

impl Ingestor {
    /// Build an ingestor for a watched root and daily-notes directory
    ///
    /// Both directories are canonicalized up front so later containment
    /// checks are immune to symlinked event paths; the daily-notes directory
    /// is created if it does not exist yet.
    pub fn new(
        watch_root: &Path,
        daily_dir: &Path,
        include_daily_dir: bool,
        config: &Config,
    ) -> NoteResult<Self> {
        let watch_root = watch_root
            .canonicalize()
            .map_err(|e| NoteError::from_io(e, watch_root.to_path_buf()))?;

        fs::create_dir_all(daily_dir)
            .map_err(|e| NoteError::from_io(e, daily_dir.to_path_buf()))?;
        let daily_dir = daily_dir
            .canonicalize()
            .map_err(|e| NoteError::from_io(e, daily_dir.to_path_buf()))?;

        let temp_prefix = Regex::new(&config.temp_prefix_pattern)?;
        let temp_prefix_name = Regex::new(&format!("^{}", config.temp_prefix_pattern))?;

        let extension_alternatives = config
            .markdown_extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect::<Vec<_>>()
            .join("|");
        let note_name = Regex::new(&format!(
            r"^(\d{{8}})\d{{4}}\.(?:{})$",
            extension_alternatives
        ))?;

        Ok(Self {
            watch_root,
            daily_dir,
            include_daily_dir,
            inbox_heading: config.inbox_heading.clone(),
            feed_heading: config.feed_heading.clone(),
            feed_subdir: PathBuf::from(&config.feed_subdir),
            extensions: config.markdown_extensions.clone(),
            temp_prefix,
            temp_prefix_name,
            note_name,
        })
    }

    /// Process one observed path against the current local date
    ///
    /// Returns whether a link was inserted. Rejections are `Ok(false)`.
    pub fn process(&self, path: &Path) -> NoteResult<bool> {
        self.process_dated(path, Local::now().date_naive())
    }

    /// Process one observed path against an explicit "today"
    pub fn process_dated(&self, path: &Path, today: NaiveDate) -> NoteResult<bool> {
        // Race with deletion or rename: the path may already be gone
        if !path.is_file() {
            debug!("skipping {}: not a regular file", path.display());
            return Ok(false);
        }

        if !has_markdown_extension(path, &self.extensions) {
            debug!("skipping {}: not a Markdown file", path.display());
            return Ok(false);
        }

        let resolved = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                debug!("skipping {}: vanished before resolution", path.display());
                return Ok(false);
            }
        };

        if !self.include_daily_dir && resolved.starts_with(&self.daily_dir) {
            debug!("skipping {}: inside daily notes directory", path.display());
            return Ok(false);
        }

        if resolved == daily_note_path(&self.daily_dir, today) {
            debug!("skipping {}: is today's daily note", path.display());
            return Ok(false);
        }

        let relative = match resolved.strip_prefix(&self.watch_root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => {
                debug!("skipping {}: outside watched root", path.display());
                return Ok(false);
            }
        };

        if !self.is_note_from_today(&resolved, today) {
            debug!("skipping {}: filename is not dated today", path.display());
            return Ok(false);
        }

        let Some(title) = extract_h1_title(&resolved) else {
            debug!("skipping {}: no usable level-1 title", path.display());
            return Ok(false);
        };

        let note = ensure_daily_note(&self.daily_dir, today, &self.inbox_heading)?;

        let target = self
            .temp_prefix
            .replace_all(&to_posix(&relative), "")
            .into_owned();
        let sub_heading = if relative.starts_with(&self.feed_subdir) {
            Some(self.feed_heading.as_str())
        } else {
            None
        };

        add_link_to_note(&note, &title, &target, &self.inbox_heading, sub_heading)
    }

    /// True iff the filename encodes today's local date
    ///
    /// Notes are named `YYYYMMDDHHMM.<ext>`; a volatile editor temp prefix
    /// is stripped before matching.
    fn is_note_from_today(&self, path: &Path, today: NaiveDate) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return false;
        };
        let clean = self.temp_prefix_name.replace(&name, "");

        let stamp = today.format(NOTE_DATE_FORMAT).to_string();
        match self.note_name.captures(&clean) {
            Some(captures) => captures[1] == stamp,
            None => false,
        }
    }
}

/// True iff the path carries one of the recognized Markdown extensions
pub(crate) fn has_markdown_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map_or(false, |ext| extensions.iter().any(|e| *e == ext))
}
