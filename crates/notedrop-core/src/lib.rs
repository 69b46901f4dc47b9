//! notedrop Core Library
//!
//! This crate provides the core functionality for notedrop, a small daemon
//! that watches a Markdown vault and links notes written today into a
//! per-day note file under a designated section.
//!
//! # Architecture
//!
//! Data flows one way: filesystem event → validity filters → title
//! extraction → section location → link insertion → atomic rewrite. Each
//! edit reads the whole daily note, mutates it in memory as a line vector,
//! and rewrites it via a temp-file rename, so the file is never observed
//! half-written. De-duplication by normalized link target makes every
//! insertion idempotent, which also absorbs duplicated filesystem events.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let ingestor = Ingestor::new(&watch_root, &daily_dir, false, &config)?;
//! let watcher = VaultWatcher::new(&watch_root, &config.markdown_extensions)?;
//!
//! for msg in watcher.receiver.iter() {
//!     match msg {
//!         WatchMessage::Candidate(path) => { ingestor.process(&path)?; }
//!         WatchMessage::Shutdown => break,
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - `config`: section headings, extensions, and temp-file pattern
//! - `heading`: heading-level scanning and H1 title extraction
//! - `normalize`: link-target canonicalization for de-duplication
//! - `section`: find-or-create sections with heading-level boundaries
//! - `note`: link insertion, daily note lifecycle, atomic writes
//! - `ingest`: event filtering and dispatch
//! - `watch`: filesystem event subscription

pub mod config;
pub mod error;
pub mod heading;
pub mod ingest;
pub mod normalize;
pub mod note;
pub mod section;
pub mod watch;

pub use config::Config;
pub use error::{NoteError, NoteResult};
pub use ingest::Ingestor;
pub use section::SectionBlock;
pub use watch::{VaultWatcher, WatchMessage};
