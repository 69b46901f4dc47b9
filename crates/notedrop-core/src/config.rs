//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/notedrop/config.toml)
//! 3. Environment variables (NOTEDROP_* prefix)
//!
//! Environment variables take precedence over config file values. The watched
//! root and daily-notes directory are command-line arguments, not config
//! values; the config file covers the note-shape knobs (section headings,
//! recognized extensions, editor temp-file pattern).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "NOTEDROP";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Heading literal of the top-level section links are filed under
    #[serde(default = "default_inbox_heading")]
    pub inbox_heading: String,

    /// Heading literal of the nested section used for feed imports
    #[serde(default = "default_feed_heading")]
    pub feed_heading: String,

    /// Root-relative directory whose files are filed under the feed heading
    #[serde(default = "default_feed_subdir")]
    pub feed_subdir: String,

    /// File extensions recognized as Markdown (lowercase, without dot)
    #[serde(default = "default_extensions")]
    pub markdown_extensions: Vec<String>,

    /// Pattern for the volatile prefix some editors prepend while saving
    ///
    /// Stripped from filenames before the date check and from link targets.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inbox_heading: default_inbox_heading(),
            feed_heading: default_feed_heading(),
            feed_subdir: default_feed_subdir(),
            markdown_extensions: default_extensions(),
            temp_prefix_pattern: default_temp_prefix(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (NOTEDROP_INBOX_HEADING, ...)
    /// 2. Config file (~/.config/notedrop/config.toml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_INBOX_HEADING", ENV_PREFIX)) {
            self.inbox_heading = val;
        }

        if let Ok(val) = std::env::var(format!("{}_FEED_HEADING", ENV_PREFIX)) {
            self.feed_heading = val;
        }

        if let Ok(val) = std::env::var(format!("{}_FEED_SUBDIR", ENV_PREFIX)) {
            self.feed_subdir = val;
        }

        if let Ok(val) = std::env::var(format!("{}_TEMP_PREFIX", ENV_PREFIX)) {
            self.temp_prefix_pattern = val;
        }
    }

    /// Default config file location (~/.config/notedrop/config.toml)
    pub fn config_file_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("notedrop")
            .join("config.toml")
    }
}

fn default_inbox_heading() -> String {
    "## Inbox".to_string()
}

fn default_feed_heading() -> String {
    "### Saved Articles".to_string()
}

fn default_feed_subdir() -> String {
    "Inbox/RSS_Feed".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

fn default_temp_prefix() -> String {
    r"\.conform\.\d+\.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.inbox_heading, "## Inbox");
        assert_eq!(config.feed_heading, "### Saved Articles");
        assert_eq!(config.feed_subdir, "Inbox/RSS_Feed");
        assert_eq!(config.markdown_extensions, vec!["md", "markdown"]);
        assert_eq!(config.temp_prefix_pattern, r"\.conform\.\d+\.");
    }

    #[test]
    fn test_load_from_str() {
        let toml = r###"
            inbox_heading = "## Capture"
            feed_subdir = "Feeds"
        "###;

        let config = Config::load_from_str(toml).unwrap();

        assert_eq!(config.inbox_heading, "## Capture");
        assert_eq!(config.feed_subdir, "Feeds");
        // Unspecified fields fall back to defaults
        assert_eq!(config.feed_heading, "### Saved Articles");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load_from_path(&PathBuf::from("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.inbox_heading, "## Inbox");
    }

    #[test]
    fn test_env_override() {
        // No other test reads this variable, so parallel runs are safe
        std::env::set_var("NOTEDROP_TEMP_PREFIX", r"\.swap\.\d+\.");
        let config = Config::load_from_str("").unwrap();
        std::env::remove_var("NOTEDROP_TEMP_PREFIX");

        assert_eq!(config.temp_prefix_pattern, r"\.swap\.\d+\.");
    }
}
