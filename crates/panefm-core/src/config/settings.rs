//! Application configuration loaded from a TOML file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level configuration snapshot.
///
/// All fields have sensible defaults so panefm works without a config file.
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Listing sort/filter preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "default_sort")]
    pub default_sort: String,
    #[serde(default = "default_true")]
    pub sort_dir_first: bool,
    #[serde(default)]
    pub sort_descending: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            default_sort: default_sort(),
            sort_dir_first: true,
            sort_descending: false,
        }
    }
}

/// Embedded terminal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Whether the terminal is shown when a pane opens.
    #[serde(default)]
    pub display_at_startup: bool,
    /// Push navigated directories to the terminal as `cd` commands.
    #[serde(default = "default_true")]
    pub sync_cwd: bool,
    #[serde(default = "default_terminal_shell")]
    pub shell: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            display_at_startup: false,
            sync_cwd: true,
            shell: default_terminal_shell(),
        }
    }
}

/// Directory-read and listing-cache tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Reads taking longer than this resolve as a timeout error. Unset means
    /// wait forever.
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Cached listings younger than this are shown while a re-read runs.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    /// Abort the in-flight read when a newer navigation supersedes it.
    #[serde(default = "default_true")]
    pub cancel_superseded: bool,
}

impl NavigationConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: None,
            cache_capacity: default_cache_capacity(),
            cache_ttl_ms: default_cache_ttl_ms(),
            cancel_superseded: true,
        }
    }
}

fn default_terminal_shell() -> String {
    "auto".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sort() -> String {
    "name".to_string()
}

fn default_cache_capacity() -> usize {
    64
}

fn default_cache_ttl_ms() -> u64 {
    30_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_general() {
        let config = Config::default();

        assert!(!config.general.show_hidden);
        assert_eq!(config.general.default_sort, "name");
        assert!(config.general.sort_dir_first);
        assert!(!config.general.sort_descending);
    }

    #[test]
    fn default_config_terminal() {
        let config = Config::default();
        assert!(!config.terminal.display_at_startup);
        assert!(config.terminal.sync_cwd);
        assert_eq!(config.terminal.shell, "auto");
    }

    #[test]
    fn default_config_navigation() {
        let config = Config::default();
        assert!(config.navigation.read_timeout().is_none());
        assert_eq!(config.navigation.cache_capacity, 64);
        assert_eq!(config.navigation.cache_ttl(), Duration::from_secs(30));
        assert!(config.navigation.cancel_superseded);
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[general]
show_hidden = true
default_sort = "size"
sort_dir_first = false
sort_descending = true

[terminal]
display_at_startup = true
sync_cwd = false
shell = "/bin/zsh"

[navigation]
read_timeout_ms = 2500
cache_capacity = 8
cache_ttl_ms = 0
cancel_superseded = false
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert!(config.general.show_hidden);
        assert_eq!(config.general.default_sort, "size");
        assert!(!config.general.sort_dir_first);
        assert!(config.general.sort_descending);

        assert!(config.terminal.display_at_startup);
        assert!(!config.terminal.sync_cwd);
        assert_eq!(config.terminal.shell, "/bin/zsh");

        assert_eq!(
            config.navigation.read_timeout(),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(config.navigation.cache_capacity, 8);
        assert_eq!(config.navigation.cache_ttl(), Duration::ZERO);
        assert!(!config.navigation.cancel_superseded);
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let config = Config::parse(
            r#"
[terminal]
display_at_startup = true
"#,
        )
        .unwrap();

        assert!(config.terminal.display_at_startup);
        assert!(config.terminal.sync_cwd);
        assert_eq!(config.general.default_sort, "name");
        assert_eq!(config.navigation.cache_capacity, 64);
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let config = Config::parse("").unwrap();
        let default = Config::default();

        assert_eq!(config.general.show_hidden, default.general.show_hidden);
        assert_eq!(
            config.navigation.cache_ttl_ms,
            default.navigation.cache_ttl_ms
        );
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let result = Config::parse("this is not valid [[[toml");
        assert!(matches!(result.unwrap_err(), CoreError::ConfigParse(_)));
    }
}
