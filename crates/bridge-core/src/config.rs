//! Settings parser for `<config-dir>/editor-bridge/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;
use crate::log::LogLevel;

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = "editor-bridge";

/// Dependency that marks a directory as a project root by default
pub const DEFAULT_PROJECT_DEPENDENCY: &str = "react-native";

/// Default bound on one peer round trip
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 5_000;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub detection: DetectionSettings,

    #[serde(default)]
    pub peer: PeerSettings,
}

/// User-facing log output
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogSettings {
    /// Threshold for internal diagnostic messages
    #[serde(default)]
    pub level: LogLevel,
}

/// Project root detection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetectionSettings {
    /// package.json dependency that identifies a project root
    #[serde(default = "default_dependency")]
    pub dependency: String,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            dependency: default_dependency(),
        }
    }
}

fn default_dependency() -> String {
    DEFAULT_PROJECT_DEPENDENCY.to_string()
}

/// Editor peer transport
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeerSettings {
    /// Directory holding peer sockets (defaults to the system temp dir)
    #[serde(default)]
    pub socket_dir: Option<PathBuf>,

    /// Bound on connect + request + response, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            socket_dir: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_PEER_TIMEOUT_MS
}

impl PeerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn resolved_socket_dir(&self) -> PathBuf {
        self.socket_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Default location of the settings file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Parse settings from TOML text
pub fn parse_settings(content: &str) -> Result<Settings> {
    Ok(toml::from_str(content)?)
}

/// Load settings from `config_path`, falling back to defaults.
///
/// A missing file is normal. An unreadable or malformed file is reported as
/// a warning and ignored.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log.level, LogLevel::Info);
        assert_eq!(settings.detection.dependency, "react-native");
        assert_eq!(settings.peer.timeout(), Duration::from_secs(5));
        assert!(settings.peer.socket_dir.is_none());
    }

    #[test]
    fn test_parse_full_settings() {
        let settings = parse_settings(
            r#"
[log]
level = "debug"

[detection]
dependency = "expo"

[peer]
socket_dir = "/run/user/1000"
timeout_ms = 250
"#,
        )
        .unwrap();

        assert_eq!(settings.log.level, LogLevel::Debug);
        assert_eq!(settings.detection.dependency, "expo");
        assert_eq!(
            settings.peer.resolved_socket_dir(),
            PathBuf::from("/run/user/1000")
        );
        assert_eq!(settings.peer.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_partial_settings_keeps_defaults() {
        let settings = parse_settings("[peer]\ntimeout_ms = 10\n").unwrap();
        assert_eq!(settings.detection.dependency, "react-native");
        assert_eq!(settings.peer.timeout_ms, 10);
    }

    #[test]
    fn test_parse_invalid_settings() {
        let err = parse_settings("[log]\nlevel = \"loud\"\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("config.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [not toml").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[detection]\ndependency = \"react-native-windows\"\n").unwrap();
        assert_eq!(
            load_settings(&path).detection.dependency,
            "react-native-windows"
        );
    }
}
