use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Port WebHare listens on unless WEBHARE_BASEPORT says otherwise
pub const DEFAULT_BASE_PORT: u16 = 13679;

/// Extra directories appended to PATH for the CLI
pub const EXTRA_PATH_DIRS: &[&str] = &["/usr/local/bin", "/opt/homebrew/bin"];

const DEFAULT_INSTALL_SUBDIR: &str = "projects/webhare/whtree";
const DEFAULT_DATAROOT_SUBDIR: &str = "whrunkit/myserver/whdata/";
const DEFAULT_LOG_FILE: &str = "webhare-mcp-log.txt";

/// Where log output goes besides stderr
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
    Stderr,
    /// Mirror everything, payloads included, into this file
    File(PathBuf),
}

/// Server configuration, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub home: PathBuf,
    /// Root of the WebHare installation tree (`whtree`)
    pub webhare_dir: PathBuf,
    pub data_root: PathBuf,
    pub base_port: u16,
    /// Directory for transient CLI scripts
    pub script_dir: PathBuf,
    pub log: LogMode,
}

impl ServerConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let home = get("HOME").map(PathBuf::from);
        let home_join = |sub: &str| home.as_ref().map(|h| h.join(sub)).ok_or(ConfigError::MissingHome);

        let webhare_dir = match get("WEBHARE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => home_join(DEFAULT_INSTALL_SUBDIR)?,
        };
        let data_root = match get("WEBHARE_DATAROOT") {
            Some(dir) => PathBuf::from(dir),
            None => home_join(DEFAULT_DATAROOT_SUBDIR)?,
        };

        let base_port = match get("WEBHARE_BASEPORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_BASE_PORT,
        };

        let script_dir = get("WEBHARE_MCP_SCRIPT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let log = match get("WEBHARE_MCP_LOG").as_deref().map(str::trim) {
            None | Some("stderr") => LogMode::Stderr,
            Some("file") => {
                let path = match get("WEBHARE_MCP_LOG_FILE") {
                    Some(path) => PathBuf::from(path),
                    None => home_join(DEFAULT_LOG_FILE)?,
                };
                LogMode::File(path)
            }
            Some(other) => return Err(ConfigError::InvalidLogMode(other.to_string())),
        };

        // HOME is exported to the CLI; fall back to the installation root's parent
        let home = match home {
            Some(home) => home,
            None => webhare_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("/")),
        };

        Ok(Self {
            home,
            webhare_dir,
            data_root,
            base_port,
            script_dir,
            log,
        })
    }

    /// The CLI entry point, `bin/wh`
    pub fn cli_path(&self) -> PathBuf {
        self.webhare_dir.join("bin").join("wh")
    }

    /// Helper script sourced before every CLI run
    pub fn functions_path(&self) -> PathBuf {
        self.webhare_dir.join("lib").join("wh-functions.sh")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_derive_from_home() {
        let config = config_from(&[("HOME", "/home/dev")]).unwrap();
        assert_eq!(config.webhare_dir, PathBuf::from("/home/dev/projects/webhare/whtree"));
        assert_eq!(config.data_root, PathBuf::from("/home/dev/whrunkit/myserver/whdata/"));
        assert_eq!(config.base_port, DEFAULT_BASE_PORT);
        assert_eq!(config.log, LogMode::Stderr);
        assert_eq!(config.cli_path(), PathBuf::from("/home/dev/projects/webhare/whtree/bin/wh"));
        assert_eq!(
            config.functions_path(),
            PathBuf::from("/home/dev/projects/webhare/whtree/lib/wh-functions.sh")
        );
    }

    #[test]
    fn test_environment_overrides_paths_and_port() {
        let config = config_from(&[
            ("HOME", "/home/dev"),
            ("WEBHARE_DIR", "/opt/wh/whtree"),
            ("WEBHARE_DATAROOT", "/srv/whdata/"),
            ("WEBHARE_BASEPORT", "8000"),
            ("WEBHARE_MCP_SCRIPT_DIR", "/var/tmp"),
        ])
        .unwrap();
        assert_eq!(config.webhare_dir, PathBuf::from("/opt/wh/whtree"));
        assert_eq!(config.data_root, PathBuf::from("/srv/whdata/"));
        assert_eq!(config.base_port, 8000);
        assert_eq!(config.script_dir, PathBuf::from("/var/tmp"));
    }

    #[test]
    fn test_missing_home_without_explicit_roots() {
        assert!(matches!(config_from(&[]), Err(ConfigError::MissingHome)));
    }

    #[test]
    fn test_explicit_roots_do_not_need_home() {
        let config = config_from(&[
            ("WEBHARE_DIR", "/opt/wh/whtree"),
            ("WEBHARE_DATAROOT", "/srv/whdata"),
        ])
        .unwrap();
        assert_eq!(config.home, PathBuf::from("/opt/wh"));
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("HOME", "/home/dev"), ("WEBHARE_BASEPORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref raw) if raw == "http"));
    }

    #[test]
    fn test_file_log_mode_defaults_to_home() {
        let config = config_from(&[("HOME", "/home/dev"), ("WEBHARE_MCP_LOG", "file")]).unwrap();
        assert_eq!(
            config.log,
            LogMode::File(PathBuf::from("/home/dev/webhare-mcp-log.txt"))
        );
    }

    #[test]
    fn test_unknown_log_mode() {
        let err = config_from(&[("HOME", "/home/dev"), ("WEBHARE_MCP_LOG", "syslog")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogMode(_)));
    }
}
