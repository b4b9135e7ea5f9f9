// Front-end preferences persisted as TOML in the per-user config directory
// Board geometry is fixed and lives here as constants

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Fixed board geometry
pub const ROWS: usize = 15;
pub const COLS: usize = 15;
pub const MINES: usize = 40;

/// User preferences
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub ascii_icons: bool,          // Use ASCII fallback icons
    pub show_indicator: bool,       // Show cursor position indicator
    pub log_file: Option<PathBuf>,  // Write tracing output here when set
}

/// Get the configuration file path
/// Uses the platform config directory (e.g. ~/.config/mswpr/mswpr.toml on Linux)
/// Falls back to the current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem().and_then(|s| s.to_str())?;
    let mut path = match ProjectDirs::from("com", "mswpr", name) {
        Some(proj) => proj.config_dir().to_path_buf(),
        None => env::current_dir().ok()?,
    };
    path.push(format!("{}.toml", name));
    Some(path)
}

/// Parse a config file, or None if it is missing or malformed
pub fn read_config(path: &Path) -> Option<Config> {
    let s = fs::read_to_string(path).ok()?;
    match toml::from_str::<Config>(&s) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed config");
            None
        }
    }
}

/// Serialize `cfg` to `path`, creating parent directories as needed
pub fn write_config(path: &Path, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let s = toml::to_string(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, s)?;
    Ok(())
}

/// Load configuration from disk, or create the default file if not found
pub fn load_or_create_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if let Some(cfg) = read_config(&path) {
        return cfg;
    }
    let cfg = Config::default();
    if !path.exists() {
        save_to(&path, &cfg);
    }
    cfg
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        save_to(&path, cfg);
    }
}

fn save_to(path: &Path, cfg: &Config) {
    if let Err(e) = write_config(path, cfg) {
        warn!(path = %path.display(), error = %e, "could not save config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("mswpr-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_fields_use_defaults() {
        let cfg: Config = toml::from_str("ascii_icons = true").unwrap();
        assert!(cfg.ascii_icons);
        assert!(!cfg.show_indicator);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn write_then_read() {
        let path = temp_path("write_then_read.toml");
        let cfg = Config {
            ascii_icons: true,
            show_indicator: true,
            log_file: Some(PathBuf::from("mswpr.log")),
        };
        write_config(&path, &cfg).unwrap();
        assert_eq!(read_config(&path), Some(cfg));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let path = temp_path("malformed.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "ascii_icons = \"yes\"").unwrap();
        assert_eq!(read_config(&path), None);
        let _ = fs::remove_file(&path);
    }
}
