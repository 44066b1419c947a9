//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory name under the user config root.
const APP_DIR: &str = "moviedeck";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Else if `XDG_CONFIG_HOME` is set and non-empty, returns
///   `$XDG_CONFIG_HOME/moviedeck/config.toml`.
/// - Otherwise returns `~/.config/moviedeck/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    let xdg = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty());
    config_path_from(xdg.map(PathBuf::from), std::env::var_os("HOME").map(PathBuf::from))
}

/// Builds the default path from the XDG config root or the home directory.
fn config_path_from(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    let root = match xdg_config_home {
        Some(root) => root,
        None => home
            .context("HOME environment variable is not set")?
            .join(".config"),
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/moviedeck-test");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/moviedeck-test/config.toml"));
    }

    #[test]
    fn test_xdg_root_wins_over_home() {
        // Arrange & Act
        let path = config_path_from(
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/user")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/moviedeck/config.toml"));
    }

    #[test]
    fn test_home_fallback() {
        // Arrange & Act
        let path = config_path_from(None, Some(PathBuf::from("/home/user"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/user/.config/moviedeck/config.toml"));
    }

    #[test]
    fn test_no_home_is_an_error() {
        // Arrange & Act
        let result = config_path_from(None, None);

        // Assert
        assert!(result.is_err());
    }
}
