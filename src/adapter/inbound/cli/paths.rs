//! Path utilities for edgescout.
//!
//! The configuration file is looked up in the working directory first, then
//! under `~/.edgescout/`.

use std::path::{Path, PathBuf};

/// Config file name in the working directory.
pub const LOCAL_CONFIG: &str = "config.toml";

/// Returns the edgescout home directory (`~/.edgescout/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".edgescout")
}

/// Returns the per-user config file path (`~/.edgescout/config.toml`).
pub fn user_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// First existing default config file, if any.
pub fn default_config() -> Option<PathBuf> {
    find_config(Path::new(LOCAL_CONFIG), &user_config())
}

fn find_config(local: &Path, user: &Path) -> Option<PathBuf> {
    [local, user]
        .into_iter()
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_config_is_under_edgescout_home() {
        assert!(user_config().to_string_lossy().contains(".edgescout"));
    }

    #[test]
    fn local_config_wins_over_user_config() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("config.toml");
        let user = dir.path().join("user.toml");

        assert_eq!(find_config(&local, &user), None);

        std::fs::write(&user, "").unwrap();
        assert_eq!(find_config(&local, &user), Some(user.clone()));

        std::fs::write(&local, "").unwrap();
        assert_eq!(find_config(&local, &user), Some(local));
    }
}
