//! Runtime settings read from `config.toml` in the data directory.
//!
//! Every key is optional. A missing file means defaults; an unreadable or
//! malformed one is logged and also falls back to defaults, so loading the
//! configuration never stops the game from starting.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory for character saves. Relative paths are taken from the working directory.
    pub save_dir: PathBuf,
    /// Quest catalog file name, relative to the data directory.
    pub quests_file: String,
    /// Item catalog file name, relative to the data directory.
    pub items_file: String,
    /// Save the loaded character after every command.
    pub autosave: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saved_games"),
            quests_file: "quests.txt".to_string(),
            items_file: "items.txt".to_string(),
            autosave: true,
        }
    }
}

impl GameConfig {
    pub fn quests_path(&self, data_root: &Path) -> PathBuf {
        data_root.join(&self.quests_file)
    }

    pub fn items_path(&self, data_root: &Path) -> PathBuf {
        data_root.join(&self.items_file)
    }
}

/// Load settings from `path`, falling back to defaults on any problem.
pub fn load_config(path: &Path) -> GameConfig {
    if !path.exists() {
        info!("no config at '{}', using defaults", path.display());
        return GameConfig::default();
    }
    match try_load_config(path) {
        Ok(config) => {
            info!("config loaded from '{}'", path.display());
            config
        },
        Err(e) => {
            warn!("Could not load config from '{}': {e:#}. Using defaults.", path.display());
            GameConfig::default()
        },
    }
}

fn try_load_config(path: &Path) -> Result<GameConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config from '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config from '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "autosave = false\nsave_dir = \"/tmp/heroes\"\n")?;
        let config = load_config(&path);
        assert!(!config.autosave);
        assert_eq!(config.save_dir, PathBuf::from("/tmp/heroes"));
        assert_eq!(config.quests_file, "quests.txt");
        Ok(())
    }

    #[test]
    fn missing_or_malformed_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(load_config(&dir.path().join("nope.toml")), GameConfig::default());

        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "autosave = \"sometimes\"")?;
        assert_eq!(load_config(&path), GameConfig::default());
        Ok(())
    }

    #[test]
    fn catalog_paths_join_the_data_root() {
        let config = GameConfig::default();
        assert_eq!(
            config.items_path(Path::new("data")),
            PathBuf::from("data").join("items.txt")
        );
    }
}
