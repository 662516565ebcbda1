//! The state of one play session: the static catalog, runtime settings, and
//! the character currently being played (if any).

use std::path::{Path, PathBuf};

use chronicles_data::Catalog;
use log::info;

use crate::character::Character;
use crate::config::GameConfig;
use crate::error::{GameError, PersistError};
use crate::save_files;

#[derive(Debug, Clone)]
pub struct Session {
    pub catalog: Catalog,
    pub config: GameConfig,
    pub character: Option<Character>,
}

impl Session {
    pub fn new(catalog: Catalog, config: GameConfig) -> Self {
        Self {
            catalog,
            config,
            character: None,
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.config.save_dir
    }

    /// Make `character` the one being played, returning whoever was loaded before.
    pub fn begin(&mut self, character: Character) -> Option<Character> {
        info!("now playing '{}'", character.name);
        self.character.replace(character)
    }

    /// Save the loaded character. `Ok(None)` if no character is loaded.
    ///
    /// # Errors
    /// - `Io` if the save cannot be written
    pub fn save(&self) -> Result<Option<PathBuf>, PersistError> {
        match &self.character {
            Some(character) => save_files::save_character(self.save_dir(), character).map(Some),
            None => Ok(None),
        }
    }

    /// Save after a command if autosave is on and a character is loaded.
    ///
    /// # Errors
    /// - `Io` if the save cannot be written
    pub fn autosave(&self) -> Result<(), PersistError> {
        if self.config.autosave {
            self.save()?;
        }
        Ok(())
    }

    /// The loaded character along with the catalog, for engine calls that need both.
    pub fn parts_mut(&mut self) -> Option<(&mut Character, &Catalog)> {
        self.character.as_mut().map(|character| (character, &self.catalog))
    }

    pub fn require_alive(&self) -> Result<(), GameError> {
        match &self.character {
            Some(character) if crate::progression::is_dead(character) => {
                Err(GameError::CharacterDead(character.name.clone()))
            },
            _ => Ok(()),
        }
    }
}
