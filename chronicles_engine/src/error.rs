//! Error types for the game engines and persistence layer.
//!
//! Engine operations validate before they mutate, so any `Err` returned here
//! means the character record was left untouched.

use std::io;
use std::path::PathBuf;

use chronicles_data::{CatalogKind, Id, ItemKind};
use thiserror::Error;

/// Broad category of a failure, used by the driver to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyInState,
    GateUnmet,
    CapacityExceeded,
    InvalidOperation,
    DataCorruption,
}

/// Rule violations raised by the progression, inventory, quest and combat engines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("'{0}' is not a playable class (choose Warrior, Mage, Rogue or Cleric)")]
    InvalidCharacterClass(String),
    #[error("'{0}' cannot be used as a character name")]
    InvalidCharacterName(String),
    #[error("{0} is dead")]
    CharacterDead(String),
    #[error("not enough gold: have {available}, need {required}")]
    InsufficientGold { available: u32, required: u32 },
    #[error("inventory is full ({capacity} items)")]
    InventoryFull { capacity: usize },
    #[error("no '{0}' in inventory")]
    ItemNotFound(Id),
    #[error("'{item}' is {found}, not {expected}")]
    InvalidItemType {
        item: Id,
        expected: ItemKind,
        found: ItemKind,
    },
    #[error("no quest with id '{0}'")]
    QuestNotFound(Id),
    #[error("quest '{0}' is already active")]
    QuestAlreadyActive(Id),
    #[error("quest '{0}' has already been completed")]
    QuestAlreadyCompleted(Id),
    #[error("quest '{0}' is not active")]
    QuestNotActive(Id),
    #[error("level {required} required (currently level {current})")]
    InsufficientLevel { required: u32, current: u32 },
    #[error("quest '{quest}' requires '{prerequisite}' to be completed first")]
    QuestRequirementsNotMet { quest: Id, prerequisite: Id },
    #[error("prerequisite chain of quest '{0}' loops back on itself")]
    PrerequisiteCycle(Id),
    #[error("no enemy called '{0}'")]
    InvalidTarget(String),
    #[error("combat is not active")]
    CombatNotActive,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::ItemNotFound(_) | GameError::QuestNotFound(_) | GameError::InvalidTarget(_) => {
                ErrorKind::NotFound
            },
            GameError::QuestAlreadyActive(_) | GameError::QuestAlreadyCompleted(_) => ErrorKind::AlreadyInState,
            GameError::InsufficientGold { .. }
            | GameError::InsufficientLevel { .. }
            | GameError::QuestRequirementsNotMet { .. } => ErrorKind::GateUnmet,
            GameError::InventoryFull { .. } => ErrorKind::CapacityExceeded,
            GameError::InvalidCharacterClass(_)
            | GameError::InvalidCharacterName(_)
            | GameError::CharacterDead(_)
            | GameError::InvalidItemType { .. }
            | GameError::QuestNotActive(_)
            | GameError::CombatNotActive => ErrorKind::InvalidOperation,
            GameError::PrerequisiteCycle(_) => ErrorKind::DataCorruption,
        }
    }
}

/// Failures loading or storing saves and catalogs.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no saved character named '{0}'")]
    CharacterNotFound(String),
    #[error("save file {} could not be read", .path.display())]
    SaveFileCorrupted {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file {} is invalid: {reason}", .path.display())]
    InvalidSaveData { path: PathBuf, reason: String },
    #[error("{kind} catalog not found at {}", .path.display())]
    MissingCatalog { kind: CatalogKind, path: PathBuf },
    #[error("{kind} catalog {} is malformed: {reason}", .path.display())]
    CatalogFormat {
        kind: CatalogKind,
        path: PathBuf,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PersistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersistError::CharacterNotFound(_) | PersistError::MissingCatalog { .. } => ErrorKind::NotFound,
            PersistError::SaveFileCorrupted { .. }
            | PersistError::InvalidSaveData { .. }
            | PersistError::CatalogFormat { .. } => ErrorKind::DataCorruption,
            PersistError::Io(_) => ErrorKind::InvalidOperation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_errors_map_to_kinds() {
        assert_eq!(GameError::QuestNotFound("q".into()).kind(), ErrorKind::NotFound);
        assert_eq!(GameError::QuestAlreadyCompleted("q".into()).kind(), ErrorKind::AlreadyInState);
        assert_eq!(
            GameError::InsufficientLevel { required: 3, current: 1 }.kind(),
            ErrorKind::GateUnmet
        );
        assert_eq!(GameError::InventoryFull { capacity: 20 }.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(GameError::CombatNotActive.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn persist_errors_map_to_kinds() {
        let missing = PersistError::MissingCatalog {
            kind: CatalogKind::Items,
            path: PathBuf::from("items.txt"),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        let bad = PersistError::InvalidSaveData {
            path: PathBuf::from("x_save.txt"),
            reason: "missing LEVEL".into(),
        };
        assert_eq!(bad.kind(), ErrorKind::DataCorruption);
        assert!(bad.to_string().contains("missing LEVEL"));
    }
}
