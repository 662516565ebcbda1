#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub const CHRONICLES_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod character;
pub mod combat;
pub mod command;
pub mod config;
pub mod data_paths;
pub mod error;
pub mod health;
pub mod helpers;
pub mod inventory;
pub mod loader;
pub mod progression;
pub mod quest;
pub mod repl;
pub mod save_files;
pub mod session;
pub mod style;
pub mod view;

// Re-exports for convenience
pub use character::{Character, CharacterClass, create_character};
pub use combat::{Battle, BattleStatus, Chance, Enemy, RandomChance};
pub use config::{GameConfig, load_config};
pub use error::{ErrorKind, GameError, PersistError};
pub use loader::load_catalog;
pub use repl::run_repl;
pub use session::Session;
pub use view::{View, ViewItem};
