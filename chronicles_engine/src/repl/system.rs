//! `repl::system` module
//!
//! Handlers for saving, loading and other game-system commands.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::error::{ErrorKind, PersistError};
use crate::repl::{ReplControl, no_character};
use crate::save_files::{build_save_entries, delete_character, load_character, save_path};
use crate::session::Session;
use crate::view::{HelpLine, View, ViewItem};

const HELP: &[(&str, &str)] = &[
    ("new <name> <class>", "create a Warrior, Mage, Rogue or Cleric"),
    ("load <name>", "continue a saved character"),
    ("saves", "list saved characters"),
    ("delete <name>", "delete a saved character"),
    ("save", "save the current character"),
    ("stats", "show the character sheet"),
    ("inventory", "list what you carry"),
    ("use <item>", "use a consumable"),
    ("equip <item>", "equip a weapon or armor"),
    ("unequip weapon|armor", "put equipment back in your pack"),
    ("shop", "see what's for sale"),
    ("buy <item> / sell <item>", "trade with the shopkeeper (items sell for half)"),
    ("quests [available|completed]", "show your quest journal"),
    ("accept <quest>", "take on a quest"),
    ("complete <quest>", "turn in an active quest"),
    ("abandon <quest>", "give up an active quest"),
    ("chain <quest>", "show the quests that lead up to one"),
    ("explore", "leave town and find a fight"),
    ("revive", "return from the dead at half health"),
    ("help", "show this list"),
    ("quit", "leave the game"),
];

/// Load a saved character, replacing the one being played.
pub fn load_handler(session: &mut Session, view: &mut View, name: &str) {
    match load_character(session.save_dir(), name) {
        Ok(character) => {
            view.push(ViewItem::GameLoaded {
                name: character.name.clone(),
                path: save_path(session.save_dir(), &character.name).display().to_string(),
            });
            if let Some(previous) = session.begin(character)
                && !session.config.autosave
            {
                view.push(ViewItem::EngineMessage(format!(
                    "Unsaved progress for {} was left behind.",
                    previous.name
                )));
            }
        },
        Err(err) => {
            warn!("load of '{name}' failed: {err}");
            let msg = match err.kind() {
                ErrorKind::NotFound => format!("{err}. Type `saves` to see who is available."),
                _ => err.to_string(),
            };
            view.push(ViewItem::Error(msg));
        },
    }
}

/// List saved characters with a short summary of each.
///
/// # Errors
/// - if the save directory cannot be read
pub fn list_saves_handler(session: &Session, view: &mut View) -> Result<()> {
    let dir = session.save_dir();
    let entries = build_save_entries(dir).with_context(|| format!("listing saves in {}", dir.display()))?;
    view.push(ViewItem::SavedGamesList {
        directory: dir.display().to_string(),
        entries,
    });
    Ok(())
}

/// Delete a saved character. Deleting the one being played also unloads it.
///
/// # Errors
/// - if the save file exists but cannot be removed
pub fn delete_handler(session: &mut Session, view: &mut View, name: &str) -> Result<()> {
    match delete_character(session.save_dir(), name) {
        Ok(()) => {
            view.push(ViewItem::ActionSuccess(format!("Deleted the save for {}.", name.trim())));
            if session
                .character
                .as_ref()
                .is_some_and(|c| c.name.eq_ignore_ascii_case(name.trim()))
            {
                session.character = None;
                view.push(ViewItem::EngineMessage(
                    "That was the character you were playing. Start or load another.".to_string(),
                ));
            }
            Ok(())
        },
        Err(PersistError::CharacterNotFound(missing)) => {
            view.push(ViewItem::ActionFailure(format!("There is no saved character named {missing}.")));
            Ok(())
        },
        Err(err) => Err(err).with_context(|| format!("deleting the save for '{name}'")),
    }
}

/// Save the current character.
///
/// # Errors
/// - if the save file cannot be written
pub fn save_handler(session: &Session, view: &mut View) -> Result<()> {
    let Some(path) = session.save().context("saving the current character")? else {
        no_character(view);
        return Ok(());
    };
    if let Some(character) = &session.character {
        view.push(ViewItem::GameSaved {
            name: character.name.clone(),
            path: path.display().to_string(),
        });
    }
    Ok(())
}

pub fn help_handler(view: &mut View) {
    let lines = HELP
        .iter()
        .map(|(command, description)| HelpLine {
            command: (*command).to_string(),
            description: (*description).to_string(),
        })
        .collect();
    view.push(ViewItem::Help(lines));
}

/// Quit the game, saving first when autosave is on.
///
/// # Errors
/// - if the final save cannot be written
pub fn quit_handler(session: &Session, view: &mut View) -> Result<ReplControl> {
    if session.config.autosave
        && let Some(path) = session.save().context("saving before quitting")?
        && let Some(character) = &session.character
    {
        view.push(ViewItem::GameSaved {
            name: character.name.clone(),
            path: path.display().to_string(),
        });
    }
    match &session.character {
        Some(character) => info!(
            "quitting as {} (level {}, {} gold, {} quests completed)",
            character.name,
            character.level,
            character.gold,
            character.completed_quests.len()
        ),
        None => info!("quitting with no character loaded"),
    }
    view.push(ViewItem::EngineMessage("Farewell, adventurer.".to_string()));
    Ok(ReplControl::Quit)
}
