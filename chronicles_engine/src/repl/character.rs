//! `repl::character` module
//!
//! Handlers for creating, inspecting and reviving the played character.

use chronicles_data::Catalog;
use log::warn;

use crate::character::{Character, create_character};
use crate::helpers::item_name;
use crate::progression::{experience_to_next_level, revive};
use crate::repl::no_character;
use crate::save_files::list_saved_characters;
use crate::session::Session;
use crate::view::{CharacterSheet, View, ViewItem};

/// Create a new character and start playing it.
///
/// Refuses a name that already has a save, so a new character never silently
/// overwrites an old one.
pub fn new_character_handler(session: &mut Session, view: &mut View, name: &str, class: &str) {
    match list_saved_characters(session.save_dir()) {
        Ok(names) if names.iter().any(|saved| saved.eq_ignore_ascii_case(name.trim())) => {
            view.push(ViewItem::ActionFailure(format!(
                "A character named {} already exists. Use `load {}` or `delete {}` first.",
                name.trim(),
                name.trim(),
                name.trim()
            )));
            return;
        },
        Ok(_) => {},
        Err(err) => warn!("could not check existing saves: {err}"),
    }

    let character = match create_character(name, class) {
        Ok(character) => character,
        Err(err) => {
            view.push(ViewItem::ActionFailure(err.to_string()));
            return;
        },
    };
    view.push(ViewItem::ActionSuccess(format!(
        "{} the {} steps forth with {} gold.",
        character.name, character.class, character.gold
    )));
    view.push(ViewItem::CharacterSheet(character_sheet(&character, &session.catalog)));
    if let Some(previous) = session.begin(character) {
        view.push(ViewItem::EngineMessage(format!("{} has been set aside.", previous.name)));
    }
}

/// Show the character sheet.
pub fn stats_handler(session: &Session, view: &mut View) {
    match &session.character {
        Some(character) => view.push(ViewItem::CharacterSheet(character_sheet(character, &session.catalog))),
        None => no_character(view),
    }
}

/// Bring a fallen character back at half health.
pub fn revive_handler(session: &mut Session, view: &mut View) {
    let Some(character) = session.character.as_mut() else {
        no_character(view);
        return;
    };
    if revive(character) {
        view.push(ViewItem::ActionSuccess(format!(
            "{} returns to life with {} health.",
            character.name,
            character.health.current_hp()
        )));
    } else {
        view.push(ViewItem::ActionFailure(format!("{} is not dead.", character.name)));
    }
}

/// Build the display form of a character.
pub fn character_sheet(character: &Character, catalog: &Catalog) -> CharacterSheet {
    let equipped = |slot: &Option<String>| slot.as_deref().map(|id| item_name(catalog, id).to_string());
    CharacterSheet {
        name: character.name.clone(),
        class: character.class.to_string(),
        level: character.level,
        health: character.health.current_hp(),
        max_health: character.health.max_hp(),
        strength: character.strength,
        magic: character.magic,
        experience: character.experience,
        to_next_level: experience_to_next_level(character),
        gold: character.gold,
        weapon: equipped(&character.equipped_weapon),
        armor: equipped(&character.equipped_armor),
        active_quests: character.active_quests.len(),
        completed_quests: character.completed_quests.len(),
    }
}
