//! REPL and command handling.
//!
//! The game runs in a read-eval-print loop over a [`Session`]. This module
//! reads and dispatches commands; the submodules hold the handlers.

pub mod character;
pub mod combat;
pub mod input;
pub mod inventory;
pub mod quest;
pub mod system;

pub use character::*;
pub use combat::*;
pub use inventory::*;
pub use quest::*;
pub use system::*;

use anyhow::Result;
use colored::Colorize;
use log::{error, info};

use chronicles_data::Catalog;

use crate::character::Character;
use crate::command::{Command, parse_command};
use crate::session::Session;
use crate::view::{View, ViewItem};

use input::{InputEvent, InputManager};

/// Control flow signal used by handlers to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the main read-eval-print loop until the user quits.
///
/// Engine and persistence failures are shown to the player and the loop keeps
/// going; only a failure to read input at all ends it early.
///
/// # Errors
/// - if stdin cannot be read
pub fn run_repl(session: &mut Session) -> Result<()> {
    let mut view = View::new();
    let mut input = InputManager::new(session.save_dir());
    help_handler(&mut view);
    view.flush();

    loop {
        let prompt = prompt_for(session);
        let line = match input.read_line(&prompt)? {
            InputEvent::Line(line) => line,
            InputEvent::Eof => "quit".to_string(),
            InputEvent::Interrupted => {
                view.push(ViewItem::EngineMessage("Command canceled.".to_string()));
                view.flush();
                continue;
            },
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = parse_command(&line);
        info!("command: {command:?}");
        match dispatch(session, &mut view, &mut input, &command) {
            Ok(ReplControl::Quit) => {
                view.flush();
                break;
            },
            Ok(ReplControl::Continue) => {},
            Err(err) => {
                error!("'{}' failed: {err:#}", line.trim());
                view.push(ViewItem::Error(format!("{err:#}")));
            },
        }

        if let Err(err) = session.autosave() {
            error!("autosave failed: {err}");
            view.push(ViewItem::Error(format!("Autosave failed: {err}")));
        }
        view.flush();
    }
    Ok(())
}

/// Route one command to its handler.
///
/// # Errors
/// - propagates I/O failures from handlers
pub fn dispatch(
    session: &mut Session,
    view: &mut View,
    input: &mut InputManager,
    command: &Command,
) -> Result<ReplControl> {
    #[allow(clippy::enum_glob_use)]
    use Command::*;
    match command {
        New { name, class } => new_character_handler(session, view, name, class),
        Load(name) => load_handler(session, view, name),
        Saves => list_saves_handler(session, view)?,
        Delete(name) => delete_handler(session, view, name)?,
        Save => save_handler(session, view)?,
        Stats => stats_handler(session, view),
        Inventory => inventory_handler(session, view),
        UseItem(item) => use_handler(session, view, item),
        Equip(item) => equip_handler(session, view, item),
        Unequip(slot) => unequip_handler(session, view, *slot),
        Shop => shop_handler(session, view),
        Buy(item) => buy_handler(session, view, item),
        Sell(item) => sell_handler(session, view, item),
        Quests(filter) => quests_handler(session, view, *filter),
        Accept(quest) => accept_handler(session, view, quest),
        Complete(quest) => complete_handler(session, view, quest),
        Abandon(quest) => abandon_handler(session, view, quest),
        Chain(quest) => chain_handler(session, view, quest),
        Explore => explore_handler(session, view, input)?,
        Revive => revive_handler(session, view),
        Help => help_handler(view),
        Quit => return quit_handler(session, view),
        Unknown => view.push(ViewItem::Error(
            "Didn't quite catch that. Type \"help\" for a list of commands.".italic().to_string(),
        )),
    }
    Ok(ReplControl::Continue)
}

fn prompt_for(session: &Session) -> String {
    match &session.character {
        Some(c) => format!(
            "\n[{} | Lv {} | HP {}/{} | {}g]>> ",
            c.name,
            c.level,
            c.health.current_hp(),
            c.health.max_hp(),
            c.gold
        ),
        None => "\n[no character]>> ".to_string(),
    }
    .bright_white()
    .to_string()
}

/// Feedback when a command needs a character and none is loaded.
pub fn no_character(view: &mut View) {
    view.push(ViewItem::ActionFailure(
        "No character loaded. Use `new <name> <class>` or `load <name>` first.".to_string(),
    ));
}

/// The loaded character and catalog, if there is a character and it is alive.
/// Otherwise pushes the reason to the view and returns `None`.
pub fn living_character<'a>(session: &'a mut Session, view: &mut View) -> Option<(&'a mut Character, &'a Catalog)> {
    if let Err(err) = session.require_alive() {
        view.push(ViewItem::ActionFailure(format!("{err}. Type `revive` to return.")));
        return None;
    }
    let parts = session.parts_mut();
    if parts.is_none() {
        no_character(view);
    }
    parts
}
