//! `repl::quest` module
//!
//! Handlers for the quest journal.

use chronicles_data::{Catalog, QuestDef};

use crate::command::QuestFilter;
use crate::helpers::find_quest;
use crate::quest::{
    abandon_quest, accept_quest, active_quests, available_quests, complete_quest, completed_quests,
    completion_percentage, prerequisite_chain, total_rewards,
};
use crate::repl::{living_character, no_character};
use crate::session::Session;
use crate::style::GameStyle;
use crate::view::{QuestLine, View, ViewItem};

/// List active, available or completed quests, followed by overall progress.
pub fn quests_handler(session: &Session, view: &mut View, filter: QuestFilter) {
    let Some(character) = &session.character else {
        no_character(view);
        return;
    };
    let catalog = &session.catalog;
    let (heading, quests) = match filter {
        QuestFilter::Active => ("Active quests", active_quests(character, catalog)),
        QuestFilter::Available => ("Quests you can accept", available_quests(character, catalog)),
        QuestFilter::Completed => ("Completed quests", completed_quests(character, catalog)),
    };
    view.push(ViewItem::QuestList {
        heading: heading.to_string(),
        quests: quests.into_iter().map(quest_line).collect(),
    });
    view.push(ViewItem::QuestProgress {
        percentage: completion_percentage(character, catalog),
        rewards: total_rewards(character, catalog),
    });
}

pub fn accept_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = living_character(session, view) else {
        return;
    };
    let Some(quest) = find_quest(catalog, search) else {
        unknown_quest(view, search);
        return;
    };
    match accept_quest(character, &quest.id, catalog) {
        Ok(quest) => {
            view.push(ViewItem::ActionSuccess(format!(
                "Quest accepted: {}",
                quest.title.quest_style()
            )));
            if !quest.description.is_empty() {
                view.push(ViewItem::EngineMessage(quest.description.clone()));
            }
        },
        Err(err) => view.push(ViewItem::ActionFailure(err.to_string())),
    }
}

/// Turn in an active quest for its rewards.
pub fn complete_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = living_character(session, view) else {
        return;
    };
    let Some(quest) = find_quest(catalog, search) else {
        unknown_quest(view, search);
        return;
    };
    match complete_quest(character, &quest.id, catalog) {
        Ok(completion) => {
            view.push(ViewItem::QuestCompleted {
                title: quest.title.clone(),
                xp: completion.xp_gained,
                gold: completion.gold_gained,
            });
            if completion.levels_gained > 0 {
                view.push(ViewItem::LevelUp {
                    name: character.name.clone(),
                    level: character.level,
                });
            }
        },
        Err(err) => view.push(ViewItem::ActionFailure(err.to_string())),
    }
}

pub fn abandon_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = session.parts_mut() else {
        no_character(view);
        return;
    };
    let Some(quest) = find_quest(catalog, search) else {
        unknown_quest(view, search);
        return;
    };
    match abandon_quest(character, &quest.id) {
        Ok(()) => view.push(ViewItem::ActionSuccess(format!(
            "You abandon {}. It can be accepted again later.",
            quest.title.quest_style()
        ))),
        Err(err) => view.push(ViewItem::ActionFailure(err.to_string())),
    }
}

/// Show the quests that must be finished before the named one.
///
/// Doesn't need a character: the chain is a property of the catalog.
pub fn chain_handler(session: &Session, view: &mut View, search: &str) {
    let catalog = &session.catalog;
    let Some(quest) = find_quest(catalog, search) else {
        unknown_quest(view, search);
        return;
    };
    match prerequisite_chain(&quest.id, catalog) {
        Ok(chain) => view.push(ViewItem::PrerequisiteChain {
            quest: quest.title.clone(),
            chain: chain.iter().map(|id| title_of(catalog, id)).collect(),
        }),
        Err(err) => view.push(ViewItem::Error(err.to_string())),
    }
}

fn quest_line(quest: &QuestDef) -> QuestLine {
    QuestLine {
        quest_id: quest.id.clone(),
        title: quest.title.clone(),
        description: quest.description.clone(),
        reward_xp: quest.reward_xp,
        reward_gold: quest.reward_gold,
        required_level: quest.required_level,
    }
}

fn title_of(catalog: &Catalog, id: &str) -> String {
    catalog.quest(id).map_or_else(|| id.to_string(), |quest| quest.title.clone())
}

fn unknown_quest(view: &mut View, search: &str) {
    view.push(ViewItem::ActionFailure(format!(
        "There's no quest called \"{}\". Try `quests available`.",
        search.error_style()
    )));
}
