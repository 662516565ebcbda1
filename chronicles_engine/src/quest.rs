//! Quest engine.
//!
//! A quest is, per character, not accepted, active or completed. Abandoning an
//! active quest returns it to not accepted. Definitions come from the static
//! [`Catalog`]; only the id lists on the [`Character`] change.

use std::collections::HashSet;
use std::fmt;

use chronicles_data::{Catalog, Id, QuestDef};
use log::info;

use crate::character::Character;
use crate::error::GameError;
use crate::progression::{self, is_dead};

/// Where a character stands with one quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    NotAccepted,
    Active,
    Completed,
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuestStatus::NotAccepted => "not accepted",
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
        })
    }
}

/// What completing a quest paid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    pub xp_gained: u32,
    pub gold_gained: u32,
    pub levels_gained: u32,
    pub message: String,
}

/// Totals over every completed quest that is still in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardSummary {
    pub quests: usize,
    pub total_xp: u32,
    pub total_gold: u32,
}

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

pub fn quest_status(character: &Character, quest_id: &str) -> QuestStatus {
    if is_quest_completed(character, quest_id) {
        QuestStatus::Completed
    } else if is_quest_active(character, quest_id) {
        QuestStatus::Active
    } else {
        QuestStatus::NotAccepted
    }
}

/// Check every acceptance gate, in order, without changing anything.
fn check_acceptable<'a>(character: &Character, quest_id: &str, catalog: &'a Catalog) -> Result<&'a QuestDef, GameError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
    if is_quest_completed(character, quest_id) {
        return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()));
    }
    if is_quest_active(character, quest_id) {
        return Err(GameError::QuestAlreadyActive(quest_id.to_string()));
    }
    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            required: quest.required_level,
            current: character.level,
        });
    }
    if let Some(prereq) = &quest.prerequisite
        && !is_quest_completed(character, prereq)
    {
        return Err(GameError::QuestRequirementsNotMet {
            quest: quest_id.to_string(),
            prerequisite: prereq.clone(),
        });
    }
    Ok(quest)
}

/// Accept a quest, making it active.
///
/// # Errors
/// - `QuestNotFound`, `QuestAlreadyCompleted`, `QuestAlreadyActive`,
///   `InsufficientLevel` or `QuestRequirementsNotMet`, checked in that order
pub fn accept_quest<'a>(
    character: &mut Character,
    quest_id: &str,
    catalog: &'a Catalog,
) -> Result<&'a QuestDef, GameError> {
    let quest = check_acceptable(character, quest_id, catalog)?;
    character.active_quests.push(quest_id.to_string());
    info!("{} accepted quest '{}'", character.name, quest.title);
    Ok(quest)
}

pub fn can_accept_quest(character: &Character, quest_id: &str, catalog: &Catalog) -> bool {
    check_acceptable(character, quest_id, catalog).is_ok()
}

/// Complete an active quest and pay out its rewards.
///
/// # Errors
/// - `QuestNotFound` if the id is not in the catalog
/// - `QuestNotActive` if the character hasn't accepted it
/// - `CharacterDead` if the character can't receive experience; the quest stays active
pub fn complete_quest(
    character: &mut Character,
    quest_id: &str,
    catalog: &Catalog,
) -> Result<QuestCompletion, GameError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
    let idx = character
        .active_quests
        .iter()
        .position(|id| id == quest_id)
        .ok_or_else(|| GameError::QuestNotActive(quest_id.to_string()))?;
    if is_dead(character) {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    let id = character.active_quests.remove(idx);
    character.completed_quests.push(id);
    let levels_gained = progression::gain_experience(character, quest.reward_xp)?;
    character.gold = character.gold.saturating_add(quest.reward_gold);

    let mut message = format!(
        "Quest '{}' completed! Gained {} XP and {} gold.",
        quest.title, quest.reward_xp, quest.reward_gold
    );
    if levels_gained > 0 {
        message.push_str(&format!(" Reached level {}!", character.level));
    }
    info!("{} completed quest '{}'", character.name, quest.title);
    Ok(QuestCompletion {
        xp_gained: quest.reward_xp,
        gold_gained: quest.reward_gold,
        levels_gained,
        message,
    })
}

/// Drop an active quest without reward.
///
/// # Errors
/// - `QuestNotActive` if the quest isn't active
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> Result<(), GameError> {
    let idx = character
        .active_quests
        .iter()
        .position(|id| id == quest_id)
        .ok_or_else(|| GameError::QuestNotActive(quest_id.to_string()))?;
    character.active_quests.remove(idx);
    info!("{} abandoned quest '{quest_id}'", character.name);
    Ok(())
}

/// Active quests that exist in the catalog, in acceptance order.
pub fn active_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a QuestDef> {
    character.active_quests.iter().filter_map(|id| catalog.quest(id)).collect()
}

/// Completed quests that exist in the catalog, in completion order.
pub fn completed_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a QuestDef> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| catalog.quest(id))
        .collect()
}

/// Quests the character could accept right now.
pub fn available_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a QuestDef> {
    catalog
        .quests
        .values()
        .filter(|quest| can_accept_quest(character, &quest.id, catalog))
        .collect()
}

/// Share of the catalog completed, as a percentage. 0.0 for an empty catalog.
#[allow(clippy::cast_precision_loss)]
pub fn completion_percentage(character: &Character, catalog: &Catalog) -> f64 {
    if catalog.quests.is_empty() {
        return 0.0;
    }
    let done = completed_quests(character, catalog).len();
    done as f64 / catalog.quests.len() as f64 * 100.0
}

pub fn total_rewards(character: &Character, catalog: &Catalog) -> RewardSummary {
    completed_quests(character, catalog)
        .into_iter()
        .fold(RewardSummary::default(), |acc, quest| RewardSummary {
            quests: acc.quests + 1,
            total_xp: acc.total_xp.saturating_add(quest.reward_xp),
            total_gold: acc.total_gold.saturating_add(quest.reward_gold),
        })
}

/// Quests that must be completed before `quest_id`, from the root of the chain
/// down to its direct prerequisite.
///
/// # Errors
/// - `QuestNotFound` if `quest_id` or any link in the chain is not in the catalog
/// - `PrerequisiteCycle` if following the links comes back to a visited quest
pub fn prerequisite_chain(quest_id: &str, catalog: &Catalog) -> Result<Vec<Id>, GameError> {
    let mut current = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
    let mut seen: HashSet<&str> = HashSet::from([quest_id]);
    let mut chain = Vec::new();

    while let Some(prereq) = &current.prerequisite {
        if !seen.insert(prereq.as_str()) {
            return Err(GameError::PrerequisiteCycle(quest_id.to_string()));
        }
        current = catalog
            .quest(prereq)
            .ok_or_else(|| GameError::QuestNotFound(prereq.clone()))?;
        chain.push(prereq.clone());
    }
    chain.reverse();
    Ok(chain)
}
