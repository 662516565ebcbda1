//! Character -- the player's character record.
//!
//! Every engine in the crate mutates a [`Character`] in place. The record is
//! created here with class-determined base stats and otherwise only changed
//! through the progression, inventory, quest and combat modules.
use std::fmt;
use std::str::FromStr;

use chronicles_data::Id;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::health::{HealthState, LivingEntity};

pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_GOLD: u32 = 100;

/// Characters that cannot appear in a name: they would break save file names or lines.
const FORBIDDEN_NAME_CHARS: [char; 6] = ['/', '\\', ',', ':', '\n', '\r'];

/// Playable classes. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Class-determined starting stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Cleric,
    ];

    pub fn base_stats(self) -> BaseStats {
        let (max_health, strength, magic) = match self {
            CharacterClass::Warrior => (120, 15, 5),
            CharacterClass::Mage => (80, 8, 20),
            CharacterClass::Rogue => (90, 12, 10),
            CharacterClass::Cleric => (100, 10, 15),
        };
        BaseStats {
            max_health,
            strength,
            magic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidCharacterClass(s.trim().to_string()))
    }
}

/// The mutable record shared by every engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub health: HealthState,
    pub strength: u32,
    pub magic: u32,
    /// Progress toward the next level; reset by each level-up.
    pub experience: u32,
    pub gold: u32,
    /// Item ids in acquisition order. Duplicates allowed.
    pub inventory: Vec<Id>,
    pub active_quests: Vec<Id>,
    pub completed_quests: Vec<Id>,
    pub equipped_weapon: Option<Id>,
    pub equipped_armor: Option<Id>,
}

impl Character {
    /// Create a level 1 character with the base stats of `class`.
    ///
    /// # Errors
    /// - if `name` is empty or contains characters that cannot be stored in a save file
    pub fn new(name: &str, class: CharacterClass) -> Result<Character, GameError> {
        let name = name.trim();
        if !is_valid_name(name) {
            return Err(GameError::InvalidCharacterName(name.to_string()));
        }
        let stats = class.base_stats();
        info!("created {class} '{name}'");
        Ok(Character {
            name: name.to_string(),
            class,
            level: STARTING_LEVEL,
            health: HealthState::new_at_max(stats.max_health),
            strength: stats.strength,
            magic: stats.magic,
            experience: 0,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
        })
    }
}

impl LivingEntity for Character {
    fn name(&self) -> &str {
        &self.name
    }
    fn health(&self) -> &HealthState {
        &self.health
    }
    fn health_mut(&mut self) -> &mut HealthState {
        &mut self.health
    }
    fn strength(&self) -> u32 {
        self.strength
    }
}

/// Create a character from a user-supplied class name.
///
/// # Errors
/// - `InvalidCharacterClass` if `class` is not one of the four classes
/// - `InvalidCharacterName` if `name` is unusable
pub fn create_character(name: &str, class: &str) -> Result<Character, GameError> {
    let class = class.parse::<CharacterClass>()?;
    Character::new(name, class)
}

/// Returns true if `name` can be used as a character name and save key.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(FORBIDDEN_NAME_CHARS)
}
