//! Class special abilities.

use std::fmt;

use crate::character::CharacterClass;

pub const CLERIC_HEAL: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAbility {
    /// Strength x2 to the enemy.
    PowerStrike,
    /// Magic x2 to the enemy.
    Fireball,
    /// Coin flip: strength x3 on a critical, plain strength otherwise.
    CriticalStrike,
    /// Restore [`CLERIC_HEAL`] hp to self.
    Heal,
}

impl SpecialAbility {
    pub fn name(self) -> &'static str {
        match self {
            SpecialAbility::PowerStrike => "Power Strike",
            SpecialAbility::Fireball => "Fireball",
            SpecialAbility::CriticalStrike => "Critical Strike",
            SpecialAbility::Heal => "Heal",
        }
    }
}

impl fmt::Display for SpecialAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CharacterClass {
    pub fn special_ability(self) -> SpecialAbility {
        match self {
            CharacterClass::Warrior => SpecialAbility::PowerStrike,
            CharacterClass::Mage => SpecialAbility::Fireball,
            CharacterClass::Rogue => SpecialAbility::CriticalStrike,
            CharacterClass::Cleric => SpecialAbility::Heal,
        }
    }
}
