//! Progression engine: experience and level-ups, gold, healing, death and revival.

use log::info;

use crate::character::Character;
use crate::error::GameError;
use crate::health::{LifeState, LivingEntity};

/// Experience needed per level; reaching `level * XP_PER_LEVEL` triggers a level-up.
pub const XP_PER_LEVEL: u32 = 100;
pub const LEVEL_UP_MAX_HEALTH: i32 = 10;
pub const LEVEL_UP_STRENGTH: u32 = 2;
pub const LEVEL_UP_MAGIC: u32 = 2;

/// Experience required to advance from `level` to the next.
pub fn level_threshold(level: u32) -> u32 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Add experience and apply every level-up it pays for. Returns the number of levels gained.
///
/// The threshold is recomputed from the new level after each step, so one large
/// grant can cascade through several levels.
///
/// # Errors
/// - `CharacterDead` if the character has no health left; nothing is changed
pub fn gain_experience(character: &mut Character, amount: u32) -> Result<u32, GameError> {
    if is_dead(character) {
        return Err(GameError::CharacterDead(character.name.clone()));
    }
    character.experience = character.experience.saturating_add(amount);

    let mut levels = 0;
    loop {
        let threshold = level_threshold(character.level);
        if character.experience < threshold {
            break;
        }
        character.experience -= threshold;
        character.level = character.level.saturating_add(1);
        character.health.adjust_max(LEVEL_UP_MAX_HEALTH);
        character.strength = character.strength.saturating_add(LEVEL_UP_STRENGTH);
        character.magic = character.magic.saturating_add(LEVEL_UP_MAGIC);
        character.health.restore_full();
        levels += 1;
        info!("{} reached level {}", character.name, character.level);
    }
    Ok(levels)
}

/// Experience still needed to reach the next level.
pub fn experience_to_next_level(character: &Character) -> u32 {
    level_threshold(character.level).saturating_sub(character.experience)
}

/// Add (or, with a negative amount, spend) gold. Returns the new total.
///
/// # Errors
/// - `InsufficientGold` if the balance would go below zero; gold is unchanged
pub fn add_gold(character: &mut Character, amount: i32) -> Result<u32, GameError> {
    let Some(total) = character.gold.checked_add_signed(amount) else {
        return Err(GameError::InsufficientGold {
            available: character.gold,
            required: amount.unsigned_abs(),
        });
    };
    character.gold = total;
    Ok(total)
}

/// Heal a living character by up to `amount`. Returns the hp actually restored.
///
/// A dead character is not healed (returns 0); use [`revive`] instead.
pub fn heal_character(character: &mut Character, amount: u32) -> u32 {
    if is_dead(character) {
        return 0;
    }
    character.health.heal(amount)
}

pub fn is_dead(character: &Character) -> bool {
    matches!(character.life_state(), LifeState::Dead)
}

/// Bring a dead character back at half of max health. Returns false if already alive.
pub fn revive(character: &mut Character) -> bool {
    if !is_dead(character) {
        return false;
    }
    let half = character.health.max_hp() / 2;
    character.health.set_current(half);
    info!("{} revived with {half} hp", character.name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn warrior() -> Character {
        Character::new("Hero", CharacterClass::Warrior).unwrap()
    }

    #[test]
    fn large_grant_cascades_through_levels() {
        let mut hero = warrior();
        assert_eq!(gain_experience(&mut hero, 250).unwrap(), 1);
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 150);
        assert_eq!(hero.health.max_hp(), 130);
        assert_eq!(hero.health.current_hp(), 130);
        assert_eq!(hero.strength, 17);
        assert_eq!(hero.magic, 7);

        // 100 (lvl1) + 200 (lvl2) + 300 (lvl3) = 600, 50 left over
        let mut hero = warrior();
        assert_eq!(gain_experience(&mut hero, 650).unwrap(), 3);
        assert_eq!(hero.level, 4);
        assert_eq!(hero.experience, 50);
        assert!(hero.experience < level_threshold(hero.level));
    }

    #[test]
    fn level_up_saturates_huge_stats() {
        let mut hero = warrior();
        hero.strength = u32::MAX;
        hero.magic = u32::MAX - 1;
        assert_eq!(gain_experience(&mut hero, 100).unwrap(), 1);
        assert_eq!(hero.level, 2);
        assert_eq!((hero.strength, hero.magic), (u32::MAX, u32::MAX));

        hero.level = u32::MAX;
        assert_eq!(gain_experience(&mut hero, u32::MAX).unwrap(), 1);
        assert_eq!(hero.level, u32::MAX);
        assert_eq!(hero.experience, 0);
    }

    #[test]
    fn level_up_restores_health() {
        let mut hero = warrior();
        hero.health.damage(100);
        gain_experience(&mut hero, 100).unwrap();
        assert_eq!(hero.health.current_hp(), hero.health.max_hp());
    }

    #[test]
    fn dead_character_gains_nothing() {
        let mut hero = warrior();
        hero.health.damage(500);
        let before = hero.clone();
        assert_eq!(
            gain_experience(&mut hero, 500),
            Err(GameError::CharacterDead("Hero".into()))
        );
        assert_eq!(hero, before);
    }

    #[test]
    fn gold_cannot_go_negative() {
        let mut hero = warrior();
        let gold = i32::try_from(hero.gold).unwrap();
        assert!(add_gold(&mut hero, -gold - 1).is_err());
        assert_eq!(hero.gold, 100);
        assert_eq!(add_gold(&mut hero, -gold), Ok(0));
        assert_eq!(add_gold(&mut hero, 35), Ok(35));
    }

    #[test]
    fn healing_is_capped_and_skips_the_dead() {
        let mut hero = warrior();
        hero.health.damage(10);
        assert_eq!(heal_character(&mut hero, 50), 10);
        assert_eq!(heal_character(&mut hero, 50), 0);

        hero.health.damage(1_000);
        assert!(is_dead(&hero));
        assert_eq!(heal_character(&mut hero, 50), 0);
        assert_eq!(hero.health.current_hp(), 0);
    }

    #[test]
    fn revive_only_works_on_the_dead() {
        let mut hero = warrior();
        assert!(!revive(&mut hero));
        hero.health.damage(1_000);
        assert!(revive(&mut hero));
        assert_eq!(hero.health.current_hp(), 60);
        assert!(!is_dead(&hero));
    }

    #[test]
    fn experience_to_next_level_counts_down() {
        let mut hero = warrior();
        assert_eq!(experience_to_next_level(&hero), 100);
        gain_experience(&mut hero, 40).unwrap();
        assert_eq!(experience_to_next_level(&hero), 60);
    }
}
