//! Enemy templates and per-encounter enemy instances.

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;
use crate::health::{HealthState, LivingEntity};

/// The three enemy tiers. Each encounter gets a fresh [`Enemy`] built from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyTier {
    Goblin,
    Orc,
    Dragon,
}

/// Fixed stats for an enemy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl EnemyTier {
    pub const ALL: [EnemyTier; 3] = [EnemyTier::Goblin, EnemyTier::Orc, EnemyTier::Dragon];

    pub fn template(self) -> EnemyTemplate {
        match self {
            EnemyTier::Goblin => EnemyTemplate {
                name: "Goblin",
                max_health: 50,
                strength: 8,
                magic: 2,
                xp_reward: 25,
                gold_reward: 10,
            },
            EnemyTier::Orc => EnemyTemplate {
                name: "Orc",
                max_health: 80,
                strength: 12,
                magic: 5,
                xp_reward: 50,
                gold_reward: 25,
            },
            EnemyTier::Dragon => EnemyTemplate {
                name: "Dragon",
                max_health: 200,
                strength: 25,
                magic: 15,
                xp_reward: 200,
                gold_reward: 100,
            },
        }
    }

    /// Tier matched to a character level: goblins to 2, orcs to 5, dragons beyond.
    pub fn for_level(level: u32) -> EnemyTier {
        match level {
            0..=2 => EnemyTier::Goblin,
            3..=5 => EnemyTier::Orc,
            _ => EnemyTier::Dragon,
        }
    }

    pub fn spawn(self) -> Enemy {
        let t = self.template();
        Enemy {
            tier: self,
            name: t.name.to_string(),
            health: HealthState::new_at_max(t.max_health),
            strength: t.strength,
            magic: t.magic,
            xp_reward: t.xp_reward,
            gold_reward: t.gold_reward,
        }
    }
}

impl fmt::Display for EnemyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template().name)
    }
}

impl FromStr for EnemyTier {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyTier::ALL
            .into_iter()
            .find(|tier| tier.template().name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidTarget(s.trim().to_string()))
    }
}

/// An enemy in a single encounter. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub tier: EnemyTier,
    pub name: String,
    pub health: HealthState,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl LivingEntity for Enemy {
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

/// Create an enemy by tier name (case-insensitive).
///
/// # Errors
/// - `InvalidTarget` if no tier has that name
pub fn create_enemy(name: &str) -> Result<Enemy, GameError> {
    Ok(name.parse::<EnemyTier>()?.spawn())
}

/// A fresh enemy suited to a character level.
pub fn enemy_for_level(level: u32) -> Enemy {
    EnemyTier::for_level(level).spawn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_level_bands() {
        assert_eq!(enemy_for_level(1).tier, EnemyTier::Goblin);
        assert_eq!(enemy_for_level(2).tier, EnemyTier::Goblin);
        assert_eq!(enemy_for_level(3).tier, EnemyTier::Orc);
        assert_eq!(enemy_for_level(5).tier, EnemyTier::Orc);
        assert_eq!(enemy_for_level(6).tier, EnemyTier::Dragon);
    }

    #[test]
    fn create_by_name_is_case_insensitive() {
        let orc = create_enemy("ORC").unwrap();
        assert_eq!(orc.name, "Orc");
        assert_eq!(orc.health.current_hp(), 80);
        assert_eq!((orc.strength, orc.magic, orc.xp_reward, orc.gold_reward), (12, 5, 50, 25));
        assert_eq!(create_enemy("troll"), Err(GameError::InvalidTarget("troll".into())));
    }

    #[test]
    fn encounters_do_not_share_state() {
        let mut first = create_enemy("goblin").unwrap();
        first.take_damage(30);
        let second = create_enemy("goblin").unwrap();
        assert_eq!(second.health.current_hp(), 50);
    }
}
