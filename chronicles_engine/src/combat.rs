//! Combat engine.
//!
//! A [`Battle`] pits a character against one freshly spawned [`Enemy`]. It is
//! pending until [`Battle::start`], then advances one [`Battle::take_turn`] at
//! a time until one side drops to zero health or the player escapes. Each turn
//! returns the [`BattleEvent`]s it produced so the caller can render them.
//!
//! Coin flips (fleeing, rogue criticals) come from a [`Chance`] source so a
//! battle can be replayed exactly in tests.

pub mod ability;
pub mod enemy;

pub use ability::{CLERIC_HEAL, SpecialAbility};
pub use enemy::{Enemy, EnemyTemplate, EnemyTier, create_enemy, enemy_for_level};

use log::info;

use crate::character::Character;
use crate::error::GameError;
use crate::health::LivingEntity;
use crate::progression;

/// Source of 50/50 outcomes.
pub trait Chance {
    /// Returns true on success.
    fn coin_flip(&mut self) -> bool;
}

/// Thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChance;

impl Chance for RandomChance {
    fn coin_flip(&mut self) -> bool {
        rand::random_bool(0.5)
    }
}

impl<C: Chance + ?Sized> Chance for &mut C {
    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

/// What the player chose to do this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Special,
    Flee,
    /// Unrecognized input. Costs the turn.
    Invalid(String),
}

impl PlayerAction {
    /// Interpret battle-prompt input. Never fails; unknown input becomes `Invalid`.
    pub fn parse(input: &str) -> PlayerAction {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "a" | "attack" => PlayerAction::Attack,
            "2" | "s" | "special" => PlayerAction::Special,
            "3" | "f" | "flee" | "run" => PlayerAction::Flee,
            other => PlayerAction::Invalid(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    Ongoing,
    PlayerWon,
    EnemyWon,
    Escaped,
}

impl BattleStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, BattleStatus::Ongoing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BattleState {
    Pending,
    Active,
    Resolved(BattleStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player,
    Enemy,
}

/// Outcome of a finished battle. Rewards are non-zero only for a player win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleResult {
    pub winner: Option<Winner>,
    pub xp_gained: u32,
    pub gold_gained: u32,
}

/// Something that happened during a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    Started {
        character: String,
        enemy: String,
    },
    Hit {
        attacker: String,
        target: String,
        damage: u32,
        target_hp: u32,
    },
    Special {
        ability: SpecialAbility,
        damage: u32,
        critical: bool,
        enemy_hp: u32,
    },
    Healed {
        amount: u32,
        hp: u32,
    },
    FleeFailed,
    Escaped,
    TurnForfeited {
        input: String,
    },
    Victory {
        enemy: String,
        xp: u32,
        gold: u32,
    },
    Defeat {
        enemy: String,
    },
}

/// Events from one turn and where the battle stands afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub events: Vec<BattleEvent>,
    pub status: BattleStatus,
}

/// Basic attack damage: attacker strength less a quarter of the defender's, at least 1.
pub fn calculate_damage(attacker: &impl LivingEntity, defender: &impl LivingEntity) -> u32 {
    attacker
        .strength()
        .saturating_sub(defender.strength() / 4)
        .max(1)
}

pub fn can_character_fight(character: &Character) -> bool {
    !character.is_dead()
}

pub fn victory_rewards(enemy: &Enemy) -> BattleResult {
    BattleResult {
        winner: Some(Winner::Player),
        xp_gained: enemy.xp_reward,
        gold_gained: enemy.gold_reward,
    }
}

/// Feed a battle's rewards into progression. Returns the levels gained.
///
/// # Errors
/// - `CharacterDead` if the character has no health left
pub fn apply_rewards(character: &mut Character, result: &BattleResult) -> Result<u32, GameError> {
    if result.winner != Some(Winner::Player) {
        return Ok(0);
    }
    let levels = progression::gain_experience(character, result.xp_gained)?;
    character.gold = character.gold.saturating_add(result.gold_gained);
    Ok(levels)
}

/// One fight between a character and an enemy.
pub struct Battle<'a, C: Chance> {
    character: &'a mut Character,
    enemy: Enemy,
    chance: C,
    state: BattleState,
    turns: u32,
}

impl<'a, C: Chance> Battle<'a, C> {
    /// Set up a pending battle.
    ///
    /// # Errors
    /// - `CharacterDead` if the character cannot fight
    pub fn new(character: &'a mut Character, enemy: Enemy, chance: C) -> Result<Self, GameError> {
        if !can_character_fight(character) {
            return Err(GameError::CharacterDead(character.name.clone()));
        }
        Ok(Battle {
            character,
            enemy,
            chance,
            state: BattleState::Pending,
            turns: 0,
        })
    }

    /// Move from pending to active.
    ///
    /// # Errors
    /// - `CombatNotActive` if the battle was already started
    pub fn start(&mut self) -> Result<BattleEvent, GameError> {
        if self.state != BattleState::Pending {
            return Err(GameError::CombatNotActive);
        }
        self.state = BattleState::Active;
        info!("battle started: {} vs {}", self.character.name, self.enemy.name);
        Ok(BattleEvent::Started {
            character: self.character.name.clone(),
            enemy: self.enemy.name.clone(),
        })
    }

    pub fn character(&self) -> &Character {
        self.character
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn status(&self) -> BattleStatus {
        match self.state {
            BattleState::Pending | BattleState::Active => BattleStatus::Ongoing,
            BattleState::Resolved(status) => status,
        }
    }

    /// The outcome, once the battle is resolved.
    pub fn result(&self) -> Option<BattleResult> {
        match self.state {
            BattleState::Resolved(BattleStatus::PlayerWon) => Some(victory_rewards(&self.enemy)),
            BattleState::Resolved(BattleStatus::EnemyWon) => Some(BattleResult {
                winner: Some(Winner::Enemy),
                xp_gained: 0,
                gold_gained: 0,
            }),
            BattleState::Resolved(_) => Some(BattleResult {
                winner: None,
                xp_gained: 0,
                gold_gained: 0,
            }),
            BattleState::Pending | BattleState::Active => None,
        }
    }

    /// Play the player's action, then the enemy's reply if the fight goes on.
    ///
    /// # Errors
    /// - `CombatNotActive` if the battle is pending or already resolved
    pub fn take_turn(&mut self, action: &PlayerAction) -> Result<TurnReport, GameError> {
        if self.state != BattleState::Active {
            return Err(GameError::CombatNotActive);
        }
        self.turns += 1;
        let mut events = Vec::new();

        match action {
            PlayerAction::Attack => {
                let damage = calculate_damage(&*self.character, &self.enemy);
                self.enemy.take_damage(damage);
                events.push(BattleEvent::Hit {
                    attacker: self.character.name.clone(),
                    target: self.enemy.name.clone(),
                    damage,
                    target_hp: self.enemy.health.current_hp(),
                });
            },
            PlayerAction::Special => events.push(self.use_special_ability()),
            PlayerAction::Flee => {
                if self.chance.coin_flip() {
                    events.push(BattleEvent::Escaped);
                    return Ok(self.resolve(BattleStatus::Escaped, events));
                }
                events.push(BattleEvent::FleeFailed);
            },
            PlayerAction::Invalid(input) => events.push(BattleEvent::TurnForfeited { input: input.clone() }),
        }

        if self.enemy.is_dead() {
            let rewards = victory_rewards(&self.enemy);
            events.push(BattleEvent::Victory {
                enemy: self.enemy.name.clone(),
                xp: rewards.xp_gained,
                gold: rewards.gold_gained,
            });
            return Ok(self.resolve(BattleStatus::PlayerWon, events));
        }

        let damage = calculate_damage(&self.enemy, &*self.character);
        self.character.take_damage(damage);
        events.push(BattleEvent::Hit {
            attacker: self.enemy.name.clone(),
            target: self.character.name.clone(),
            damage,
            target_hp: self.character.health.current_hp(),
        });

        if self.character.is_dead() {
            events.push(BattleEvent::Defeat {
                enemy: self.enemy.name.clone(),
            });
            return Ok(self.resolve(BattleStatus::EnemyWon, events));
        }

        Ok(TurnReport {
            events,
            status: BattleStatus::Ongoing,
        })
    }

    fn use_special_ability(&mut self) -> BattleEvent {
        let ability = self.character.class.special_ability();
        let (damage, critical) = match ability {
            SpecialAbility::PowerStrike => (self.character.strength.saturating_mul(2), false),
            SpecialAbility::Fireball => (self.character.magic.saturating_mul(2), false),
            SpecialAbility::CriticalStrike => {
                if self.chance.coin_flip() {
                    (self.character.strength.saturating_mul(3), true)
                } else {
                    (self.character.strength, false)
                }
            },
            SpecialAbility::Heal => {
                let amount = self.character.health.heal(CLERIC_HEAL);
                return BattleEvent::Healed {
                    amount,
                    hp: self.character.health.current_hp(),
                };
            },
        };
        self.enemy.take_damage(damage);
        BattleEvent::Special {
            ability,
            damage,
            critical,
            enemy_hp: self.enemy.health.current_hp(),
        }
    }

    fn resolve(&mut self, status: BattleStatus, events: Vec<BattleEvent>) -> TurnReport {
        self.state = BattleState::Resolved(status);
        info!(
            "battle resolved after {} turn(s): {} vs {} -> {status:?}",
            self.turns, self.character.name, self.enemy.name
        );
        TurnReport { events, status }
    }
}

/// Drive a battle to resolution.
///
/// `next_action` is asked for the player's move each turn; `on_event` sees
/// every event, starting with [`BattleEvent::Started`]. Rewards are returned,
/// not applied; pass them to [`apply_rewards`].
///
/// # Errors
/// - `CharacterDead` if the character cannot fight
pub fn run_battle<C, A, E>(
    character: &mut Character,
    enemy: Enemy,
    chance: C,
    mut next_action: A,
    mut on_event: E,
) -> Result<BattleResult, GameError>
where
    C: Chance,
    A: FnMut(&Character, &Enemy) -> PlayerAction,
    E: FnMut(&BattleEvent),
{
    let mut battle = Battle::new(character, enemy, chance)?;
    on_event(&battle.start()?);
    loop {
        let action = next_action(battle.character(), battle.enemy());
        let report = battle.take_turn(&action)?;
        report.events.iter().for_each(&mut on_event);
        if report.status.is_over() {
            break;
        }
    }
    battle.result().ok_or(GameError::CombatNotActive)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::character::CharacterClass;

    /// Replays a fixed list of coin flips, then fails every flip.
    struct Scripted(VecDeque<bool>);

    impl Scripted {
        fn new(flips: &[bool]) -> Self {
            Scripted(flips.iter().copied().collect())
        }
    }

    impl Chance for Scripted {
        fn coin_flip(&mut self) -> bool {
            self.0.pop_front().unwrap_or(false)
        }
    }

    fn hero(class: CharacterClass) -> Character {
        Character::new("Hero", class).unwrap()
    }

    #[test]
    fn damage_is_never_below_one() {
        let mut weak = hero(CharacterClass::Mage);
        weak.strength = 1;
        let mut strong = create_enemy("dragon").unwrap();
        strong.strength = 100;
        assert_eq!(calculate_damage(&weak, &strong), 1);
        assert_eq!(calculate_damage(&hero(CharacterClass::Warrior), &create_enemy("goblin").unwrap()), 13);
    }

    #[test]
    fn warrior_beats_goblin_in_four_hits() {
        let mut h = hero(CharacterClass::Warrior);
        let goblin = create_enemy("goblin").unwrap();
        let mut hits = 0;
        let result = run_battle(
            &mut h,
            goblin,
            Scripted::new(&[]),
            |_, _| {
                hits += 1;
                PlayerAction::Attack
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(hits, 4);
        assert_eq!(
            result,
            BattleResult {
                winner: Some(Winner::Player),
                xp_gained: 25,
                gold_gained: 10
            }
        );
        // goblin hits back for 8 - 15/4 = 5 on each of the first three turns
        assert_eq!(h.health.current_hp(), 105);
    }

    #[test]
    fn dead_character_cannot_start() {
        let mut h = hero(CharacterClass::Rogue);
        h.health.damage(1_000);
        assert!(matches!(
            Battle::new(&mut h, create_enemy("goblin").unwrap(), RandomChance),
            Err(GameError::CharacterDead(_))
        ));
    }

    #[test]
    fn turns_need_an_active_battle() {
        let mut h = hero(CharacterClass::Warrior);
        let mut battle = Battle::new(&mut h, create_enemy("goblin").unwrap(), Scripted::new(&[true])).unwrap();
        assert_eq!(battle.take_turn(&PlayerAction::Attack), Err(GameError::CombatNotActive));
        battle.start().unwrap();
        assert_eq!(battle.start(), Err(GameError::CombatNotActive));

        let report = battle.take_turn(&PlayerAction::Flee).unwrap();
        assert_eq!(report.status, BattleStatus::Escaped);
        assert_eq!(report.events, vec![BattleEvent::Escaped]);
        assert_eq!(battle.take_turn(&PlayerAction::Attack), Err(GameError::CombatNotActive));
        assert_eq!(
            battle.result(),
            Some(BattleResult {
                winner: None,
                xp_gained: 0,
                gold_gained: 0
            })
        );
    }

    #[test]
    fn failed_flee_and_bad_input_still_let_the_enemy_act() {
        let mut h = hero(CharacterClass::Warrior);
        let mut battle = Battle::new(&mut h, create_enemy("goblin").unwrap(), Scripted::new(&[false])).unwrap();
        battle.start().unwrap();

        let report = battle.take_turn(&PlayerAction::Flee).unwrap();
        assert_eq!(report.events[0], BattleEvent::FleeFailed);
        assert_eq!(report.status, BattleStatus::Ongoing);

        let report = battle.take_turn(&PlayerAction::parse("dance")).unwrap();
        assert_eq!(report.events[0], BattleEvent::TurnForfeited { input: "dance".into() });
        assert_eq!(battle.enemy().health.current_hp(), 50);
        assert_eq!(battle.character().health.current_hp(), 110);
    }

    #[test]
    fn specials_follow_class() {
        let mut warrior = hero(CharacterClass::Warrior);
        let mut battle = Battle::new(&mut warrior, create_enemy("dragon").unwrap(), Scripted::new(&[])).unwrap();
        battle.start().unwrap();
        battle.take_turn(&PlayerAction::Special).unwrap();
        assert_eq!(battle.enemy().health.current_hp(), 170);

        let mut mage = hero(CharacterClass::Mage);
        let mut battle = Battle::new(&mut mage, create_enemy("dragon").unwrap(), Scripted::new(&[])).unwrap();
        battle.start().unwrap();
        battle.take_turn(&PlayerAction::Special).unwrap();
        assert_eq!(battle.enemy().health.current_hp(), 160);
    }

    #[test]
    fn specials_saturate_instead_of_overflowing() {
        let mut warrior = hero(CharacterClass::Warrior);
        warrior.strength = 3_000_000_000;
        let mut battle = Battle::new(&mut warrior, create_enemy("dragon").unwrap(), Scripted::new(&[])).unwrap();
        battle.start().unwrap();
        let report = battle.take_turn(&PlayerAction::Special).unwrap();
        assert!(matches!(report.events[0], BattleEvent::Special { damage: u32::MAX, .. }));
        assert_eq!(report.status, BattleStatus::PlayerWon);

        let mut rogue = hero(CharacterClass::Rogue);
        rogue.strength = u32::MAX;
        let mut battle = Battle::new(&mut rogue, create_enemy("orc").unwrap(), Scripted::new(&[true])).unwrap();
        battle.start().unwrap();
        let report = battle.take_turn(&PlayerAction::Special).unwrap();
        assert!(matches!(
            report.events[0],
            BattleEvent::Special {
                damage: u32::MAX,
                critical: true,
                ..
            }
        ));
    }

    #[test]
    fn rogue_critical_depends_on_the_flip() {
        let mut rogue = hero(CharacterClass::Rogue);
        let mut battle = Battle::new(&mut rogue, create_enemy("dragon").unwrap(), Scripted::new(&[true, false])).unwrap();
        battle.start().unwrap();

        let report = battle.take_turn(&PlayerAction::Special).unwrap();
        assert!(matches!(
            report.events[0],
            BattleEvent::Special {
                damage: 36,
                critical: true,
                ..
            }
        ));
        let report = battle.take_turn(&PlayerAction::Special).unwrap();
        assert!(matches!(
            report.events[0],
            BattleEvent::Special {
                damage: 12,
                critical: false,
                ..
            }
        ));
    }

    #[test]
    fn cleric_heal_is_capped_and_deals_no_damage() {
        let mut cleric = hero(CharacterClass::Cleric);
        cleric.health.damage(10);
        let mut battle = Battle::new(&mut cleric, create_enemy("goblin").unwrap(), Scripted::new(&[])).unwrap();
        battle.start().unwrap();
        let report = battle.take_turn(&PlayerAction::Special).unwrap();
        assert_eq!(report.events[0], BattleEvent::Healed { amount: 10, hp: 100 });
        assert_eq!(battle.enemy().health.current_hp(), 50);
    }

    #[test]
    fn losing_gives_nothing() {
        let mut h = hero(CharacterClass::Mage);
        let result = run_battle(
            &mut h,
            create_enemy("dragon").unwrap(),
            Scripted::new(&[]),
            |_, _| PlayerAction::Attack,
            |_| {},
        )
        .unwrap();
        assert_eq!(result.winner, Some(Winner::Enemy));
        assert_eq!((result.xp_gained, result.gold_gained), (0, 0));
        assert_eq!(h.health.current_hp(), 0);
        assert_eq!(apply_rewards(&mut h, &result), Ok(0));
    }

    #[test]
    fn rewards_flow_into_progression() {
        let mut h = hero(CharacterClass::Warrior);
        let result = victory_rewards(&create_enemy("dragon").unwrap());
        assert_eq!(apply_rewards(&mut h, &result), Ok(1));
        assert_eq!(h.gold, 200);
        assert_eq!(h.experience, 100);
    }
}
