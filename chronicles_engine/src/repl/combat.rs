//! `repl::combat` module
//!
//! The `explore` command: meet an enemy suited to the character's level and
//! fight it turn by turn at a battle prompt.

use std::io;

use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::combat::{Battle, BattleStatus, Chance, PlayerAction, RandomChance, Winner, apply_rewards, enemy_for_level};
use crate::health::LivingEntity;
use crate::repl::input::{InputEvent, InputManager};
use crate::repl::living_character;
use crate::session::Session;
use crate::view::{View, ViewItem};

/// Explore until something attacks, then fight it out.
///
/// # Errors
/// - if reading the battle prompt fails
pub fn explore_handler(session: &mut Session, view: &mut View, input: &mut InputManager) -> Result<()> {
    explore_with(session, view, RandomChance, |prompt| input.read_line(prompt))
}

/// Run one exploration encounter with the given chance source and line reader.
///
/// The view is flushed after every turn so the player sees the fight unfold.
/// Ending input (EOF or Ctrl-C) at the battle prompt counts as an attempt to flee.
///
/// # Errors
/// - if `read_line` fails
pub fn explore_with<C, R>(session: &mut Session, view: &mut View, chance: C, mut read_line: R) -> Result<()>
where
    C: Chance,
    R: FnMut(&str) -> io::Result<InputEvent>,
{
    let Some((character, _)) = living_character(session, view) else {
        return Ok(());
    };
    let enemy = enemy_for_level(character.level);
    info!("{} (level {}) encounters a {}", character.name, character.level, enemy.name);
    view.push(ViewItem::EngineMessage(format!(
        "You venture out of town. A {} blocks the path!",
        enemy.name
    )));

    let mut battle = Battle::new(character, enemy, chance)?;
    view.push(ViewItem::Battle(battle.start()?));
    view.flush();

    while battle.status() == BattleStatus::Ongoing {
        let prompt = battle_prompt(battle.character(), battle.enemy());
        let action = match read_line(&prompt)? {
            InputEvent::Line(line) => PlayerAction::parse(&line),
            InputEvent::Eof | InputEvent::Interrupted => PlayerAction::Flee,
        };
        let report = battle.take_turn(&action)?;
        for event in report.events {
            view.push(ViewItem::Battle(event));
        }
        if !report.status.is_over() {
            view.flush();
        }
    }

    let Some(result) = battle.result() else {
        return Ok(());
    };
    let turns = battle.turns();
    drop(battle);
    let Some((character, _)) = session.parts_mut() else {
        return Ok(());
    };
    info!("battle over after {turns} turn(s): {:?}", result.winner);

    match result.winner {
        Some(Winner::Player) => {
            let levels = apply_rewards(character, &result)?;
            view.push(ViewItem::Rewards {
                xp: result.xp_gained,
                gold: result.gold_gained,
            });
            if levels > 0 {
                view.push(ViewItem::LevelUp {
                    name: character.name.clone(),
                    level: character.level,
                });
            }
        },
        Some(Winner::Enemy) => view.push(ViewItem::CharacterDeath(character.name.clone())),
        None => view.push(ViewItem::EngineMessage("You make it back to town.".to_string())),
    }
    Ok(())
}

fn battle_prompt(character: &impl LivingEntity, enemy: &impl LivingEntity) -> String {
    format!(
        "{} {}/{} hp vs {} {}/{} hp\n  1) attack  2) special  3) flee\n[battle]>> ",
        character.name(),
        character.health().current_hp(),
        character.health().max_hp(),
        enemy.name(),
        enemy.health().current_hp(),
        enemy.health().max_hp()
    )
    .bright_red()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::create_character;
    use crate::combat::BattleEvent;
    use crate::config::GameConfig;
    use chronicles_data::Catalog;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<bool>);

    impl Chance for Scripted {
        fn coin_flip(&mut self) -> bool {
            self.0.pop_front().unwrap_or(false)
        }
    }

    fn lines(inputs: &[&str]) -> impl FnMut(&str) -> io::Result<InputEvent> {
        let mut queue: VecDeque<InputEvent> = inputs.iter().map(|s| InputEvent::Line((*s).to_string())).collect();
        move |_| Ok(queue.pop_front().unwrap_or(InputEvent::Eof))
    }

    fn session_with(class: &str) -> Result<Session> {
        let mut session = Session::new(Catalog::default(), GameConfig::default());
        session.begin(create_character("Hero", class)?);
        Ok(session)
    }

    #[test]
    fn warrior_beats_a_goblin_and_collects() -> Result<()> {
        let mut session = session_with("Warrior")?;
        let mut view = View::new();
        explore_with(&mut session, &mut view, Scripted(VecDeque::new()), lines(&["attack"; 4]))?;

        let hero = session.character.as_ref().expect("loaded");
        assert_eq!(hero.experience, 25);
        assert_eq!(hero.gold, 110);
        assert_eq!(hero.health.current_hp(), 105);
        assert!(view.items.iter().any(|item| *item == ViewItem::Rewards { xp: 25, gold: 10 }));
        Ok(())
    }

    #[test]
    fn eof_at_the_battle_prompt_flees() -> Result<()> {
        let mut session = session_with("Mage")?;
        let mut view = View::new();
        explore_with(&mut session, &mut view, Scripted(VecDeque::from([true])), lines(&[]))?;

        assert!(
            view.items
                .iter()
                .any(|item| matches!(item, ViewItem::Battle(BattleEvent::Escaped)))
        );
        assert_eq!(session.character.as_ref().map(|c| c.experience), Some(0));
        Ok(())
    }

    #[test]
    fn dead_characters_stay_in_town() -> Result<()> {
        let mut session = session_with("Rogue")?;
        if let Some(hero) = session.character.as_mut() {
            hero.health.damage(1_000);
        }
        let mut view = View::new();
        explore_with(&mut session, &mut view, Scripted(VecDeque::new()), lines(&["attack"]))?;
        assert!(view.items[0].is_action_failure());
        Ok(())
    }

    #[test]
    fn losing_reports_death() -> Result<()> {
        let mut session = session_with("Mage")?;
        if let Some(hero) = session.character.as_mut() {
            hero.health.set_current(1);
        }
        let mut view = View::new();
        explore_with(&mut session, &mut view, Scripted(VecDeque::new()), lines(&["dance"]))?;
        assert!(view.items.iter().any(ViewItem::is_character_death));
        assert!(session.require_alive().is_err());
        Ok(())
    }
}
