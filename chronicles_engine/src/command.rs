//! Command module
//!
//! Describes the commands available at the main prompt.
use variantly::Variantly;

use crate::inventory::Slot;

/// Which quests the `quests` command lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestFilter {
    Active,
    Available,
    Completed,
}

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum Command {
    Abandon(String),
    Accept(String),
    Buy(String),
    Chain(String),
    Complete(String),
    Delete(String),
    Equip(String),
    Explore,
    Help,
    Inventory,
    Load(String),
    New { name: String, class: String },
    Quests(QuestFilter),
    Quit,
    Revive,
    Save,
    Saves,
    Sell(String),
    Shop,
    Stats,
    Unequip(Slot),
    Unknown,
    UseItem(String),
}

/// Words offered for tab completion at the main prompt.
pub const COMMAND_WORDS: &[&str] = &[
    "abandon",
    "accept",
    "buy",
    "chain",
    "complete",
    "delete",
    "equip",
    "explore",
    "help",
    "inventory",
    "load",
    "new",
    "quests",
    "quit",
    "revive",
    "save",
    "saves",
    "sell",
    "shop",
    "stats",
    "unequip",
    "use",
];

/// Parses an input string and returns the corresponding `Command`.
///
/// Arguments naming a character, item or quest may span several words.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.trim().to_lowercase();
    let words: Vec<&str> = input.split_whitespace().collect();
    let verbs: Vec<&str> = lowered.split_whitespace().collect();
    let Some(verb) = verbs.first() else {
        return Command::Unknown;
    };
    let rest = words[1..].join(" ");

    match (*verb, &verbs[1..]) {
        ("new" | "create", [_, .., _]) => {
            let (class, name) = words[1..].split_last().map_or(("", &[][..]), |(c, n)| (*c, n));
            Command::New {
                name: name.join(" "),
                class: class.to_string(),
            }
        },
        ("load", [_, ..]) => Command::Load(rest),
        ("delete", [_, ..]) => Command::Delete(rest),
        ("saves" | "characters", []) => Command::Saves,
        ("save", []) => Command::Save,
        ("stats" | "status" | "sheet", []) => Command::Stats,
        ("inventory" | "inv" | "i", []) => Command::Inventory,
        ("use" | "drink" | "eat", [_, ..]) => Command::UseItem(rest),
        ("equip" | "wield" | "wear", [_, ..]) => Command::Equip(rest),
        ("unequip" | "remove", ["weapon"]) => Command::Unequip(Slot::Weapon),
        ("unequip" | "remove", ["armor" | "armour"]) => Command::Unequip(Slot::Armor),
        ("shop" | "store", []) => Command::Shop,
        ("buy" | "purchase", [_, ..]) => Command::Buy(rest),
        ("sell", [_, ..]) => Command::Sell(rest),
        ("quests" | "journal", [] | ["active"]) => Command::Quests(QuestFilter::Active),
        ("quests" | "journal", ["available"]) => Command::Quests(QuestFilter::Available),
        ("quests" | "journal", ["completed" | "done"]) => Command::Quests(QuestFilter::Completed),
        ("accept", [_, ..]) => Command::Accept(rest),
        ("complete" | "finish", [_, ..]) => Command::Complete(rest),
        ("abandon", [_, ..]) => Command::Abandon(rest),
        ("chain" | "prereqs", [_, ..]) => Command::Chain(rest),
        ("explore" | "fight" | "battle", []) => Command::Explore,
        ("revive", []) => Command::Revive,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => Command::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_takes_the_last_word_as_class() {
        assert_eq!(
            parse_command("new Sir Reginald warrior"),
            Command::New {
                name: "Sir Reginald".into(),
                class: "warrior".into()
            }
        );
        assert_eq!(parse_command("new Hero"), Command::Unknown);
    }

    #[test]
    fn arguments_keep_their_case() {
        assert_eq!(parse_command("load Ann"), Command::Load("Ann".into()));
        assert_eq!(parse_command("USE Health Potion"), Command::UseItem("Health Potion".into()));
    }

    #[test]
    fn quest_listing_filters() {
        assert_eq!(parse_command("quests"), Command::Quests(QuestFilter::Active));
        assert_eq!(parse_command("quests available"), Command::Quests(QuestFilter::Available));
        assert_eq!(parse_command("journal done"), Command::Quests(QuestFilter::Completed));
    }

    #[test]
    fn unequip_needs_a_slot() {
        assert_eq!(parse_command("unequip armor"), Command::Unequip(Slot::Armor));
        assert!(parse_command("unequip hat").is_unknown());
    }

    #[test]
    fn blank_and_stray_input_is_unknown() {
        assert_eq!(parse_command("   "), Command::Unknown);
        assert_eq!(parse_command("dance wildly"), Command::Unknown);
        assert_eq!(parse_command("save now"), Command::Unknown);
    }

    #[test]
    fn every_completion_word_parses_to_something() {
        for word in COMMAND_WORDS {
            let input = match *word {
                "new" => "new Hero mage".to_string(),
                "unequip" => "unequip weapon".to_string(),
                "load" | "delete" | "use" | "equip" | "buy" | "sell" | "accept" | "complete" | "abandon"
                | "chain" => format!("{word} thing"),
                other => other.to_string(),
            };
            assert!(!parse_command(&input).is_unknown(), "{input}");
        }
    }
}
