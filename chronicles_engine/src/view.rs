//! View module.
//!
//! Handlers never print directly. They push [`ViewItem`]s, and the REPL flushes
//! the view once per command (once per turn during a battle), rendering the
//! items grouped by [`Section`].
use colored::Colorize;
use textwrap::{Options, fill, termwidth};
use variantly::Variantly;

use crate::combat::BattleEvent;
use crate::helpers::plural_s;
use crate::quest::RewardSummary;
use crate::save_files::{SaveFileEntry, SaveFileStatus, format_modified};
use crate::style::GameStyle;

const ICON_SUCCESS: &str = "\u{2611}"; // ✔
const ICON_FAILURE: &str = "\u{274C}"; // ✖
const ICON_ERROR: &str = "⚠︎";
const ICON_HARMED: &str = "\u{2623}";
const ICON_HEALED: &str = "\u{2624}";
const ICON_DEATH: &str = "☠";
const ICON_CELEBRATE: &str = "🎉";

fn normal_block() -> Options<'static> {
    Options::new(termwidth()).initial_indent("").subsequent_indent("    ")
}

/// Collects output for one frame and renders it on [`View::flush`].
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewItem>,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// Items queued for `section`, in push order.
    pub fn section_items(&self, section: Section) -> Vec<&ViewItem> {
        self.items.iter().filter(|item| item.section() == section).collect()
    }

    /// Render everything queued and clear the frame.
    pub fn flush(&mut self) {
        self.width = termwidth();
        for section in Section::ORDER {
            let items = self.section_items(section);
            if items.is_empty() {
                continue;
            }
            println!("{:.>width$}\n", section.label().section_style(), width = self.width);
            for item in items {
                render(item);
            }
            println!();
        }
        self.items.clear();
    }
}

/// Subsections of the output, rendered in [`Section::ORDER`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    /// Blow-by-blow battle output.
    Battle,
    /// Direct results of the player's command.
    DirectResult,
    /// Character sheet, inventory, quest and shop listings.
    Status,
    /// Saves, help and other game-system feedback.
    System,
}

impl Section {
    pub const ORDER: [Section; 4] = [Section::Battle, Section::DirectResult, Section::Status, Section::System];

    fn label(self) -> &'static str {
        match self {
            Section::Battle => "battle",
            Section::DirectResult => "results",
            Section::Status => "status",
            Section::System => "game",
        }
    }
}

/// One row of the character sheet's equipment or the inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLine {
    pub item_id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopLine {
    pub item_id: String,
    pub name: String,
    pub kind: String,
    pub effect: String,
    pub cost: u32,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLine {
    pub quest_id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    pub name: String,
    pub class: String,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub experience: u32,
    pub to_next_level: u32,
    pub gold: u32,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub active_quests: usize,
    pub completed_quests: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine {
    pub command: String,
    pub description: String,
}

/// The kinds of information that may be shown to the player.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum ViewItem {
    ActionFailure(String),
    ActionSuccess(String),
    Battle(BattleEvent),
    CharacterDeath(String),
    CharacterSheet(CharacterSheet),
    EngineMessage(String),
    Error(String),
    GameLoaded {
        name: String,
        path: String,
    },
    GameSaved {
        name: String,
        path: String,
    },
    Help(Vec<HelpLine>),
    Inventory {
        lines: Vec<InventoryLine>,
        space_remaining: usize,
    },
    LevelUp {
        name: String,
        level: u32,
    },
    PrerequisiteChain {
        quest: String,
        chain: Vec<String>,
    },
    QuestCompleted {
        title: String,
        xp: u32,
        gold: u32,
    },
    QuestList {
        heading: String,
        quests: Vec<QuestLine>,
    },
    QuestProgress {
        percentage: f64,
        rewards: RewardSummary,
    },
    Rewards {
        xp: u32,
        gold: u32,
    },
    SavedGamesList {
        directory: String,
        entries: Vec<SaveFileEntry>,
    },
    Shop {
        gold: u32,
        lines: Vec<ShopLine>,
    },
}

impl ViewItem {
    /// Classify a view item into a top-level output section.
    pub fn section(&self) -> Section {
        match self {
            ViewItem::Battle(_) => Section::Battle,
            ViewItem::ActionFailure(_)
            | ViewItem::ActionSuccess(_)
            | ViewItem::CharacterDeath(_)
            | ViewItem::Error(_)
            | ViewItem::LevelUp { .. }
            | ViewItem::QuestCompleted { .. }
            | ViewItem::Rewards { .. } => Section::DirectResult,
            ViewItem::CharacterSheet(_)
            | ViewItem::Inventory { .. }
            | ViewItem::PrerequisiteChain { .. }
            | ViewItem::QuestList { .. }
            | ViewItem::QuestProgress { .. }
            | ViewItem::Shop { .. } => Section::Status,
            ViewItem::EngineMessage(_)
            | ViewItem::GameLoaded { .. }
            | ViewItem::GameSaved { .. }
            | ViewItem::Help(_)
            | ViewItem::SavedGamesList { .. } => Section::System,
        }
    }
}

fn wrapped(text: &str) {
    println!("{}", fill(text, normal_block()));
}

fn render(item: &ViewItem) {
    match item {
        ViewItem::ActionSuccess(msg) => wrapped(&format!("{} {msg}", ICON_SUCCESS.bright_green())),
        ViewItem::ActionFailure(msg) => wrapped(&format!("{} {msg}", ICON_FAILURE.bright_red())),
        ViewItem::Error(msg) => wrapped(&format!("{:<4}{}", ICON_ERROR.error_style(), msg)),
        ViewItem::EngineMessage(msg) => wrapped(&msg.description_style().to_string()),
        ViewItem::Battle(event) => battle_event(event),
        ViewItem::CharacterDeath(name) => println!(
            "{:<4}{} has fallen. Type {} to return.",
            ICON_DEATH.bright_red(),
            name.character_style(),
            "revive".bold()
        ),
        ViewItem::LevelUp { name, level } => println!(
            "{} {} reached {}!",
            ICON_CELEBRATE,
            name.character_style(),
            format!("level {level}").xp_style()
        ),
        ViewItem::QuestCompleted { title, xp, gold } => println!(
            "{} Quest {} completed: +{} +{}",
            ICON_SUCCESS.bright_green(),
            title.quest_style(),
            format!("{xp} XP").xp_style(),
            format!("{gold} gold").gold_style()
        ),
        ViewItem::Rewards { xp, gold } => println!(
            "Spoils: +{} +{}",
            format!("{xp} XP").xp_style(),
            format!("{gold} gold").gold_style()
        ),
        ViewItem::CharacterSheet(sheet) => character_sheet(sheet),
        ViewItem::Inventory { lines, space_remaining } => inventory(lines, *space_remaining),
        ViewItem::Shop { gold, lines } => shop(*gold, lines),
        ViewItem::QuestList { heading, quests } => quest_list(heading, quests),
        ViewItem::QuestProgress { percentage, rewards } => println!(
            "Progress: {percentage:.1}% of all quests | {} completed for {} and {}",
            rewards.quests,
            format!("{} XP", rewards.total_xp).xp_style(),
            format!("{} gold", rewards.total_gold).gold_style()
        ),
        ViewItem::PrerequisiteChain { quest, chain } => {
            if chain.is_empty() {
                println!("{} has no prerequisites.", quest.quest_style());
            } else {
                let steps: Vec<String> = chain.iter().map(|id| id.quest_style().to_string()).collect();
                println!("{} -> {}", steps.join(" -> "), quest.quest_style());
            }
        },
        ViewItem::GameSaved { name, path } => {
            println!("{}: \"{}\" ({})", "Game Saved".green().bold(), name, path);
        },
        ViewItem::GameLoaded { name, path } => {
            println!("{}: \"{}\" ({})", "Game Loaded".green().bold(), name, path);
        },
        ViewItem::SavedGamesList { directory, entries } => saved_games(directory, entries),
        ViewItem::Help(lines) => {
            println!("{}", "Commands:".bold().yellow());
            println!();
            for line in lines {
                wrapped(&format!("{} - {}", line.command.bold().green(), line.description.italic()));
            }
        },
    }
}

fn battle_event(event: &BattleEvent) {
    match event {
        BattleEvent::Started { character, enemy } => println!(
            "{} faces a {}!",
            character.character_style(),
            enemy.enemy_style()
        ),
        BattleEvent::Hit {
            attacker,
            target,
            damage,
            target_hp,
        } => println!(
            "{:<4}{} hits {} for {} ({} hp left)",
            ICON_HARMED.bright_yellow(),
            attacker.as_str().bold(),
            target.as_str().bold(),
            damage.to_string().damage_style(),
            target_hp
        ),
        BattleEvent::Special {
            ability,
            damage,
            critical,
            enemy_hp,
        } => {
            let label = if *critical {
                format!("{}!", ability.name().to_uppercase())
            } else {
                format!("{ability}!")
            };
            println!(
                "{:<4}{} Dealt {} damage ({} hp left)",
                ICON_HARMED.bright_yellow(),
                label.success_style(),
                damage.to_string().damage_style(),
                enemy_hp
            );
        },
        BattleEvent::Healed { amount, hp } => println!(
            "{:<4}Heal! Restored {} ({} hp)",
            ICON_HEALED.bright_green(),
            format!("+{amount}").health_style(),
            hp
        ),
        BattleEvent::FleeFailed => println!("{}", "You fail to escape!".denied_style()),
        BattleEvent::Escaped => println!("{}", "You escaped safely!".success_style()),
        BattleEvent::TurnForfeited { input } => println!(
            "{}",
            format!("\"{input}\" is not a battle action; you miss your turn!").denied_style()
        ),
        BattleEvent::Victory { enemy, xp, gold } => println!(
            "{} Victory! {} was defeated. (+{} +{})",
            ICON_CELEBRATE,
            enemy.enemy_style(),
            format!("{xp} XP").xp_style(),
            format!("{gold} gold").gold_style()
        ),
        BattleEvent::Defeat { enemy } => println!(
            "{:<4}{}",
            ICON_DEATH.bright_red(),
            format!("Defeat! The {enemy} has bested you.").error_style()
        ),
    }
}

fn character_sheet(sheet: &CharacterSheet) {
    println!(
        "{} the {} (level {})",
        sheet.name.character_style(),
        sheet.class.subheading_style(),
        sheet.level
    );
    println!(
        "  {:<12}{}",
        "Health:",
        format!("{}/{}", sheet.health, sheet.max_health).health_style()
    );
    println!("  {:<12}{}", "Strength:", sheet.strength);
    println!("  {:<12}{}", "Magic:", sheet.magic);
    println!(
        "  {:<12}{} ({} to next level)",
        "Experience:",
        sheet.experience.to_string().xp_style(),
        sheet.to_next_level
    );
    println!("  {:<12}{}", "Gold:", sheet.gold.to_string().gold_style());
    let slot = |item: &Option<String>| item.as_deref().map_or_else(|| "none".dimmed(), |name| name.item_style());
    println!("  {:<12}{}", "Weapon:", slot(&sheet.weapon));
    println!("  {:<12}{}", "Armor:", slot(&sheet.armor));
    println!(
        "  {:<12}{} active, {} completed",
        "Quests:", sheet.active_quests, sheet.completed_quests
    );
}

fn inventory(lines: &[InventoryLine], space_remaining: usize) {
    println!("{}:", "Inventory".subheading_style());
    if lines.is_empty() {
        println!("   {}", "Your pack is empty.".italic().dimmed());
    } else {
        for line in lines {
            let count = if line.count > 1 {
                format!(" x{}", line.count)
            } else {
                String::new()
            };
            println!("   {}{} {}", line.name.item_style(), count, format!("({})", line.item_id).dimmed());
        }
    }
    println!(
        "   {}",
        format!("{space_remaining} free slot{}", plural_s(space_remaining)).dimmed()
    );
}

fn shop(gold: u32, lines: &[ShopLine]) {
    println!(
        "{} (you have {})",
        "Shop".subheading_style(),
        format!("{gold} gold").gold_style()
    );
    for line in lines {
        let price = format!("{:>5}g", line.cost);
        let price = if line.affordable { price.gold_style() } else { price.dimmed() };
        println!(
            "  {} {} [{}] {}  {}",
            price,
            line.name.item_style(),
            line.kind,
            line.effect.as_str().italic(),
            format!("buy {}", line.item_id).dimmed()
        );
    }
}

fn quest_list(heading: &str, quests: &[QuestLine]) {
    println!("{}:", heading.subheading_style());
    if quests.is_empty() {
        println!("   {}", "None.".italic().dimmed());
        return;
    }
    for quest in quests {
        println!(
            "   {} {} (level {}, {} / {})",
            quest.title.quest_style(),
            format!("[{}]", quest.quest_id).dimmed(),
            quest.required_level,
            format!("{} XP", quest.reward_xp).xp_style(),
            format!("{} gold", quest.reward_gold).gold_style()
        );
        if !quest.description.is_empty() {
            println!("      {}", quest.description.description_style());
        }
    }
}

fn saved_games(directory: &str, entries: &[SaveFileEntry]) {
    println!("{}", format!("Saved characters in {directory}/").subheading_style());
    if entries.is_empty() {
        println!(
            "    {}",
            "No saved characters found. Use `new <name> <class>` to create one.".italic()
        );
        return;
    }
    for entry in entries {
        let saved = entry
            .modified
            .map(|modified| format!(" - saved {}", format_modified(modified)))
            .unwrap_or_default();
        println!("  • {}{}", entry.slot.character_style(), saved.dimmed());
        if let Some(summary) = &entry.summary {
            println!(
                "    {} level {} | {} | {} quest{} completed",
                summary.class,
                summary.level,
                format!("{} gold", summary.gold).gold_style(),
                summary.completed_quests,
                plural_s(summary.completed_quests)
            );
        }
        match &entry.status {
            SaveFileStatus::Ready => println!("    {}", format!("load {}", entry.slot).dimmed()),
            SaveFileStatus::Corrupted { message } => println!("    {} {}", "Error:".bold().red(), message.red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_are_binned_by_section_in_push_order() {
        let mut view = View::new();
        view.push(ViewItem::ActionSuccess("first".into()));
        view.push(ViewItem::EngineMessage("system".into()));
        view.push(ViewItem::Battle(BattleEvent::Escaped));
        view.push(ViewItem::Error("second".into()));

        let direct = view.section_items(Section::DirectResult);
        assert_eq!(direct.len(), 2);
        assert!(direct[0].is_action_success());
        assert!(direct[1].is_error());
        assert_eq!(view.section_items(Section::Battle).len(), 1);
        assert!(view.section_items(Section::Status).is_empty());
    }

    #[test]
    fn flush_clears_the_frame() {
        let mut view = View::new();
        view.push(ViewItem::LevelUp {
            name: "Hero".into(),
            level: 2,
        });
        view.flush();
        assert!(view.items.is_empty());
    }
}
