//! Character save files.
//!
//! Each character is stored as `<name>_save.txt` in the save directory, one
//! `KEY: value` pair per line, with list fields comma-separated. Loading is
//! lenient about layout (unknown keys and lines without a colon are skipped)
//! but strict about content: every required field must be present and well-formed.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chronicles_data::Id;
use log::{info, warn};

use crate::character::{Character, CharacterClass, is_valid_name};
use crate::error::PersistError;
use crate::health::HealthState;
use crate::inventory::INVENTORY_CAPACITY;
use crate::progression::level_threshold;

pub const SAVE_SUFFIX: &str = "_save.txt";

const REQUIRED_KEYS: [&str; 12] = [
    "NAME",
    "CLASS",
    "LEVEL",
    "HEALTH",
    "MAX_HEALTH",
    "STRENGTH",
    "MAGIC",
    "EXPERIENCE",
    "GOLD",
    "INVENTORY",
    "ACTIVE_QUESTS",
    "COMPLETED_QUESTS",
];

/// Headline facts about a save, for the load screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub gold: u32,
    pub completed_quests: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFileStatus {
    Ready,
    Corrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileEntry {
    /// Character name taken from the file name.
    pub slot: String,
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub summary: Option<SaveSummary>,
    pub status: SaveFileStatus,
}

pub fn save_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}{SAVE_SUFFIX}"))
}

/// Render a character in save file form.
pub fn render_save(character: &Character) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: &dyn std::fmt::Display| {
        let _ = writeln!(out, "{key}: {value}");
    };
    line("NAME", &character.name);
    line("CLASS", &character.class);
    line("LEVEL", &character.level);
    line("HEALTH", &character.health.current_hp());
    line("MAX_HEALTH", &character.health.max_hp());
    line("STRENGTH", &character.strength);
    line("MAGIC", &character.magic);
    line("EXPERIENCE", &character.experience);
    line("GOLD", &character.gold);
    line("INVENTORY", &character.inventory.join(","));
    line("ACTIVE_QUESTS", &character.active_quests.join(","));
    line("COMPLETED_QUESTS", &character.completed_quests.join(","));
    line("EQUIPPED_WEAPON", &character.equipped_weapon.as_deref().unwrap_or_default());
    line("EQUIPPED_ARMOR", &character.equipped_armor.as_deref().unwrap_or_default());
    out
}

/// Parse save file text. `path` is only used for error reporting.
///
/// # Errors
/// - `InvalidSaveData` if a required field is missing or malformed, or the
///   record breaks a character invariant
pub fn parse_save(raw: &str, path: &Path) -> Result<Character, PersistError> {
    let invalid = |reason: String| PersistError::InvalidSaveData {
        path: path.to_path_buf(),
        reason,
    };

    let fields: HashMap<String, &str> = raw
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_uppercase(), value.trim()))
        .collect();

    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !fields.contains_key(**key)) {
        return Err(invalid(format!("missing field {missing}")));
    }
    // presence checked above
    let text = |key: &str| fields.get(key).copied().unwrap_or_default();
    let number = |key: &str| {
        text(key)
            .parse::<u32>()
            .map_err(|e| invalid(format!("{key} '{}' is not a whole number: {e}", text(key))))
    };
    let list = |key: &str| -> Vec<Id> {
        text(key)
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    };
    let optional = |key: &str| {
        fields
            .get(key)
            .filter(|value| !value.is_empty())
            .map(|value| (*value).to_string())
    };

    let name = text("NAME").to_string();
    if !is_valid_name(&name) {
        return Err(invalid(format!("'{name}' is not a valid character name")));
    }
    let class = text("CLASS")
        .parse::<CharacterClass>()
        .map_err(|e| invalid(e.to_string()))?;
    let level = number("LEVEL")?;
    if level == 0 {
        return Err(invalid("LEVEL must be at least 1".into()));
    }
    let current_hp = number("HEALTH")?;
    let max_hp = number("MAX_HEALTH")?;
    if current_hp > max_hp {
        warn!("{}: HEALTH {current_hp} exceeds MAX_HEALTH {max_hp}, clamping", path.display());
    }

    let inventory = list("INVENTORY");
    if inventory.len() > INVENTORY_CAPACITY {
        return Err(invalid(format!(
            "{} inventory items exceed capacity of {INVENTORY_CAPACITY}",
            inventory.len()
        )));
    }
    let active_quests = list("ACTIVE_QUESTS");
    let completed_quests = list("COMPLETED_QUESTS");
    if let Some(both) = active_quests.iter().find(|id| completed_quests.contains(*id)) {
        return Err(invalid(format!("quest '{both}' is both active and completed")));
    }
    let strength = number("STRENGTH")?;
    let magic = number("MAGIC")?;
    if strength == 0 || magic == 0 {
        return Err(invalid("STRENGTH and MAGIC must be at least 1".into()));
    }
    let experience = number("EXPERIENCE")?;
    let threshold = level_threshold(level);
    if experience >= threshold {
        return Err(invalid(format!(
            "EXPERIENCE {experience} reaches the level {level} threshold of {threshold}"
        )));
    }

    Ok(Character {
        name,
        class,
        level,
        health: HealthState::from_parts(current_hp, max_hp),
        strength,
        magic,
        experience,
        gold: number("GOLD")?,
        inventory,
        active_quests,
        completed_quests,
        equipped_weapon: optional("EQUIPPED_WEAPON"),
        equipped_armor: optional("EQUIPPED_ARMOR"),
    })
}

/// Write a character to its save file, creating the save directory if needed.
///
/// # Errors
/// - `Io` if the directory or file cannot be written
pub fn save_character(dir: &Path, character: &Character) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir)?;
    let path = save_path(dir, &character.name);
    fs::write(&path, render_save(character))?;
    info!("saved '{}' to {}", character.name, path.display());
    Ok(path)
}

/// Load a character by name.
///
/// # Errors
/// - `CharacterNotFound` if there is no save for `name`
/// - `SaveFileCorrupted` if the file exists but cannot be read
/// - `InvalidSaveData` if its contents are incomplete or malformed
pub fn load_character(dir: &Path, name: &str) -> Result<Character, PersistError> {
    let path = existing_save(dir, name)?;
    let raw = fs::read_to_string(&path).map_err(|source| PersistError::SaveFileCorrupted {
        path: path.clone(),
        source,
    })?;
    let character = parse_save(&raw, &path)?;
    info!("loaded '{}' from {}", character.name, path.display());
    Ok(character)
}

/// Names of all saved characters, sorted. An absent save directory has none.
///
/// # Errors
/// - `Io` if the directory exists but cannot be listed
pub fn list_saved_characters(dir: &Path) -> Result<Vec<String>, PersistError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(name) = slot_name(&path) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Delete a character's save file.
///
/// # Errors
/// - `CharacterNotFound` if there is no save for `name`
/// - `Io` if the file cannot be removed
pub fn delete_character(dir: &Path, name: &str) -> Result<(), PersistError> {
    let path = existing_save(dir, name)?;
    fs::remove_file(&path)?;
    info!("deleted save {}", path.display());
    Ok(())
}

/// Describe every save in `dir`, most recently modified first.
///
/// # Errors
/// - `Io` if the directory exists but cannot be listed
pub fn build_save_entries(dir: &Path) -> Result<Vec<SaveFileEntry>, PersistError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(slot) = slot_name(&path) else {
            continue;
        };
        let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
        let (summary, status) = match fs::read_to_string(&path) {
            Ok(raw) => match parse_save(&raw, &path) {
                Ok(character) => (Some(summarize(&character)), SaveFileStatus::Ready),
                Err(err) => {
                    warn!("save '{slot}' ({}) is invalid: {err}", path.display());
                    (
                        None,
                        SaveFileStatus::Corrupted {
                            message: trim_error(&err),
                        },
                    )
                },
            },
            Err(err) => {
                warn!("failed to read save '{slot}' ({}): {err}", path.display());
                (
                    None,
                    SaveFileStatus::Corrupted {
                        message: format!("read error: {}", trim_error(&err)),
                    },
                )
            },
        };
        entries.push(SaveFileEntry {
            slot,
            path,
            modified,
            summary,
            status,
        });
    }
    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.slot.cmp(&b.slot)));
    Ok(entries)
}

/// Format a human-friendly modified time relative to now.
pub fn format_modified(modified: SystemTime) -> String {
    match SystemTime::now().duration_since(modified) {
        Ok(delta) => format_duration(delta),
        Err(_) => "in the future".to_string(),
    }
}

fn summarize(character: &Character) -> SaveSummary {
    SaveSummary {
        name: character.name.clone(),
        class: character.class,
        level: character.level,
        gold: character.gold,
        completed_quests: character.completed_quests.len(),
    }
}

fn existing_save(dir: &Path, name: &str) -> Result<PathBuf, PersistError> {
    let path = save_path(dir, name);
    if !is_valid_name(name) || !path.is_file() {
        return Err(PersistError::CharacterNotFound(name.to_string()));
    }
    Ok(path)
}

fn slot_name(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.strip_suffix(SAVE_SUFFIX)?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Convert a duration into a compact "time ago" string.
fn format_duration(duration: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;
    const WEEK: u64 = DAY * 7;

    let secs = duration.as_secs();
    if secs < 30 {
        "just now".to_string()
    } else if secs < MINUTE {
        format!("{secs}s ago")
    } else if secs < HOUR {
        format!("{}m ago", secs / MINUTE)
    } else if secs < DAY {
        format!("{}h ago", secs / HOUR)
    } else if secs < WEEK {
        format!("{}d ago", secs / DAY)
    } else {
        format!("{}w ago", secs / WEEK)
    }
}

/// Clamp verbose error messages to a readable length.
fn trim_error(err: &impl ToString) -> String {
    let message = err.to_string();
    if message.chars().count() <= 120 {
        return message;
    }
    let mut trimmed: String = message.chars().take(117).collect();
    trimmed.push_str("...");
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::create_character;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn round_trip_keeps_every_field() -> Result<()> {
        let dir = tempdir()?;
        let mut hero = create_character("Hero", "Rogue")?;
        hero.level = 3;
        hero.health = HealthState::from_parts(40, 110);
        hero.experience = 17;
        hero.gold = 9;
        hero.inventory = vec!["potion".into(), "potion".into(), "dagger".into()];
        hero.completed_quests = vec!["rats".into()];
        hero.equipped_armor = Some("leather".into());

        save_character(dir.path(), &hero)?;
        assert_eq!(load_character(dir.path(), "Hero")?, hero);
        Ok(())
    }

    #[test]
    fn empty_lists_survive_a_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let hero = create_character("Fresh", "Mage")?;
        let path = save_character(dir.path(), &hero)?;
        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("INVENTORY: \n"));
        let loaded = load_character(dir.path(), "Fresh")?;
        assert!(loaded.inventory.is_empty());
        assert!(loaded.active_quests.is_empty());
        assert!(loaded.equipped_weapon.is_none());
        assert_eq!(loaded, hero);
        Ok(())
    }

    #[test]
    fn missing_and_malformed_saves_are_distinguished() -> Result<()> {
        let dir = tempdir()?;
        assert!(matches!(
            load_character(dir.path(), "Nobody"),
            Err(PersistError::CharacterNotFound(_))
        ));

        let hero = create_character("Hero", "Cleric")?;
        let raw = render_save(&hero).replace("LEVEL: 1\n", "");
        fs::write(save_path(dir.path(), "Hero"), raw)?;
        let err = load_character(dir.path(), "Hero").unwrap_err();
        assert!(matches!(err, PersistError::InvalidSaveData { .. }));
        assert!(err.to_string().contains("LEVEL"));

        let raw = render_save(&hero).replace("GOLD: 100", "GOLD: lots");
        fs::write(save_path(dir.path(), "Hero"), raw)?;
        assert!(matches!(
            load_character(dir.path(), "Hero"),
            Err(PersistError::InvalidSaveData { .. })
        ));
        Ok(())
    }

    #[test]
    fn unreadable_save_is_corrupted() -> Result<()> {
        let dir = tempdir()?;
        fs::write(save_path(dir.path(), "Hero"), [0xff, 0xfe, 0x00, 0x9f])?;
        assert!(matches!(
            load_character(dir.path(), "Hero"),
            Err(PersistError::SaveFileCorrupted { .. })
        ));
        Ok(())
    }

    #[test]
    fn lines_without_a_colon_are_skipped() -> Result<()> {
        let hero = create_character("Hero", "Warrior")?;
        let raw = format!("# saved by hand\n{}\n\n", render_save(&hero));
        assert_eq!(parse_save(&raw, Path::new("Hero_save.txt"))?, hero);
        Ok(())
    }

    #[test]
    fn quest_in_both_lists_is_rejected() -> Result<()> {
        let mut hero = create_character("Hero", "Warrior")?;
        hero.active_quests = vec!["rats".into()];
        hero.completed_quests = vec!["rats".into()];
        assert!(parse_save(&render_save(&hero), Path::new("x")).is_err());
        Ok(())
    }

    #[test]
    fn stats_outside_character_rules_are_rejected() -> Result<()> {
        let hero = create_character("Hero", "Warrior")?;
        let raw = render_save(&hero);
        for (from, to) in [
            ("STRENGTH: 15", "STRENGTH: 0"),
            ("MAGIC: 5", "MAGIC: 0"),
            ("EXPERIENCE: 0", "EXPERIENCE: 5000"),
            ("EXPERIENCE: 0", "EXPERIENCE: 100"),
        ] {
            let err = parse_save(&raw.replace(from, to), Path::new("Hero_save.txt")).unwrap_err();
            assert!(matches!(err, PersistError::InvalidSaveData { .. }), "{to}: {err}");
        }
        Ok(())
    }

    #[test]
    fn huge_stats_load_and_play_without_overflow() -> Result<()> {
        use crate::combat::{Battle, BattleStatus, PlayerAction, RandomChance, create_enemy};
        use crate::progression::gain_experience;

        let hero = create_character("Hero", "Warrior")?;
        let raw = render_save(&hero).replace("STRENGTH: 15", "STRENGTH: 4294967295");
        let mut loaded = parse_save(&raw, Path::new("Hero_save.txt"))?;
        assert_eq!(loaded.strength, u32::MAX);

        let mut battle = Battle::new(&mut loaded, create_enemy("dragon")?, RandomChance)?;
        battle.start()?;
        let report = battle.take_turn(&PlayerAction::Special)?;
        assert_eq!(report.status, BattleStatus::PlayerWon);
        drop(battle);

        assert_eq!(gain_experience(&mut loaded, 100)?, 1);
        assert_eq!(loaded.strength, u32::MAX);
        Ok(())
    }

    #[test]
    fn list_and_delete() -> Result<()> {
        let dir = tempdir()?;
        assert!(list_saved_characters(&dir.path().join("missing"))?.is_empty());

        for name in ["Zed", "Ann"] {
            save_character(dir.path(), &create_character(name, "Mage")?)?;
        }
        fs::write(dir.path().join("notes.txt"), "ignore me")?;
        assert_eq!(list_saved_characters(dir.path())?, vec!["Ann", "Zed"]);

        delete_character(dir.path(), "Zed")?;
        assert_eq!(list_saved_characters(dir.path())?, vec!["Ann"]);
        assert!(matches!(
            delete_character(dir.path(), "Zed"),
            Err(PersistError::CharacterNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn save_entries_report_corruption() -> Result<()> {
        let dir = tempdir()?;
        let mut hero = create_character("Ann", "Warrior")?;
        hero.level = 4;
        save_character(dir.path(), &hero)?;
        fs::write(save_path(dir.path(), "Bob"), "NAME: Bob\n")?;

        let entries = build_save_entries(dir.path())?;
        assert_eq!(entries.len(), 2);
        let ann = entries.iter().find(|e| e.slot == "Ann").unwrap();
        assert_eq!(ann.status, SaveFileStatus::Ready);
        assert_eq!(ann.summary.as_ref().unwrap().level, 4);
        let bob = entries.iter().find(|e| e.slot == "Bob").unwrap();
        assert!(matches!(bob.status, SaveFileStatus::Corrupted { .. }));
        assert!(bob.summary.is_none());
        Ok(())
    }

    #[test]
    fn durations_are_compact() {
        assert_eq!(format_duration(Duration::from_secs(5)), "just now");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m ago");
        assert_eq!(format_duration(Duration::from_secs(3 * 86_400)), "3d ago");
    }
}
