//! Text codec for the quest and item catalogs.
//!
//! A catalog file is a sequence of records separated by blank lines. Each record
//! is a run of `KEY: value` lines; keys are matched case-insensitively and lines
//! without a `:` are ignored.
//!
//! ```text
//! QUEST_ID: rat_catcher
//! TITLE: Rat Catcher
//! DESCRIPTION: Clear the cellar.
//! REWARD_XP: 100
//! REWARD_GOLD: 50
//! REQUIRED_LEVEL: 1
//! PREREQUISITE: NONE
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::{CatalogKind, ItemDef, ItemKind, NO_PREREQUISITE, QuestDef, StatEffect};

const QUEST_FIELDS: [&str; 7] = [
    "quest_id",
    "title",
    "description",
    "reward_xp",
    "reward_gold",
    "required_level",
    "prerequisite",
];

const ITEM_FIELDS: [&str; 6] = ["item_id", "name", "type", "effect", "cost", "description"];

/// A catalog record that could not be turned into a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogParseError {
    pub kind: CatalogKind,
    /// 1-based position of the record within the file.
    pub record: usize,
    pub reason: String,
}

impl fmt::Display for CatalogParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} record #{}: {}", self.kind, self.record, self.reason)
    }
}

impl std::error::Error for CatalogParseError {}

/// Raw `key -> value` fields for one record, keys lowercased.
struct RawRecord {
    position: usize,
    fields: HashMap<String, String>,
}

impl RawRecord {
    fn require(&self, kind: CatalogKind, required: &[&str]) -> Result<(), CatalogParseError> {
        match required.iter().find(|field| !self.fields.contains_key(**field)) {
            Some(missing) => Err(self.error(kind, format!("missing required field '{missing}'"))),
            None => Ok(()),
        }
    }

    fn text(&self, key: &str) -> String {
        self.fields.get(key).cloned().unwrap_or_default()
    }

    fn number(&self, kind: CatalogKind, key: &str) -> Result<u32, CatalogParseError> {
        let raw = self.text(key);
        raw.parse::<u32>()
            .map_err(|e| self.error(kind, format!("field '{key}' value '{raw}' is not a whole number: {e}")))
    }

    fn error(&self, kind: CatalogKind, reason: String) -> CatalogParseError {
        CatalogParseError {
            kind,
            record: self.position,
            reason,
        }
    }
}

fn split_records(text: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut current: HashMap<String, String> = HashMap::new();
    let mut in_record = false;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if in_record {
                records.push(RawRecord {
                    position: records.len() + 1,
                    fields: std::mem::take(&mut current),
                });
                in_record = false;
            }
            continue;
        }
        in_record = true;
        if let Some((key, value)) = line.split_once(':') {
            current.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    if in_record {
        records.push(RawRecord {
            position: records.len() + 1,
            fields: current,
        });
    }
    records
}

/// Parse the quest catalog text.
///
/// # Errors
/// - if a record lacks a required field or a numeric field does not parse
pub fn parse_quests(text: &str) -> Result<Vec<QuestDef>, CatalogParseError> {
    let kind = CatalogKind::Quests;
    split_records(text)
        .into_iter()
        .map(|raw| -> Result<QuestDef, CatalogParseError> {
            raw.require(kind, &QUEST_FIELDS)?;
            let prerequisite = raw.text("prerequisite");
            let prerequisite = if prerequisite.is_empty() || prerequisite.eq_ignore_ascii_case(NO_PREREQUISITE) {
                None
            } else {
                Some(prerequisite)
            };
            Ok(QuestDef {
                id: raw.text("quest_id"),
                title: raw.text("title"),
                description: raw.text("description"),
                reward_xp: raw.number(kind, "reward_xp")?,
                reward_gold: raw.number(kind, "reward_gold")?,
                required_level: raw.number(kind, "required_level")?,
                prerequisite,
            })
        })
        .collect()
}

/// Parse the item catalog text.
///
/// # Errors
/// - if a record lacks a required field, names an unknown item type, has a
///   malformed effect, or has a non-numeric cost
pub fn parse_items(text: &str) -> Result<Vec<ItemDef>, CatalogParseError> {
    let kind = CatalogKind::Items;
    split_records(text)
        .into_iter()
        .map(|raw| -> Result<ItemDef, CatalogParseError> {
            raw.require(kind, &ITEM_FIELDS)?;
            let item_kind = raw.text("type").parse::<ItemKind>().map_err(|e| raw.error(kind, e))?;
            let effect = raw.text("effect").parse::<StatEffect>().map_err(|e| raw.error(kind, e))?;
            Ok(ItemDef {
                id: raw.text("item_id"),
                name: raw.text("name"),
                kind: item_kind,
                effect,
                cost: raw.number(kind, "cost")?,
                description: raw.text("description"),
            })
        })
        .collect()
}

/// Render quests in catalog format.
pub fn write_quests(quests: &[QuestDef]) -> String {
    let mut out = String::new();
    for quest in quests {
        if !out.is_empty() {
            out.push('\n');
        }
        let prerequisite = quest.prerequisite.as_deref().unwrap_or(NO_PREREQUISITE);
        let _ = writeln!(out, "QUEST_ID: {}", quest.id);
        let _ = writeln!(out, "TITLE: {}", quest.title);
        let _ = writeln!(out, "DESCRIPTION: {}", quest.description);
        let _ = writeln!(out, "REWARD_XP: {}", quest.reward_xp);
        let _ = writeln!(out, "REWARD_GOLD: {}", quest.reward_gold);
        let _ = writeln!(out, "REQUIRED_LEVEL: {}", quest.required_level);
        let _ = writeln!(out, "PREREQUISITE: {prerequisite}");
    }
    out
}

/// Render items in catalog format.
pub fn write_items(items: &[ItemDef]) -> String {
    let mut out = String::new();
    for item in items {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "ITEM_ID: {}", item.id);
        let _ = writeln!(out, "NAME: {}", item.name);
        let _ = writeln!(out, "TYPE: {}", item.kind);
        let _ = writeln!(out, "EFFECT: {}", item.effect);
        let _ = writeln!(out, "COST: {}", item.cost);
        let _ = writeln!(out, "DESCRIPTION: {}", item.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTS: &str = "\
QUEST_ID: rat_catcher
TITLE: Rat Catcher
DESCRIPTION: Clear the cellar.
REWARD_XP: 100
REWARD_GOLD: 50
REQUIRED_LEVEL: 1
PREREQUISITE: NONE


quest_id: wolf_den
title: Wolf Den
this line has no delimiter and is skipped
description: Thin the pack: all of it.
reward_xp: 250
reward_gold: 80
required_level: 3
prerequisite: rat_catcher
";

    #[test]
    fn parses_blank_line_delimited_quests() {
        let quests = parse_quests(QUESTS).unwrap();
        assert_eq!(quests.len(), 2);
        assert_eq!(quests[0].id, "rat_catcher");
        assert_eq!(quests[0].prerequisite, None);
        assert_eq!(quests[1].prerequisite.as_deref(), Some("rat_catcher"));
        assert_eq!(quests[1].description, "Thin the pack: all of it.");
        assert_eq!(quests[1].required_level, 3);
    }

    #[test]
    fn missing_quest_field_names_the_field() {
        let err = parse_quests("QUEST_ID: a\nTITLE: A\n").unwrap_err();
        assert_eq!(err.record, 1);
        assert!(err.reason.contains("description"), "{err}");
    }

    #[test]
    fn non_numeric_reward_is_rejected() {
        let text = QUESTS.replace("REWARD_XP: 100", "REWARD_XP: lots");
        let err = parse_quests(&text).unwrap_err();
        assert!(err.reason.contains("reward_xp"), "{err}");
    }

    #[test]
    fn parses_items_and_rejects_unknown_type() {
        let text = "ITEM_ID: potion\nNAME: Potion\nTYPE: consumable\nEFFECT: health:20\nCOST: 10\nDESCRIPTION: Heals.\n";
        let items = parse_items(text).unwrap();
        assert_eq!(items[0].kind, ItemKind::Consumable);
        assert_eq!(items[0].effect, StatEffect::new("health", 20));

        let bad = text.replace("consumable", "trinket");
        assert!(parse_items(&bad).is_err());
    }

    #[test]
    fn written_catalogs_parse_back() {
        let quests = parse_quests(QUESTS).unwrap();
        assert_eq!(parse_quests(&write_quests(&quests)).unwrap(), quests);
    }

    #[test]
    fn empty_text_is_an_empty_catalog() {
        assert!(parse_quests("").unwrap().is_empty());
        assert!(parse_items("\n\n").unwrap().is_empty());
    }
}
