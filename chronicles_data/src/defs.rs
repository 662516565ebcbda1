use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Stable identifier used for quests and items across catalogs and saves.
pub type Id = String;

/// Sentinel written in catalogs for a quest without a prerequisite.
pub const NO_PREREQUISITE: &str = "NONE";

/// A quest record from the quest catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
    /// Quest that must be completed first, `None` for the "none" sentinel.
    #[serde(default)]
    pub prerequisite: Option<Id>,
}

/// Equipment slot / usage category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Ok(ItemKind::Weapon),
            "armor" | "armour" => Ok(ItemKind::Armor),
            "consumable" => Ok(ItemKind::Consumable),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

/// A single stat modification, written `stat:delta` (e.g. `health:+20`).
///
/// The stat name is kept as written; whether it names a real character stat
/// is decided by the engine when the effect is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEffect {
    pub stat: String,
    pub delta: i32,
}

impl StatEffect {
    pub fn new(stat: impl Into<String>, delta: i32) -> Self {
        Self {
            stat: stat.into(),
            delta,
        }
    }
}

impl fmt::Display for StatEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:+}", self.stat, self.delta)
    }
}

impl FromStr for StatEffect {
    type Err = String;

    /// ```
    /// use chronicles_data::StatEffect;
    ///
    /// let fx: StatEffect = "health:+20".parse().unwrap();
    /// assert_eq!(fx, StatEffect::new("health", 20));
    /// assert!("health".parse::<StatEffect>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, delta) = s
            .split_once(':')
            .ok_or_else(|| format!("effect '{s}' is not in 'stat:value' form"))?;
        let stat = stat.trim();
        if stat.is_empty() {
            return Err(format!("effect '{s}' has no stat name"));
        }
        let delta = delta
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("effect '{s}' has a bad value: {e}"))?;
        Ok(StatEffect::new(stat, delta))
    }
}

/// An item record from the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub name: String,
    pub kind: ItemKind,
    pub effect: StatEffect,
    pub cost: u32,
    pub description: String,
}

/// Which catalog a record or file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    Quests,
    Items,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Quests => f.write_str("quest"),
            CatalogKind::Items => f.write_str("item"),
        }
    }
}

/// The static quest and item catalogs for one session, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub quests: BTreeMap<Id, QuestDef>,
    pub items: BTreeMap<Id, ItemDef>,
}

impl Catalog {
    /// Build a catalog from parsed records. Later duplicates replace earlier ones;
    /// run [`crate::validate_catalog`] first to reject them instead.
    pub fn new(quests: Vec<QuestDef>, items: Vec<ItemDef>) -> Self {
        Self {
            quests: quests.into_iter().map(|q| (q.id.clone(), q)).collect(),
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    pub fn quest(&self, id: &str) -> Option<&QuestDef> {
        self.quests.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_effect_accepts_signed_and_unsigned_values() {
        assert_eq!("strength:5".parse::<StatEffect>(), Ok(StatEffect::new("strength", 5)));
        assert_eq!("magic: -3".parse::<StatEffect>(), Ok(StatEffect::new("magic", -3)));
        assert!("magic:lots".parse::<StatEffect>().is_err());
        assert!(":4".parse::<StatEffect>().is_err());
    }

    #[test]
    fn stat_effect_displays_with_explicit_sign() {
        assert_eq!(StatEffect::new("health", 20).to_string(), "health:+20");
        assert_eq!(StatEffect::new("health", -2).to_string(), "health:-2");
    }

    #[test]
    fn item_kind_parses_case_insensitively() {
        assert_eq!("Weapon".parse::<ItemKind>(), Ok(ItemKind::Weapon));
        assert_eq!("ARMOR".parse::<ItemKind>(), Ok(ItemKind::Armor));
        assert!("trinket".parse::<ItemKind>().is_err());
    }

    #[test]
    fn catalog_lookups_by_id() {
        let catalog = Catalog::new(
            vec![QuestDef {
                id: "rats".into(),
                title: "Rats".into(),
                description: "Clear the cellar.".into(),
                reward_xp: 100,
                reward_gold: 50,
                required_level: 1,
                prerequisite: None,
            }],
            Vec::new(),
        );
        assert!(catalog.quest("rats").is_some());
        assert!(catalog.quest("wolves").is_none());
        assert!(catalog.item("rats").is_none());
    }
}
