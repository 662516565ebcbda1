//! Inventory and equipment engine.
//!
//! The inventory is an ordered list of item ids capped at [`INVENTORY_CAPACITY`].
//! Items are looked up in the catalog by the caller and passed in alongside the
//! id, so these functions never need the whole catalog.
//!
//! Equipping applies the item's stat effect once. Unequipping (directly or by
//! swapping in another item) only moves the item back to the inventory; the
//! stat change it made stays on the character.

use chronicles_data::{Id, ItemDef, ItemKind, StatEffect};
use log::{info, warn};

use crate::character::Character;
use crate::error::GameError;

pub const INVENTORY_CAPACITY: usize = 20;

/// Character stats an item effect can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
    Gold,
}

impl Stat {
    /// Look up a stat by the name used in item effects.
    pub fn from_name(name: &str) -> Option<Stat> {
        match name.trim().to_ascii_lowercase().as_str() {
            "health" | "hp" => Some(Stat::Health),
            "max_health" | "max_hp" => Some(Stat::MaxHealth),
            "strength" => Some(Stat::Strength),
            "magic" => Some(Stat::Magic),
            "gold" => Some(Stat::Gold),
            _ => None,
        }
    }
}

/// Equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Weapon,
    Armor,
}

impl Slot {
    fn item_kind(self) -> ItemKind {
        match self {
            Slot::Weapon => ItemKind::Weapon,
            Slot::Armor => ItemKind::Armor,
        }
    }

    fn of(self, character: &mut Character) -> &mut Option<Id> {
        match self {
            Slot::Weapon => &mut character.equipped_weapon,
            Slot::Armor => &mut character.equipped_armor,
        }
    }
}

/// Append an item id.
///
/// # Errors
/// - `InventoryFull` at capacity
pub fn add_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    ensure_space(character)?;
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Remove the first occurrence of an item id.
///
/// # Errors
/// - `ItemNotFound` if the character does not carry it
pub fn remove_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    let idx = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(idx);
    Ok(())
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn space_remaining(character: &Character) -> usize {
    INVENTORY_CAPACITY.saturating_sub(character.inventory.len())
}

/// Empty the inventory, returning what was in it.
pub fn clear_inventory(character: &mut Character) -> Vec<Id> {
    std::mem::take(&mut character.inventory)
}

/// Item ids with their counts, in first-acquired order.
pub fn inventory_summary(character: &Character) -> Vec<(Id, usize)> {
    let mut summary: Vec<(Id, usize)> = Vec::new();
    for id in &character.inventory {
        match summary.iter_mut().find(|(seen, _)| seen == id) {
            Some((_, count)) => *count += 1,
            None => summary.push((id.clone(), 1)),
        }
    }
    summary
}

/// Apply a stat effect to the character. Returns false (and changes nothing)
/// if the effect names a stat the character doesn't have.
pub fn apply_stat_effect(character: &mut Character, effect: &StatEffect) -> bool {
    let Some(stat) = Stat::from_name(&effect.stat) else {
        warn!("ignoring effect on unknown stat '{}'", effect.stat);
        return false;
    };
    let delta = effect.delta;
    match stat {
        Stat::Health => character.health.adjust_current(delta),
        Stat::MaxHealth => character.health.adjust_max(delta),
        Stat::Strength => character.strength = character.strength.saturating_add_signed(delta).max(1),
        Stat::Magic => character.magic = character.magic.saturating_add_signed(delta).max(1),
        Stat::Gold => character.gold = character.gold.saturating_add_signed(delta),
    }
    true
}

/// Consume one unit of a consumable and apply its effect.
///
/// # Errors
/// - `ItemNotFound` if not carried
/// - `InvalidItemType` if the item isn't a consumable
pub fn use_item(character: &mut Character, item_id: &str, item: &ItemDef) -> Result<StatEffect, GameError> {
    ensure_carried(character, item_id)?;
    ensure_kind(item_id, item, ItemKind::Consumable)?;

    apply_stat_effect(character, &item.effect);
    remove_item(character, item_id)?;
    info!("{} used {} ({})", character.name, item.name, item.effect);
    Ok(item.effect.clone())
}

/// Equip a weapon from the inventory. Returns the id of any weapon it replaced.
///
/// # Errors
/// - `ItemNotFound` if not carried
/// - `InvalidItemType` if the item isn't a weapon
pub fn equip_weapon(character: &mut Character, item_id: &str, item: &ItemDef) -> Result<Option<Id>, GameError> {
    equip(character, Slot::Weapon, item_id, item)
}

/// Equip armor from the inventory. Returns the id of any armor it replaced.
///
/// # Errors
/// - `ItemNotFound` if not carried
/// - `InvalidItemType` if the item isn't armor
pub fn equip_armor(character: &mut Character, item_id: &str, item: &ItemDef) -> Result<Option<Id>, GameError> {
    equip(character, Slot::Armor, item_id, item)
}

fn equip(character: &mut Character, slot: Slot, item_id: &str, item: &ItemDef) -> Result<Option<Id>, GameError> {
    ensure_carried(character, item_id)?;
    ensure_kind(item_id, item, slot.item_kind())?;
    // The occupant is unequipped first, so a swap needs room for it.
    if slot.of(character).is_some() {
        ensure_space(character)?;
    }

    remove_item(character, item_id)?;
    let replaced = slot.of(character).replace(item_id.to_string());
    if let Some(old) = &replaced {
        character.inventory.push(old.clone());
    }
    apply_stat_effect(character, &item.effect);
    info!(
        "{} equipped {} ({}){}",
        character.name,
        item.name,
        item.effect,
        replaced.as_ref().map(|old| format!(", replacing {old}")).unwrap_or_default()
    );
    Ok(replaced)
}

/// Return the equipped weapon to the inventory. `Ok(None)` if nothing was equipped.
///
/// # Errors
/// - `InventoryFull` if there is no room for it
pub fn unequip_weapon(character: &mut Character) -> Result<Option<Id>, GameError> {
    unequip(character, Slot::Weapon)
}

/// Return the equipped armor to the inventory. `Ok(None)` if nothing was equipped.
///
/// # Errors
/// - `InventoryFull` if there is no room for it
pub fn unequip_armor(character: &mut Character) -> Result<Option<Id>, GameError> {
    unequip(character, Slot::Armor)
}

fn unequip(character: &mut Character, slot: Slot) -> Result<Option<Id>, GameError> {
    if slot.of(character).is_none() {
        return Ok(None);
    }
    ensure_space(character)?;
    let removed = slot.of(character).take();
    if let Some(id) = &removed {
        character.inventory.push(id.clone());
        info!("{} unequipped {id}", character.name);
    }
    Ok(removed)
}

/// Buy an item at catalog cost. Returns the remaining gold.
///
/// # Errors
/// - `InsufficientGold` if the character can't afford it
/// - `InventoryFull` at capacity
pub fn purchase_item(character: &mut Character, item_id: &str, item: &ItemDef) -> Result<u32, GameError> {
    if character.gold < item.cost {
        return Err(GameError::InsufficientGold {
            available: character.gold,
            required: item.cost,
        });
    }
    ensure_space(character)?;
    character.gold -= item.cost;
    character.inventory.push(item_id.to_string());
    info!("{} bought {} for {} gold", character.name, item.name, item.cost);
    Ok(character.gold)
}

/// Sell one unit of an item for half its cost (rounded down). Returns the gold received.
///
/// # Errors
/// - `ItemNotFound` if not carried
pub fn sell_item(character: &mut Character, item_id: &str, item: &ItemDef) -> Result<u32, GameError> {
    remove_item(character, item_id)?;
    let price = sell_price(item);
    character.gold = character.gold.saturating_add(price);
    info!("{} sold {} for {price} gold", character.name, item.name);
    Ok(price)
}

pub fn sell_price(item: &ItemDef) -> u32 {
    item.cost / 2
}

fn ensure_space(character: &Character) -> Result<(), GameError> {
    if character.inventory.len() >= INVENTORY_CAPACITY {
        return Err(GameError::InventoryFull {
            capacity: INVENTORY_CAPACITY,
        });
    }
    Ok(())
}

fn ensure_carried(character: &Character, item_id: &str) -> Result<(), GameError> {
    if has_item(character, item_id) {
        Ok(())
    } else {
        Err(GameError::ItemNotFound(item_id.to_string()))
    }
}

fn ensure_kind(item_id: &str, item: &ItemDef, expected: ItemKind) -> Result<(), GameError> {
    if item.kind == expected {
        Ok(())
    } else {
        Err(GameError::InvalidItemType {
            item: item_id.to_string(),
            expected,
            found: item.kind,
        })
    }
}
