//! `repl::inventory` module
//!
//! Handlers for the pack, equipment and the shop.

use chronicles_data::ItemKind;
use log::info;

use crate::helpers::{find_item, item_name};
use crate::inventory::{
    Slot, equip_armor, equip_weapon, inventory_summary, purchase_item, sell_item, sell_price, space_remaining,
    unequip_armor, unequip_weapon, use_item,
};
use crate::repl::{living_character, no_character};
use crate::session::Session;
use crate::style::GameStyle;
use crate::view::{InventoryLine, ShopLine, View, ViewItem};

/// List the contents of the pack.
pub fn inventory_handler(session: &Session, view: &mut View) {
    let Some(character) = &session.character else {
        no_character(view);
        return;
    };
    let lines = inventory_summary(character)
        .into_iter()
        .map(|(item_id, count)| InventoryLine {
            name: item_name(&session.catalog, &item_id).to_string(),
            item_id,
            count,
        })
        .collect();
    view.push(ViewItem::Inventory {
        lines,
        space_remaining: space_remaining(character),
    });
}

/// Use a consumable from the pack.
pub fn use_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = living_character(session, view) else {
        return;
    };
    let Some(item) = find_item(catalog, search) else {
        unknown_item(view, search);
        return;
    };
    match use_item(character, &item.id, item) {
        Ok(effect) => view.push(ViewItem::ActionSuccess(format!(
            "You use the {}. ({effect})",
            item.name.item_style()
        ))),
        Err(err) => view.push(ViewItem::ActionFailure(err.to_string())),
    }
}

/// Equip a weapon or armor from the pack into the matching slot.
pub fn equip_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = living_character(session, view) else {
        return;
    };
    let Some(item) = find_item(catalog, search) else {
        unknown_item(view, search);
        return;
    };
    let result = match item.kind {
        ItemKind::Armor => equip_armor(character, &item.id, item),
        ItemKind::Weapon | ItemKind::Consumable => equip_weapon(character, &item.id, item),
    };
    match result {
        Ok(replaced) => {
            let mut msg = format!("You equip the {}. ({})", item.name.item_style(), item.effect);
            if let Some(old) = replaced {
                msg.push_str(&format!(" The {} goes back in your pack.", item_name(catalog, &old).item_style()));
            }
            view.push(ViewItem::ActionSuccess(msg));
        },
        Err(err) => view.push(ViewItem::ActionFailure(err.to_string())),
    }
}

/// Move whatever is in `slot` back to the pack.
pub fn unequip_handler(session: &mut Session, view: &mut View, slot: Slot) {
    let Some((character, catalog)) = session.parts_mut() else {
        no_character(view);
        return;
    };
    let result = match slot {
        Slot::Weapon => unequip_weapon(character),
        Slot::Armor => unequip_armor(character),
    };
    match result {
        Ok(Some(id)) => view.push(ViewItem::ActionSuccess(format!(
            "You put the {} back in your pack.",
            item_name(catalog, &id).item_style()
        ))),
        Ok(None) => view.push(ViewItem::ActionFailure(format!(
            "You have no {} equipped.",
            match slot {
                Slot::Weapon => "weapon",
                Slot::Armor => "armor",
            }
        ))),
        Err(err) => view.push(ViewItem::ActionFailure(err.to_string())),
    }
}

/// Show the shop's stock with prices.
pub fn shop_handler(session: &Session, view: &mut View) {
    let Some(character) = &session.character else {
        no_character(view);
        return;
    };
    let mut stock: Vec<_> = session.catalog.items.values().collect();
    stock.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.name.cmp(&b.name)));
    let lines = stock
        .into_iter()
        .map(|item| ShopLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            kind: item.kind.to_string(),
            effect: item.effect.to_string(),
            cost: item.cost,
            affordable: item.cost <= character.gold,
        })
        .collect();
    view.push(ViewItem::Shop {
        gold: character.gold,
        lines,
    });
}

/// Buy one of an item.
pub fn buy_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = session.parts_mut() else {
        no_character(view);
        return;
    };
    let Some(item) = find_item(catalog, search) else {
        unknown_item(view, search);
        return;
    };
    match purchase_item(character, &item.id, item) {
        Ok(remaining) => view.push(ViewItem::ActionSuccess(format!(
            "You buy the {} for {}. {} left.",
            item.name.item_style(),
            format!("{} gold", item.cost).gold_style(),
            format!("{remaining} gold").gold_style()
        ))),
        Err(err) => {
            info!("purchase of '{}' refused: {err}", item.id);
            view.push(ViewItem::ActionFailure(err.to_string()));
        },
    }
}

/// Sell one of an item for half its price.
pub fn sell_handler(session: &mut Session, view: &mut View, search: &str) {
    let Some((character, catalog)) = session.parts_mut() else {
        no_character(view);
        return;
    };
    let Some(item) = find_item(catalog, search) else {
        unknown_item(view, search);
        return;
    };
    match sell_item(character, &item.id, item) {
        Ok(price) => view.push(ViewItem::ActionSuccess(format!(
            "You sell the {} for {}.",
            item.name.item_style(),
            format!("{price} gold").gold_style()
        ))),
        Err(err) => view.push(ViewItem::ActionFailure(format!(
            "{err} (it would fetch {} gold)",
            sell_price(item)
        ))),
    }
}

fn unknown_item(view: &mut View, search: &str) {
    view.push(ViewItem::ActionFailure(format!(
        "There's no item called \"{}\". Try `shop` for a list.",
        search.error_style()
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::create_character;
    use crate::config::GameConfig;
    use anyhow::Result;
    use chronicles_data::{Catalog, ItemDef, StatEffect};

    fn item(id: &str, name: &str, kind: ItemKind, effect: &str, cost: u32) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: name.into(),
            kind,
            effect: effect.parse().unwrap_or_else(|_| StatEffect::new("health", 0)),
            cost,
            description: String::new(),
        }
    }

    fn session() -> Result<Session> {
        let catalog = Catalog::new(
            Vec::new(),
            vec![
                item("potion", "Health Potion", ItemKind::Consumable, "health:+20", 25),
                item("sword", "Iron Sword", ItemKind::Weapon, "strength:+5", 60),
                item("plate", "Plate Armor", ItemKind::Armor, "max_health:+30", 150),
            ],
        );
        let mut session = Session::new(catalog, GameConfig::default());
        session.begin(create_character("Hero", "Warrior")?);
        Ok(session)
    }

    #[test]
    fn buy_then_equip_by_name() -> Result<()> {
        let mut session = session()?;
        let mut view = View::new();
        buy_handler(&mut session, &mut view, "iron sword");
        equip_handler(&mut session, &mut view, "sword");
        let hero = session.character.as_ref().expect("loaded");
        assert_eq!(hero.gold, 40);
        assert_eq!(hero.equipped_weapon.as_deref(), Some("sword"));
        assert_eq!(hero.strength, 20);
        assert!(view.items.iter().all(ViewItem::is_action_success));
        Ok(())
    }

    #[test]
    fn cannot_afford_plate() -> Result<()> {
        let mut session = session()?;
        let mut view = View::new();
        buy_handler(&mut session, &mut view, "plate");
        assert!(view.items[0].is_action_failure());
        assert_eq!(session.character.as_ref().map(|c| c.gold), Some(100));
        Ok(())
    }

    #[test]
    fn dead_characters_cannot_use_items() -> Result<()> {
        let mut session = session()?;
        let mut view = View::new();
        buy_handler(&mut session, &mut view, "potion");
        if let Some(hero) = session.character.as_mut() {
            hero.health.damage(1_000);
        }
        use_handler(&mut session, &mut view, "potion");
        assert!(view.items[1].is_action_failure());
        assert_eq!(session.character.as_ref().map(|c| c.inventory.len()), Some(1));
        Ok(())
    }

    #[test]
    fn unequip_with_nothing_equipped_is_refused() -> Result<()> {
        let mut session = session()?;
        let mut view = View::new();
        unequip_handler(&mut session, &mut view, Slot::Armor);
        assert!(view.items[0].is_action_failure());
        Ok(())
    }

    #[test]
    fn inventory_groups_duplicates() -> Result<()> {
        let mut session = session()?;
        let mut view = View::new();
        buy_handler(&mut session, &mut view, "potion");
        buy_handler(&mut session, &mut view, "potion");
        view.items.clear();
        inventory_handler(&session, &mut view);
        let Some(ViewItem::Inventory { lines, space_remaining }) = view.items.first() else {
            panic!("expected an inventory listing");
        };
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].count, 2);
        assert_eq!(lines[0].name, "Health Potion");
        assert_eq!(*space_remaining, 18);
        Ok(())
    }

    #[test]
    fn unknown_items_are_reported() -> Result<()> {
        let mut session = session()?;
        let mut view = View::new();
        sell_handler(&mut session, &mut view, "moon rock");
        assert!(view.items[0].is_action_failure());
        Ok(())
    }
}
