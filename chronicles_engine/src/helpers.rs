//! Helpers Module
//!
//! Small lookup and formatting helpers shared by the REPL handlers.

use chronicles_data::{Catalog, ItemDef, QuestDef};

/// Returns "s" unless `count` is exactly one.
pub fn plural_s(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Find an item by id, or failing that by case-insensitive id or name.
pub fn find_item<'a>(catalog: &'a Catalog, search: &str) -> Option<&'a ItemDef> {
    let term = search.trim();
    catalog.item(term).or_else(|| {
        catalog
            .items
            .values()
            .find(|item| item.id.eq_ignore_ascii_case(term) || item.name.eq_ignore_ascii_case(term))
    })
}

/// Find a quest by id, or failing that by case-insensitive id or title.
pub fn find_quest<'a>(catalog: &'a Catalog, search: &str) -> Option<&'a QuestDef> {
    let term = search.trim();
    catalog.quest(term).or_else(|| {
        catalog
            .quests
            .values()
            .find(|quest| quest.id.eq_ignore_ascii_case(term) || quest.title.eq_ignore_ascii_case(term))
    })
}

/// Display name for an item id, falling back to the id itself.
pub fn item_name<'a>(catalog: &'a Catalog, id: &'a str) -> &'a str {
    catalog.item(id).map_or(id, |item| item.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicles_data::{ItemKind, StatEffect};

    fn catalog() -> Catalog {
        Catalog::new(
            Vec::new(),
            vec![ItemDef {
                id: "health_potion".into(),
                name: "Health Potion".into(),
                kind: ItemKind::Consumable,
                effect: StatEffect::new("health", 20),
                cost: 25,
                description: String::new(),
            }],
        )
    }

    #[test]
    fn items_are_found_by_id_or_name() {
        let cat = catalog();
        assert!(find_item(&cat, "health_potion").is_some());
        assert!(find_item(&cat, "HEALTH POTION").is_some());
        assert!(find_item(&cat, "potion").is_none());
        assert_eq!(item_name(&cat, "health_potion"), "Health Potion");
        assert_eq!(item_name(&cat, "mystery"), "mystery");
    }

    #[test]
    fn plural_suffix() {
        assert_eq!(plural_s(1), "");
        assert_eq!(plural_s(0), "s");
    }
}
