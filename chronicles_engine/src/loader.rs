//! Catalog loading.
//!
//! Both catalogs are read once at startup. A missing file and a malformed one
//! are reported as different errors; either aborts the session.

use std::fs;
use std::io;
use std::path::Path;

use chronicles_data::{
    Catalog, CatalogKind, ItemDef, QuestDef, ValidationError, parse_items, parse_quests, validate_catalog,
};
use log::info;

use crate::error::PersistError;

fn read_catalog(kind: CatalogKind, path: &Path) -> Result<String, PersistError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => PersistError::MissingCatalog {
            kind,
            path: path.to_path_buf(),
        },
        _ => PersistError::CatalogFormat {
            kind,
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    })
}

fn reject_invalid(kind: CatalogKind, path: &Path, errors: Vec<ValidationError>) -> Result<(), PersistError> {
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    Err(PersistError::CatalogFormat {
        kind,
        path: path.to_path_buf(),
        reason: format!("validation failed:\n{details}"),
    })
}

/// Load and validate the quest catalog.
///
/// # Errors
/// - `MissingCatalog` if the file does not exist
/// - `CatalogFormat` if it cannot be parsed or fails validation
pub fn load_quests(path: &Path) -> Result<Vec<QuestDef>, PersistError> {
    let kind = CatalogKind::Quests;
    let quests = parse_quests(&read_catalog(kind, path)?).map_err(|err| PersistError::CatalogFormat {
        kind,
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    reject_invalid(kind, path, validate_catalog(&quests, &[]))?;
    info!("{} quests loaded from '{}'", quests.len(), path.display());
    Ok(quests)
}

/// Load and validate the item catalog.
///
/// # Errors
/// - `MissingCatalog` if the file does not exist
/// - `CatalogFormat` if it cannot be parsed or fails validation
pub fn load_items(path: &Path) -> Result<Vec<ItemDef>, PersistError> {
    let kind = CatalogKind::Items;
    let items = parse_items(&read_catalog(kind, path)?).map_err(|err| PersistError::CatalogFormat {
        kind,
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    reject_invalid(kind, path, validate_catalog(&[], &items))?;
    info!("{} items loaded from '{}'", items.len(), path.display());
    Ok(items)
}

/// Load both catalogs into a [`Catalog`].
///
/// # Errors
/// - any error from [`load_quests`] or [`load_items`]
pub fn load_catalog(quests_path: &Path, items_path: &Path) -> Result<Catalog, PersistError> {
    Ok(Catalog::new(load_quests(quests_path)?, load_items(items_path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use anyhow::Result;
    use tempfile::tempdir;

    const QUESTS: &str = "\
QUEST_ID: rats
TITLE: Rat Problem
DESCRIPTION: Clear the cellar.
REWARD_XP: 50
REWARD_GOLD: 20
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: wolves
TITLE: Wolf Pack
DESCRIPTION: Drive off the wolves.
REWARD_XP: 120
REWARD_GOLD: 40
REQUIRED_LEVEL: 2
PREREQUISITE: rats
";

    const ITEMS: &str = "\
ITEM_ID: potion
NAME: Health Potion
TYPE: consumable
EFFECT: health:20
COST: 25
DESCRIPTION: Restores 20 health.
";

    #[test]
    fn loads_both_catalogs() -> Result<()> {
        let dir = tempdir()?;
        let quests = dir.path().join("quests.txt");
        let items = dir.path().join("items.txt");
        fs::write(&quests, QUESTS)?;
        fs::write(&items, ITEMS)?;

        let catalog = load_catalog(&quests, &items)?;
        assert_eq!(catalog.quests.len(), 2);
        assert_eq!(catalog.quest("wolves").and_then(|q| q.prerequisite.as_deref()), Some("rats"));
        assert_eq!(catalog.item("potion").map(|i| i.cost), Some(25));
        Ok(())
    }

    #[test]
    fn missing_file_is_not_a_format_error() -> Result<()> {
        let dir = tempdir()?;
        let err = load_items(&dir.path().join("items.txt")).unwrap_err();
        assert!(matches!(err, PersistError::MissingCatalog { kind: CatalogKind::Items, .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn malformed_and_invalid_catalogs_are_format_errors() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("quests.txt");

        fs::write(&path, QUESTS.replace("REWARD_XP: 50", "REWARD_XP: fifty"))?;
        assert!(matches!(load_quests(&path), Err(PersistError::CatalogFormat { .. })));

        fs::write(&path, QUESTS.replace("PREREQUISITE: rats", "PREREQUISITE: bears"))?;
        let err = load_quests(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataCorruption);
        assert!(err.to_string().contains("bears"));
        Ok(())
    }
}
