use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::*;

/// Validation error for duplicate ids, dangling references or bad values in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: CatalogKind, id: String },
    MissingReference { kind: CatalogKind, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate ids, prerequisite links and basic invariants across both catalogs.
///
/// ```
/// use chronicles_data::{QuestDef, validate_catalog};
///
/// let quests = vec![QuestDef {
///     id: "rats".into(),
///     title: "Rats".into(),
///     description: "Clear the cellar.".into(),
///     reward_xp: 100,
///     reward_gold: 50,
///     required_level: 1,
///     prerequisite: None,
/// }];
/// assert!(validate_catalog(&quests, &[]).is_empty());
/// ```
pub fn validate_catalog(quests: &[QuestDef], items: &[ItemDef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut quest_ids = HashSet::new();
    let mut item_ids = HashSet::new();
    track_ids(
        CatalogKind::Quests,
        quests.iter().map(|q| q.id.as_str()),
        &mut quest_ids,
        &mut errors,
    );
    track_ids(
        CatalogKind::Items,
        items.iter().map(|i| i.id.as_str()),
        &mut item_ids,
        &mut errors,
    );

    for quest in quests {
        if quest.required_level == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("quest '{}' required level must be at least 1", quest.id),
            });
        }
        if let Some(prereq) = &quest.prerequisite {
            if prereq == &quest.id {
                errors.push(ValidationError::InvalidValue {
                    context: format!("quest '{}' lists itself as its prerequisite", quest.id),
                });
            } else if !quest_ids.contains(prereq.as_str()) {
                errors.push(ValidationError::MissingReference {
                    kind: CatalogKind::Quests,
                    id: prereq.clone(),
                    context: format!("prerequisite of quest '{}'", quest.id),
                });
            }
        }
    }

    check_prerequisite_cycles(quests, &mut errors);

    for item in items {
        if item.name.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("item '{}' has an empty name", item.id),
            });
        }
    }

    errors
}

fn track_ids<'a>(
    kind: CatalogKind,
    ids: impl Iterator<Item = &'a str>,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if id.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("{kind} with an empty id"),
            });
        } else if !seen.insert(id) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

/// Follow each quest's prerequisite link and report any chain that loops back on itself.
/// Self-references are reported separately and skipped here.
fn check_prerequisite_cycles(quests: &[QuestDef], errors: &mut Vec<ValidationError>) {
    let links: HashMap<&str, &str> = quests
        .iter()
        .filter_map(|q| q.prerequisite.as_deref().map(|p| (q.id.as_str(), p)))
        .filter(|(id, prereq)| id != prereq)
        .collect();

    let mut reported: HashSet<&str> = HashSet::new();
    for quest in quests {
        let mut visited = vec![quest.id.as_str()];
        let mut current = quest.id.as_str();
        while let Some(next) = links.get(current).copied() {
            if let Some(pos) = visited.iter().position(|id| *id == next) {
                let cycle = &visited[pos..];
                // report each loop once, keyed by its smallest member
                let key = cycle.iter().min().copied().unwrap_or(next);
                if reported.insert(key) {
                    errors.push(ValidationError::InvalidValue {
                        context: format!("prerequisite cycle: {} -> {next}", cycle.join(" -> ")),
                    });
                }
                break;
            }
            visited.push(next);
            current = next;
        }
    }
}
