//! Shared catalog data model for Quest Chronicles.

pub mod codec;
pub mod defs;
pub mod validate;

pub use codec::{CatalogParseError, parse_items, parse_quests, write_items, write_quests};
pub use defs::*;
pub use validate::{ValidationError, validate_catalog};
