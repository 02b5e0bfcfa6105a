//! Data model types for the card collection.
//!
//! `CardRecord` is both the transfer shape handed out by catalog searches and
//! the enriched form that gets persisted. `StoredCard` is what the collection
//! hands back after joining with the `set` table.

use serde::{Deserialize, Serialize};

/// Placeholder for a field the catalog did not populate (or not yet enriched).
pub const NOT_AVAILABLE: &str = "N/A";

/// Name used when the catalog payload has no `name`.
pub const UNKNOWN_CARD: &str = "Unknown Card";

/// Set name used when the catalog payload or the join has no set.
pub const UNKNOWN_SET: &str = "Unknown Set";

/// Card type used when the catalog's `types` list is empty or absent.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Image URL used when the catalog payload has no image base path.
pub const PLACEHOLDER_IMAGE: &str = "placeholder.png";

/// Suffix appended to the catalog's base image path.
pub const IMAGE_SUFFIX: &str = "/high.webp";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

// ── Card ────────────────────────────────────────────────────────────────────

/// A card as returned by the catalog, brief or enriched.
///
/// Wire keys follow the REST surface: the set's display name travels as `set`
/// and the card type as `type`. Missing fields deserialize to the sentinel so
/// a partial body from a client still parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default = "not_available")]
    pub name: String,
    #[serde(default = "not_available")]
    pub image_url: String,
    #[serde(rename = "set", default = "not_available")]
    pub set_name: String,
    #[serde(default = "not_available")]
    pub set_id: String,
    #[serde(rename = "type", default = "not_available")]
    pub card_type: String,
    #[serde(default = "not_available")]
    pub rarity: String,
}

impl CardRecord {
    /// A brief record: only id, name and image are known.
    pub fn brief(
        id: impl Into<String>,
        name: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: image_url.into(),
            set_name: not_available(),
            set_id: not_available(),
            card_type: not_available(),
            rarity: not_available(),
        }
    }

    /// True when the record carries a usable primary key.
    pub fn has_valid_id(&self) -> bool {
        !crate::is_missing(&self.id)
    }

    /// True when the record references a concrete set.
    pub fn has_valid_set_id(&self) -> bool {
        !crate::is_missing(&self.set_id)
    }
}

// ── Set ─────────────────────────────────────────────────────────────────────

/// An expansion set. Cards reference it through `set_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: String,
    pub name: String,
    /// Never populated from the catalog; always the sentinel.
    pub release_date: String,
}

impl SetRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            release_date: not_available(),
        }
    }
}

// ── Stored card ─────────────────────────────────────────────────────────────

/// A card row from the collection, joined with its set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCard {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub rarity: String,
    pub image_url: String,
    /// Display name of the joined set, or `Unknown Set`.
    #[serde(rename = "set")]
    pub set_name: String,
    pub set_id: String,
}
