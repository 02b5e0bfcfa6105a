use serde::Deserialize;
use tcg_shelf_core::{
    CardRecord, NOT_AVAILABLE, UNKNOWN_CARD, UNKNOWN_SET, UNKNOWN_TYPE, image_url_from_base,
    normalize_name,
};

/// A card object as the catalog returns it.
///
/// The list endpoint only sends `id`, `localId`, `name` and `image`; the
/// single-card endpoint adds `set`, `types`, `rarity` and much more. Every
/// field is optional so both shapes parse through the same struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Base image path, without quality or extension.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub set: Option<RawSet>,
}

/// The nested set object of a detailed card.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSet {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Which endpoint a raw card came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    /// Name search list entry.
    Brief,
    /// Single-card lookup by id.
    Full,
}

/// Map a raw catalog card into a normalized record.
///
/// The name has its apostrophes rewritten and the image path gets the fixed
/// suffix (or the placeholder) in both cases. Only `Detail::Full` reads the
/// set, type and rarity fields; a brief record leaves them at `N/A`.
pub fn card_from_raw(raw: &RawCard, detail: Detail) -> CardRecord {
    let id = raw.id.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let name = normalize_name(raw.name.as_deref().unwrap_or(UNKNOWN_CARD));
    let image_url = image_url_from_base(raw.image.as_deref());

    match detail {
        Detail::Brief => CardRecord::brief(id, name, image_url),
        Detail::Full => {
            let card_type = raw
                .types
                .as_ref()
                .and_then(|t| t.first())
                .cloned()
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
            let set = raw.set.as_ref();
            let set_id = set
                .and_then(|s| s.id.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let set_name = set
                .and_then(|s| s.name.clone())
                .unwrap_or_else(|| UNKNOWN_SET.to_string());
            let rarity = raw
                .rarity
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());

            CardRecord {
                id,
                name,
                image_url,
                set_name,
                set_id,
                card_type,
                rarity,
            }
        }
    }
}
