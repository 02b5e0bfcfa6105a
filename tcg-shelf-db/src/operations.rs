//! Write operations on the collection: sets and cards.

use rusqlite::{Connection, params};
use tcg_shelf_core::{CardRecord, SetRecord, is_missing};

use crate::error::StoreError;
use crate::queries::{card_exists, find_set};

// ── Set Operations ──────────────────────────────────────────────────────────

/// Return the set with `id`, inserting it first if it does not exist.
///
/// A new set gets `name` and an unknown (`N/A`) release date. An existing set
/// is returned unchanged, even when `name` differs.
pub fn ensure_set(conn: &Connection, id: &str, name: &str) -> Result<SetRecord, StoreError> {
    if is_missing(id) {
        return Err(StoreError::MissingSetId);
    }
    if let Some(existing) = find_set(conn, id)? {
        return Ok(existing);
    }

    let set = SetRecord::new(id, name);
    conn.execute(
        r#"INSERT INTO "set" (id, name, release_date) VALUES (?1, ?2, ?3)"#,
        params![set.id, set.name, set.release_date],
    )?;
    log::debug!("Created set '{}' ({})", set.id, set.name);
    Ok(set)
}

// ── Card Operations ─────────────────────────────────────────────────────────

/// Insert an enriched card, creating its set on demand, in one transaction.
///
/// A duplicate id fails with [`StoreError::AlreadyInCollection`] before any
/// write. Every other failure drops the transaction, which rolls it back.
/// Returns the human-readable success message.
pub fn create_card(conn: &mut Connection, card: &CardRecord) -> Result<String, StoreError> {
    let tx = conn.transaction()?;

    if card_exists(&tx, &card.id)? {
        return Err(StoreError::AlreadyInCollection {
            id: card.id.clone(),
        });
    }
    if !card.has_valid_set_id() {
        return Err(StoreError::MissingSetId);
    }

    let set = ensure_set(&tx, &card.set_id, &card.set_name)?;
    tx.execute(
        "INSERT INTO card (id, name, type, rarity, image_url, set_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            card.id,
            card.name,
            card.card_type,
            card.rarity,
            card.image_url,
            set.id,
        ],
    )?;
    tx.commit()?;

    Ok(format!(
        "Card {} successfully added to collection.",
        card.name
    ))
}

/// Delete a card by id. Its set is left in place.
pub fn delete_card(conn: &mut Connection, id: &str) -> Result<String, StoreError> {
    let tx = conn.transaction()?;
    let deleted = tx.execute("DELETE FROM card WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(StoreError::NotFound { id: id.to_string() });
    }
    tx.commit()?;
    Ok(format!("Card ID {id} deleted."))
}
