//! Read queries for the collection database.

use rusqlite::{Connection, OptionalExtension, Row, params};
use tcg_shelf_core::{NOT_AVAILABLE, SetRecord, StoredCard};

use crate::error::StoreError;

const STORED_CARD_COLUMNS: &str = r#"
    SELECT c.id, c.name, c.type, c.rarity, c.image_url,
           COALESCE(s.name, 'Unknown Set'), c.set_id
    FROM card c LEFT JOIN "set" s ON s.id = c.set_id"#;

/// List collected cards ordered by name.
///
/// With a non-empty `name_filter`, only names containing it (ignoring case)
/// are returned. `%` and `_` in the filter match literally.
pub fn list_cards(
    conn: &Connection,
    name_filter: Option<&str>,
) -> Result<Vec<StoredCard>, StoreError> {
    let cards = match name_filter.filter(|f| !f.is_empty()) {
        Some(filter) => {
            let sql = format!(
                "{STORED_CARD_COLUMNS}
                 WHERE LOWER(c.name) LIKE '%' || ?1 || '%' ESCAPE '\\'
                 ORDER BY c.name ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let pattern = escape_like(&filter.to_lowercase());
            let rows = stmt.query_map(params![pattern], row_to_stored_card)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let sql = format!("{STORED_CARD_COLUMNS} ORDER BY c.name ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_stored_card)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(cards)
}

/// Look up a single collected card by id.
pub fn get_card(conn: &Connection, id: &str) -> Result<Option<StoredCard>, StoreError> {
    let sql = format!("{STORED_CARD_COLUMNS} WHERE c.id = ?1");
    let card = conn
        .query_row(&sql, params![id], row_to_stored_card)
        .optional()?;
    Ok(card)
}

/// Look up a set by id.
pub fn find_set(conn: &Connection, id: &str) -> Result<Option<SetRecord>, StoreError> {
    let set = conn
        .query_row(
            r#"SELECT id, name, release_date FROM "set" WHERE id = ?1"#,
            params![id],
            row_to_set,
        )
        .optional()?;
    Ok(set)
}

/// List all sets ordered by id, including ones no card references anymore.
pub fn list_sets(conn: &Connection) -> Result<Vec<SetRecord>, StoreError> {
    let mut stmt = conn.prepare(r#"SELECT id, name, release_date FROM "set" ORDER BY id"#)?;
    let rows = stmt.query_map([], row_to_set)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(crate) fn card_exists(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM card WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn escape_like(filter: &str) -> String {
    filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn or_sentinel(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn row_to_stored_card(row: &Row) -> rusqlite::Result<StoredCard> {
    Ok(StoredCard {
        id: row.get(0)?,
        name: row.get(1)?,
        card_type: or_sentinel(row.get(2)?),
        rarity: or_sentinel(row.get(3)?),
        image_url: or_sentinel(row.get(4)?),
        set_name: row.get(5)?,
        set_id: row.get(6)?,
    })
}

fn row_to_set(row: &Row) -> rusqlite::Result<SetRecord> {
    Ok(SetRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        release_date: or_sentinel(row.get(2)?),
    })
}
