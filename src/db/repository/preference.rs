use std::collections::HashMap;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;

/// Get a user preference by key. Returns None if not set.
pub fn get_user_preference(
    conn: &Connection,
    key: &str,
) -> Result<Option<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM user_preferences WHERE key = ?1")?;
    match stmt.query_row([key], |row| row.get::<_, String>(0)) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Get every stored preference (bulk load at startup).
pub fn get_all_user_preferences(
    conn: &Connection,
) -> Result<HashMap<String, String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT key, value FROM user_preferences ORDER BY key")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let (key, value) = row?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Set a user preference (upsert).
pub fn set_user_preference(
    conn: &Connection,
    key: &str,
    value: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_preferences (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// Upsert several preferences in one transaction.
pub fn set_user_preferences<'a>(
    conn: &mut Connection,
    entries: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    for (key, value) in entries {
        set_user_preference(&tx, key, &value)?;
    }
    tx.commit()?;
    Ok(())
}

/// Delete a user preference.
pub fn delete_user_preference(conn: &Connection, key: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM user_preferences WHERE key = ?1", [key])?;
    Ok(())
}
