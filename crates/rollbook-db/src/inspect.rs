//! Read-only schema introspection.

use rollbook_common::{Error, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

/// One column as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type, as written in the `CREATE TABLE` statement.
    pub data_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// User tables in the store, sorted by name.
///
/// Only the literal `sqlite_` prefix is internal; names like `sqlitexdata`
/// are ordinary tables.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_'
             ORDER BY name",
        )
        .map_err(Error::storage)?;

    let names = stmt
        .query_map([], |row| row.get(0))
        .map_err(Error::storage)?
        .collect::<rusqlite::Result<Vec<String>>>()
        .map_err(Error::storage)?;

    Ok(names)
}

/// Columns of `table` in table order, or `None` if there is no such table.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Option<Vec<ColumnInfo>>> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            [table],
            |_| Ok(()),
        )
        .optional()
        .map_err(Error::storage)?
        .is_some();

    if !exists {
        return Ok(None);
    }

    let mut stmt = conn
        .prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
        )
        .map_err(Error::storage)?;

    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
                not_null: row.get::<_, i64>(2)? != 0,
                primary_key: row.get::<_, i64>(3)? > 0,
            })
        })
        .map_err(Error::storage)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::storage)?;

    Ok(Some(columns))
}
