//! Schema bootstrap.
//!
//! Ensures that every declared table exists in a store. Missing tables are
//! created from their descriptors; tables that already exist are left exactly
//! as they are, with no column diffing or migration. All tables are created
//! in one transaction, so a failure leaves the store as it was.

use rollbook_common::{Error, Result, StoreLocation};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::schema::{validate_all, TableDefinition};
use crate::store::open_store;

/// What the bootstrap did with one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOutcome {
    pub table: String,
    pub status: TableStatus,
}

/// Per-table outcomes, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub tables: Vec<TableOutcome>,
}

impl BootstrapReport {
    /// Names of the tables created by this run.
    pub fn created(&self) -> Vec<&str> {
        self.with_status(TableStatus::Created)
    }

    /// Names of the tables that were already there.
    pub fn already_present(&self) -> Vec<&str> {
        self.with_status(TableStatus::AlreadyPresent)
    }

    /// True when the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.tables
            .iter()
            .all(|t| t.status == TableStatus::AlreadyPresent)
    }

    fn with_status(&self, status: TableStatus) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.table.as_str())
            .collect()
    }
}

/// Open or create the store at `location` and ensure every table exists.
///
/// Descriptors are validated before the store is opened, so an invalid
/// definition never creates a database file. The connection lives only for
/// the duration of this call.
///
/// # Arguments
///
/// * `location` - Store to bootstrap
/// * `tables` - Entity definitions, created in the given order
///
/// # Returns
///
/// * `Ok(BootstrapReport)` - Which tables were created and which already existed
/// * `Err(Error::InvalidSchema)` - If a descriptor is malformed
/// * `Err(Error::Storage)` - If the store cannot be opened or a DDL statement fails
///
/// # Example
///
/// ```
/// use rollbook_common::StoreLocation;
/// use rollbook_db::bootstrap::ensure_schema;
/// use rollbook_db::models::entities;
///
/// let report = ensure_schema(&StoreLocation::Memory, &entities()).unwrap();
/// assert_eq!(report.created(), vec!["students"]);
/// ```
pub fn ensure_schema(
    location: &StoreLocation,
    tables: &[TableDefinition],
) -> Result<BootstrapReport> {
    validate_all(tables)?;

    tracing::debug!("Ensuring {} table(s) at {}", tables.len(), location);
    let conn = open_store(location)?;
    ensure_tables(&conn, tables)
}

/// Ensure every table exists on an already-open connection.
///
/// For each descriptor the name is looked up in `sqlite_master`:
///
/// 1. Absent: `CREATE TABLE IF NOT EXISTS` is executed
/// 2. Present as a table: nothing is done
/// 3. Present as a view or index: a plain `CREATE TABLE` is issued so the
///    engine reports the collision, and the transaction is rolled back
pub fn ensure_tables(conn: &Connection, tables: &[TableDefinition]) -> Result<BootstrapReport> {
    validate_all(tables)?;

    let tx = conn.unchecked_transaction().map_err(Error::storage)?;

    let mut report = BootstrapReport::default();
    for table in tables {
        let status = ensure_table(&tx, table)?;
        report.tables.push(TableOutcome {
            table: table.name.clone(),
            status,
        });
    }

    tx.commit().map_err(Error::storage)?;

    let created = report.created();
    if created.is_empty() {
        tracing::info!("Schema already up to date ({} table(s))", report.tables.len());
    } else {
        tracing::info!("Created table(s): {}", created.join(", "));
    }

    Ok(report)
}

fn ensure_table(conn: &Connection, table: &TableDefinition) -> Result<TableStatus> {
    match existing_object_type(conn, &table.name)?.as_deref() {
        Some("table") => {
            tracing::debug!("Table {} already present, leaving unchanged", table.name);
            Ok(TableStatus::AlreadyPresent)
        }
        Some(other) => {
            tracing::warn!(
                "Name {} is taken by an existing {}, attempting create anyway",
                table.name,
                other
            );
            conn.execute_batch(&table.create_statement(false))
                .map_err(Error::storage)?;
            // Only reachable if the engine accepted the statement
            Ok(TableStatus::Created)
        }
        None => {
            let sql = table.create_statement(true);
            tracing::debug!(
                "Creating table {} ({}): {}",
                table.name,
                table.column_names().join(", "),
                sql
            );
            conn.execute_batch(&sql).map_err(Error::storage)?;
            Ok(TableStatus::Created)
        }
    }
}

/// Type of the schema object named `name` (tables win over other kinds).
fn existing_object_type(conn: &Connection, name: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT type FROM sqlite_master
         WHERE name = ?1 COLLATE NOCASE AND type IN ('table', 'view', 'index')
         ORDER BY type = 'table' DESC
         LIMIT 1",
        [name],
        |row| row.get(0),
    )
    .optional()
    .map_err(Error::storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{list_tables, table_columns};
    use crate::models::{entities, Student};
    use crate::schema::{ColumnDefinition, DataType};
    use tempfile::tempdir;

    fn file_location(dir: &tempfile::TempDir, name: &str) -> StoreLocation {
        StoreLocation::File(dir.path().join(name))
    }

    #[test]
    fn test_fresh_store_gets_students_table() {
        let dir = tempdir().unwrap();
        let location = file_location(&dir, "students.db");

        let report = ensure_schema(&location, &entities()).unwrap();
        assert_eq!(report.created(), vec!["students"]);
        assert!(!report.is_noop());
        assert!(dir.path().join("students.db").exists());

        let conn = open_store(&location).unwrap();
        assert_eq!(list_tables(&conn).unwrap(), vec!["students"]);

        let columns = table_columns(&conn, "students").unwrap().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].data_type, "INTEGER");
        assert!(columns[0].primary_key);
        assert_eq!(columns[1].name, "name");
        assert_eq!(columns[1].data_type, "VARCHAR");
        assert!(!columns[1].primary_key);
        assert!(!columns[1].not_null);
    }

    #[test]
    fn test_second_run_is_noop() {
        let dir = tempdir().unwrap();
        let location = file_location(&dir, "students.db");

        ensure_schema(&location, &entities()).unwrap();
        let before = table_columns(&open_store(&location).unwrap(), "students").unwrap();

        let report = ensure_schema(&location, &entities()).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.already_present(), vec!["students"]);

        let conn = open_store(&location).unwrap();
        let after = table_columns(&conn, "students").unwrap();
        assert_eq!(before, after);
        assert_eq!(list_tables(&conn).unwrap(), vec!["students"]);
    }

    #[test]
    fn test_existing_table_not_altered() {
        let conn = open_store(&StoreLocation::Memory).unwrap();
        conn.execute_batch(
            "CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT, year INTEGER)",
        )
        .unwrap();

        let report = ensure_tables(&conn, &entities()).unwrap();
        assert!(report.is_noop());

        let columns = table_columns(&conn, "students").unwrap().unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "year"]);
    }

    #[test]
    fn test_unrelated_table_untouched() {
        let dir = tempdir().unwrap();
        let location = file_location(&dir, "shop.db");

        {
            let conn = open_store(&location).unwrap();
            conn.execute_batch(
                "CREATE TABLE orders (id INTEGER PRIMARY KEY, total REAL);
                 INSERT INTO orders (total) VALUES (9.5), (12.25);",
            )
            .unwrap();
        }

        let report = ensure_schema(&location, &entities()).unwrap();
        assert_eq!(report.created(), vec!["students"]);

        let conn = open_store(&location).unwrap();
        assert_eq!(list_tables(&conn).unwrap(), vec!["orders", "students"]);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_missing_directory_fails_without_creating_anything() {
        let dir = tempdir().unwrap();
        let location = StoreLocation::File(dir.path().join("nope").join("students.db"));

        let err = ensure_schema(&location, &entities()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(!dir.path().join("nope").exists());
    }

    #[test]
    fn test_view_collision_surfaces_engine_error() {
        let conn = open_store(&StoreLocation::Memory).unwrap();
        conn.execute_batch("CREATE VIEW students AS SELECT 1 AS id, 'x' AS name")
            .unwrap();

        let err = ensure_tables(&conn, &entities()).unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("already exists"), "{}", err);
        assert!(list_tables(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_failure_rolls_back_earlier_tables() {
        let conn = open_store(&StoreLocation::Memory).unwrap();
        conn.execute_batch("CREATE VIEW courses AS SELECT 1 AS id").unwrap();

        let courses = TableDefinition::new("courses")
            .column(ColumnDefinition::new("id", DataType::Integer).primary_key());
        let tables = vec![Student::table(), courses];

        assert!(ensure_tables(&conn, &tables).is_err());
        assert!(table_columns(&conn, "students").unwrap().is_none());
    }

    #[test]
    fn test_invalid_descriptor_opens_nothing() {
        let dir = tempdir().unwrap();
        let location = file_location(&dir, "students.db");
        let keyless = TableDefinition::new("students")
            .column(ColumnDefinition::new("name", DataType::string()));

        let err = ensure_schema(&location, &[keyless]).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
        assert!(!dir.path().join("students.db").exists());
    }

    #[test]
    fn test_ids_assigned_by_engine() {
        let conn = open_store(&StoreLocation::Memory).unwrap();
        ensure_tables(&conn, &entities()).unwrap();

        conn.execute("INSERT INTO students (name) VALUES (?1)", ["Ada"])
            .unwrap();
        conn.execute("INSERT INTO students (name) VALUES (NULL)", [])
            .unwrap();

        let mut stmt = conn
            .prepare("SELECT id, name FROM students ORDER BY id")
            .unwrap();
        let students: Vec<Student> = stmt
            .query_map([], Student::from_row)
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(students[0], Student { id: 1, name: Some("Ada".to_string()) });
        assert_eq!(students[1], Student { id: 2, name: None });

        let duplicate = conn.execute("INSERT INTO students (id, name) VALUES (1, 'Grace')", []);
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_empty_definition_list() {
        let conn = open_store(&StoreLocation::Memory).unwrap();
        let report = ensure_tables(&conn, &[]).unwrap();
        assert!(report.tables.is_empty());
        assert!(report.is_noop());
    }

    #[cfg(unix)]
    fn set_mode(path: &std::path::Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_directory_fails() {
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        set_mode(&locked, 0o555);

        // Permission bits don't bind root
        if std::fs::write(locked.join("canary"), b"").is_ok() {
            set_mode(&locked, 0o755);
            return;
        }

        let location = StoreLocation::File(locked.join("students.db"));
        let result = ensure_schema(&location, &entities());
        set_mode(&locked, 0o755);

        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(!locked.join("students.db").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_store_file_fails() {
        use rusqlite::OpenFlags;

        let dir = tempdir().unwrap();
        let path = dir.path().join("students.db");
        open_store(&StoreLocation::File(path.clone()))
            .unwrap()
            .execute_batch("CREATE TABLE orders (id INTEGER PRIMARY KEY)")
            .unwrap();
        set_mode(&path, 0o444);

        if std::fs::OpenOptions::new().write(true).open(&path).is_ok() {
            set_mode(&path, 0o644);
            return;
        }

        // SQLite falls back to a read-only open; the failure comes at CREATE
        let err = ensure_schema(&StoreLocation::File(path.clone()), &entities()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(err.to_string().contains("readonly"), "{}", err);

        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY).unwrap();
        assert_eq!(list_tables(&conn).unwrap(), vec!["orders"]);
    }
}
