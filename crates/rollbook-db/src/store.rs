//! Store connection management.
//!
//! A store is a single SQLite database, file-backed or in memory. Connections
//! are opened per operation and released when dropped; there is no pooling.

use rollbook_common::{Error, Result, StoreLocation};
use rusqlite::{Connection, OpenFlags};

/// Open the store at `location`, creating the database file if it doesn't
/// exist.
///
/// The connection is probed with a schema read so that a path pointing at
/// something other than a SQLite database fails here rather than on first use.
///
/// # Arguments
///
/// * `location` - Where the store lives
///
/// # Returns
///
/// * `Ok(Connection)` - Read-write connection
/// * `Err(Error::Storage)` - If the engine cannot open or read the store
///
/// # Example
///
/// ```
/// use rollbook_common::StoreLocation;
/// use rollbook_db::store::open_store;
///
/// let conn = open_store(&StoreLocation::Memory).unwrap();
/// ```
pub fn open_store(location: &StoreLocation) -> Result<Connection> {
    let conn = match location {
        // No SQLITE_OPEN_URI: a path like `file:x.db` is a plain file name
        StoreLocation::File(path) => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
        StoreLocation::Memory => Connection::open_in_memory(),
    }
    .map_err(Error::storage)?;

    probe(&conn)?;
    tracing::debug!("Opened store at {}", location);
    Ok(conn)
}

/// Open an existing store without creating or modifying it.
///
/// # Returns
///
/// * `Ok(Connection)` - Read-only connection
/// * `Err(Error::Storage)` - If the store doesn't exist or can't be read
pub fn open_store_read_only(location: &StoreLocation) -> Result<Connection> {
    let conn = match location {
        StoreLocation::File(path) => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
        StoreLocation::Memory => Connection::open_in_memory(),
    }
    .map_err(Error::storage)?;

    probe(&conn)?;
    tracing::debug!("Opened store at {} (read-only)", location);
    Ok(conn)
}

fn probe(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map_err(Error::storage)?;
    Ok(())
}
