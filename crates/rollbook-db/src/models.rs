//! Entity models and their table descriptors.
//!
//! Each model declares its own [`TableDefinition`]; [`entities`] is the
//! explicit list handed to the bootstrap.

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnDefinition, DataType, TableDefinition};

/// A student record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: Option<String>,
}

impl Student {
    pub const TABLE: &'static str = "students";

    /// `students(id INTEGER PRIMARY KEY, name VARCHAR)`.
    ///
    /// No NOT NULL, length limit or AUTOINCREMENT is declared; ids come from
    /// SQLite's rowid aliasing of an `INTEGER PRIMARY KEY`.
    pub fn table() -> TableDefinition {
        TableDefinition::new(Self::TABLE)
            .column(ColumnDefinition::new("id", DataType::Integer).primary_key())
            .column(ColumnDefinition::new("name", DataType::string()))
    }

    /// Map a row selected as `id, name`.
    #[cfg(test)]
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// Every table the application needs, in creation order.
pub fn entities() -> Vec<TableDefinition> {
    vec![Student::table()]
}
