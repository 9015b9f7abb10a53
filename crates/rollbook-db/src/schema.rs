//! Table descriptors and DDL rendering.
//!
//! An entity is described by a plain [`TableDefinition`] value: a table name
//! and an ordered list of typed columns, exactly one of which is the primary
//! key. Descriptors are validated before they reach the store and rendered
//! into `CREATE TABLE` statements in declaration order.

use std::collections::HashSet;
use std::fmt;

use rollbook_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Scalar column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataType {
    Integer,
    /// Character string, optionally length-limited.
    String { length: Option<u32> },
    Text,
    Real,
    Boolean,
    Blob,
}

impl DataType {
    /// Unbounded character string.
    pub const fn string() -> Self {
        Self::String { length: None }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::String { length: None } => write!(f, "VARCHAR"),
            Self::String { length: Some(n) } => write!(f, "VARCHAR({})", n),
            Self::Text => write!(f, "TEXT"),
            Self::Real => write!(f, "FLOAT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Blob => write!(f, "BLOB"),
        }
    }
}

/// Column constraint flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
    Unique,
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "PRIMARY KEY"),
            Self::NotNull => write!(f, "NOT NULL"),
            Self::Unique => write!(f, "UNIQUE"),
        }
    }
}

/// A single typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    /// A column with no constraints.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn primary_key(self) -> Self {
        self.with_constraint(ColumnConstraint::PrimaryKey)
    }

    pub fn not_null(self) -> Self {
        self.with_constraint(ColumnConstraint::NotNull)
    }

    pub fn unique(self) -> Self {
        self.with_constraint(ColumnConstraint::Unique)
    }

    /// Add a constraint; adding one twice is a no-op.
    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::PrimaryKey)
    }

    /// Render the column clause, e.g. `id INTEGER PRIMARY KEY`.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type);
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(&constraint.to_string());
        }
        sql
    }
}

/// Descriptor for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column. Declaration order is the table's column order.
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// The column marked as primary key, if any.
    pub fn primary_key_column(&self) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check that the descriptor can be turned into a table.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Names are identifiers, columns are unique, one primary key
    /// * `Err(Error::InvalidSchema)` - Describing the first problem found
    pub fn validate(&self) -> Result<()> {
        check_identifier("table", &self.name)?;

        if self.columns.is_empty() {
            return Err(Error::invalid_schema(format!(
                "table '{}' declares no columns",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            check_identifier("column", &column.name)?;
            // SQLite compares column names case-insensitively
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(Error::invalid_schema(format!(
                    "table '{}' declares column '{}' more than once",
                    self.name, column.name
                )));
            }
        }

        let primary_keys = self.columns.iter().filter(|c| c.is_primary_key()).count();
        if primary_keys != 1 {
            return Err(Error::invalid_schema(format!(
                "table '{}' must declare exactly one primary key column, found {}",
                self.name, primary_keys
            )));
        }

        Ok(())
    }

    /// Render the `CREATE TABLE` statement.
    ///
    /// # Example
    ///
    /// ```
    /// use rollbook_db::schema::{ColumnDefinition, DataType, TableDefinition};
    ///
    /// let table = TableDefinition::new("students")
    ///     .column(ColumnDefinition::new("id", DataType::Integer).primary_key())
    ///     .column(ColumnDefinition::new("name", DataType::string()));
    ///
    /// assert_eq!(
    ///     table.create_statement(true),
    ///     "CREATE TABLE IF NOT EXISTS students (id INTEGER PRIMARY KEY, name VARCHAR)"
    /// );
    /// ```
    pub fn create_statement(&self, if_not_exists: bool) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        format!(
            "CREATE TABLE {}{} ({})",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            self.name,
            columns.join(", ")
        )
    }
}

/// Validate a list of descriptors, including that table names don't repeat.
pub fn validate_all(tables: &[TableDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for table in tables {
        table.validate()?;
        if !seen.insert(table.name.to_ascii_lowercase()) {
            return Err(Error::invalid_schema(format!(
                "table '{}' is declared more than once",
                table.name
            )));
        }
    }
    Ok(())
}

fn check_identifier(kind: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if !valid {
        return Err(Error::invalid_schema(format!(
            "{} name '{}' is not a valid identifier",
            kind, name
        )));
    }

    if name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(Error::invalid_schema(format!(
            "{} name '{}' uses the reserved sqlite_ prefix",
            kind, name
        )));
    }

    Ok(())
}
