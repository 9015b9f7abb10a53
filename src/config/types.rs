use serde::{Deserialize, Serialize};

/// Store location used when nothing else is configured.
pub const DEFAULT_LOCATION: &str = "students.db";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// File path or `sqlite://` URL of the store
    #[serde(default = "default_location")]
    pub location: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
        }
    }
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}
