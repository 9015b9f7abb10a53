mod types;

pub use types::*;

use anyhow::{Context, Result};
use rollbook_common::StoreLocation;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./rollbook.toml", "~/.config/rollbook/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

impl Config {
    /// Parsed store location, with `~` expanded.
    pub fn store_location(&self) -> Result<StoreLocation> {
        resolve_location(&self.database.location)
    }
}

/// Parse a store identifier given on the command line or in a config file.
pub fn resolve_location(raw: &str) -> Result<StoreLocation> {
    let expanded = shellexpand::tilde(raw);
    StoreLocation::parse(expanded.as_ref())
        .with_context(|| format!("Invalid store location: {:?}", raw))
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    config.store_location()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.location, "students.db");
        assert_eq!(
            config.store_location().unwrap(),
            StoreLocation::File(PathBuf::from("students.db"))
        );
    }

    #[test]
    fn test_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rollbook.toml");
        std::fs::write(
            &path,
            r#"
[database]
location = "sqlite:////srv/school/roll.db"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.store_location().unwrap(),
            StoreLocation::File(PathBuf::from("/srv/school/roll.db"))
        );
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rollbook.toml");
        std::fs::write(&path, "").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database.location, DEFAULT_LOCATION);
    }

    #[test]
    fn test_invalid_location_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rollbook.toml");
        std::fs::write(&path, "[database]\nlocation = \"postgres://db/school\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("postgres"));
    }

    #[test]
    fn test_unreadable_config() {
        let err = load_config(Path::new("/nonexistent/rollbook.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_custom_path_takes_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[database]\nlocation = \":memory:\"\n").unwrap();

        let config = load_config_or_default(Some(&path)).unwrap();
        assert!(config.store_location().unwrap().is_memory());
    }

    #[test]
    fn test_tilde_expanded() {
        let location = resolve_location("~/roll.db").unwrap();
        let path = location.path().unwrap();
        assert!(path.ends_with("roll.db"));
        if std::env::var_os("HOME").is_some() {
            assert!(!path.starts_with("~"));
        }
    }
}
