mod cli;

use rollbook::config;
use rollbook_common::StoreLocation;
use rollbook_db::{
    bootstrap::{self, TableStatus},
    inspect, models, store,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "rollbook=debug,rollbook_db=trace,rollbook_common=debug".to_string()
        } else {
            "rollbook=info,rollbook_db=info".to_string()
        }
    });

    // Logs go to stderr so that stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let database = cli.database.as_deref();

    match cli.command.unwrap_or(Commands::Bootstrap) {
        Commands::Bootstrap => {
            let location = resolve_store(config_path, database)?;
            run_bootstrap(&location)
        }
        Commands::Schema { json } => print_schema(json),
        Commands::Inspect { json } => {
            let location = resolve_store(config_path, database)?;
            inspect_store(&location, json)
        }
        Commands::Version => {
            println!("rollbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// `--database` wins over the config file, which wins over the default.
fn resolve_store(config_path: Option<&Path>, database: Option<&str>) -> Result<StoreLocation> {
    match database {
        Some(raw) => config::resolve_location(raw),
        None => config::load_config_or_default(config_path)?.store_location(),
    }
}

fn run_bootstrap(location: &StoreLocation) -> Result<()> {
    tracing::info!("Bootstrapping schema at {}", location);

    let report = bootstrap::ensure_schema(location, &models::entities()).map_err(|e| {
        if e.is_storage() {
            tracing::error!("Storage engine rejected the bootstrap at {}", location);
        }
        anyhow::Error::new(e).context(format!("Failed to bootstrap schema at {}", location))
    })?;

    println!("Database ready at {}", location);
    for outcome in &report.tables {
        match outcome.status {
            TableStatus::Created => println!("  created {}", outcome.table),
            TableStatus::AlreadyPresent => println!("  {} already present", outcome.table),
        }
    }

    Ok(())
}

fn print_schema(json: bool) -> Result<()> {
    let tables = models::entities();

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        for table in &tables {
            println!("{};", table.create_statement(true));
        }
    }

    Ok(())
}

fn inspect_store(location: &StoreLocation, json: bool) -> Result<()> {
    let conn = store::open_store_read_only(location)
        .with_context(|| format!("Failed to open store at {}", location))?;

    let mut tables = Vec::new();
    for name in inspect::list_tables(&conn)? {
        let columns = inspect::table_columns(&conn, &name)?.unwrap_or_default();
        tables.push((name, columns));
    }

    if json {
        let value: Vec<_> = tables
            .iter()
            .map(|(name, columns)| serde_json::json!({ "table": name, "columns": columns }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if tables.is_empty() {
        println!("No tables in {}", location);
        return Ok(());
    }

    for (name, columns) in &tables {
        println!("{}", name);
        for column in columns {
            print!("  {} {}", column.name, column.data_type);
            if column.primary_key {
                print!(" PRIMARY KEY");
            }
            if column.not_null {
                print!(" NOT NULL");
            }
            println!();
        }
    }

    Ok(())
}
