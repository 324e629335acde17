//! # AdminKit CLI
//!
//! Command-line interface for AdminKit.
//!
//! Loads type descriptors from JSON files, builds the entity metadata and
//! exercises it without a web front end.
//!
//! ## Commands
//!
//! - `list` - List the registered entities
//! - `inspect` - Show an entity's resolved metadata
//! - `filter` - Compile list filters into a parameterized WHERE clause
//! - `key` - Decode a composite key string
//! - `bind` - Bind form fields into a row and show its display string
//!

pub mod commands;
pub mod loader;

use adminkit_core::AdminSettings;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::FilterRequest;
use std::path::PathBuf;

pub use loader::{build_registry, load_descriptors, load_settings};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Parser)]
#[command(
    name = "adminkit",
    about = "Metadata-driven CRUD administration toolkit",
    version
)]
pub struct Cli {
    /// Settings file (TOML or JSON)
    #[arg(short, long, global = true, env = "ADMINKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Descriptor file or directory (defaults to descriptor_dir from settings)
    #[arg(short, long, global = true)]
    pub descriptors: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered entities
    List,

    /// Show an entity's resolved metadata
    Inspect {
        /// Entity name
        entity: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile list filters into a WHERE clause
    Filter {
        /// Entity name
        entity: String,

        /// Filter value as PROPERTY=VALUE (repeatable)
        #[arg(short = 'f', long = "filter", value_parser = parse_pair)]
        filters: Vec<(String, String)>,

        /// Free-text search term
        #[arg(short, long)]
        search: Option<String>,

        /// Table alias prefixed to columns (e.g. "p.")
        #[arg(long, default_value = "")]
        alias: String,

        /// Anchor relative date ranges at this day (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Decode a composite key string
    Key {
        /// Entity name
        entity: String,

        /// Key values joined with '`'
        key: String,
    },

    /// Bind form fields into a row
    Bind {
        /// Entity name
        entity: String,

        /// Field value as NAME=VALUE (repeatable)
        #[arg(short = 'F', long = "field", value_parser = parse_pair)]
        fields: Vec<(String, String)>,

        /// Key of the record being edited
        #[arg(short, long)]
        key: Option<String>,
    },
}

/// Parse a `NAME=VALUE` argument
fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

/// Run a parsed command line and print its output
pub fn run(cli: Cli, settings: &AdminSettings) -> anyhow::Result<()> {
    let registry = build_registry(settings, cli.descriptors.as_deref())?;

    let output = match cli.command {
        Command::List => commands::list(&registry)?,
        Command::Inspect { entity, json } => commands::inspect(&registry, &entity, json)?,
        Command::Filter {
            entity,
            filters,
            search,
            alias,
            today,
        } => {
            let request = FilterRequest {
                values: filters,
                search,
                alias,
                today,
            };
            commands::filter(&registry, &entity, &request)?
        }
        Command::Key { entity, key } => commands::key(&registry, &entity, &key)?,
        Command::Bind {
            entity,
            fields,
            key,
        } => commands::bind(&registry, settings, &entity, &fields, key.as_deref())?,
    };

    print!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("Shipped=true").unwrap(),
            ("Shipped".to_string(), "true".to_string())
        );
        assert_eq!(
            parse_pair("Range=2024.01.01-").unwrap().1,
            "2024.01.01-"
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_parse_filter_command() {
        let cli = Cli::parse_from([
            "adminkit",
            "filter",
            "Order",
            "-f",
            "Shipped=true",
            "--today",
            "2024-01-10",
            "--descriptors",
            "demos",
        ]);
        match cli.command {
            Command::Filter { filters, today, .. } => {
                assert_eq!(filters, vec![("Shipped".to_string(), "true".to_string())]);
                assert_eq!(today, NaiveDate::from_ymd_opt(2024, 1, 10));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.descriptors, Some(PathBuf::from("demos")));
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
