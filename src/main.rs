use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use schema_workbench::app::DbMetaData;
use schema_workbench::error;
use schema_workbench::infra::config::WorkbenchConfig;
use schema_workbench::infra::default_registry;

const LOG_ENV: &str = "SCHEMA_WORKBENCH_LOG";

/// Browse the relational metadata an OLAP schema is built on.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: <config dir>/schema-workbench/workbench.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Driver name, e.g. `postgres`, `sqlite` or `org.postgresql.Driver`
    #[arg(long, global = true)]
    driver: Option<String>,

    #[arg(long, global = true)]
    url: Option<String>,

    #[arg(long, global = true)]
    user: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// Comma or semicolon separated schemas to load
    #[arg(long, global = true)]
    schemas: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Database product, version and cache size
    Info,
    /// Loaded schema names
    Schemas,
    /// Table names, `schema->table` across schemas when none is given
    Tables {
        #[arg(long)]
        schema: Option<String>,
        /// Drop entries ending with this name
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Tables that import foreign keys
    FactTables {
        #[arg(long)]
        schema: Option<String>,
    },
    /// Tables referenced by a fact table
    Dimensions {
        #[arg(long)]
        fact: String,
        #[arg(long)]
        schema: Option<String>,
    },
    /// Foreign key columns of a fact table
    Fks {
        #[arg(long)]
        fact: String,
        #[arg(long)]
        schema: Option<String>,
    },
    /// Column names of a table, or every column with its type
    Columns {
        #[arg(long)]
        schema: Option<String>,
        /// Without a table every column of every loaded table is described
        #[arg(long)]
        table: Option<String>,
    },
    /// Primary key column of a table
    Pk {
        #[arg(long)]
        table: String,
        #[arg(long)]
        schema: Option<String>,
    },
}

impl Args {
    fn load_config(&self) -> Result<WorkbenchConfig> {
        let path = self.config.clone().or_else(WorkbenchConfig::default_path);
        let mut config = match path {
            Some(path) => WorkbenchConfig::load(&path)?,
            None => WorkbenchConfig::default(),
        };

        let connection = &mut config.connection;
        if let Some(driver) = &self.driver {
            connection.driver.clone_from(driver);
        }
        if let Some(url) = &self.url {
            connection.url.clone_from(url);
        }
        if self.user.is_some() {
            connection.username.clone_from(&self.user);
        }
        if self.password.is_some() {
            connection.password.clone_from(&self.password);
        }
        if let Some(schemas) = &self.schemas {
            config.metadata.schemas.clone_from(schemas);
        }
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: &Command, metadata: &mut DbMetaData) -> Vec<String> {
    match command {
        Command::Info => vec![
            format!("Product: {}", metadata.database_product_name()),
            format!("Version: {}", metadata.database_product_version()),
            format!("Catalog: {}", metadata.db_catalog_name()),
            format!("URL: {}", metadata.jdbc_connection_url()),
            format!("Schemas: {}", metadata.database().schema_count()),
            format!("Tables: {}", metadata.database().table_count()),
        ],
        Command::Schemas => metadata.get_all_schemas(),
        Command::Tables {
            schema,
            exclude: Some(exclude),
        } => metadata.get_all_tables_excluding(schema.as_deref(), exclude),
        Command::Tables {
            schema,
            exclude: None,
        } => metadata.get_all_tables(schema.as_deref()),
        Command::FactTables { schema } => metadata.get_fact_tables(schema.as_deref()),
        Command::Dimensions { fact, schema } => {
            metadata.get_dimension_tables(schema.as_deref(), fact)
        }
        Command::Fks { fact, schema } => metadata.get_fact_table_fks(schema.as_deref(), fact),
        Command::Columns { schema, table } => {
            metadata.get_all_columns(schema.as_deref(), table.as_deref())
        }
        Command::Pk { table, schema } => metadata
            .get_table_pk(schema.as_deref(), table)
            .into_iter()
            .collect(),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    error::install_hooks()?;

    let args = Args::parse();
    let config = args.load_config()?;
    let mut metadata = DbMetaData::new(config.to_options(), default_registry());

    if let Some(message) = metadata.err_msg() {
        return Err(eyre!("{}", message));
    }

    let lines = run(&args.command, &mut metadata);
    if let Some(message) = metadata.err_msg() {
        return Err(eyre!("{}", message));
    }

    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn every_subcommand_has_help() {
        let command = Args::command();

        for sub in command.get_subcommands() {
            assert!(
                sub.get_about().is_some(),
                "{} has no help line",
                sub.get_name()
            );
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = Args::try_parse_from([
            "schema-workbench",
            "tables",
            "--exclude",
            "store",
            "--driver",
            "sqlite",
        ])
        .unwrap();

        assert_eq!(args.driver.as_deref(), Some("sqlite"));
        assert!(matches!(
            args.command,
            Command::Tables { schema: None, exclude: Some(ref e) } if e == "store"
        ));
    }
}
