//! panelctl - Breaker panel management tool for PanelMap
//!
//! Manages panels and breakers in the PanelMap SQLite database, with the
//! same position rules the service layer enforces.

mod breakers;
mod output;
mod panels;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use common::logging::{self, LogConfig};
use common::{load_config, AppConfig};
use panel_store::{ClientOptions, NewBreakerRequest, PanelService, SqliteClient};
use tracing::debug;

use crate::breakers::BreakerCommands;
use crate::output::Output;
use crate::panels::PanelCommands;

#[derive(Parser)]
#[command(name = "panelctl")]
#[command(about = "PanelMap breaker panel management tool")]
#[command(long_about = "PanelMap breaker panel management tool

Position grammars:
  7           single-pole breaker at slot 7
  1-3         2-pole (240V) breaker bonding slots 1 and 3
  14A / 14B   one half of a tandem breaker at slot 14
  14A/14B     combined tandem (import only, split into two halves)

Examples:
  panelctl init
  panelctl panels create \"Main panel\"
  panelctl breakers add --panel 1 --position 1-3 --amperage 30 --label Dryer
  panelctl check --panel 1 3
  panelctl import --panel 1 export.json

Use 'panelctl <command> --help' for more information on a specific command.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file (.toml, .yaml or .json)
    #[arg(short = 'c', long = "config", global = true, env = "PANELMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides database.path)
    #[arg(long = "db-path", global = true)]
    db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,

    /// Classify position tokens (no database access)
    Classify {
        /// Position tokens, e.g. 7 1-3 14A 14A/14B
        #[arg(required = true)]
        positions: Vec<String>,
    },

    /// Manage panels
    Panels {
        #[command(subcommand)]
        command: PanelCommands,
    },

    /// Manage breakers
    Breakers {
        #[command(subcommand)]
        command: BreakerCommands,
    },

    /// Check a position against a panel without writing
    Check {
        /// Panel ID
        #[arg(long)]
        panel: i64,

        /// Proposed position
        position: String,

        /// Breaker being moved (ignored in the check)
        #[arg(long)]
        exclude: Option<i64>,
    },

    /// Split every combined tandem breaker on a panel
    Migrate {
        /// Panel ID
        #[arg(long)]
        panel: i64,
    },

    /// Import breakers from a JSON array, then split combined tandems
    Import {
        /// Panel ID
        #[arg(long)]
        panel: i64,

        /// JSON file with an array of breakers
        file: PathBuf,

        /// Leave combined tandem positions unsplit
        #[arg(long)]
        no_migrate: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "ERROR".red(), e);
            std::process::exit(1);
        },
    }
}

/// Run a command, returning the process exit code
async fn run(cli: Cli) -> Result<i32> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(db_path) = &cli.db_path {
        config.database.path = db_path.clone();
    }

    init_logging(&cli, &config)?;
    let out = Output::new(cli.json);

    // Pure commands first; no database needed
    if let Commands::Classify { positions } = &cli.command {
        for position in positions {
            out.classification(&panel_model::classify(position))?;
        }
        return Ok(0);
    }

    let client = open_database(&config).await?;
    let service = PanelService::new(client.pool().clone());

    match cli.command {
        Commands::Classify { .. } => {},
        Commands::Init => {
            client.ping().await?;
            println!(
                "{} Schema ready at {}",
                "OK".green(),
                client.path().bright_yellow()
            );
        },
        Commands::Panels { command } => {
            panels::handle_command(command, &service, &out).await?;
        },
        Commands::Breakers { command } => {
            breakers::handle_command(command, &service, &out).await?;
        },
        Commands::Check {
            panel,
            position,
            exclude,
        } => {
            let result = service.check_position(panel, &position, exclude).await?;
            out.conflict(&position, &result)?;
            if !result.is_ok() {
                return Ok(2);
            }
        },
        Commands::Migrate { panel } => {
            let report = service.migrate_panel(panel).await?;
            out.migration(&report)?;
        },
        Commands::Import {
            panel,
            file,
            no_migrate,
        } => {
            let requests = read_import_file(&file)?;
            let imported = service.import_breakers(panel, requests).await?;
            if !cli.json {
                println!(
                    "{} Imported {} breakers from {}",
                    "OK".green(),
                    imported.len(),
                    file.display()
                );
            }
            if no_migrate {
                out.breakers(&imported)?;
            } else {
                let report = service.migrate_panel(panel).await?;
                out.migration(&report)?;
            }
        },
    }

    Ok(0)
}

fn init_logging(cli: &Cli, config: &AppConfig) -> Result<()> {
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    logging::init_with_config(LogConfig {
        service_name: "panelctl".to_string(),
        level,
        log_dir: config.logging.dir.clone(),
        enable_json: config.logging.json,
        ansi: !cli.no_color,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn open_database(config: &AppConfig) -> Result<SqliteClient> {
    let options = ClientOptions {
        max_connections: config.database.max_connections,
        busy_timeout: Duration::from_millis(config.database.busy_timeout_ms),
    };
    debug!("Opening database {}", config.database.path.display());

    SqliteClient::new(&config.database.path, options)
        .await
        .with_context(|| {
            format!(
                "Failed to open database {}",
                config.database.path.display()
            )
        })
}

/// Parse an export file: a JSON array of breaker objects
///
/// Extra fields such as `id` or `panelId` are ignored.
fn read_import_file(path: &Path) -> Result<Vec<NewBreakerRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let requests: Vec<NewBreakerRequest> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid breaker JSON in {}", path.display()))?;
    Ok(requests)
}
