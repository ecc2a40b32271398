//! Breaker commands

use anyhow::Result;
use clap::Subcommand;
use panel_model::BreakerUpdate;
use panel_store::{NewBreakerRequest, PanelService};

use crate::output::Output;

#[derive(Subcommand)]
pub enum BreakerCommands {
    /// List breakers on a panel
    List {
        /// Panel ID
        #[arg(long)]
        panel: i64,
    },

    /// Add a breaker (a combined tandem like 14A/14B is split on save)
    Add {
        /// Panel ID
        #[arg(long)]
        panel: i64,

        /// Position token, e.g. 7, 1-3, 14A
        #[arg(long)]
        position: String,

        /// Rated current in amps
        #[arg(long, default_value_t = 20)]
        amperage: u32,

        /// Pole count (defaults to what the position implies)
        #[arg(long)]
        poles: Option<u8>,

        /// Circuit label
        #[arg(long, default_value = "")]
        label: String,

        #[arg(long)]
        circuit_type: Option<String>,

        #[arg(long)]
        protection_type: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        sort_order: Option<i64>,

        /// Record the breaker as switched off
        #[arg(long)]
        off: bool,
    },

    /// Move a breaker to a new position
    Move {
        /// Breaker ID
        id: i64,

        /// New position token
        position: String,
    },

    /// Delete a breaker
    Delete {
        /// Breaker ID
        id: i64,
    },

    /// Split a combined tandem breaker into its two halves
    Split {
        /// Breaker ID
        id: i64,
    },
}

pub async fn handle_command(
    cmd: BreakerCommands,
    service: &PanelService,
    out: &Output,
) -> Result<()> {
    match cmd {
        BreakerCommands::List { panel } => {
            let breakers = service.list_breakers(panel).await?;
            out.breakers(&breakers)?;
        },
        BreakerCommands::Add {
            panel,
            position,
            amperage,
            poles,
            label,
            circuit_type,
            protection_type,
            notes,
            sort_order,
            off,
        } => {
            let req = NewBreakerRequest {
                position,
                amperage,
                poles,
                label,
                circuit_type,
                protection_type,
                is_on: Some(!off),
                notes,
                sort_order,
            };
            let write = service.create_breaker(panel, req).await?;
            out.write(&write)?;
        },
        BreakerCommands::Move { id, position } => {
            let update = BreakerUpdate {
                position: Some(position),
                ..Default::default()
            };
            let write = service.update_breaker(id, update).await?;
            out.write(&write)?;
        },
        BreakerCommands::Delete { id } => {
            service.delete_breaker(id).await?;
            out.deleted(id)?;
        },
        BreakerCommands::Split { id } => {
            let write = service.split_breaker(id).await?;
            out.write(&write)?;
        },
    }
    Ok(())
}
