//! Panel commands

use anyhow::Result;
use clap::Subcommand;
use panel_store::PanelService;

use crate::output::Output;

#[derive(Subcommand)]
pub enum PanelCommands {
    /// Create a panel
    Create {
        /// Panel name, e.g. "Main panel"
        name: String,
    },

    /// List all panels
    List,
}

pub async fn handle_command(
    cmd: PanelCommands,
    service: &PanelService,
    out: &Output,
) -> Result<()> {
    match cmd {
        PanelCommands::Create { name } => {
            let panel = service.create_panel(&name).await?;
            out.panel(&panel)?;
        },
        PanelCommands::List => {
            let panels = service.list_panels().await?;
            out.panels(&panels)?;
        },
    }
    Ok(())
}
