//! User lookups.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// Fetch a public profile
    Get {
        /// User id
        id: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

pub async fn handle(cmd: UsersCommand, ctx: &CliContext) -> Result<()> {
    match cmd.command {
        UsersSubcommand::Get { id, pretty } => {
            let user = ctx
                .client
                .users()
                .user_by_id(&id)
                .await
                .context("Failed to fetch user")?;
            output::json(&user, pretty)
        }
    }
}
