//! Subcommand implementations.

pub mod account;
pub mod articles;
pub mod comments;
pub mod password;
pub mod users;

use anyhow::Result;

use blogdesk_core::ApiConfig;

use crate::cli::Commands;
use crate::session::CliContext;

pub async fn handle(cmd: Commands, config: ApiConfig) -> Result<()> {
    let ctx = CliContext::connect(config).await?;

    match cmd {
        Commands::Login(args) => account::login(args, &ctx).await,
        Commands::Logout(args) => account::logout(args, &ctx).await,
        Commands::Whoami(args) => account::whoami(args, &ctx).await,
        Commands::Register(args) => account::register(args, &ctx).await,
        Commands::Avatar(args) => account::avatar(args, &ctx).await,
        Commands::Password(cmd) => password::handle(cmd, &ctx).await,
        Commands::Users(cmd) => users::handle(cmd, &ctx).await,
        Commands::Articles(cmd) => articles::handle(cmd, &ctx).await,
        Commands::Comments(cmd) => comments::handle(cmd, &ctx).await,
    }
}
