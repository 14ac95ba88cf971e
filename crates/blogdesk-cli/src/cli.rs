//! CLI argument definitions.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use blogdesk_core::{ApiConfig, Environment};

use crate::commands::{account, articles, comments, password, users};

/// Command-line client for the blog API.
#[derive(Parser, Debug)]
#[command(name = "blogdesk")]
#[command(author, version = env!("BLOGDESK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Deployment environment (development or production)
    #[arg(long, env = "BLOGDESK_ENV", default_value = env!("BLOGDESK_BUILD_ENV"), global = true)]
    pub env: Environment,

    /// API origin override, takes precedence over the per-environment origins
    #[arg(long, env = "BLOGDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// API origin for development
    #[arg(long, env = "BLOGDESK_API_BASE_URL_DEVELOP", global = true, hide = true)]
    pub develop_url: Option<String>,

    /// API origin for production
    #[arg(long, env = "BLOGDESK_API_BASE_URL_RELEASE", global = true, hide = true)]
    pub release_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, env = "BLOGDESK_TIMEOUT_MS", default_value_t = 10_000, global = true)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the API configuration: `--server`, then the origin for the
    /// selected environment, then the built-in default.
    pub fn api_config(&self) -> Result<ApiConfig> {
        let env_origin = match self.env {
            Environment::Development => self.develop_url.as_deref(),
            Environment::Production => self.release_url.as_deref(),
        };

        let mut config = ApiConfig::for_env(self.env);
        if let Some(origin) = self.server.as_deref().or(env_origin) {
            config = config
                .with_server_override(origin)
                .context("Invalid API origin")?;
        }

        Ok(config.with_timeout(Duration::from_millis(self.timeout_ms)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login(account::LoginArgs),

    /// Log out and remove the stored token
    Logout(account::LogoutArgs),

    /// Display the restored session
    Whoami(account::WhoamiArgs),

    /// Register a new account and confirm the emailed code
    Register(account::RegisterArgs),

    /// Change the avatar of the signed-in account
    Avatar(account::AvatarArgs),

    /// Password recovery and change
    Password(password::PasswordCommand),

    /// User lookups
    Users(users::UsersCommand),

    /// Article operations
    Articles(articles::ArticlesCommand),

    /// Comment operations
    Comments(comments::CommentsCommand),
}
