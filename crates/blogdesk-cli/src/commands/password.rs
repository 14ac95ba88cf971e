//! Password recovery and change.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use blogdesk_core::model::{PasswordChange, PasswordReset};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct PasswordCommand {
    #[command(subcommand)]
    pub command: PasswordSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PasswordSubcommand {
    /// Email a reset code
    Forgot {
        #[arg(long)]
        email: String,
    },

    /// Set a new password using the emailed code
    Reset {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,

        #[arg(long)]
        new_password: String,
    },

    /// Change the password of the signed-in account
    Change {
        #[arg(long)]
        old_password: String,

        #[arg(long)]
        new_password: String,
    },
}

pub async fn handle(cmd: PasswordCommand, ctx: &CliContext) -> Result<()> {
    let users = ctx.client.users();

    match cmd.command {
        PasswordSubcommand::Forgot { email } => {
            users
                .forgot_password(&email)
                .await
                .context("Failed to request a reset code")?;
            output::success(&format!("Reset code sent to {email}"));
        }
        PasswordSubcommand::Reset {
            email,
            code,
            new_password,
        } => {
            let reset = PasswordReset {
                email,
                code: code.trim().to_string(),
                new_password,
            };
            users
                .reset_password(&reset)
                .await
                .context("Failed to reset password")?;
            output::success("Password reset, you can now log in");
        }
        PasswordSubcommand::Change {
            old_password,
            new_password,
        } => {
            ctx.require_login()?;
            let change = PasswordChange {
                old_password,
                new_password,
            };
            users
                .change_password(&change)
                .await
                .context("Failed to change password")?;
            output::success("Password changed");
        }
    }

    Ok(())
}
