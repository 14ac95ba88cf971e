//! Session commands: login, logout, whoami, register and avatar.

use anyhow::{Result, bail};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use blogdesk_core::Credentials;
use blogdesk_core::model::Registration;
use blogdesk_http::BootstrapOutcome;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the session as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Verification code; prompted for when omitted
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args, Debug)]
pub struct AvatarArgs {
    /// New avatar URL
    pub url: String,
}

pub async fn login(args: LoginArgs, ctx: &CliContext) -> Result<()> {
    let session = ctx.client.session();
    let credentials = Credentials::new(&args.email, &args.password);

    output::note("Logging in...");

    let response = session
        .login(&credentials)
        .await
        .map_err(|e| ctx.failure(e))?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &response.user.id);
    output::field("Name", &response.user.name);
    output::field("API", ctx.client.config().base_origin().as_str());

    Ok(())
}

pub async fn logout(_args: LogoutArgs, ctx: &CliContext) -> Result<()> {
    ctx.client.session().logout().await;
    output::success("Logged out");
    Ok(())
}

pub async fn whoami(args: WhoamiArgs, ctx: &CliContext) -> Result<()> {
    let session = ctx.client.session().snapshot();

    if args.json {
        return output::json(&session, true);
    }

    match ctx.restored {
        BootstrapOutcome::Restored => {
            output::field("User", &session.user_id);
            output::field("Name", &session.display_name);
            output::field("Avatar", &session.avatar_url);
            output::field("API", ctx.client.config().base_origin().as_str());
            Ok(())
        }
        BootstrapOutcome::NoToken => bail!("No active session. Run 'blogdesk login' first."),
        BootstrapOutcome::Rejected => {
            bail!("Session expired and was removed. Run 'blogdesk login' again.")
        }
        BootstrapOutcome::Deferred | BootstrapOutcome::Superseded => {
            let reason = session
                .last_error
                .unwrap_or_else(|| "Could not restore your session".to_string());
            bail!("{reason}. The stored token was kept; try again later.")
        }
    }
}

pub async fn register(args: RegisterArgs, ctx: &CliContext) -> Result<()> {
    let session = ctx.client.session();
    let registration = Registration {
        name: args.name,
        email: args.email,
        password: args.password,
    };

    output::note("Registering...");
    session
        .register(&registration)
        .await
        .map_err(|e| ctx.failure(e))?;
    output::success(&format!("Verification code sent to {}", registration.email));

    if let Some(code) = args.code {
        session
            .verify_registration_code(&code)
            .await
            .map_err(|e| ctx.failure(e))?;
        output::success("Account verified, you can now log in");
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("Verification code: ");
        let Some(code) = lines.next_line().await? else {
            bail!("No verification code entered");
        };

        match session.verify_registration_code(&code).await {
            Ok(()) => break,
            Err(_) => {
                let message = session
                    .snapshot()
                    .last_error
                    .unwrap_or_else(|| "Verification failed".to_string());
                output::error(&message);
            }
        }
    }

    output::success("Account verified, you can now log in");
    Ok(())
}

pub async fn avatar(args: AvatarArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_login()?;

    ctx.client
        .session()
        .update_avatar(&args.url)
        .await
        .map_err(|e| ctx.failure(e))?;

    output::success("Avatar updated");
    output::field("Avatar", &ctx.client.session().snapshot().avatar_url);
    Ok(())
}
