//! Session context shared by every command.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use blogdesk_core::{ApiConfig, Error};
use blogdesk_http::{BlogClient, BootstrapOutcome};

use storage::FileTokenStore;

/// A client whose session was restored from the token file.
pub struct CliContext {
    pub client: BlogClient,
    pub restored: BootstrapOutcome,
}

impl CliContext {
    /// Build the client on the default token file and bootstrap the session.
    pub async fn connect(config: ApiConfig) -> Result<Self> {
        let tokens = FileTokenStore::open_default()?;
        debug!(path = %tokens.path().display(), "Using token file");
        Self::connect_with(config, tokens).await
    }

    pub async fn connect_with(config: ApiConfig, tokens: FileTokenStore) -> Result<Self> {
        let client =
            BlogClient::new(config, Arc::new(tokens)).context("Failed to create API client")?;

        let restored = client.session().bootstrap().await;
        debug!(?restored, "Session bootstrapped");

        Ok(Self { client, restored })
    }

    /// Id of the signed-in user, or an error telling the user to log in.
    pub fn require_login(&self) -> Result<String> {
        self.client
            .session()
            .user_id()
            .context("Not logged in. Run 'blogdesk login' first.")
    }

    /// Wrap a failed session action with the message it recorded.
    pub fn failure(&self, err: Error) -> anyhow::Error {
        match self.client.session().snapshot().last_error {
            Some(message) => anyhow!(err).context(message),
            None => anyhow!(err),
        }
    }
}
