//! Account endpoints.

use serde::Serialize;
use tracing::instrument;

use blogdesk_core::model::{
    LoginResponse, PasswordChange, PasswordReset, ProfileUpdate, Registration, User,
    VerifyCodeRequest,
};
use blogdesk_core::{Credentials, Result};

use crate::client::ApiClient;
use crate::endpoints::*;

#[derive(Debug, Serialize)]
struct EmailQuery<'a> {
    email: &'a str,
}

/// Typed wrappers for `/api/users/*`.
#[derive(Debug, Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<serde_json::Value> {
        self.client.post(USERS_REGISTER, registration).await
    }

    #[instrument(skip(self, code))]
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<serde_json::Value> {
        self.client
            .post(USERS_VERIFY_CODE, &VerifyCodeRequest { email, code })
            .await
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.client.post(USERS_LOGIN, credentials).await
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.client
            .post_empty::<serde_json::Value>(USERS_LOGOUT)
            .await
            .map(drop)
    }

    /// Ask the backend to email a password reset code.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.client
            .post_with_query::<_, serde_json::Value>(
                USERS_FORGOT_PASSWORD,
                &EmailQuery { email },
            )
            .await
            .map(drop)
    }

    #[instrument(skip(self, reset), fields(email = %reset.email))]
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<()> {
        self.client
            .post::<_, serde_json::Value>(USERS_RESET_PASSWORD, reset)
            .await
            .map(drop)
    }

    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.client
            .put::<_, serde_json::Value>(USERS_CHANGE_PASSWORD, change)
            .await
            .map(drop)
    }

    /// Fetch the account the stored token belongs to.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User> {
        self.client.get(USERS_ME).await
    }

    #[instrument(skip(self))]
    pub async fn user_by_id(&self, user_id: &str) -> Result<User> {
        self.client.get(&user(user_id)?).await
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<serde_json::Value> {
        self.client.put(USERS_PROFILE, update).await
    }
}
