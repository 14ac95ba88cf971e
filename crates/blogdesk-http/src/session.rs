//! Client-side session store.
//!
//! [`SessionStore`] owns the signed-in identity and is the only writer of
//! the credential token. It is an explicitly constructed value: clone it
//! to share it, there is no global instance.
//!
//! # Sequencing
//!
//! Actions may overlap. Each action draws a ticket from a counter shared by
//! the actions it can conflict with (login/logout/bootstrap, avatar
//! updates, register/verify). When an action completes with a ticket older
//! than one already applied, its result is discarded instead of
//! overwriting newer state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use blogdesk_core::error::AuthError;
use blogdesk_core::model::{LoginResponse, ProfileUpdate, Registration, User};
use blogdesk_core::{Credentials, Error, Result, TokenStore};

use crate::api::UserApi;

/// Avatar shown after login when the account has none.
pub const DEFAULT_LOGIN_AVATAR: &str = "/assets/default-avatar.png";

/// Avatar shown after a restored session when the account has none.
pub const DEFAULT_RESTORED_AVATAR: &str = "/assets/user-avatar.png";

const LOGIN_FAILED: &str = "Login failed, please try again";
const AVATAR_FAILED: &str = "Failed to update avatar";
const REGISTER_FAILED: &str = "Registration failed, please check your details";
const VERIFY_FAILED: &str = "Verification code is invalid or expired";
const RESTORE_FAILED: &str = "Could not restore your session";
const SESSION_EXPIRED: &str = "Your session has expired, please log in again";

/// Snapshot of the client-side session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    /// True while any session action is waiting on the network.
    pub loading: bool,
    /// User-displayable message from the most recent failure.
    pub last_error: Option<String>,
    /// Email of a registration that still needs its verification code.
    pub pending_registration_email: Option<String>,
}

impl Session {
    fn sign_in(&mut self, user: &User, default_avatar: &str) {
        self.is_authenticated = true;
        self.user_id = user.id.clone();
        self.display_name = user.name.clone();
        self.avatar_url = user
            .avatar_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_avatar.to_string());
    }

    fn clear_identity(&mut self) {
        self.is_authenticated = false;
        self.user_id.clear();
        self.display_name.clear();
        self.avatar_url.clear();
    }

    fn reset(&mut self) {
        *self = Session::default();
    }
}

/// Result of restoring a session at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No token was stored; nothing was requested.
    NoToken,
    /// The stored token was accepted and the identity loaded.
    Restored,
    /// The backend rejected the token; it was discarded.
    Rejected,
    /// The identity could not be loaded; the token was kept for a retry.
    Deferred,
    /// A newer session action completed first; this result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct Sequence {
    issued: u64,
    applied: u64,
}

impl Sequence {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// True while no newer ticket has written the session.
    fn is_current(&self, ticket: u64) -> bool {
        ticket >= self.applied
    }

    /// Marks `ticket` as the latest write. Returns false when a newer
    /// ticket has already been applied.
    ///
    /// Failures and no-op outcomes only check [`Sequence::is_current`].
    fn accept(&mut self, ticket: u64) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.applied = ticket;
        true
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Identity,
    Profile,
    Registration,
}

#[derive(Debug, Default)]
struct State {
    session: Session,
    in_flight: usize,
    identity: Sequence,
    profile: Sequence,
    registration: Sequence,
}

impl State {
    fn sequence(&mut self, kind: Kind) -> &mut Sequence {
        match kind {
            Kind::Identity => &mut self.identity,
            Kind::Profile => &mut self.profile,
            Kind::Registration => &mut self.registration,
        }
    }
}

struct Inner {
    users: UserApi,
    tokens: Arc<dyn TokenStore>,
    state: RwLock<State>,
}

impl Inner {
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_failure(&self, kind: Kind, ticket: u64, err: &Error, fallback: &str) {
        let mut state = self.write();
        if state.sequence(kind).is_current(ticket) {
            state.session.last_error = Some(err.user_message(fallback));
        }
    }

    fn clear_token(&self) {
        if let Err(e) = self.tokens.clear() {
            error!(error = %e, "Failed to remove stored token");
        }
    }
}

/// Keeps `loading` set while an action is in flight, even if the action's
/// future is dropped.
struct InFlight<'a> {
    inner: &'a Inner,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.inner.write();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Session store for one client.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use blogdesk_core::{ApiConfig, Credentials, Environment, MemoryTokenStore};
/// use blogdesk_http::BlogClient;
///
/// # async fn example() -> Result<(), blogdesk_core::Error> {
/// let config = ApiConfig::for_env(Environment::Development);
/// let client = BlogClient::new(config, Arc::new(MemoryTokenStore::new()))?;
///
/// let session = client.session();
/// session.bootstrap().await;
/// if !session.snapshot().is_authenticated {
///     session.login(&Credentials::new("ann@example.com", "hunter2")).await?;
/// }
/// println!("Signed in as {}", session.snapshot().display_name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create a logged-out store.
    ///
    /// The token is persisted in the same store the client of `users`
    /// reads from.
    pub fn new(users: UserApi) -> Self {
        let tokens = Arc::clone(users.client().tokens());
        Self {
            inner: Arc::new(Inner {
                users,
                tokens,
                state: RwLock::new(State::default()),
            }),
        }
    }

    /// Returns the account endpoints this store talks to.
    pub fn users(&self) -> &UserApi {
        &self.inner.users
    }

    /// Returns a copy of the current session.
    pub fn snapshot(&self) -> Session {
        let state = self.inner.read();
        let mut session = state.session.clone();
        session.loading = state.in_flight > 0;
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().session.is_authenticated
    }

    /// Id of the signed-in user, if any.
    pub fn user_id(&self) -> Option<String> {
        let state = self.inner.read();
        state
            .session
            .is_authenticated
            .then(|| state.session.user_id.clone())
    }

    fn begin(&self, kind: Kind, clear_error: bool) -> (u64, InFlight<'_>) {
        let mut state = self.inner.write();
        state.in_flight += 1;
        if clear_error {
            state.session.last_error = None;
        }
        let ticket = state.sequence(kind).issue();
        (ticket, InFlight { inner: &self.inner })
    }

    /// Sign in and persist the issued token.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error after recording it in
    /// `last_error`, or [`AuthError::Superseded`] when a newer session
    /// action completed first.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        info!("Logging in");
        let (ticket, _in_flight) = self.begin(Kind::Identity, true);

        let response = match self.inner.users.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.inner
                    .record_failure(Kind::Identity, ticket, &e, LOGIN_FAILED);
                return Err(e);
            }
        };

        let mut state = self.inner.write();
        if !state.identity.accept(ticket) {
            debug!("Discarding stale login");
            return Err(AuthError::Superseded.into());
        }

        if let Err(e) = self.inner.tokens.save(&response.token) {
            error!(error = %e, "Failed to persist token");
            state.session.last_error = Some(e.user_message(LOGIN_FAILED));
            return Err(e);
        }

        state.session.sign_in(&response.user, DEFAULT_LOGIN_AVATAR);
        info!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    /// Sign out locally, telling the backend on a best-effort basis.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        info!("Logging out");
        let (ticket, _in_flight) = self.begin(Kind::Identity, false);

        // The token is still stored here so the backend can invalidate it.
        if let Err(e) = self.inner.users.logout().await {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }

        let mut state = self.inner.write();
        if !state.identity.accept(ticket) {
            debug!("Discarding stale logout");
            return;
        }
        self.inner.clear_token();
        state.session.reset();
        info!("Logged out");
    }

    /// Restore the session from a stored token.
    ///
    /// Never fails: a rejected token is discarded, any other failure keeps
    /// the token and leaves the session unauthenticated.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let stored = match self.inner.tokens.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                let mut state = self.inner.write();
                let ticket = state.identity.issue();
                if state.identity.is_current(ticket) {
                    state.session.clear_identity();
                    state.session.last_error = Some(e.user_message(RESTORE_FAILED));
                }
                return BootstrapOutcome::Deferred;
            }
        };

        if stored.is_none() {
            debug!("No stored token");
            let mut state = self.inner.write();
            let ticket = state.identity.issue();
            if state.identity.is_current(ticket) {
                state.session.reset();
            }
            return BootstrapOutcome::NoToken;
        }

        info!("Restoring session");
        let (ticket, _in_flight) = self.begin(Kind::Identity, false);
        let result = self.inner.users.current_user().await;

        let mut state = self.inner.write();
        if !state.identity.is_current(ticket) {
            debug!("Discarding stale session restore");
            return BootstrapOutcome::Superseded;
        }

        match result {
            Ok(user) => {
                state.identity.accept(ticket);
                state.session.sign_in(&user, DEFAULT_RESTORED_AVATAR);
                info!(user_id = %user.id, "Session restored");
                BootstrapOutcome::Restored
            }
            Err(e) if e.is_auth_rejected() => {
                info!("Stored token rejected, discarding it");
                state.identity.accept(ticket);
                self.inner.clear_token();
                state.session.reset();
                state.session.last_error = Some(e.user_message(SESSION_EXPIRED));
                BootstrapOutcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, "Failed to restore session, keeping token");
                state.session.clear_identity();
                state.session.last_error = Some(e.user_message(RESTORE_FAILED));
                BootstrapOutcome::Deferred
            }
        }
    }

    /// Change the avatar of the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error after recording it in `last_error`.
    #[instrument(skip(self))]
    pub async fn update_avatar(&self, avatar_url: &str) -> Result<()> {
        let (ticket, _in_flight) = self.begin(Kind::Profile, false);

        let update = ProfileUpdate {
            avatar_url: Some(avatar_url.to_string()),
            ..Default::default()
        };

        if let Err(e) = self.inner.users.update_profile(&update).await {
            warn!(error = %e, "Avatar update failed");
            self.inner
                .record_failure(Kind::Profile, ticket, &e, AVATAR_FAILED);
            return Err(e);
        }

        let mut state = self.inner.write();
        if state.profile.accept(ticket) && state.session.is_authenticated {
            state.session.avatar_url = avatar_url.to_string();
        } else {
            debug!("Discarding stale avatar update");
        }
        Ok(())
    }

    /// First registration step: create the account and remember its email
    /// until the verification code is confirmed.
    ///
    /// # Errors
    ///
    /// Returns the transport or API error after recording it in `last_error`.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<serde_json::Value> {
        info!("Registering account");
        let (ticket, _in_flight) = self.begin(Kind::Registration, true);

        let payload = match self.inner.users.register(registration).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.inner
                    .record_failure(Kind::Registration, ticket, &e, REGISTER_FAILED);
                return Err(e);
            }
        };

        let mut state = self.inner.write();
        if state.registration.accept(ticket) {
            state.session.pending_registration_email = Some(registration.email.clone());
        } else {
            debug!("Discarding stale registration");
        }
        Ok(payload)
    }

    /// Second registration step: confirm the emailed code.
    ///
    /// The pending email is cleared on success and kept on failure so the
    /// caller can retry.
    ///
    /// # Errors
    ///
    /// Fails without contacting the backend when no registration is pending
    /// or `code` is blank. Otherwise returns the transport or API error
    /// after recording it in `last_error`.
    #[instrument(skip(self, code))]
    pub async fn verify_registration_code(&self, code: &str) -> Result<()> {
        let code = code.trim();
        let pending = self.inner.read().session.pending_registration_email.clone();

        let email = match pending {
            Some(email) if !code.is_empty() => email,
            Some(_) => return Err(self.reject_locally(AuthError::MissingVerificationCode)),
            None => return Err(self.reject_locally(AuthError::NoPendingRegistration)),
        };

        info!(email = %email, "Verifying registration code");
        let (ticket, _in_flight) = self.begin(Kind::Registration, true);

        if let Err(e) = self.inner.users.verify_code(&email, code).await {
            warn!(error = %e, "Verification failed");
            self.inner
                .record_failure(Kind::Registration, ticket, &e, VERIFY_FAILED);
            return Err(e);
        }

        let mut state = self.inner.write();
        if state.registration.accept(ticket)
            && state.session.pending_registration_email.as_deref() == Some(email.as_str())
        {
            state.session.pending_registration_email = None;
        }
        info!("Registration verified");
        Ok(())
    }

    fn reject_locally(&self, err: AuthError) -> Error {
        let err = Error::from(err);
        self.inner.write().session.last_error = Some(err.user_message(VERIFY_FAILED));
        err
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.snapshot();
        f.debug_struct("SessionStore")
            .field("is_authenticated", &session.is_authenticated)
            .field("user_id", &session.user_id)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(avatar: Option<&str>) -> User {
        User {
            id: "u1".into(),
            name: "Ann".into(),
            avatar_url: avatar.map(str::to_string),
            email: None,
        }
    }

    #[test]
    fn sequence_rejects_older_tickets() {
        let mut seq = Sequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.accept(second));
        assert!(!seq.accept(first));
        assert!(seq.accept(second));
    }

    #[test]
    fn failed_newer_ticket_leaves_older_current() {
        let mut seq = Sequence::default();
        let older = seq.issue();
        let newer = seq.issue();
        assert!(seq.is_current(newer));
        assert!(seq.is_current(older));
        assert!(seq.accept(older));
        assert!(seq.is_current(newer));
    }

    #[test]
    fn sequence_accepts_in_order_completion() {
        let mut seq = Sequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.accept(first));
        assert!(seq.accept(second));
    }

    #[test]
    fn sign_in_uses_default_avatar() {
        let mut session = Session::default();
        session.sign_in(&user(None), DEFAULT_LOGIN_AVATAR);
        assert!(session.is_authenticated);
        assert_eq!(session.avatar_url, DEFAULT_LOGIN_AVATAR);

        session.sign_in(&user(Some("")), DEFAULT_RESTORED_AVATAR);
        assert_eq!(session.avatar_url, DEFAULT_RESTORED_AVATAR);

        session.sign_in(&user(Some("/me.png")), DEFAULT_LOGIN_AVATAR);
        assert_eq!(session.avatar_url, "/me.png");
    }

    #[test]
    fn clear_identity_keeps_pending_registration() {
        let mut session = Session {
            pending_registration_email: Some("ann@example.com".into()),
            ..Default::default()
        };
        session.sign_in(&user(None), DEFAULT_LOGIN_AVATAR);
        session.clear_identity();
        assert!(!session.is_authenticated);
        assert!(session.user_id.is_empty());
        assert_eq!(
            session.pending_registration_email.as_deref(),
            Some("ann@example.com")
        );

        session.reset();
        assert_eq!(session, Session::default());
    }
}
