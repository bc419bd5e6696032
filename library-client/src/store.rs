//! Session store - the single owner of [`Session`] state.
//!
//! The store is constructed once per application and shared as
//! `Arc<SessionStore<H>>`. Only its operations mutate the session; the
//! persisted credential and the transport's bearer header follow every
//! change.
//!
//! Operations never hold the state lock across a request, so concurrent
//! operations interleave freely: whichever finishes last decides the
//! `loading`/`error` flags.

use parking_lot::RwLock;

use shared::client::{LoginRequest, RegisterRequest};
use shared::models::{ProfileUpdate, User};

use crate::error::{ClientResult, SessionError, SessionResult};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::Session;
use crate::storage::CredentialStorage;
use crate::ClientConfig;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";

/// Result of [`SessionStore::fetch_identity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStatus {
    /// No credential, nothing fetched
    Anonymous,
    /// Identity loaded for the current credential
    Refreshed,
    /// Credential rejected; the session was cleared
    InvalidSession,
    /// Credential changed while the request was in flight; result discarded
    Superseded,
}

/// Session store bridging the session state to the identity API
#[derive(Debug)]
pub struct SessionStore<H: HttpClient> {
    http: H,
    storage: CredentialStorage,
    state: RwLock<Session>,
}

impl SessionStore<NetworkHttpClient> {
    /// Build a store with a network client and the configured storage.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        Ok(Self::new(http, config.build_storage()))
    }
}

impl<H: HttpClient> SessionStore<H> {
    /// Creates the store, seeding the credential from storage.
    ///
    /// Storage is not read again after this point.
    pub fn new(http: H, storage: CredentialStorage) -> Self {
        let token = storage.load();
        if let Some(token) = token.as_deref() {
            http.set_token(Some(token));
            tracing::debug!("Restored credential from storage");
        }
        Self {
            http,
            storage,
            state: RwLock::new(Session::with_token(token)),
        }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    // ========== Reads ==========

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().is_admin()
    }

    pub fn is_librarian(&self) -> bool {
        self.state.read().is_librarian()
    }

    pub fn needs_hydration(&self) -> bool {
        self.state.read().needs_hydration()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    // ========== Operations ==========

    /// Log in with username and password.
    pub async fn login(&self, username: &str, password: &str) -> SessionResult {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.begin();
        let result = self.http.login(&request).await;
        match result {
            Ok(auth) => {
                tracing::info!(username = %auth.user.username, role = %auth.user.role, "Logged in");
                self.set_auth_data(auth.user, auth.token);
                self.finish(None)
            }
            Err(e) => {
                tracing::warn!(username, "Login failed: {}", e);
                self.finish(Some(SessionError::from_client_error(&e, LOGIN_FAILED)))
            }
        }
    }

    /// Register a new account; on success the session is logged in.
    pub async fn register(&self, request: &RegisterRequest) -> SessionResult {
        self.begin();
        let result = self.http.register(request).await;
        match result {
            Ok(auth) => {
                tracing::info!(username = %auth.user.username, "Registered");
                self.set_auth_data(auth.user, auth.token);
                self.finish(None)
            }
            Err(e) => {
                tracing::warn!(username = %request.username, "Registration failed: {}", e);
                self.finish(Some(SessionError::from_client_error(
                    &e,
                    REGISTRATION_FAILED,
                )))
            }
        }
    }

    /// Forget identity and credential. Local only; always succeeds.
    pub fn logout(&self) {
        self.clear_auth_data();
        tracing::info!("Logged out");
    }

    /// Load the identity behind the current credential.
    ///
    /// A rejected credential clears the session instead of surfacing an
    /// error. Does not touch `loading`/`error`.
    pub async fn fetch_identity(&self) -> IdentityStatus {
        let Some(token) = self.token() else {
            return IdentityStatus::Anonymous;
        };

        let result = self.http.me().await;

        let mut state = self.state.write();
        if state.token.as_deref() != Some(token.as_str()) {
            tracing::debug!("Credential changed during identity fetch, discarding result");
            return IdentityStatus::Superseded;
        }
        match result {
            Ok(user) => {
                tracing::debug!(username = %user.username, "Identity refreshed");
                state.user = Some(user);
                IdentityStatus::Refreshed
            }
            Err(e) => {
                state.clear();
                drop(state);
                self.forget_credential();
                tracing::info!("Stored credential rejected, session cleared: {}", e);
                IdentityStatus::InvalidSession
            }
        }
    }

    /// Send a partial profile update and adopt the server's representation.
    ///
    /// The caller is expected to check that the session is authenticated.
    /// The returned identity is only adopted if the credential the request
    /// was sent with is still current.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> SessionResult {
        let sent_with = self.token();
        self.begin();
        let result = self.http.update_profile(update).await;
        match result {
            Ok(user) => {
                tracing::info!(username = %user.username, "Profile updated");
                {
                    let mut state = self.state.write();
                    if sent_with.is_some() && state.token == sent_with {
                        state.user = Some(user);
                    } else {
                        tracing::debug!("Credential changed during profile update, discarding identity");
                    }
                }
                self.finish(None)
            }
            Err(e) => {
                tracing::warn!("Profile update failed: {}", e);
                self.finish(Some(SessionError::from_client_error(
                    &e,
                    PROFILE_UPDATE_FAILED,
                )))
            }
        }
    }

    // ========== Internals ==========

    fn begin(&self) {
        let mut state = self.state.write();
        state.loading = true;
        state.error = None;
    }

    fn finish(&self, failure: Option<SessionError>) -> SessionResult {
        let mut state = self.state.write();
        state.loading = false;
        match failure {
            None => Ok(()),
            Some(err) => {
                state.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    fn set_auth_data(&self, user: User, token: String) {
        self.http.set_token(Some(&token));
        if let Err(e) = self.storage.save(&token) {
            tracing::warn!("Failed to persist credential: {}", e);
        }
        self.state.write().set_login(token, user);
    }

    fn clear_auth_data(&self) {
        self.state.write().clear();
        self.forget_credential();
    }

    fn forget_credential(&self) {
        self.http.set_token(None);
        if let Err(e) = self.storage.delete() {
            tracing::warn!("Failed to remove persisted credential: {}", e);
        }
    }
}
