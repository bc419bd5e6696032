//! Session state and its derived authorization predicates

use shared::models::User;

/// Session data held by the [`SessionStore`](crate::SessionStore).
///
/// A credential on its own (for example one restored from storage before the
/// identity has been fetched) does not make the session authenticated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Current identity, once known
    pub user: Option<User>,
    /// Bearer credential
    pub token: Option<String>,
    /// A login/register/profile request is in flight
    pub loading: bool,
    /// Message of the last failed operation
    pub error: Option<String>,
}

impl Session {
    /// Creates an empty session seeded with a stored credential.
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Sets identity and credential together.
    pub(crate) fn set_login(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
    }

    /// Clears identity and credential. Status flags are left alone.
    pub(crate) fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn is_librarian(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_librarian)
    }

    /// Credential known but identity not yet fetched
    pub fn needs_hydration(&self) -> bool {
        self.token.is_some() && self.user.is_none()
    }
}
