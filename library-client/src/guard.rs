//! Navigation guard
//!
//! Runs before every route transition and decides whether the target may be
//! entered. Rules, first match wins:
//!
//! 1. credential without identity: hydrate the identity first
//! 2. requires auth, not authenticated: go to login
//! 3. requires guest, authenticated: go to the landing page
//! 4. requires admin, not admin: go to the landing page
//! 5. requires librarian, not librarian: go to the landing page
//! 6. allow

use std::sync::Arc;

use crate::http::HttpClient;
use crate::route::{ResolvedRoute, RouteRequirement};
use crate::session::Session;
use crate::store::SessionStore;

/// Login page
pub const LOGIN_PATH: &str = "/auth/login";
/// Landing page of authenticated users
pub const LANDING_PATH: &str = "/dashboard";

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(String),
}

impl NavigationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[derive(Debug)]
pub struct NavigationGuard<H: HttpClient> {
    store: Arc<SessionStore<H>>,
    login_path: String,
    landing_path: String,
}

impl<H: HttpClient> Clone for NavigationGuard<H> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            login_path: self.login_path.clone(),
            landing_path: self.landing_path.clone(),
        }
    }
}

impl<H: HttpClient> NavigationGuard<H> {
    pub fn new(store: Arc<SessionStore<H>>) -> Self {
        Self {
            store,
            login_path: LOGIN_PATH.to_string(),
            landing_path: LANDING_PATH.to_string(),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_landing_path(mut self, path: impl Into<String>) -> Self {
        self.landing_path = path.into();
        self
    }

    pub fn store(&self) -> &Arc<SessionStore<H>> {
        &self.store
    }

    /// Check a navigation to `target`. Never fails; at worst it redirects.
    pub async fn before_each(&self, target: &ResolvedRoute) -> NavigationDecision {
        if self.store.needs_hydration() {
            let status = self.store.fetch_identity().await;
            tracing::debug!(?status, path = %target.path, "Hydrated identity before navigation");
        }

        let decision = evaluate(
            target.requirement,
            &self.store.snapshot(),
            &self.login_path,
            &self.landing_path,
        );
        if let NavigationDecision::Redirect(to) = &decision {
            tracing::debug!(from = %target.full_path, to = %to, "Navigation redirected");
        }
        decision
    }
}

/// Decide a navigation for a session whose identity is already settled
pub fn evaluate(
    requirement: RouteRequirement,
    session: &Session,
    login_path: &str,
    landing_path: &str,
) -> NavigationDecision {
    let authenticated = session.is_authenticated();
    if requirement.requires_auth && !authenticated {
        NavigationDecision::Redirect(login_path.to_string())
    } else if (requirement.requires_guest && authenticated)
        || (requirement.requires_admin && !session.is_admin())
        || (requirement.requires_librarian && !session.is_librarian())
    {
        NavigationDecision::Redirect(landing_path.to_string())
    } else {
        NavigationDecision::Allow
    }
}
