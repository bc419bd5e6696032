//! Router driver
//!
//! Resolves locations, follows route-level redirects, runs the guard and
//! follows its redirects until the navigation settles.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{NavigationError, RouteConfigError};
use crate::guard::{NavigationDecision, NavigationGuard};
use crate::http::HttpClient;
use crate::route::{ResolvedRoute, RouteTable};
use crate::store::SessionStore;

/// Maximum number of redirects followed by one navigation
pub const MAX_REDIRECTS: usize = 10;

/// Number of history entries kept; older entries are dropped
pub const MAX_HISTORY: usize = 100;

#[derive(Debug)]
pub struct Router<H: HttpClient> {
    table: RouteTable,
    guard: NavigationGuard<H>,
    current: Mutex<Option<ResolvedRoute>>,
    history: Mutex<VecDeque<String>>,
}

impl<H: HttpClient> Router<H> {
    pub fn new(table: RouteTable, guard: NavigationGuard<H>) -> Self {
        Self {
            table,
            guard,
            current: Mutex::new(None),
            history: Mutex::new(VecDeque::with_capacity(MAX_HISTORY)),
        }
    }

    /// Router over the library routes with the default guard
    pub fn library(store: Arc<SessionStore<H>>) -> Result<Self, RouteConfigError> {
        Ok(Self::new(RouteTable::library()?, NavigationGuard::new(store)))
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn store(&self) -> &Arc<SessionStore<H>> {
        self.guard.store()
    }

    /// Route of the last completed navigation
    pub fn current(&self) -> Option<ResolvedRoute> {
        self.current.lock().clone()
    }

    /// Full paths of the last [`MAX_HISTORY`] completed navigations, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().iter().cloned().collect()
    }

    /// Navigate to `location` and return where the navigation settled.
    ///
    /// On error the current route is left unchanged.
    pub async fn push(&self, location: &str) -> Result<ResolvedRoute, NavigationError> {
        let mut next = location.to_string();
        for _ in 0..=MAX_REDIRECTS {
            let route = self
                .table
                .resolve(&next)
                .ok_or_else(|| NavigationError::NoMatch(next.clone()))?;

            if let Some(to) = &route.redirect {
                tracing::debug!(from = %route.path, to = %to, "Route redirect");
                next = to.clone();
                continue;
            }

            match self.guard.before_each(&route).await {
                NavigationDecision::Allow => {
                    tracing::debug!(path = %route.full_path, name = ?route.name, "Navigated");
                    {
                        let mut history = self.history.lock();
                        if history.len() == MAX_HISTORY {
                            history.pop_front();
                        }
                        history.push_back(route.full_path.clone());
                    }
                    *self.current.lock() = Some(route.clone());
                    return Ok(route);
                }
                NavigationDecision::Redirect(to) => next = to,
            }
        }

        tracing::warn!(target_path = location, last = %next, "Navigation aborted: redirect loop");
        Err(NavigationError::RedirectLoop {
            target: location.to_string(),
            last: next,
        })
    }

    /// Navigate to a named route
    pub async fn push_named(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<ResolvedRoute, NavigationError> {
        let path = self.table.path_for(name, params)?;
        self.push(&path).await
    }
}
