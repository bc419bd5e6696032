//! Library Client - session and navigation core of the library front end
//!
//! - [`SessionStore`]: identity, credential and operation status, backed by
//!   the library API and a persistent credential slot
//! - [`NavigationGuard`]: decides whether a route may be entered
//! - [`Router`]: drives navigation through the route table and the guard

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod route;
pub mod router;
pub mod session;
pub mod storage;
pub mod store;

#[cfg(test)]
mod mock;

pub use config::ClientConfig;
pub use error::{
    ClientError, ClientResult, NavigationError, RouteConfigError, SessionError, SessionResult,
    StorageError,
};
pub use guard::{NavigationDecision, NavigationGuard};
pub use http::{HttpClient, NetworkHttpClient};
pub use route::{ResolvedRoute, RouteRecord, RouteRequirement, RouteTable};
pub use router::Router;
pub use session::Session;
pub use storage::{CredentialStorage, FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{IdentityStatus, SessionStore};

// Re-export shared types for convenience
pub use shared::client::{AuthResponse, LoginRequest, RegisterRequest};
pub use shared::models::{ProfileUpdate, Role, User};
