//! Shared types for the library application
//!
//! API data shapes used by both the server and `library-client`:
//! identity and catalogue models, auth DTOs, list queries and response
//! envelopes.

pub mod client;
pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest};
pub use models::{ProfileUpdate, Role, User};
pub use response::{ApiResponse, PaginatedResponse};
