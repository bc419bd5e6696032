//! Data models
//!
//! Shared between the API server and the client. Wire format is camelCase JSON;
//! all IDs are `i64`.

pub mod book;
pub mod borrow_record;
pub mod dashboard;
pub mod role;
pub mod user;

// Re-exports
pub use book::*;
pub use borrow_record::*;
pub use dashboard::*;
pub use role::*;
pub use user::*;
