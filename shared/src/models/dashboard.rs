//! Dashboard Model

use serde::{Deserialize, Serialize};

use super::{Book, BorrowRecord};

/// Aggregate statistics shown on the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_books: i64,
    pub total_users: i64,
    pub active_borrows: i64,
    pub overdue_books: i64,
    #[serde(default)]
    pub popular_books: Vec<Book>,
    #[serde(default)]
    pub recent_activity: Vec<BorrowRecord>,
}
