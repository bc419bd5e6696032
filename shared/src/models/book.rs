//! Book Model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Catalogue status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    #[default]
    Available,
    OutOfStock,
    Discontinued,
}

/// Book entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub publication_date: NaiveDate,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub status: BookStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Book {
    /// Whether at least one copy can be borrowed right now
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available && self.available_copies > 0
    }

    /// Copies currently out on loan
    pub fn borrowed_copies(&self) -> i32 {
        (self.total_copies - self.available_copies).max(0)
    }
}

/// Create book payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreateRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub publication_date: NaiveDate,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_copies: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

/// Update book payload; only `id` is required
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_copies: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(status: BookStatus, total: i32, available: i32) -> Book {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Book {
            id: 1,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: "9780441013593".into(),
            publisher: "Ace".into(),
            publication_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            category: "Science Fiction".into(),
            description: None,
            total_copies: total,
            available_copies: available,
            cover_image_url: None,
            rating: 4.5,
            review_count: 12,
            status,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_is_available() {
        assert!(book(BookStatus::Available, 3, 1).is_available());
        assert!(!book(BookStatus::Available, 3, 0).is_available());
        assert!(!book(BookStatus::Discontinued, 3, 3).is_available());
    }

    #[test]
    fn test_borrowed_copies() {
        assert_eq!(book(BookStatus::Available, 5, 2).borrowed_copies(), 3);
        assert_eq!(book(BookStatus::Available, 1, 4).borrowed_copies(), 0);
    }

    #[test]
    fn test_book_deserialize_defaults() {
        let json = r#"{
            "id": 3,
            "title": "Emma",
            "author": "Jane Austen",
            "isbn": "9780141439587",
            "publisher": "Penguin",
            "publicationDate": "1815-12-23",
            "category": "Classics",
            "totalCopies": 2,
            "availableCopies": 2,
            "status": "OUT_OF_STOCK",
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.status, BookStatus::OutOfStock);
        assert_eq!(book.review_count, 0);
        assert!(book.description.is_none());
    }

    #[test]
    fn test_update_request_only_sends_changes() {
        let req = BookUpdateRequest {
            id: 9,
            total_copies: Some(4),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"id":9,"totalCopies":4}"#);
    }
}
