//! API Response types
//!
//! Envelope and page shapes returned by the library API.

use serde::{Deserialize, Serialize};

/// Generic response envelope
///
/// ```json
/// {
///     "success": true,
///     "message": "Book created",
///     "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// Human-readable message (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            data,
            message: None,
            success: true,
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
            success: true,
        }
    }

    /// Unwrap into the payload, or the message when the server flagged failure
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.message.unwrap_or_else(|| "Request failed".to_string()))
        }
    }
}

/// One page of a server-side paged listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// Requested page size
    pub size: u32,
    /// 0-based page index
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> PaginatedResponse<T> {
    /// Build a page from a slice of items and the overall total
    pub fn new(content: Vec<T>, number: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            u32::try_from(total_elements.div_ceil(size as u64)).unwrap_or(u32::MAX)
        };
        Self {
            content,
            total_elements,
            total_pages,
            size,
            number,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Transform the page items, keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
        }
    }
}
