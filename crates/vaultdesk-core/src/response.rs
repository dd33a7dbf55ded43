//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

/// `{"success": true, "message": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Wrapper keeping list payloads under an `items` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

/// Page of results with its position in the full result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Items<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(
        message: impl Into<String>,
        items: Vec<T>,
        page: i64,
        per_page: i64,
        total_items: i64,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Items { items },
            page,
            per_page,
            total_items,
            total_pages: total_pages(total_items, per_page),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.data.items
    }
}

/// Ceiling division of `total_items` by `per_page`.
pub fn total_pages(total_items: i64, per_page: i64) -> i64 {
    if per_page <= 0 || total_items <= 0 {
        return 0;
    }
    (total_items + per_page - 1) / per_page
}
