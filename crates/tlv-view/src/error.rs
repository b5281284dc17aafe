//! Error types for view-state navigation.

use thiserror::Error;

/// Result type for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised by navigation requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// The requested page is outside `1..=total`.
    #[error("page {page} out of range (1-{total})")]
    PageOutOfRange {
        /// The requested page.
        page: usize,
        /// The number of pages available.
        total: usize,
    },

    /// No chapter has the given id or position.
    #[error("unknown chapter: {0}")]
    UnknownChapter(String),

    /// Page size must be at least one.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// No document is loaded yet.
    #[error("no document loaded")]
    NotLoaded,
}
