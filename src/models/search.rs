//! Search state and derived statistics.

use serde::Serialize;

use super::Book;

pub const NO_RESULTS_MESSAGE: &str = "No books found for your search query";
pub const CONNECTIVITY_MESSAGE: &str =
    "Failed to fetch books. Please check your internet connection and try again.";
pub const EMPTY_QUERY_MESSAGE: &str = "Search query cannot be empty";

/// Why a search ended in the failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The provider answered but returned no documents
    NotFound,
    /// The request failed or returned a non-success status
    Transport,
}

/// A reportable search failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchFailure {
    pub fn not_found() -> Self {
        Self {
            kind: FailureKind::NotFound,
            message: NO_RESULTS_MESSAGE.to_string(),
        }
    }

    /// Transport failure, falling back to a generic message when none is given.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            CONNECTIVITY_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            kind: FailureKind::Transport,
            message,
        }
    }
}

/// Search lifecycle status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(SearchFailure),
}

/// Search status plus the canonical book collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub status: SearchStatus,
    pub books: Vec<Book>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// Failure message, if the last search failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SearchStatus::Failed(failure) => Some(failure.message.as_str()),
            _ => None,
        }
    }
}

/// Aggregate numbers over the collection and annotations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub favorite_count: usize,
    pub annotated_count: usize,
    pub average_rating: f64,
}
