// src/models/mod.rs

//! Domain models for the folio library.

mod annotation;
mod book;
mod config;
mod search;

// Re-export all public types
pub use annotation::{
    Annotation, NOTE_MAX_CHARS, NOTE_MIN_CHARS, RATING_MAX, RATING_MIN, validate_annotation,
};
pub use book::{Book, CoverSize, RawDoc};
pub use config::{Config, LoggingConfig, SearchConfig};
pub use search::{
    CONNECTIVITY_MESSAGE, EMPTY_QUERY_MESSAGE, FailureKind, NO_RESULTS_MESSAGE, SearchFailure,
    SearchState, SearchStatus, Statistics,
};
