//! Service layer for the folio library.
//!
//! This module contains the business logic for:
//! - Favorites and notes persistence (`AnnotationStore`)
//! - Search provider access (`SearchProvider`, `OpenLibraryClient`)
//! - Result normalization (`normalize`)
//! - Search state (`BookStateManager`)
//! - Derived views (`filtered_books`, `statistics`)

mod annotations;
mod books;
mod normalize;
mod search;
mod views;

pub use annotations::AnnotationStore;
pub use books::{BookStateManager, Completion, SearchTicket};
pub use normalize::normalize;
pub use search::{OpenLibraryClient, SEARCH_FIELDS, SearchProvider, parse_response};
pub use views::{filtered_books, statistics};
