//! Derived views over the book collection and annotations.
//!
//! Pure functions; callers recompute them whenever the inputs change.

use std::collections::BTreeMap;

use crate::models::{Annotation, Book, Statistics};

/// Books to show, optionally restricted to favorites. Order is preserved.
pub fn filtered_books(books: &[Book], favorites_only: bool) -> Vec<&Book> {
    books
        .iter()
        .filter(|book| !favorites_only || book.favorite)
        .collect()
}

/// Collection size, favorite and annotation counts, and mean rating.
pub fn statistics(books: &[Book], annotations: &BTreeMap<String, Annotation>) -> Statistics {
    let rating_sum: u32 = annotations.values().map(|a| u32::from(a.rating)).sum();
    let average_rating = if annotations.is_empty() {
        0.0
    } else {
        round_to_tenth(f64::from(rating_sum) / annotations.len() as f64)
    };

    Statistics {
        total: books.len(),
        favorite_count: books.iter().filter(|b| b.favorite).count(),
        annotated_count: annotations.len(),
        average_rating,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
