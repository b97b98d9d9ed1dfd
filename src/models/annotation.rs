//! Annotation (note + rating) data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::ValidationErrors;

pub const NOTE_MIN_CHARS: usize = 10;
pub const NOTE_MAX_CHARS: usize = 500;
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// A user-authored note and rating attached to a book id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub note: String,
    pub rating: u8,
    pub date_added: DateTime<Utc>,

    /// Book title at the time the note was written
    #[serde(alias = "bookTitle")]
    pub book_title_snapshot: String,
}

impl Annotation {
    /// Rating rendered as filled and empty stars, e.g. `★★★☆☆`.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(RATING_MAX as u8));
        format!(
            "{}{}",
            "★".repeat(filled),
            "☆".repeat(RATING_MAX as usize - filled)
        )
    }
}

/// Check a note and rating, reporting every failing field.
///
/// Note length is measured on the trimmed text in grapheme clusters.
pub fn validate_annotation(note: &str, rating: i64) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let trimmed = note.trim();
    let length = trimmed.graphemes(true).count();
    if trimmed.is_empty() {
        errors.add("note", "Note is required");
    } else if length < NOTE_MIN_CHARS {
        errors.add(
            "note",
            format!("Note must be at least {} characters long", NOTE_MIN_CHARS),
        );
    } else if length > NOTE_MAX_CHARS {
        errors.add(
            "note",
            format!("Note must be less than {} characters", NOTE_MAX_CHARS),
        );
    }

    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        errors.add(
            "rating",
            format!("Rating must be between {} and {}", RATING_MIN, RATING_MAX),
        );
    }

    errors.into_result()
}
