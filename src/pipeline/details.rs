// src/pipeline/details.rs

//! Book details command.

use crate::error::{AppError, Result};
use crate::models::{Annotation, Book, CoverSize, SearchStatus};
use crate::services::BookStateManager;
use crate::storage::KeyValueStore;

const SUBJECT_LIMIT: usize = 10;
const PUBLISHER_LIMIT: usize = 3;

/// Search, then print the full record of one book from the results.
pub async fn run_details<S: KeyValueStore>(
    manager: &mut BookStateManager<S>,
    id: &str,
    query: &str,
    limit: usize,
    cover_base_url: &str,
) -> Result<()> {
    manager.search(query, limit).await?;

    if let SearchStatus::Failed(failure) = &manager.state().status {
        log::error!("Error: {}", failure.message);
        return Err(AppError::search(failure.message.clone()));
    }

    let Some(book) = manager.find_book(id) else {
        log::error!("{} is not among the results for '{}'", id, query);
        return Err(AppError::search(format!("Book {} not found", id)));
    };

    println!(
        "{}",
        format_details(book, manager.store().annotation(id), cover_base_url)
    );
    Ok(())
}

/// Multi-line detail view with placeholders for missing fields.
pub fn format_details(
    book: &Book,
    annotation: Option<&Annotation>,
    cover_base_url: &str,
) -> String {
    let mut lines = Vec::new();

    let marker = if book.favorite { "★" } else { "☆" };
    lines.push(format!(
        "{} {}",
        marker,
        book.title.as_deref().unwrap_or("No Title Available")
    ));

    let authors = if book.authors.is_empty() {
        "Unknown Author".to_string()
    } else {
        book.authors.join(", ")
    };
    lines.push(format!("Author(s):        {}", authors));
    lines.push(format!(
        "First Published:  {}",
        or_unknown(book.first_publish_year)
    ));
    lines.push(format!(
        "Number of Pages:  {}",
        or_unknown(book.page_count_median)
    ));

    if let Some(isbn) = book.isbns.as_ref().and_then(|isbns| isbns.first()) {
        lines.push(format!("ISBN:             {}", isbn));
    }
    if let Some(publishers) = book.publishers.as_ref().filter(|p| !p.is_empty()) {
        let shown = &publishers[..publishers.len().min(PUBLISHER_LIMIT)];
        lines.push(format!("Publisher(s):     {}", shown.join(", ")));
    }
    if let Some(languages) = book.languages.as_ref().filter(|l| !l.is_empty()) {
        lines.push(format!(
            "Language(s):      {}",
            languages.join(", ").to_uppercase()
        ));
    }
    if let Some(subjects) = book.subjects.as_ref().filter(|s| !s.is_empty()) {
        let shown = &subjects[..subjects.len().min(SUBJECT_LIMIT)];
        let mut line = format!("Subjects:         {}", shown.join(", "));
        if subjects.len() > SUBJECT_LIMIT {
            line.push_str(&format!(" +{} more", subjects.len() - SUBJECT_LIMIT));
        }
        lines.push(line);
    }

    match book.cover_url(cover_base_url, CoverSize::Large) {
        Some(url) => lines.push(format!("Cover:            {}", url)),
        None => lines.push("Cover:            (no cover available)".to_string()),
    }
    lines.push(format!("Open Library:     https://openlibrary.org{}", book.id));

    if let Some(annotation) = annotation {
        lines.push(format!(
            "Note:             {} {}",
            annotation.stars(),
            annotation.note
        ));
    }

    lines.join("\n")
}

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "Unknown".to_string(), |v| v.to_string())
}
