// src/pipeline/search.rs

//! Search command.

use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::{Annotation, Book, FailureKind, SearchStatus};
use crate::services::BookStateManager;
use crate::storage::KeyValueStore;
use crate::utils::truncate;

/// Run a search and print the resulting rows and statistics.
///
/// An empty result is reported and is not an error; a transport failure is.
pub async fn run_search<S: KeyValueStore>(
    manager: &mut BookStateManager<S>,
    query: &str,
    limit: usize,
    favorites_only: bool,
) -> Result<()> {
    manager.search(query, limit).await?;

    if let SearchStatus::Failed(failure) = &manager.state().status {
        log::error!("Error: {}", failure.message);
        return match failure.kind {
            FailureKind::NotFound => Ok(()),
            FailureKind::Transport => Err(AppError::search(failure.message.clone())),
        };
    }

    let rows = manager.filtered_books(favorites_only);
    let annotations = manager.annotations();
    for book in &rows {
        println!("{}", format_row(book, annotations));
    }

    let total = manager.books().len();
    log::info!(
        "Showing {} of {} book{}",
        rows.len(),
        total,
        if total == 1 { "" } else { "s" }
    );

    let stats = manager.statistics();
    log::info!(
        "Total: {} | Favorites: {} | With notes: {} | Avg rating: {:.1}",
        stats.total,
        stats.favorite_count,
        stats.annotated_count,
        stats.average_rating
    );
    Ok(())
}

/// One table row: favorite marker, title, authors, year, note rating, id.
pub fn format_row(book: &Book, annotations: &BTreeMap<String, Annotation>) -> String {
    let marker = if book.favorite { "★" } else { "☆" };
    let title = book.title.as_deref().unwrap_or("No title");
    let authors = if book.authors.is_empty() {
        "Unknown".to_string()
    } else {
        book.authors.join(", ")
    };
    let year = book
        .first_publish_year
        .map_or_else(|| "Unknown".to_string(), |y| y.to_string());
    let note = annotations
        .get(&book.id)
        .map_or_else(|| "No note".to_string(), Annotation::stars);

    format!(
        "{} {:<40} {:<25} {:>7}  {:<7}  {}",
        marker,
        truncate(title, 40),
        truncate(&authors, 25),
        year,
        note,
        book.id
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::models::RawDoc;
    use crate::services::{AnnotationStore, SearchProvider};
    use crate::storage::MemoryStorage;

    /// Provider answering every query with the same outcome.
    enum CannedProvider {
        Empty,
        Status(u16),
    }

    #[async_trait]
    impl SearchProvider for CannedProvider {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<RawDoc>> {
            match self {
                CannedProvider::Empty => Ok(Vec::new()),
                CannedProvider::Status(status) => Err(AppError::Transport { status: *status }),
            }
        }
    }

    fn manager(provider: CannedProvider) -> BookStateManager<MemoryStorage> {
        BookStateManager::new(
            AnnotationStore::open(MemoryStorage::new()),
            Arc::new(provider),
        )
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let mut manager = manager(CannedProvider::Status(500));

        let err = run_search(&mut manager, "javascript", 10, false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Search error: HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_no_results_is_not_an_error() {
        let mut manager = manager(CannedProvider::Empty);
        assert!(run_search(&mut manager, "zzzzzz", 10, false).await.is_ok());
    }

    fn book() -> Book {
        Book {
            id: "/works/OL1W".to_string(),
            title: None,
            authors: Vec::new(),
            first_publish_year: None,
            cover_id: None,
            isbns: None,
            publishers: None,
            languages: None,
            subjects: None,
            page_count_median: None,
            favorite: true,
        }
    }

    #[test]
    fn test_row_uses_placeholders_for_missing_fields() {
        let row = format_row(&book(), &BTreeMap::new());
        assert!(row.starts_with("★ No title"));
        assert!(row.contains("Unknown"));
        assert!(row.contains("No note"));
        assert!(row.ends_with("/works/OL1W"));
    }

    #[test]
    fn test_row_shows_rating_stars() {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            "/works/OL1W".to_string(),
            Annotation {
                note: "Great read, loved it".to_string(),
                rating: 3,
                date_added: chrono::Utc::now(),
                book_title_snapshot: "Some Title".to_string(),
            },
        );
        assert!(format_row(&book(), &annotations).contains("★★★☆☆"));
    }
}
