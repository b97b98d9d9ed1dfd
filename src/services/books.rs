// src/services/books.rs

//! Book state manager.
//!
//! Holds the canonical book collection and search status, and routes
//! favorite and annotation changes through the annotation store.
//!
//! ## Search lifecycle
//!
//! ```text
//! Idle ──begin──▶ Loading ──complete──▶ Ready | Failed
//!                    ▲                        │
//!                    └──────── begin ─────────┘
//! ```
//!
//! `search` is split into `begin_search` and `complete_search` around the
//! network fetch. Each begin takes a new sequence number and only the
//! newest one may complete, so an older response arriving late is dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{AppError, Result};
use crate::models::{
    Annotation, Book, EMPTY_QUERY_MESSAGE, RawDoc, SearchFailure, SearchState, SearchStatus,
    Statistics,
};
use crate::services::annotations::AnnotationStore;
use crate::services::normalize::normalize;
use crate::services::search::SearchProvider;
use crate::services::views;
use crate::storage::KeyValueStore;

/// A search that has entered the loading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
    limit: usize,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run the fetch for this ticket against a provider.
    pub async fn fetch(&self, provider: &dyn SearchProvider) -> Result<Vec<RawDoc>> {
        provider.search(&self.query, self.limit).await
    }
}

/// How a search completion was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result replaced the current state
    Applied,
    /// A newer search was issued; the result was discarded
    Superseded,
}

/// Single authoritative container for search state.
pub struct BookStateManager<S> {
    store: AnnotationStore<S>,
    provider: Arc<dyn SearchProvider>,
    state: SearchState,
    issued: u64,
    revision: watch::Sender<u64>,
}

impl<S: KeyValueStore> BookStateManager<S> {
    pub fn new(store: AnnotationStore<S>, provider: Arc<dyn SearchProvider>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            provider,
            state: SearchState::default(),
            issued: 0,
            revision,
        }
    }

    // --- Queries ---

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn books(&self) -> &[Book] {
        &self.state.books
    }

    pub fn find_book(&self, id: &str) -> Option<&Book> {
        self.state.books.iter().find(|book| book.id == id)
    }

    pub fn favorite_books(&self) -> Vec<&Book> {
        views::filtered_books(&self.state.books, true)
    }

    pub fn filtered_books(&self, favorites_only: bool) -> Vec<&Book> {
        views::filtered_books(&self.state.books, favorites_only)
    }

    pub fn statistics(&self) -> Statistics {
        views::statistics(&self.state.books, self.store.annotations())
    }

    pub fn store(&self) -> &AnnotationStore<S> {
        &self.store
    }

    pub fn annotations(&self) -> &BTreeMap<String, Annotation> {
        self.store.annotations()
    }

    /// Watch the change counter. It is bumped after every state or annotation change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // --- Search ---

    /// Search the provider and replace the collection with the results.
    ///
    /// Only an empty query is an error; fetch failures end up in the state.
    pub async fn search(&mut self, query: &str, limit: usize) -> Result<Completion> {
        let ticket = self.begin_search(query, limit)?;
        let provider = Arc::clone(&self.provider);
        let result = ticket.fetch(provider.as_ref()).await;
        Ok(self.complete_search(ticket, result))
    }

    /// Enter the loading state for a new query.
    ///
    /// The current collection stays in place until the search completes.
    pub fn begin_search(&mut self, query: &str, limit: usize) -> Result<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("query", EMPTY_QUERY_MESSAGE));
        }

        self.issued += 1;
        self.state.status = SearchStatus::Loading;
        self.notify();

        log::info!("Searching for '{}' (limit {})", query, limit);
        Ok(SearchTicket {
            seq: self.issued,
            query: query.to_string(),
            limit,
        })
    }

    /// Apply the outcome of a fetch started by `begin_search`.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<RawDoc>>,
    ) -> Completion {
        if ticket.seq != self.issued || !self.state.is_loading() {
            log::debug!(
                "Discarding result for '{}' (search #{} superseded by #{})",
                ticket.query,
                ticket.seq,
                self.issued
            );
            return Completion::Superseded;
        }

        match result {
            Ok(docs) => {
                let fetched = docs.len();
                let books = normalize(docs, self.store.favorites());
                if books.is_empty() {
                    log::info!("No results for '{}'", ticket.query);
                    self.fail(SearchFailure::not_found());
                } else {
                    log::info!(
                        "Loaded {} books for '{}' ({} dropped)",
                        books.len(),
                        ticket.query,
                        fetched - books.len()
                    );
                    self.state = SearchState {
                        status: SearchStatus::Ready,
                        books,
                    };
                }
            }
            Err(e) => {
                log::error!("Search for '{}' failed: {}", ticket.query, e);
                self.fail(SearchFailure::transport(transport_message(&e)));
            }
        }

        self.notify();
        Completion::Applied
    }

    fn fail(&mut self, failure: SearchFailure) {
        self.state = SearchState {
            status: SearchStatus::Failed(failure),
            books: Vec::new(),
        };
    }

    // --- Favorites ---

    /// Toggle a favorite and update matching books in place.
    ///
    /// Returns the new favorite status of `id`.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let favorite = self.store.toggle_favorite(id)?.contains(id);

        for book in self.state.books.iter_mut().filter(|book| book.id == id) {
            book.favorite = favorite;
        }

        self.notify();
        Ok(favorite)
    }

    /// Drop every favorite and clear the flag on all books.
    pub fn clear_all_favorites(&mut self) -> Result<()> {
        self.store.clear_favorites()?;

        for book in &mut self.state.books {
            book.favorite = false;
        }

        self.notify();
        Ok(())
    }

    // --- Annotations ---

    pub fn upsert_annotation(
        &mut self,
        id: &str,
        note: &str,
        rating: i64,
        title_snapshot: &str,
    ) -> Result<Annotation> {
        let annotation = self
            .store
            .upsert_annotation(id, note, rating, title_snapshot)?;
        self.notify();
        Ok(annotation)
    }

    pub fn delete_annotation(&mut self, id: &str) -> Result<()> {
        self.store.delete_annotation(id)?;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

/// Human-readable message for a failed fetch.
fn transport_message(error: &AppError) -> String {
    match error {
        AppError::Http(e) if e.is_connect() || e.is_timeout() => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::models::{CONNECTIVITY_MESSAGE, FailureKind, NO_RESULTS_MESSAGE};
    use crate::storage::MemoryStorage;

    /// Provider answering every query with the same outcome.
    enum CannedProvider {
        Docs(Vec<RawDoc>),
        Status(u16),
    }

    #[async_trait]
    impl SearchProvider for CannedProvider {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<RawDoc>> {
            match self {
                CannedProvider::Docs(docs) => Ok(docs.clone()),
                CannedProvider::Status(status) => Err(AppError::Transport { status: *status }),
            }
        }
    }

    fn doc(key: Option<&str>, title: &str) -> RawDoc {
        RawDoc {
            key: key.map(str::to_string),
            title: Some(title.to_string()),
            ..RawDoc::default()
        }
    }

    fn javascript_docs() -> Vec<RawDoc> {
        vec![
            doc(Some("/works/OL1W"), "JavaScript: The Good Parts"),
            doc(None, "Keyless Edition"),
            doc(Some("/works/OL2W"), "Eloquent JavaScript"),
        ]
    }

    fn manager(provider: CannedProvider) -> BookStateManager<MemoryStorage> {
        BookStateManager::new(
            AnnotationStore::open(MemoryStorage::new()),
            Arc::new(provider),
        )
    }

    #[tokio::test]
    async fn test_search_drops_keyless_docs() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));

        let completion = manager.search("javascript", 50).await.unwrap();

        assert_eq!(completion, Completion::Applied);
        assert_eq!(manager.state().status, SearchStatus::Ready);
        assert_eq!(manager.books().len(), 2);
        assert_eq!(manager.statistics().total, 2);
    }

    #[tokio::test]
    async fn test_empty_query_leaves_state_untouched() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();
        let before = manager.state().clone();

        let err = manager.search("   ", 50).await.unwrap_err();

        assert_eq!(
            err.validation_errors().and_then(|e| e.get("query")),
            Some(EMPTY_QUERY_MESSAGE)
        );
        assert_eq!(manager.state(), &before);
    }

    #[tokio::test]
    async fn test_no_results_is_reported_as_not_found() {
        let mut manager = manager(CannedProvider::Docs(Vec::new()));

        manager.search("zzzzzz", 10).await.unwrap();

        match &manager.state().status {
            SearchStatus::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::NotFound);
                assert_eq!(failure.message, NO_RESULTS_MESSAGE);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(manager.books().is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_clears_books_and_keeps_status_message() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();
        manager.provider = Arc::new(CannedProvider::Status(503));

        manager.search("javascript", 50).await.unwrap();

        let failure = match &manager.state().status {
            SearchStatus::Failed(failure) => failure.clone(),
            other => panic!("expected failure, got {other:?}"),
        };
        assert_eq!(failure.kind, FailureKind::Transport);
        assert_eq!(failure.message, "HTTP error! status: 503");
        assert!(manager.books().is_empty());
    }

    #[tokio::test]
    async fn test_new_search_clears_previous_failure() {
        let mut manager = manager(CannedProvider::Status(503));
        manager.search("javascript", 50).await.unwrap();
        assert!(manager.state().error_message().is_some());

        manager.begin_search("javascript", 50).unwrap();

        assert!(manager.state().is_loading());
        assert_eq!(manager.state().error_message(), None);
    }

    #[test]
    fn test_transport_message_falls_back_when_empty() {
        assert_eq!(SearchFailure::transport(String::new()).message, CONNECTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_book_flag() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();

        assert!(manager.toggle_favorite("/works/OL2W").unwrap());
        assert!(manager.find_book("/works/OL2W").unwrap().favorite);
        assert!(!manager.find_book("/works/OL1W").unwrap().favorite);

        assert!(!manager.toggle_favorite("/works/OL2W").unwrap());
        assert!(!manager.find_book("/works/OL2W").unwrap().favorite);
        assert!(manager.store().favorites().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_updates_set_only() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();
        let books_before = manager.books().to_vec();

        manager.toggle_favorite("/works/OL999W").unwrap();

        assert_eq!(manager.books(), books_before.as_slice());
        assert!(manager.store().is_favorite("/works/OL999W"));
    }

    #[tokio::test]
    async fn test_clear_all_favorites() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();
        manager.toggle_favorite("/works/OL1W").unwrap();
        manager.toggle_favorite("/works/OL2W").unwrap();

        manager.clear_all_favorites().unwrap();

        assert!(manager.books().iter().all(|b| !b.favorite));
        assert!(manager.favorite_books().is_empty());
        assert!(manager.store().favorites().is_empty());
    }

    #[tokio::test]
    async fn test_favorites_survive_a_new_search() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();
        manager.toggle_favorite("/works/OL1W").unwrap();

        manager.search("javascript", 50).await.unwrap();

        let favorites: Vec<_> = manager.favorite_books().iter().map(|b| b.id.clone()).collect();
        assert_eq!(favorites, ["/works/OL1W"]);
    }

    #[tokio::test]
    async fn test_toggle_during_fetch_is_merged() {
        let provider = CannedProvider::Docs(javascript_docs());
        let mut manager = manager(CannedProvider::Docs(Vec::new()));

        let ticket = manager.begin_search("javascript", 50).unwrap();
        assert!(manager.state().is_loading());
        manager.toggle_favorite("/works/OL2W").unwrap();
        let result = ticket.fetch(&provider).await;
        manager.complete_search(ticket, result);

        assert!(manager.find_book("/works/OL2W").unwrap().favorite);
        assert!(!manager.find_book("/works/OL1W").unwrap().favorite);
    }

    #[tokio::test]
    async fn test_older_search_resolving_last_is_discarded() {
        let mut manager = manager(CannedProvider::Docs(Vec::new()));

        let first = manager.begin_search("javascript", 50).unwrap();
        let second = manager.begin_search("rust", 50).unwrap();

        let newer = vec![doc(Some("/works/RUST"), "The Rust Programming Language")];
        assert_eq!(manager.complete_search(second, Ok(newer)), Completion::Applied);
        assert_eq!(
            manager.complete_search(first, Ok(javascript_docs())),
            Completion::Superseded
        );

        let ids: Vec<_> = manager.books().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["/works/RUST"]);
    }

    #[tokio::test]
    async fn test_annotations_feed_statistics() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        manager.search("javascript", 50).await.unwrap();
        manager.toggle_favorite("/works/OL1W").unwrap();

        manager
            .upsert_annotation("/works/OL1W", "Short but dense classic", 2, "JavaScript: The Good Parts")
            .unwrap();
        manager
            .upsert_annotation("/works/OL2W", "Excellent exercises throughout", 4, "Eloquent JavaScript")
            .unwrap();
        manager
            .upsert_annotation("/works/OL3W", "Read this one years ago", 5, "Other")
            .unwrap();

        let stats = manager.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.favorite_count, 1);
        assert_eq!(stats.annotated_count, 3);
        assert_eq!(stats.average_rating, 3.7);

        manager.delete_annotation("/works/OL3W").unwrap();
        assert_eq!(manager.statistics().average_rating, 3.0);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_change() {
        let mut manager = manager(CannedProvider::Docs(javascript_docs()));
        let mut changes = manager.subscribe();

        manager.search("javascript", 50).await.unwrap();
        assert!(changes.has_changed().unwrap());
        let after_search = *changes.borrow_and_update();
        assert_eq!(after_search, 2);

        manager.toggle_favorite("/works/OL1W").unwrap();
        assert!(changes.has_changed().unwrap());
        assert_eq!(manager.revision(), 3);
    }
}
