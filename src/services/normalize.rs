//! Search result normalizer.
//!
//! Maps provider documents onto canonical books and merges favorite state.

use std::collections::BTreeSet;

use crate::models::{Book, RawDoc};

/// Convert raw documents into books, preserving provider order.
///
/// Documents without a usable `key` are dropped since they have no identity.
pub fn normalize(
    raw_docs: impl IntoIterator<Item = RawDoc>,
    favorites: &BTreeSet<String>,
) -> Vec<Book> {
    raw_docs
        .into_iter()
        .enumerate()
        .filter_map(|(position, doc)| normalize_doc(position, doc, favorites))
        .collect()
}

fn normalize_doc(position: usize, doc: RawDoc, favorites: &BTreeSet<String>) -> Option<Book> {
    let id = match doc.key {
        Some(key) if !key.trim().is_empty() => key,
        _ => {
            log::warn!(
                "Dropping search result #{} ({}): missing key",
                position,
                doc.title.as_deref().unwrap_or("untitled")
            );
            return None;
        }
    };

    let favorite = favorites.contains(&id);
    Some(Book {
        id,
        title: doc.title,
        authors: doc.author_name.unwrap_or_default(),
        first_publish_year: doc.first_publish_year,
        cover_id: doc.cover_i,
        isbns: doc.isbn,
        publishers: doc.publisher,
        languages: doc.language,
        subjects: doc.subject,
        page_count_median: doc.number_of_pages_median,
        favorite,
    })
}
