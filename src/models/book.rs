//! Book data structures.

use serde::{Deserialize, Serialize};

/// A search result document as returned by the provider.
///
/// Every field is optional; identity comes from `key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawDoc {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub isbn: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<Vec<String>>,
    #[serde(default)]
    pub subject: Option<Vec<String>>,
    #[serde(default)]
    pub number_of_pages_median: Option<u32>,
}

/// Cover thumbnail size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Canonical book entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Source key, e.g. `/works/OL27448W`
    pub id: String,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub first_publish_year: Option<i32>,
    pub cover_id: Option<i64>,
    pub isbns: Option<Vec<String>>,
    pub publishers: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub subjects: Option<Vec<String>>,
    pub page_count_median: Option<u32>,

    /// Whether `id` was in the favorite set at merge time
    pub favorite: bool,
}

impl Book {
    /// Cover thumbnail URL under `cover_base_url`, if the book has a cover.
    pub fn cover_url(&self, cover_base_url: &str, size: CoverSize) -> Option<String> {
        self.cover_id.map(|id| {
            format!(
                "{}/{}-{}.jpg",
                cover_base_url.trim_end_matches('/'),
                id,
                size.suffix()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(cover_id: Option<i64>) -> Book {
        Book {
            id: "/works/OL1W".to_string(),
            title: Some("Eloquent JavaScript".to_string()),
            authors: vec!["Marijn Haverbeke".to_string()],
            first_publish_year: Some(2011),
            cover_id,
            isbns: None,
            publishers: None,
            languages: None,
            subjects: None,
            page_count_median: None,
            favorite: false,
        }
    }

    #[test]
    fn test_cover_url() {
        let book = sample_book(Some(8091016));
        assert_eq!(
            book.cover_url("https://covers.openlibrary.org/b/id/", CoverSize::Large),
            Some("https://covers.openlibrary.org/b/id/8091016-L.jpg".to_string())
        );
    }

    #[test]
    fn test_cover_url_absent() {
        let book = sample_book(None);
        assert_eq!(
            book.cover_url("https://covers.openlibrary.org/b/id", CoverSize::Small),
            None
        );
    }

    #[test]
    fn test_raw_doc_missing_fields() {
        let doc: RawDoc = serde_json::from_str(r#"{"title": "Untitled"}"#).unwrap();
        assert_eq!(doc.key, None);
        assert_eq!(doc.title.as_deref(), Some("Untitled"));
        assert_eq!(doc.author_name, None);
    }
}
