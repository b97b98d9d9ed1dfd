// src/services/search.rs

//! Search provider client.
//!
//! Queries the Open Library search endpoint for a fixed field set.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{RawDoc, SearchConfig};
use crate::utils::http::create_async_client;

/// Fields requested from the provider.
pub const SEARCH_FIELDS: &str = "key,title,author_name,first_publish_year,cover_i,isbn,publisher,language,subject,number_of_pages_median";

/// Source of raw search documents.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch up to `limit` documents matching `query`.
    ///
    /// An empty vector means the provider found nothing.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawDoc>>;
}

/// Open Library search API client.
pub struct OpenLibraryClient {
    client: Client,
    base_url: Url,
}

impl OpenLibraryClient {
    /// Create a client from search settings.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    /// Build the request URL for a query.
    pub fn search_url(&self, query: &str, limit: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query.trim())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", SEARCH_FIELDS);
        url
    }
}

#[async_trait]
impl SearchProvider for OpenLibraryClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawDoc>> {
        let url = self.search_url(query, limit);
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transport {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<serde_json::Value>>,
}

/// Decode a search response body.
///
/// Each document is decoded on its own so one malformed entry does not
/// discard the rest. A missing `docs` array yields no documents.
pub fn parse_response(body: &str) -> Result<Vec<RawDoc>> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let docs = response
        .docs
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value::<RawDoc>(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::warn!("Skipping malformed search result #{}: {}", position, e);
                None
            }
        })
        .collect();
    Ok(docs)
}
