//! TMDb listing client.
//!
//! Every listing request degrades to "no items" on failure: a warning is
//! logged and the page contributes nothing. Callers never see an error.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::http::{HttpReply, ReqwestTransport, Transport, TransportError};
use crate::domain::RawItem;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-AU";

/// Why a single request produced no data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("TMDb returned status {status}: {}", .message.as_deref().unwrap_or("no status message"))]
    Status { status: u16, message: Option<String> },

    #[error("Invalid JSON from TMDb: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No 'results' field in TMDb response")]
    MissingResults,
}

/// Settings the client is constructed with
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API key sent as `api_key` on every request
    pub api_key: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Default `language` parameter
    pub language: Option<String>,

    /// Default `region` parameter
    pub region: Option<String>,

    /// Pages requested per listing (at least 1)
    pub page_limit: u32,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            region: None,
            page_limit: 1,
        }
    }
}

/// Error body shape used by TMDb
#[derive(Debug, Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

/// Listing body; `results` is kept untyped so one odd entry can't sink a page
#[derive(Debug, Deserialize)]
struct ListingBody {
    results: Option<Vec<Value>>,
}

/// TMDb client over a pluggable transport
#[derive(Debug, Clone)]
pub struct TmdbClient<T = ReqwestTransport> {
    pub(crate) settings: ClientSettings,
    pub(crate) transport: T,
}

impl TmdbClient<ReqwestTransport> {
    /// Create a client using the default reqwest transport
    pub fn new(settings: ClientSettings) -> Self {
        Self::with_transport(settings, ReqwestTransport::new())
    }
}

impl<T: Transport> TmdbClient<T> {
    pub fn with_transport(settings: ClientSettings, transport: T) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), endpoint)
    }

    /// Build a fresh parameter map for one request.
    ///
    /// Caller parameters win over the locale defaults; the credential and
    /// page number are always set by the client.
    pub(crate) fn request_params(
        &self,
        params: &BTreeMap<String, String>,
        page: Option<u32>,
    ) -> BTreeMap<String, String> {
        let mut merged = params.clone();

        if let Some(language) = &self.settings.language {
            merged
                .entry("language".to_string())
                .or_insert_with(|| language.clone());
        }
        if let Some(region) = &self.settings.region {
            merged
                .entry("region".to_string())
                .or_insert_with(|| region.clone());
        }

        merged.insert("api_key".to_string(), self.settings.api_key.clone());
        if let Some(page) = page {
            merged.insert("page".to_string(), page.to_string());
        }

        merged
    }

    /// Fetch `page_limit` pages of a listing endpoint
    pub async fn fetch(&self, endpoint: &str, params: &BTreeMap<String, String>) -> Vec<RawItem> {
        self.fetch_pages(endpoint, params, self.settings.page_limit)
            .await
    }

    /// Fetch pages `1..=pages` and concatenate their items.
    ///
    /// All pages are requested even when an earlier one is empty or fails.
    pub async fn fetch_pages(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        pages: u32,
    ) -> Vec<RawItem> {
        let mut items = Vec::new();

        for page in 1..=pages.max(1) {
            match self.fetch_page(endpoint, params, page).await {
                Ok(mut page_items) => {
                    debug!(endpoint, page, count = page_items.len(), "Fetched page");
                    items.append(&mut page_items);
                }
                Err(e) => {
                    warn!(endpoint, page, error = %e, "TMDb listing request failed");
                }
            }
        }

        items
    }

    /// Fetch a single page, surfacing the failure reason
    pub async fn fetch_page(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        page: u32,
    ) -> Result<Vec<RawItem>, FetchError> {
        let url = self.url(endpoint);
        let query = self.request_params(params, Some(page));

        debug!(%url, page, "Fetching listing");
        let reply = self.transport.get(&url, &query).await?;

        parse_listing(&reply, endpoint)
    }
}

fn parse_listing(reply: &HttpReply, endpoint: &str) -> Result<Vec<RawItem>, FetchError> {
    if !reply.is_success() {
        let message = serde_json::from_str::<StatusBody>(&reply.body)
            .ok()
            .and_then(|b| b.status_message);
        return Err(FetchError::Status {
            status: reply.status,
            message,
        });
    }

    let body: ListingBody = serde_json::from_str(&reply.body)?;
    let results = body.results.ok_or(FetchError::MissingResults)?;

    let items = results
        .iter()
        .filter_map(|entry| {
            let item = RawItem::from_value(entry);
            if item.is_none() {
                debug!(endpoint, "Skipping result without id or title");
            }
            item
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient<ReqwestTransport> {
        let mut settings = ClientSettings::new("secret");
        settings.region = Some("AU".to_string());
        TmdbClient::new(settings)
    }

    #[test]
    fn test_request_params_defaults() {
        let params = client().request_params(&BTreeMap::new(), Some(2));

        assert_eq!(params.get("api_key").map(String::as_str), Some("secret"));
        assert_eq!(params.get("language").map(String::as_str), Some("en-AU"));
        assert_eq!(params.get("region").map(String::as_str), Some("AU"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_request_params_keep_caller_locale() {
        let caller: BTreeMap<String, String> = [
            ("language".to_string(), "de-DE".to_string()),
            ("api_key".to_string(), "spoofed".to_string()),
        ]
        .into_iter()
        .collect();

        let params = client().request_params(&caller, None);

        assert_eq!(params.get("language").map(String::as_str), Some("de-DE"));
        // Credential is always the configured one
        assert_eq!(params.get("api_key").map(String::as_str), Some("secret"));
        assert!(!params.contains_key("page"));
    }

    #[test]
    fn test_request_params_do_not_leak_between_calls() {
        let client = client();
        let first: BTreeMap<String, String> =
            [("with_genres".to_string(), "35".to_string())].into_iter().collect();

        let _ = client.request_params(&first, Some(1));
        let second = client.request_params(&BTreeMap::new(), Some(1));

        assert!(!second.contains_key("with_genres"));
    }

    #[test]
    fn test_url_joins_base_and_endpoint() {
        let mut settings = ClientSettings::new("k");
        settings.base_url = "http://localhost:8080/3/".to_string();
        let client = TmdbClient::new(settings);

        assert_eq!(client.url("/tv/popular"), "http://localhost:8080/3/tv/popular");
    }

    #[test]
    fn test_parse_listing_success() {
        let reply = HttpReply::new(
            200,
            r#"{"page":1,"results":[{"id":1,"name":"A"},{"bogus":true},{"id":2,"title":"B"}]}"#,
        );

        let items = parse_listing(&reply, "/discover/tv").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[1].id, 2);
    }

    #[test]
    fn test_parse_listing_status_error_keeps_message() {
        let reply = HttpReply::new(401, r#"{"status_code":7,"status_message":"Invalid API key"}"#);

        match parse_listing(&reply, "/discover/tv") {
            Err(FetchError::Status { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Invalid API key"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_listing_failures() {
        let not_json = HttpReply::new(200, "<html>oops</html>");
        assert!(matches!(parse_listing(&not_json, "/x"), Err(FetchError::Json(_))));

        let no_results = HttpReply::new(200, r#"{"page":1}"#);
        assert!(matches!(
            parse_listing(&no_results, "/x"),
            Err(FetchError::MissingResults)
        ));
    }
}
