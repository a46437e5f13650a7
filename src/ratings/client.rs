//! HTTP client for the ratings endpoint with timing and safe logging.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Browser user agent; the endpoint rejects unfamiliar clients.
const CLIENT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Feature flags the ratings site sends with every API call.
const FEATURE_FLAGS: &str = r#"{"enable_age_gate":true,"enable_age_gate_refactor":false,"enable_college_football_ratings":false,"enable_currency":false,"enable_events_page":true,"enable_fc_mobile_game_languages":true,"enable_glacier":false,"enable_im_resize_query_param":true,"enable_language_redirection":true,"enable_legal_disclaimer_page":false,"enable_mobile_download_flow_optimization":false,"enable_newsletter":true,"enable_newsletter_with_incentive":false,"enable_player_stats":false,"enable_portal":false,"enable_spotlight_carousel":false,"enable_translations_api_route":false,"enable_ugc_page":false,"enable_ugx":false}"#;

/// Static request headers, excluding the user agent.
const STATIC_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.9"),
    ("dnt", "1"),
    ("origin", "https://www.ea.com"),
    ("priority", "u=1, i"),
    ("referer", "https://www.ea.com/"),
    ("sec-ch-ua", r#""Chromium";v="137", "Not/A)Brand";v="24""#),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""macOS""#),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
    ("x-feature", FEATURE_FLAGS),
];

// ─────────────────────────────────────────────────────────────────────────────
// Internal Wire Types
// ─────────────────────────────────────────────────────────────────────────────

/// Mirrors the ratings response body. Paging metadata is ignored.
#[derive(Debug, Deserialize)]
struct WirePage {
    /// Absent and `null` both mean an empty page.
    #[serde(default)]
    items: Option<Vec<Value>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// One decoded page of raw player records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
}

impl Page {
    /// Decodes a response body.
    ///
    /// The body must be a JSON object. A missing or `null` `items` field is an
    /// empty page; any other non-array `items` is malformed.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::ParseFailed(format!("invalid JSON: {}", e)))?;

        // serde also accepts a sequence for a struct; only objects are pages
        if !value.is_object() {
            return Err(AppError::ParseFailed(
                "response body is not a JSON object".to_string(),
            ));
        }

        let wire: WirePage = serde_json::from_value(value)
            .map_err(|e| AppError::ParseFailed(format!("unexpected page shape: {}", e)))?;

        Ok(Self {
            items: wire.items.unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RatingsClient
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client bound to one ratings endpoint and query profile.
#[derive(Clone)]
pub struct RatingsClient {
    /// The underlying HTTP client, carrying default headers and timeout.
    http: reqwest::Client,
    base_url: Url,
    locale: String,
    gender: u8,
    timeout: Duration,
}

impl RatingsClient {
    /// Creates a client for the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client fails to initialize.
    pub fn new(config: &ScrapeConfig) -> Result<Self, AppError> {
        let http = build_http_client(config.request_timeout)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            locale: config.locale.clone(),
            gender: config.gender,
            timeout: config.request_timeout,
        })
    }

    /// Builds the request URL for one page.
    pub fn page_url(&self, offset: u64, limit: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("locale", &self.locale)
            .append_pair("limit", &limit.to_string())
            .append_pair("gender", &self.gender.to_string())
            .append_pair("offset", &offset.to_string());
        url
    }

    /// Fetches and decodes the page of up to `limit` records at `offset`.
    ///
    /// # Errors
    ///
    /// - `AppError::ConnectionFailed` - Network error or unreadable body
    /// - `AppError::Timeout` - No answer within the request timeout
    /// - `AppError::HttpStatus` - Non-success status code
    /// - `AppError::ParseFailed` - Body is not a JSON object with an `items` list
    pub async fn fetch_page(&self, offset: u64, limit: u32) -> Result<Page, AppError> {
        let url = self.page_url(offset, limit);
        let response = self.execute_with_logging(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_transport_error(&e))?;
        let page = Page::from_body(&body)?;

        debug!("[FETCH] offset {} decoded {} records", offset, page.len());
        Ok(page)
    }

    /// Executes a GET with timing and logging.
    ///
    /// Logs path and query only; the host never appears in log lines.
    async fn execute_with_logging(&self, url: Url) -> Result<reqwest::Response, AppError> {
        let start = Instant::now();
        let logged_url = path_and_query(&url);

        let result = self.http.get(url).send().await;
        let duration_ms = start.elapsed().as_millis();

        match result {
            Ok(response) => {
                info!(
                    "[FETCH] GET {} {} {}ms",
                    logged_url,
                    response.status().as_u16(),
                    duration_ms
                );
                Ok(response)
            }
            Err(e) => {
                info!("[FETCH] GET {} FAILED {}ms", logged_url, duration_ms);
                Err(self.map_transport_error(&e))
            }
        }
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout {
                secs: self.timeout.as_secs().max(1),
            }
        } else if e.is_decode() || e.is_body() {
            AppError::ConnectionFailed("Failed to read response body".to_string())
        } else {
            AppError::ConnectionFailed("Connection to ratings API failed".to_string())
        }
    }
}

/// Renders `url` as `path?query` for logging.
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Builds the configured HTTP client.
fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    for (name, value) in STATIC_HEADERS {
        headers.insert(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        );
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
