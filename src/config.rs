//! Run configuration for a scrape.
//!
//! `ScrapeConfig::default()` reproduces the fixed behavior of the scraper:
//! the public EA ratings endpoint, English locale, men's players, pages of
//! 100 records, a half-second pause between pages, and `eafc_players.csv`
//! as output.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://drop-api.ea.com/rating/ea-sports-fc";
pub const DEFAULT_LOCALE: &str = "en";
/// `0` selects men's football.
pub const DEFAULT_GENDER: u8 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT: &str = "eafc_players.csv";

// ─────────────────────────────────────────────────────────────────────────────
// ScrapeConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Ratings endpoint; pagination parameters are appended per request.
    pub base_url: Url,
    pub locale: String,
    pub gender: u8,
    /// Records requested per page. A page shorter than this ends the crawl.
    pub page_size: u32,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
    /// Per-request transport timeout.
    pub request_timeout: Duration,
    pub output: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
            locale: DEFAULT_LOCALE.to_string(),
            gender: DEFAULT_GENDER,
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ScrapeConfig {
    /// Parses `raw` as the endpoint URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, AppError> {
        self.base_url = Url::parse(raw)
            .map_err(|e| AppError::InvalidConfig(format!("Invalid base URL '{}': {}", raw, e)))?;
        Ok(self)
    }

    /// Checks invariants the crawl relies on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidConfig` when the page size or timeout is zero,
    /// or when the base URL cannot carry query parameters.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 {
            return Err(AppError::InvalidConfig(
                "page size must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(AppError::InvalidConfig(format!(
                "base URL '{}' is not a hierarchical http(s) URL",
                self.base_url
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(AppError::InvalidConfig(
                "output path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
