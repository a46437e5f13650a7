//! Sequential offset pagination over the ratings endpoint.
//!
//! The endpoint exposes neither a total count nor a "has more" flag, so the
//! crawl stops on the first of:
//!
//! - **Empty page** - natural end of data
//! - **Short page** - fewer records than requested, processed then stopped
//! - **Failed page** - transport or parse failure; nothing is retried and no
//!   later offset is attempted

use std::time::Duration;

use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::error::AppError;
use crate::flatten::{flatten_record, RowSet};
use crate::ratings::client::RatingsClient;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Why a complete crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with no records.
    EmptyPage,
    /// A page came back with fewer records than requested.
    ShortPage,
}

/// Terminal state of a crawl.
#[derive(Debug)]
pub enum CrawlOutcome {
    /// Pagination reached the end of the data.
    Complete(StopReason),
    /// The page at `offset` could not be fetched; rows before it were kept.
    Incomplete { offset: u64, error: AppError },
}

impl CrawlOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, CrawlOutcome::Complete(_))
    }
}

/// Everything a crawl produced. Owns the row set handed to the writer.
#[derive(Debug)]
pub struct CrawlReport {
    /// Flattened rows in fetch order.
    pub rows: RowSet,
    /// Page requests issued, including a failed final one.
    pub pages_fetched: u32,
    pub outcome: CrawlOutcome,
}

// ─────────────────────────────────────────────────────────────────────────────
// Paginator
// ─────────────────────────────────────────────────────────────────────────────

/// Drives the fetch loop and flattens records as pages arrive.
///
/// # Example
///
/// ```ignore
/// let paginator = Paginator::new(RatingsClient::new(&config)?, &config);
/// let report = paginator.crawl().await;
/// println!("{} rows", report.rows.len());
/// ```
#[derive(Clone)]
pub struct Paginator {
    client: RatingsClient,
    page_size: u32,
    page_delay: Duration,
}

impl Paginator {
    pub fn new(client: RatingsClient, config: &ScrapeConfig) -> Self {
        Self {
            client,
            page_size: config.page_size,
            page_delay: config.page_delay,
        }
    }

    /// Fetches every page and returns the flattened rows with the outcome.
    pub async fn crawl(&self) -> CrawlReport {
        self.crawl_internal(None::<fn(usize)>).await
    }

    /// Like [`crawl`](Self::crawl), invoking `on_progress` with the running
    /// row count after each page that contributed rows.
    pub async fn crawl_with_progress<F>(&self, on_progress: Option<F>) -> CrawlReport
    where
        F: Fn(usize),
    {
        self.crawl_internal(on_progress).await
    }

    async fn crawl_internal<F>(&self, on_progress: Option<F>) -> CrawlReport
    where
        F: Fn(usize),
    {
        let limit = self.page_size;
        let mut offset: u64 = 0;
        let mut rows: RowSet = Vec::new();
        let mut pages_fetched: u32 = 0;

        info!("[CRAWL] Starting crawl (page size: {})", limit);

        let outcome = loop {
            info!("[CRAWL] Fetching page at offset {}...", offset);
            pages_fetched += 1;

            let page = match self.client.fetch_page(offset, limit).await {
                Ok(page) => page,
                Err(error) => {
                    warn!("[CRAWL] Failed to fetch page at offset {}: {}", offset, error);
                    break CrawlOutcome::Incomplete { offset, error };
                }
            };

            if page.is_empty() {
                info!("[CRAWL] No more items found at offset {}", offset);
                break CrawlOutcome::Complete(StopReason::EmptyPage);
            }

            let count = page.len();
            rows.extend(page.items.iter().map(flatten_record));
            info!("[CRAWL] Fetched {} players (total: {})", count, rows.len());

            if let Some(ref callback) = on_progress {
                callback(rows.len());
            }

            if (count as u64) < u64::from(limit) {
                info!("[CRAWL] Reached last page at offset {}", offset);
                break CrawlOutcome::Complete(StopReason::ShortPage);
            }

            offset += u64::from(limit);

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        };

        info!(
            "[CRAWL] Crawl finished: {} rows, {} pages, complete={}",
            rows.len(),
            pages_fetched,
            outcome.is_complete()
        );

        CrawlReport {
            rows,
            pages_fetched,
            outcome,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
