//! One scrape run: crawl every page, then write the collected rows.

use tracing::{debug, info};

use crate::config::ScrapeConfig;
use crate::error::AppError;
use crate::ratings::{CrawlOutcome, Paginator, RatingsClient};
use crate::streaming::{write_rows, WriteOutcome};

/// Result of a run that did not fail outright.
#[derive(Debug)]
pub struct ScrapeSummary {
    pub rows: usize,
    pub pages_fetched: u32,
    pub crawl: CrawlOutcome,
    pub write: WriteOutcome,
}

impl ScrapeSummary {
    /// True when pagination reached the natural end of the data.
    pub fn is_complete(&self) -> bool {
        self.crawl.is_complete()
    }
}

/// Runs a full scrape with `config`.
///
/// A page failure does not fail the run: rows collected before it are still
/// written and the failure is reported through `ScrapeSummary::crawl`.
///
/// # Errors
///
/// - `AppError::InvalidConfig` - `config` fails validation
/// - `AppError::Internal` - HTTP client could not be built
/// - `AppError::CsvWrite` - output file could not be written
pub async fn run(config: &ScrapeConfig) -> Result<ScrapeSummary, AppError> {
    config.validate()?;

    let client = RatingsClient::new(config)?;
    let paginator = Paginator::new(client, config);

    info!("Starting to fetch player data...");
    let report = paginator
        .crawl_with_progress(Some(|count: usize| {
            debug!("[CRAWL] progress: {} players collected", count);
        }))
        .await;
    info!("Total players scraped: {}", report.rows.len());

    let write = write_rows(&report.rows, &config.output)?;

    Ok(ScrapeSummary {
        rows: report.rows.len(),
        pages_fetched: report.pages_fetched,
        crawl: report.outcome,
        write,
    })
}
