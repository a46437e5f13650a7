use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::{error, warn};

use eafc_ratings_scraper::config::{
    ScrapeConfig, DEFAULT_BASE_URL, DEFAULT_GENDER, DEFAULT_LOCALE, DEFAULT_OUTPUT,
    DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};
use eafc_ratings_scraper::ratings::CrawlOutcome;
use eafc_ratings_scraper::AppError;

/// Configuration, client setup or CSV output failed; nothing reliable was written.
const EXIT_ERROR: i32 = 1;
/// Pagination stopped on a failed page; collected rows were still written.
const EXIT_INCOMPLETE: i32 = 3;

#[derive(Parser)]
#[command(
    name = "eafc-ratings-scraper",
    about = "Fetch EA Sports FC player ratings and export them as CSV",
    version
)]
struct Cli {
    /// Destination CSV file
    #[arg(long, short = 'o', env = "EAFC_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Ratings API endpoint
    #[arg(long, env = "EAFC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Locale query parameter
    #[arg(long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Gender query parameter (0 = men, 1 = women)
    #[arg(long, default_value_t = DEFAULT_GENDER)]
    gender: u8,

    /// Records requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Pause between page requests, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS)]
    delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn to_config(&self) -> Result<ScrapeConfig, AppError> {
        ScrapeConfig {
            locale: self.locale.clone(),
            gender: self.gender,
            page_size: self.page_size,
            page_delay: Duration::from_millis(self.delay_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
            output: self.output.clone(),
            ..ScrapeConfig::default()
        }
        .with_base_url(&self.base_url)
    }
}

fn init_tracing(cli: &Cli) {
    // --quiet → off; --verbose → RUST_LOG or debug; default → RUST_LOG or info.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match cli.to_config() {
        Ok(config) => eafc_ratings_scraper::run(&config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) if summary.is_complete() => {}
        Ok(summary) => {
            if let CrawlOutcome::Incomplete { offset, error } = &summary.crawl {
                warn!(
                    "Pagination stopped early at offset {} after {} rows: {}",
                    offset, summary.rows, error
                );
            }
            process::exit(EXIT_INCOMPLETE);
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.to_presentation());
            process::exit(EXIT_ERROR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_reproduce_default_config() {
        let cli = Cli::try_parse_from(["eafc-ratings-scraper"]).unwrap();
        let config = cli.to_config().unwrap();

        assert_eq!(config, ScrapeConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "eafc-ratings-scraper",
            "--output",
            "women.csv",
            "--gender",
            "1",
            "--page-size",
            "50",
            "--delay-ms",
            "0",
            "--base-url",
            "http://localhost:9000/rating",
        ])
        .unwrap();
        let config = cli.to_config().unwrap();

        assert_eq!(config.output, PathBuf::from("women.csv"));
        assert_eq!(config.gender, 1);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.page_delay, Duration::ZERO);
        assert_eq!(config.base_url.as_str(), "http://localhost:9000/rating");
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["eafc-ratings-scraper", "-v", "-q"]).is_err());
    }
}
