pub mod config;
pub mod error;
pub mod flatten;
pub mod ratings;
pub mod scrape;
pub mod streaming;

pub use config::ScrapeConfig;
pub use error::AppError;
pub use flatten::{flatten_record, Cell, FlatRow, RowSet};
pub use scrape::{run, ScrapeSummary};
