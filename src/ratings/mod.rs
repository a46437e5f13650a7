//! EA Sports FC ratings API client and pagination layer.
//!
//! - **Fixed request shape**: locale, gender, limit and offset query
//!   parameters plus the browser-like headers the endpoint expects
//! - **Safe logging**: one line per request with path, query, status and timing
//! - **Offset pagination**: sequential pages until an empty page, a short
//!   page, or the first failure

pub mod client;
pub mod paginator;

pub use client::{Page, RatingsClient};
pub use paginator::{CrawlOutcome, CrawlReport, Paginator, StopReason};
