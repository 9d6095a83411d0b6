// src/lib.rs
//! Scraper for ligafanow.pl league pages.
//!
//! The [`extractors`] turn fetched markup into [`tabular::Frame`]s: league
//! standings, link tables, team form strings, squads and match reports.
//! [`league::LeagueScraper`] composes them with a page fetcher.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), ligafanow_scraper::AppError> {
//! ligafanow_scraper::utils::logging::setup_logging();
//! let scraper = ligafanow_scraper::LeagueScraper::from_config(Default::default())?;
//! let table = scraper.get_table("ekstraklasa").await?;
//! println!("{}", table.to_json()?);
//! # Ok(())
//! # }
//! ```
pub mod extractors;
pub mod league;
pub mod tabular;
pub mod utils;

pub use league::{FetchMarkup, HttpFetcher, LeagueScraper, ScraperConfig, StaticPages};
pub use tabular::{CellValue, Frame};
pub use utils::{AppError, ExtractError, FetchError};
