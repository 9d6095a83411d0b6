// src/league/mod.rs
pub mod client;
pub mod config;
pub mod service;

pub use client::{FetchMarkup, HttpFetcher, StaticPages};
pub use config::ScraperConfig;
pub use service::LeagueScraper;
