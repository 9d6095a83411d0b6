// src/league/config.rs
use crate::extractors::form::DEFAULT_MIN_FIELD_GAP;
use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://ligafanow.pl/";
pub const DEFAULT_USER_AGENT: &str = "ligafanow-scraper/0.1";

const DEFAULT_LEAGUES: [(&str, u32); 14] = [
    ("ekstraklasa", 235),
    ("1liga", 234),
    ("2liga", 231),
    ("3liga", 232),
    ("4liga", 233),
    ("5liga", 230),
    ("6liga", 229),
    ("7liga", 228),
    ("8liga", 227),
    ("9liga", 226),
    ("10liga", 225),
    ("11liga", 224),
    ("12liga", 223),
    ("13liga", 236),
];

/// Scraper settings, passed explicitly to every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base for resolving relative links found on the site.
    pub base_url: String,
    /// League key to standings page URL.
    pub leagues: BTreeMap<String, String>,
    pub user_agent: String,
    /// Minimum whitespace run separating fields of a form cell.
    pub min_field_gap: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let leagues = DEFAULT_LEAGUES
            .iter()
            .map(|(key, id)| (key.to_string(), format!("{}rozgrywki/tabela/30/{}", DEFAULT_BASE_URL, id)))
            .collect();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            leagues,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_field_gap: DEFAULT_MIN_FIELD_GAP,
        }
    }
}

impl ScraperConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let config: ScraperConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `LIGAFANOW_BASE_URL`, `LIGAFANOW_USER_AGENT`
    /// and `LIGAFANOW_MIN_FIELD_GAP`.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("LIGAFANOW_BASE_URL") {
            tracing::debug!("Using base URL {} from environment", base);
            config.base_url = base;
        }
        if let Ok(agent) = std::env::var("LIGAFANOW_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Ok(gap) = std::env::var("LIGAFANOW_MIN_FIELD_GAP") {
            config.min_field_gap = gap
                .parse()
                .map_err(|_| AppError::Config(format!("LIGAFANOW_MIN_FIELD_GAP is not a number: '{}'", gap)))?;
            tracing::debug!("Setting min_field_gap to {} from environment", config.min_field_gap);
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        self.base()?;
        if self.min_field_gap == 0 {
            return Err(AppError::Config("min_field_gap must be at least 1".to_string()));
        }
        Ok(())
    }

    fn base(&self) -> Result<Url, AppError> {
        Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("invalid base_url '{}': {}", self.base_url, e)))
    }

    pub fn league_url(&self, league: &str) -> Result<&str, AppError> {
        self.leagues
            .get(league)
            .map(String::as_str)
            .ok_or_else(|| AppError::Config(format!("unknown league '{}'", league)))
    }

    /// Top scorers page of a league, derived from its standings URL.
    pub fn scorers_url(&self, league: &str) -> Result<String, AppError> {
        Ok(format!("{}?loadpl=all", self.league_url(league)?.replace("tabela", "strzelcy")))
    }

    /// Absolute URL for an href found on the site.
    pub fn resolve(&self, href: &str) -> Result<String, AppError> {
        let url = self
            .base()?
            .join(href)
            .map_err(|e| AppError::Config(format!("cannot resolve '{}': {}", href, e)))?;
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_leagues_and_scorers() {
        let config = ScraperConfig::default();
        assert_eq!(config.leagues.len(), 14);
        assert_eq!(config.league_url("ekstraklasa").unwrap(), "https://ligafanow.pl/rozgrywki/tabela/30/235");
        assert_eq!(
            config.scorers_url("13liga").unwrap(),
            "https://ligafanow.pl/rozgrywki/strzelcy/30/236?loadpl=all"
        );
        assert!(matches!(config.league_url("premier"), Err(AppError::Config(_))));
    }

    #[test]
    fn resolves_relative_links() {
        let config = ScraperConfig::default();
        assert_eq!(config.resolve("/druzyna/5").unwrap(), "https://ligafanow.pl/druzyna/5");
        assert_eq!(config.resolve("mecze/raport/9").unwrap(), "https://ligafanow.pl/mecze/raport/9");
        assert_eq!(config.resolve("https://other.pl/x").unwrap(), "https://other.pl/x");
    }

    #[test]
    fn json_overrides_keep_defaults() {
        let config = ScraperConfig::from_json_str(r#"{"min_field_gap": 3}"#).unwrap();
        assert_eq!(config.min_field_gap, 3);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(ScraperConfig::from_json_str(r#"{"min_field_gap": 0}"#).is_err());
        assert!(ScraperConfig::from_json_str(r#"{"base_url": "not a url"}"#).is_err());
    }
}
