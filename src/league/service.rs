// src/league/service.rs
use crate::extractors::form::FormEntry;
use crate::extractors::links::{extract_link_table, find_links};
use crate::extractors::names::{extract_round, team_slug};
use crate::extractors::report::extract_match_report;
use crate::extractors::roster::extract_roster;
use crate::extractors::standings::{normalize_standings, team_form_from_table};
use crate::extractors::table::{extract_table, extract_text_table, first_table};
use crate::league::client::{FetchMarkup, HttpFetcher};
use crate::league::config::ScraperConfig;
use crate::tabular::{CellValue, Frame, SortOrder};
use crate::utils::error::{AppError, ExtractError};
use scraper::Html;
use std::collections::BTreeSet;

const TEAM_COLUMN: &str = "Zespół";
const ROUND_COLUMN: &str = "Kol.";
const TIME_COLUMN: &str = "Godz.";
const HOME_COLUMN: &str = "Gospodarz";
const AWAY_COLUMN: &str = "Gość";

/// League-level operations composed from the page extractors.
///
/// Pages are fetched one at a time and parsed as soon as they arrive;
/// nothing is cached between calls.
pub struct LeagueScraper<F> {
    fetcher: F,
    config: ScraperConfig,
}

impl LeagueScraper<HttpFetcher> {
    /// Scraper talking to the live site.
    pub fn from_config(config: ScraperConfig) -> Result<Self, AppError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(fetcher, config))
    }
}

fn first_table_of(body: &str) -> Result<Frame, ExtractError> {
    let document = Html::parse_document(body);
    extract_table(first_table(&document)?)
}

fn first_text_table_of(body: &str) -> Result<Frame, ExtractError> {
    let document = Html::parse_document(body);
    extract_text_table(first_table(&document)?)
}

fn link_table_of(body: &str) -> Result<Frame, ExtractError> {
    let document = Html::parse_document(body);
    extract_link_table(first_table(&document)?)
}

fn text_of(record_value: Option<&CellValue>) -> Option<&str> {
    record_value.and_then(CellValue::as_str)
}

impl<F: FetchMarkup> LeagueScraper<F> {
    pub fn new(fetcher: F, config: ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        Ok(self.fetcher.fetch_markup(url).await?)
    }

    /// League table exactly as rendered, before standings normalization.
    pub async fn raw_table(&self, league: &str) -> Result<Frame, AppError> {
        let body = self.fetch(self.config.league_url(league)?).await?;
        Ok(first_table_of(&body)?)
    }

    /// Standings of a league with the form column reduced to result codes.
    pub async fn get_table(&self, league: &str) -> Result<Frame, AppError> {
        let standings = normalize_standings(self.raw_table(league).await?)?;
        tracing::info!("Fetched standings of {} ({} teams)", league, standings.len());
        Ok(standings)
    }

    /// Recent matches of one team, parsed from its form cell.
    pub async fn get_team_form(&self, league: &str, team: &str) -> Result<Vec<FormEntry>, AppError> {
        let table = self.raw_table(league).await?;
        team_form_from_table(&table, team, self.config.min_field_gap)
    }

    /// Link targets of the league table, keeping only link-bearing columns.
    pub async fn table_of_links(&self, league: &str) -> Result<Frame, AppError> {
        let body = self.fetch(self.config.league_url(league)?).await?;
        Ok(link_table_of(&body)?)
    }

    /// Absolute URLs of every team page in a league.
    pub async fn team_urls(&self, league: &str) -> Result<Vec<String>, AppError> {
        let links = self.table_of_links(league).await?;
        let column = links
            .column(TEAM_COLUMN)
            .ok_or_else(|| ExtractError::malformed("league link table has no 'Zespół' column"))?;
        column
            .into_iter()
            .filter_map(CellValue::as_str)
            .map(|href| self.config.resolve(href))
            .collect()
    }

    /// Team page whose link contains the slug of `team`.
    pub async fn team_url(&self, league: &str, team: &str) -> Result<String, AppError> {
        let slug = team_slug(team);
        let urls = self.team_urls(league).await?;
        urls.into_iter()
            .find(|url| url.contains(&slug))
            .ok_or_else(|| AppError::LookupMiss(format!("no team page matching '{}' in {}", slug, league)))
    }

    /// URL of the matches page linked from a team page.
    pub async fn matches_url(&self, team_url: &str) -> Result<String, AppError> {
        let body = self.fetch(team_url).await?;
        let href = {
            let document = Html::parse_document(&body);
            find_links(&document, "mecze", &[]).into_iter().next()
        };
        let href = href.ok_or_else(|| AppError::LookupMiss(format!("no matches link on {}", team_url)))?;
        self.config.resolve(&href)
    }

    /// Results table of one team with round labels reduced to numbers.
    /// Values stay text; [`get_matches`](Self::get_matches) coerces after merging.
    pub async fn team_results(&self, team_url: &str) -> Result<Frame, AppError> {
        let url = self.matches_url(team_url).await?;
        let body = self.fetch(&url).await?;
        let mut results = first_text_table_of(&body)?;
        results.map_column(ROUND_COLUMN, |cell| Ok(CellValue::from(extract_round(&cell.to_string()))))?;
        Ok(results)
    }

    /// Every match of a league, newest round first, optionally restricted
    /// to one round and/or to matches of one team.
    pub async fn get_matches(&self, league: &str, round: Option<i64>, team: Option<&str>) -> Result<Frame, AppError> {
        let mut per_team = Vec::new();
        for url in self.team_urls(league).await? {
            per_team.push(self.team_results(&url).await?);
        }

        // Dedup compares text cells, so it must run before coercion.
        let mut matches = Frame::concat(per_team);
        matches.dedup();
        matches.coerce_integers();
        if !matches.columns().is_empty() {
            matches.sort_by_columns(&[(ROUND_COLUMN, SortOrder::Descending), (TIME_COLUMN, SortOrder::Ascending)])?;
        }

        if let Some(round) = round {
            let label = round.to_string();
            matches.retain_rows(|r| {
                r.get(ROUND_COLUMN)
                    .is_some_and(|c| c.as_int() == Some(round) || c.as_str() == Some(label.as_str()))
            });
        }
        if let Some(team) = team {
            matches.retain_rows(|r| {
                text_of(r.get(HOME_COLUMN)) == Some(team) || text_of(r.get(AWAY_COLUMN)) == Some(team)
            });
        }

        tracing::info!("Collected {} matches for {}", matches.len(), league);
        Ok(matches)
    }

    /// Unique match report URLs reachable from a team page, sorted.
    pub async fn match_report_links(&self, team_url: &str) -> Result<Vec<String>, AppError> {
        let url = self.matches_url(team_url).await?;
        let body = self.fetch(&url).await?;
        let hrefs = {
            let document = Html::parse_document(&body);
            find_links(&document, "raport", &["veo"])
        };
        let unique = hrefs
            .iter()
            .map(|href| self.config.resolve(href))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(unique.into_iter().collect())
    }

    /// Player statistics of both teams from a match report page.
    pub async fn get_match_details(&self, report_url: &str) -> Result<Frame, AppError> {
        let body = self.fetch(report_url).await?;
        Ok(extract_match_report(&Html::parse_document(&body))?)
    }

    /// Squad of a team, merged from the two squad tables of its page.
    pub async fn get_squad_details(&self, team_url: &str) -> Result<Frame, AppError> {
        let body = self.fetch(team_url).await?;
        Ok(extract_roster(&Html::parse_document(&body))?)
    }

    /// Top scorers of a league.
    pub async fn get_scorers(&self, league: &str) -> Result<Frame, AppError> {
        let url = self.config.scorers_url(league)?;
        let body = self.fetch(&url).await?;
        Ok(first_table_of(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::client::StaticPages;
    use crate::utils::error::FetchError;
    use tokio_test::block_on;

    const LEAGUE_URL: &str = "https://ligafanow.pl/rozgrywki/tabela/30/235";
    const ORLY_URL: &str = "https://ligafanow.pl/druzyna/1/fc-orly";
    const KOTY_URL: &str = "https://ligafanow.pl/druzyna/2/dzikie-koty";

    const LEAGUE: &str = r#"<table>
        <tr><th>Poz</th><th>Zespół</th><th>M</th><th>Pkt.</th><th>Pkt.</th><th>Z</th>
            <th>R</th><th>P</th><th>BZ</th><th>BS</th><th>+/-</th><th>Forma</th></tr>
        <tr><td>2</td><td><a href="/druzyna/2/dzikie-koty">Dzikie Koty</a></td><td>2</td><td>1</td><td>0</td><td>0</td>
            <td>1</td><td>1</td><td>2</td><td>3</td><td>-1</td>
            <td>P 2024-03-10 14:00  Dzikie Koty  0:1  FC Orły  Arena  R 2024-03-03 12:30  FC Orły  2:2  Dzikie Koty  Hala</td></tr>
        <tr><td>1</td><td><a href="/druzyna/1/fc-orly">FC Orły</a></td><td>2</td><td>4</td><td>0</td><td>1</td>
            <td>1</td><td>0</td><td>3</td><td>2</td><td>1</td>
            <td>W 2024-03-10 14:00  Dzikie Koty  0:1  FC Orły  Arena  R 2024-03-03 12:30  FC Orły  2:2  Dzikie Koty  Hala</td></tr>
    </table>"#;

    const ORLY_RESULTS: &str = r#"<table>
        <tr><th>Kol.</th><th>Data</th><th>Godz.</th><th>Gospodarz</th><th>Wynik</th><th>Gość</th></tr>
        <tr><td>kolejka 1</td><td>2024-03-03</td><td>12:30</td><td>FC Orły</td><td>2:2</td><td>Dzikie Koty</td></tr>
        <tr><td>kolejka 2</td><td>2024-03-10</td><td>14:00</td><td>Dzikie Koty</td><td>0:1</td><td>FC Orły</td></tr>
        </table>
        <a href="/mecze/raport/11">raport</a>
        <a href="mecze/raport/11">raport again</a>
        <a href="/mecze/raport/12/veo">nagranie</a>"#;

    const KOTY_RESULTS: &str = r#"<table>
        <tr><th>Kol.</th><th>Data</th><th>Godz.</th><th>Gospodarz</th><th>Wynik</th><th>Gość</th></tr>
        <tr><td>kolejka 1</td><td>2024-03-03</td><td>12:30</td><td>FC Orły</td><td>2:2</td><td>Dzikie Koty</td></tr>
        <tr><td class="hideonmobie">x</td><td><span class="d-block d-sm-none">
            <div class="text-uppercase">kolejka 2</div>
            <div class="text-center">2024-03-10</div><div class="text-center">14:00</div>
            <div class="text-center">Dzikie Koty</div><div class="text-center">0:1</div>
            <div class="text-center">FC Orły</div></span></td></tr>
        </table>"#;

    fn scraper() -> LeagueScraper<StaticPages> {
        let pages = StaticPages::new()
            .with_page(LEAGUE_URL, LEAGUE)
            .with_page(ORLY_URL, r#"<a href="/druzyna/1/fc-orly/mecze">Mecze</a>"#)
            .with_page(KOTY_URL, r#"<a href="/druzyna/2/dzikie-koty/mecze">Mecze</a>"#)
            .with_page(format!("{}/mecze", ORLY_URL), ORLY_RESULTS)
            .with_page(format!("{}/mecze", KOTY_URL), KOTY_RESULTS);
        LeagueScraper::new(pages, ScraperConfig::default())
    }

    #[test]
    fn standings_from_league_page() {
        let table = block_on(scraper().get_table("ekstraklasa")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Zespół"), Some(&CellValue::text("FC Orły")));
        assert_eq!(table.get(0, "Forma"), Some(&CellValue::text("W,R")));
    }

    #[test]
    fn team_form_lookup() {
        let scraper = scraper();
        let form = block_on(scraper.get_team_form("ekstraklasa", "Dzikie Koty")).unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form[0].score, "0:1");
        let missing = block_on(scraper.get_team_form("ekstraklasa", "Nikt"));
        assert!(matches!(missing, Err(AppError::LookupMiss(_))));
    }

    #[test]
    fn team_url_by_slug() {
        let scraper = scraper();
        assert_eq!(block_on(scraper.team_url("ekstraklasa", "Dzikie Koty")).unwrap(), KOTY_URL);
        let missing = block_on(scraper.team_url("ekstraklasa", "Górnik Łęczna"));
        assert!(matches!(missing, Err(AppError::LookupMiss(_))));
    }

    #[test]
    fn matches_are_merged_deduplicated_and_sorted() {
        let scraper = scraper();
        let matches = block_on(scraper.get_matches("ekstraklasa", None, None)).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches.get(0, "Kol."), Some(&CellValue::Int(2)));
        assert_eq!(matches.get(1, "Kol."), Some(&CellValue::Int(1)));

        let round_one = block_on(scraper.get_matches("ekstraklasa", Some(1), None)).unwrap();
        assert_eq!(round_one.len(), 1);
        assert_eq!(round_one.get(0, "Wynik"), Some(&CellValue::text("2:2")));

        let nobody = block_on(scraper.get_matches("ekstraklasa", None, Some("Nikt"))).unwrap();
        assert!(nobody.is_empty());
    }

    #[test]
    fn duplicates_across_teams_merge_before_coercion() {
        let results = |widzowie: [&str; 2]| {
            format!(
                r#"<table>
                <tr><th>Kol.</th><th>Godz.</th><th>Gospodarz</th><th>Gość</th><th>Widzowie</th></tr>
                <tr><td>kolejka 1</td><td>12:30</td><td>FC Orły</td><td>Dzikie Koty</td><td>{}</td></tr>
                <tr><td>kolejka 2</td><td>14:00</td><td>Dzikie Koty</td><td>FC Orły</td><td>{}</td></tr>
                </table>"#,
                widzowie[0], widzowie[1]
            )
        };
        let pages = StaticPages::new()
            .with_page(LEAGUE_URL, LEAGUE)
            .with_page(ORLY_URL, r#"<a href="/druzyna/1/fc-orly/mecze">Mecze</a>"#)
            .with_page(KOTY_URL, r#"<a href="/druzyna/2/dzikie-koty/mecze">Mecze</a>"#)
            .with_page(format!("{}/mecze", ORLY_URL), results(["3", "4"]))
            .with_page(format!("{}/mecze", KOTY_URL), results(["3", "-"]));
        let scraper = LeagueScraper::new(pages, ScraperConfig::default());

        let matches = block_on(scraper.get_matches("ekstraklasa", None, None)).unwrap();
        assert_eq!(matches.len(), 3);
        let widzowie = matches.column("Widzowie").unwrap();
        assert!(widzowie.iter().all(|c| c.as_str().is_some()));
        assert_eq!(matches.get(2, "Widzowie"), Some(&CellValue::text("3")));
    }

    #[test]
    fn report_links_are_unique_and_absolute() {
        let links = block_on(scraper().match_report_links(ORLY_URL)).unwrap();
        assert_eq!(links, vec!["https://ligafanow.pl/mecze/raport/11".to_string()]);
    }

    #[test]
    fn fetch_failures_propagate() {
        let result = block_on(scraper().get_squad_details("https://ligafanow.pl/druzyna/9"));
        assert!(matches!(result, Err(AppError::Fetch(FetchError::NotFound(_)))));
    }

    #[test]
    fn unknown_league_is_a_config_error() {
        let result = block_on(scraper().get_table("premier"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
