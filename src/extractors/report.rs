// src/extractors/report.rs
use crate::extractors::table::{cell_text, extract_text_table, find_tables};
use crate::tabular::{CellValue, Frame};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

pub const TEAM_COLUMN: &str = "Zespół";

// Team names of a report only appear in the document title.
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to compile TITLE_SELECTOR"));

// Title shaped "(date) Home vs Away - site"; lazy groups stop at the first " vs " and " -".
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\)\s*(.+?)\s+vs\s+(.+?)\s+-").expect("Failed to compile TITLE_RE"));

/// Home and away team names from a match report's page title.
pub fn report_teams(document: &Html) -> Result<(String, String), ExtractError> {
    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(cell_text)
        .ok_or_else(|| ExtractError::malformed("match report has no <title>"))?;

    let caps = TITLE_RE
        .captures(&title)
        .ok_or_else(|| ExtractError::malformed(format!("unexpected report title '{}'", title)))?;
    match (caps.get(1), caps.get(2)) {
        (Some(home), Some(away)) => Ok((home.as_str().to_string(), away.as_str().to_string())),
        _ => Err(ExtractError::malformed(format!("unexpected report title '{}'", title))),
    }
}

/// Per-player statistics of both teams from a match report page.
///
/// The first table is the match summary; the second and third belong to
/// the home and away team. Rows are tagged with their team, rows with
/// any empty value are dropped, and integer columns are coerced once over
/// both teams.
pub fn extract_match_report(document: &Html) -> Result<Frame, ExtractError> {
    let (home, away) = report_teams(document)?;
    let tables = find_tables(document);
    if tables.len() < 3 {
        return Err(ExtractError::malformed(format!(
            "match report has {} tables, expected at least 3",
            tables.len()
        )));
    }

    let home_stats = extract_text_table(tables[1])?.with_constant_column(TEAM_COLUMN, CellValue::text(home));
    let away_stats = extract_text_table(tables[2])?.with_constant_column(TEAM_COLUMN, CellValue::text(away));

    let mut report = Frame::concat([home_stats, away_stats]);
    report.drop_incomplete_rows();
    report.coerce_integers();
    tracing::debug!("Extracted match report with {} player rows", report.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<html><head><title>(12.05.2024) FC Orły vs Dzikie Koty - Liga Fanów</title></head>
        <body>
        <table><tr><th>Wynik</th></tr><tr><td>3:1</td></tr></table>
        <table>
            <tr><th>Zawodnik</th><th>Bramki</th></tr>
            <tr><td>Jan Kowalski</td><td>2</td></tr>
            <tr><td>Adam Nowak</td><td>1</td></tr>
            <tr><td></td><td>0</td></tr>
        </table>
        <table>
            <tr><th>Zawodnik</th><th>Bramki</th></tr>
            <tr><td>Ewa Lis</td><td>1</td></tr>
            <tr><td>Ola Zielińska</td></tr>
        </table>
        </body></html>"#;

    #[test]
    fn teams_come_from_the_title() {
        let (home, away) = report_teams(&Html::parse_document(REPORT)).unwrap();
        assert_eq!(home, "FC Orły");
        assert_eq!(away, "Dzikie Koty");
    }

    #[test]
    fn player_tables_are_tagged_and_merged() {
        let report = extract_match_report(&Html::parse_document(REPORT)).unwrap();
        assert_eq!(report.columns(), &["Zawodnik", "Bramki", "Zespół"].map(String::from));
        assert_eq!(report.len(), 3);
        assert_eq!(report.get(0, TEAM_COLUMN), Some(&CellValue::text("FC Orły")));
        assert_eq!(report.get(2, "Zawodnik"), Some(&CellValue::text("Ewa Lis")));
        assert_eq!(report.get(2, TEAM_COLUMN), Some(&CellValue::text("Dzikie Koty")));
    }

    #[test]
    fn numeric_columns_are_coerced_across_both_teams() {
        let html = r#"<title>(1) A vs B - x</title>
            <table><tr><th>Wynik</th></tr></table>
            <table><tr><th>Zawodnik</th><th>Bramki</th></tr><tr><td>Jan</td><td>2</td></tr></table>
            <table><tr><th>Zawodnik</th><th>Bramki</th></tr><tr><td>Ewa</td><td>-</td></tr></table>"#;
        let report = extract_match_report(&Html::parse_document(html)).unwrap();
        assert_eq!(
            report.column("Bramki"),
            Some(vec![&CellValue::text("2"), &CellValue::text("-")])
        );

        let html = html.replace("<td>-</td>", "<td>5</td>");
        let report = extract_match_report(&Html::parse_document(&html)).unwrap();
        assert_eq!(report.column("Bramki"), Some(vec![&CellValue::Int(2), &CellValue::Int(5)]));
    }

    #[test]
    fn too_few_tables_is_malformed() {
        let html = r#"<title>(1) A vs B - x</title><table><tr><th>a</th></tr></table>"#;
        let result = extract_match_report(&Html::parse_document(html));
        assert!(matches!(result, Err(ExtractError::MalformedInput(_))));
    }

    #[test]
    fn unexpected_title_is_malformed() {
        let html = REPORT.replace(" vs ", " - ");
        let result = extract_match_report(&Html::parse_document(&html));
        assert!(matches!(result, Err(ExtractError::MalformedInput(_))));
    }
}
