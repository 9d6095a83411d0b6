// src/extractors/roster.rs
use crate::extractors::table::{cell_text, CELL_SELECTOR};
use crate::tabular::{CellValue, Frame};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

pub const ROSTER_TABLE_IDS: [&str; 2] = ["mytxablecc", "mytxablec"];

pub const ROSTER_COLUMNS: [&str; 17] = [
    "Imię i nazwisko",
    "Numer",
    "Liczba występów",
    "Liczba bramek",
    "Asysty",
    "Kanadyjczyk",
    "Superstar",
    "Top6",
    "MVP",
    "Czerwone kartki",
    "Żółte kartki",
    "Stracone bramki",
    "Samobój",
    "Obronione karne",
    "Czyste konto",
    "Gold Team",
    "ID",
];

// Squad tables always use explicit thead/tbody sections.
static HEAD_ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead tr").expect("Failed to compile HEAD_ROW_SELECTOR"));

static BODY_ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody tr").expect("Failed to compile BODY_ROW_SELECTOR"));

/// Extracts a squad table whose headers sit in the second `thead` row,
/// preferring each header cell's `tooltip` attribute over its text.
pub fn extract_tooltip_table(table: ElementRef) -> Result<Frame, ExtractError> {
    // First header row is a decorative group banner.
    let header = table
        .select(&HEAD_ROW_SELECTOR)
        .nth(1)
        .ok_or_else(|| ExtractError::malformed("tooltip table has no second header row"))?;

    let headers: Vec<String> = header
        .select(&CELL_SELECTOR)
        .map(|cell| match cell.value().attr("tooltip") {
            Some(tooltip) => tooltip.trim().to_string(),
            None => cell_text(cell),
        })
        .collect();

    let mut frame = Frame::new(headers);
    for (i, row) in table.select(&BODY_ROW_SELECTOR).enumerate() {
        let cells: Vec<String> = row.select(&CELL_SELECTOR).map(cell_text).collect();
        if cells.len() > frame.width() {
            return Err(ExtractError::malformed(format!(
                "row {} has {} cells but the header has {}",
                i,
                cells.len(),
                frame.width()
            )));
        }
        frame.push_row(cells.into_iter().map(CellValue::Text));
    }
    Ok(frame)
}

fn table_by_id<'a>(document: &'a Html, id: &str) -> Result<ElementRef<'a>, ExtractError> {
    let selector = Selector::parse(&format!("table#{}", id))
        .map_err(|e| ExtractError::Selector(format!("table#{}: {:?}", id, e)))?;
    document
        .select(&selector)
        .next()
        .ok_or_else(|| ExtractError::malformed(format!("squad page has no table#{}", id)))
}

/// Merges the two squad tables of a team page into one roster with the
/// canonical columns assigned by position. Both tables must carry exactly
/// as many columns as [`ROSTER_COLUMNS`].
pub fn extract_roster(document: &Html) -> Result<Frame, ExtractError> {
    let frames = ROSTER_TABLE_IDS
        .iter()
        .map(|id| {
            let mut frame = extract_tooltip_table(table_by_id(document, id)?)?;
            frame.rename_columns(&ROSTER_COLUMNS)?;
            Ok::<Frame, ExtractError>(frame)
        })
        .collect::<Result<Vec<_>, ExtractError>>()?;

    let roster = Frame::concat(frames);
    tracing::debug!("Extracted roster with {} players", roster.len());
    Ok(roster)
}
