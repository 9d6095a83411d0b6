// src/extractors/standings.rs
use crate::extractors::form::{form_codes, team_form, FormEntry};
use crate::tabular::{CellValue, Frame, SortOrder};
use crate::utils::error::{AppError, ExtractError};

pub const STANDINGS_COLUMNS: [&str; 12] = [
    "Poz", "Zespół", "Mecze_rozegrane", "Pkt.", "Pkt.", "Z", "R", "P", "BZ", "BS", "+/-", "Forma",
];

/// Turns a raw league table into standings: blank columns removed, the
/// twelve standings columns assigned by position, the form cell reduced
/// to its result codes and rows ordered by position.
pub fn normalize_standings(mut frame: Frame) -> Result<Frame, ExtractError> {
    frame.drop_empty_columns();
    frame.rename_columns(&STANDINGS_COLUMNS)?;
    frame.map_column("Forma", |cell| Ok(CellValue::text(form_codes(&cell.to_string()))))?;
    frame.sort_by_columns(&[("Poz", SortOrder::Ascending)])?;
    Ok(frame)
}

/// Raw form cell of `team` in an unnormalized league table.
pub fn raw_form<'a>(table: &'a Frame, team: &str) -> Result<&'a str, AppError> {
    let record = table
        .records()
        .find(|r| r.get("Zespół").and_then(CellValue::as_str) == Some(team))
        .ok_or_else(|| AppError::LookupMiss(format!("team '{}' not in league table", team)))?;
    record
        .get("Forma")
        .and_then(CellValue::as_str)
        .ok_or_else(|| ExtractError::malformed("league table has no text 'Forma' column").into())
}

/// Structured recent form of `team` from an unnormalized league table.
pub fn team_form_from_table(table: &Frame, team: &str, min_gap: usize) -> Result<Vec<FormEntry>, AppError> {
    Ok(team_form(raw_form(table, team)?, min_gap)?)
}
