// src/extractors/table.rs
use crate::tabular::{CellValue, Frame};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
// Every table on a page; callers pick by position.
pub(crate) static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));

// Rows wherever the parser put them (thead, tbody or bare).
pub(crate) static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

// Header and data cells are read alike.
pub(crate) static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("Failed to compile CELL_SELECTOR"));

// The site renders result rows twice; cells carrying this class (sic) mark
// rows whose readable data lives in the mobile-only span.
static MOBILE_MARKER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.hideonmobie").expect("Failed to compile MOBILE_MARKER_SELECTOR"));

static MOBILE_BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.d-block.d-sm-none").expect("Failed to compile MOBILE_BLOCK_SELECTOR"));

// Round label, the first column of the flattened row.
static MOBILE_LABEL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.text-uppercase").expect("Failed to compile MOBILE_LABEL_SELECTOR"));

// Remaining columns, in desktop order.
static MOBILE_VALUE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.text-center").expect("Failed to compile MOBILE_VALUE_SELECTOR"));

/// Whitespace-trimmed text content of an element.
pub(crate) fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// All tables of a document, in document order.
pub fn find_tables(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&TABLE_SELECTOR).collect()
}

/// First table of a document.
pub fn first_table(document: &Html) -> Result<ElementRef<'_>, ExtractError> {
    document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or_else(|| ExtractError::malformed("page contains no table"))
}

/// Header texts of the first row. A table without rows yields `None`;
/// a first row without cells is a missing header.
pub(crate) fn header_row(table: ElementRef) -> Result<Option<Vec<String>>, ExtractError> {
    let Some(first) = table.select(&ROW_SELECTOR).next() else {
        return Ok(None);
    };
    let headers: Vec<String> = first.select(&CELL_SELECTOR).map(cell_text).collect();
    if headers.is_empty() {
        return Err(ExtractError::malformed("table header row has no cells"));
    }
    Ok(Some(headers))
}

/// Flattens the mobile variant of a row: the label div followed by the
/// value divs, in the same order as the desktop cells.
fn mobile_row(row: ElementRef) -> Result<Vec<String>, ExtractError> {
    let block = row
        .select(&MOBILE_BLOCK_SELECTOR)
        .next()
        .ok_or_else(|| ExtractError::malformed("mobile row without its d-sm-none block"))?;

    // Without the label every value would shift one column left.
    let label = block
        .select(&MOBILE_LABEL_SELECTOR)
        .next()
        .ok_or_else(|| ExtractError::malformed("mobile row without its text-uppercase label"))?;

    let mut cells = vec![cell_text(label)];
    cells.extend(block.select(&MOBILE_VALUE_SELECTOR).map(cell_text));
    Ok(cells)
}

/// Extracts a table into text records keyed by the first row's cell texts.
///
/// Rows marked for mobile rendering are flattened first and every row is
/// padded or truncated to the header width. No column is converted, so
/// callers merging several tables can coerce once on the merged frame.
pub fn extract_text_table(table: ElementRef) -> Result<Frame, ExtractError> {
    let Some(headers) = header_row(table)? else {
        tracing::debug!("Table has no rows, returning empty frame");
        return Ok(Frame::default());
    };

    let mut frame = Frame::new(headers);
    for row in table.select(&ROW_SELECTOR).skip(1) {
        let cells = if row.select(&MOBILE_MARKER_SELECTOR).next().is_some() {
            tracing::trace!("Flattening mobile row");
            mobile_row(row)?
        } else {
            row.select(&CELL_SELECTOR).map(cell_text).collect()
        };
        frame.push_row(cells.into_iter().map(CellValue::Text));
    }

    tracing::debug!("Extracted table: {} columns, {} rows", frame.width(), frame.len());
    Ok(frame)
}

/// [`extract_text_table`] followed by integer coercion: each column made
/// only of integers is converted to integers.
pub fn extract_table(table: ElementRef) -> Result<Frame, ExtractError> {
    let mut frame = extract_text_table(table)?;
    frame.coerce_integers();
    Ok(frame)
}
