// src/extractors/links.rs
use crate::extractors::table::{header_row, CELL_SELECTOR, ROW_SELECTOR};
use crate::tabular::{CellValue, Frame};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// Anchors without a target carry nothing to follow.
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR"));

/// Href of the first link inside an element.
fn first_href(element: ElementRef) -> Option<String> {
    element
        .select(&LINK_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Same walk as [`extract_table`](crate::extractors::table::extract_table),
/// but each cell holds the target of its first link (or null). Rows and
/// then columns with no link at all are dropped.
pub fn extract_link_table(table: ElementRef) -> Result<Frame, ExtractError> {
    let Some(headers) = header_row(table)? else {
        return Ok(Frame::default());
    };

    let mut frame = Frame::new(headers);
    for row in table.select(&ROW_SELECTOR).skip(1) {
        frame.push_row(row.select(&CELL_SELECTOR).map(|cell| CellValue::from(first_href(cell))));
    }

    frame.drop_empty_rows();
    frame.drop_empty_columns();
    tracing::debug!("Extracted link table: {:?} with {} rows", frame.columns(), frame.len());
    Ok(frame)
}

/// Hrefs of every link whose target contains `needle` and none of `exclude`,
/// in document order.
pub fn find_links(document: &Html, needle: &str, exclude: &[&str]) -> Vec<String> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(needle) && !exclude.iter().any(|x| href.contains(x)))
        .map(str::to_string)
        .collect()
}
