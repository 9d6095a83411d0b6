// src/extractors/form.rs
use crate::tabular::{CellValue, Frame};
use crate::utils::error::ExtractError;
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const DEFAULT_MIN_FIELD_GAP: usize = 2;

pub const FORM_COLUMNS: [&str; 7] = ["Type", "Date", "Time", "HomeTeam", "Score", "AwayTeam", "Venue"];

// --- Regex Patterns (Lazy Static) ---
// Result code and kick-off timestamp opening every match block. Shared by
// the code listing and the block split so both see the same blocks.
static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([PWR])\s+(\d{4}-\d{2}-\d{2} \d{2}:\d{2})").expect("Failed to compile ANCHOR_RE")
});

// One regrouped block: "CODE DATE TIME" then the raw descriptive fragment.
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([PWR]) (\d{4}-\d{2}-\d{2}) (\d{2}:\d{2}) ?(.*)$").expect("Failed to compile BLOCK_RE")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

impl FormResult {
    /// Polish result letters: W(ygrana), R(emis), P(orażka).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "W" => Some(FormResult::Win),
            "R" => Some(FormResult::Draw),
            "P" => Some(FormResult::Loss),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FormResult::Win => "W",
            FormResult::Draw => "R",
            FormResult::Loss => "P",
        }
    }
}

/// One match of a team's recent form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormEntry {
    pub result: FormResult,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub home_team: String,
    pub score: String,
    pub away_team: String,
    pub venue: String,
}

/// Result codes of every match block, in order of appearance.
pub fn divide_events(text: &str) -> Vec<FormResult> {
    ANCHOR_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| FormResult::from_code(m.as_str())))
        .collect()
}

/// Result codes joined with commas, e.g. "W,W,R,P,W".
pub fn form_codes(text: &str) -> String {
    divide_events(text)
        .iter()
        .map(FormResult::code)
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits on the block anchors, keeping the code and timestamp of each
/// anchor: `[code, timestamp, fragment, code, timestamp, fragment, ...]`.
/// Text before the first anchor is discarded.
pub fn split_blocks(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut pending: Option<usize> = None;
    for caps in ANCHOR_RE.captures_iter(text) {
        let (Some(whole), Some(code), Some(stamp)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if let Some(start) = pending {
            parts.push(&text[start..whole.start()]);
        }
        parts.push(code.as_str());
        parts.push(stamp.as_str());
        pending = Some(whole.end());
    }
    if let Some(start) = pending {
        parts.push(&text[start..]);
    }
    parts
}

/// Joins consecutive tokens three at a time with single spaces.
/// A trailing incomplete group is joined as-is.
pub fn triple_strings<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .chunks(3)
        .map(|chunk| chunk.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(" "))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    InField,
    InGap(usize),
}

/// Splits fixed-width text into fields separated by runs of at least
/// `min_gap` whitespace characters. Shorter runs inside a field collapse
/// to a single space; leading, trailing and empty fields are dropped.
///
/// Any Unicode whitespace counts toward a gap, not only U+0020, so a lone
/// tab or newline inside a field also comes out as a single space.
pub fn string_divide(text: &str, min_gap: usize) -> Vec<String> {
    let min_gap = min_gap.max(1);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = Segment::InField;

    fn flush(field: &mut String, fields: &mut Vec<String>) {
        if !field.is_empty() {
            fields.push(std::mem::take(field));
        }
    }

    for c in text.chars() {
        if c.is_whitespace() {
            state = match state {
                Segment::InField => Segment::InGap(1),
                Segment::InGap(n) => Segment::InGap(n + 1),
            };
            if state == Segment::InGap(min_gap) {
                flush(&mut field, &mut fields);
            }
        } else {
            if let Segment::InGap(n) = state {
                if n < min_gap && !field.is_empty() {
                    field.push(' ');
                }
            }
            field.push(c);
            state = Segment::InField;
        }
    }
    flush(&mut field, &mut fields);
    fields
}

/// Parses one "CODE YYYY-MM-DD HH:MM fields..." block.
fn parse_block(block: &str, min_gap: usize) -> Result<FormEntry, ExtractError> {
    let caps = BLOCK_RE
        .captures(block)
        .ok_or_else(|| ExtractError::malformed(format!("form block without anchor: '{}'", block)))?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

    let result = FormResult::from_code(group(1))
        .ok_or_else(|| ExtractError::malformed(format!("unknown result code '{}'", group(1))))?;
    let date = NaiveDate::parse_from_str(group(2), "%Y-%m-%d")
        .map_err(|e| ExtractError::malformed(format!("bad match date '{}': {}", group(2), e)))?;
    let time = NaiveTime::parse_from_str(group(3), "%H:%M")
        .map_err(|e| ExtractError::malformed(format!("bad kick-off time '{}': {}", group(3), e)))?;

    let fields = string_divide(group(4), min_gap);
    let [home_team, score, away_team, venue]: [String; 4] = fields.try_into().map_err(|fields: Vec<String>| {
        ExtractError::malformed(format!("expected 4 match fields, found {}: {:?}", fields.len(), fields))
    })?;

    Ok(FormEntry { result, date, time, home_team, score, away_team, venue })
}

/// Structured decomposition of a team's form cell.
pub fn team_form(text: &str, min_gap: usize) -> Result<Vec<FormEntry>, ExtractError> {
    let parts = split_blocks(text);
    let entries = triple_strings(&parts)
        .iter()
        .map(|block| parse_block(block, min_gap))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!("Parsed {} form entries", entries.len());
    Ok(entries)
}

/// Form entries as records with the `FORM_COLUMNS` header.
pub fn form_frame(entries: &[FormEntry]) -> Frame {
    let mut frame = Frame::new(FORM_COLUMNS);
    for e in entries {
        frame.push_row([
            CellValue::text(e.result.code()),
            CellValue::text(e.date.format("%Y-%m-%d").to_string()),
            CellValue::text(e.time.format("%H:%M").to_string()),
            CellValue::text(e.home_team.as_str()),
            CellValue::text(e.score.as_str()),
            CellValue::text(e.away_team.as_str()),
            CellValue::text(e.venue.as_str()),
        ]);
    }
    frame
}
