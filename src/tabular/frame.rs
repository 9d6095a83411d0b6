// src/tabular/frame.rs
use crate::tabular::cell::CellValue;
use crate::utils::error::ExtractError;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Ordered collection of tabular records sharing one header.
///
/// Column names are positional and may repeat (league tables carry two
/// "Pkt." columns). Every row is kept exactly as wide as the header.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Borrowed view of one row together with its column names.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Record<'a> {
    /// Value of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&'a CellValue> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.cells.get(idx))
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.columns.iter().map(String::as_str).zip(self.cells.iter())
    }
}

impl Frame {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Appends a row, padding with nulls or truncating to the header width.
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        let mut row: Vec<CellValue> = cells
            .into_iter()
            .take(self.columns.len())
            .map(Into::into)
            .collect();
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            columns: &self.columns,
            cells,
        })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, ExtractError> {
        self.column_index(name)
            .ok_or_else(|| ExtractError::malformed(format!("missing column '{}'", name)))
    }

    /// Values of the first column called `name`.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&CellValue> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Converts every column whose values all parse as integers.
    /// A single blank, null or non-numeric value keeps the whole column as-is.
    pub fn coerce_integers(&mut self) {
        for col in 0..self.columns.len() {
            let parsed: Option<Vec<i64>> = self.rows.iter().map(|row| row[col].parse_int()).collect();
            match parsed {
                Some(values) => {
                    for (row, value) in self.rows.iter_mut().zip(values) {
                        row[col] = CellValue::Int(value);
                    }
                }
                None => tracing::trace!("Column '{}' left as text", self.columns[col]),
            }
        }
    }

    /// Drops rows where every cell is empty.
    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| row.iter().any(|c| !c.is_empty()));
    }

    /// Drops columns where every cell is empty.
    pub fn drop_empty_columns(&mut self) {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|col| self.rows.iter().any(|row| !row[col].is_empty()))
            .collect();
        self.retain_columns(&keep);
    }

    fn retain_columns(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&false));
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&false));
        }
    }

    /// Drops rows containing at least one empty cell.
    pub fn drop_incomplete_rows(&mut self) {
        self.rows.retain(|row| row.iter().all(|c| !c.is_empty()));
    }

    /// Appends a column holding the same value in every row.
    pub fn with_constant_column(mut self, name: &str, value: CellValue) -> Self {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.clone());
        }
        self
    }

    /// Assigns column names by position. The header width must match exactly.
    pub fn rename_columns(&mut self, names: &[&str]) -> Result<(), ExtractError> {
        if names.len() != self.columns.len() {
            return Err(ExtractError::malformed(format!(
                "expected {} columns, found {} ({:?})",
                names.len(),
                self.columns.len(),
                self.columns
            )));
        }
        self.columns = names.iter().map(|n| n.to_string()).collect();
        Ok(())
    }

    /// Replaces every value of the first column called `name`.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<(), ExtractError>
    where
        F: FnMut(&CellValue) -> Result<CellValue, ExtractError>,
    {
        let idx = self.require_column(name)?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx])?;
        }
        Ok(())
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(Record<'_>) -> bool,
    {
        let columns = &self.columns;
        self.rows.retain(|cells| keep(Record { columns, cells }));
    }

    /// Removes repeated rows, keeping the first occurrence.
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    /// Stable sort on several columns, each with its own direction.
    pub fn sort_by_columns(&mut self, keys: &[(&str, SortOrder)]) -> Result<(), ExtractError> {
        let resolved = keys
            .iter()
            .map(|(name, order)| Ok((self.require_column(name)?, *order)))
            .collect::<Result<Vec<_>, ExtractError>>()?;

        self.rows.sort_by(|a, b| {
            for (idx, order) in &resolved {
                let ord = match order {
                    SortOrder::Ascending => a[*idx].sort_cmp(&b[*idx]),
                    SortOrder::Descending => b[*idx].sort_cmp(&a[*idx]),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        Ok(())
    }

    /// Stacks frames. Columns are aligned by name (and by occurrence for
    /// repeated names); columns missing from a frame are filled with nulls.
    pub fn concat(frames: impl IntoIterator<Item = Frame>) -> Frame {
        let frames: Vec<Frame> = frames.into_iter().collect();
        let Some(first) = frames.first() else {
            return Frame::default();
        };

        if frames.iter().all(|f| f.columns == first.columns) {
            let mut out = Frame::new(first.columns.clone());
            for frame in frames {
                out.rows.extend(frame.rows);
            }
            return out;
        }

        let mut union: Vec<(String, usize)> = Vec::new();
        for frame in &frames {
            for key in occurrence_keys(&frame.columns) {
                if !union.contains(&key) {
                    union.push(key);
                }
            }
        }
        let positions: HashMap<&(String, usize), usize> =
            union.iter().enumerate().map(|(i, k)| (k, i)).collect();

        let mut out = Frame::new(union.iter().map(|(name, _)| name.clone()));
        for frame in &frames {
            let targets: Vec<usize> = occurrence_keys(&frame.columns)
                .iter()
                .map(|k| positions[k])
                .collect();
            for row in &frame.rows {
                let mut merged = vec![CellValue::Null; union.len()];
                for (cell, &target) in row.iter().zip(&targets) {
                    merged[target] = cell.clone();
                }
                out.rows.push(merged);
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Pairs each column name with how many times it appeared before.
fn occurrence_keys(columns: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    columns
        .iter()
        .map(|name| {
            let n = counts.entry(name.as_str()).or_insert(0);
            let key = (name.clone(), *n);
            *n += 1;
            key
        })
        .collect()
}
