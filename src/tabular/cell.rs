// src/tabular/cell.rs
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A single scraped value. Serialized untagged: `null`, a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Int(i64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Null, or text that is blank after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Int(_) => false,
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Strict integer parse used by column coercion: an optional sign
    /// followed by ASCII digits, nothing else.
    pub(crate) fn parse_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            CellValue::Text(s) => s.parse::<i64>().ok(),
            CellValue::Null => None,
        }
    }

    /// Total order used for sorting: nulls first, then integers, then text.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Int(a), Int(b)) => a.cmp(b),
            (Int(_), Text(_)) => Ordering::Less,
            (Text(_), Int(_)) => Ordering::Greater,
            (Text(a), Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_integer_parsing() {
        assert_eq!(CellValue::text("12").parse_int(), Some(12));
        assert_eq!(CellValue::text("-3").parse_int(), Some(-3));
        assert_eq!(CellValue::text("+4").parse_int(), Some(4));
        assert_eq!(CellValue::text("").parse_int(), None);
        assert_eq!(CellValue::text(" 7").parse_int(), None);
        assert_eq!(CellValue::text("-").parse_int(), None);
        assert_eq!(CellValue::Null.parse_int(), None);
    }

    #[test]
    fn serializes_untagged() {
        let cells = vec![CellValue::Null, CellValue::Int(5), CellValue::text("x")];
        assert_eq!(serde_json::to_string(&cells).unwrap(), r#"[null,5,"x"]"#);
    }

    #[test]
    fn blank_text_counts_as_empty() {
        assert!(CellValue::text("  ").is_empty());
        assert!(CellValue::Null.is_empty());
        assert!(!CellValue::Int(0).is_empty());
    }
}
