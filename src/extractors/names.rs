// src/extractors/names.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Case-sensitive: "Kolejka 3" is not a round label.
static ROUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"kolejka (\d+)").expect("Failed to compile ROUND_RE"));

pub const DEFAULT_SLUG_SEPARATOR: &str = "-";

/// Round number from a label such as "kolejka 17". Rows without a round
/// label map to `None`.
pub fn extract_round(text: &str) -> Option<String> {
    ROUND_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// URL slug of a team name: transliterated to ASCII, lowercased, spaces
/// replaced by `separator`. Idempotent.
pub fn adjust_team_name(text: &str, separator: &str) -> String {
    deunicode::deunicode(text)
        .to_lowercase()
        .replace(' ', separator)
}

/// Slug with the site's default separator.
pub fn team_slug(text: &str) -> String {
    adjust_team_name(text, DEFAULT_SLUG_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_round_number() {
        assert_eq!(extract_round("To jest kolejka 17 rundy"), Some("17".to_string()));
        assert_eq!(extract_round("kolejka 3"), Some("3".to_string()));
        assert_eq!(extract_round("brak danych"), None);
        assert_eq!(extract_round("Kolejka 3"), None);
    }

    #[test]
    fn slugs_strip_polish_diacritics() {
        assert_eq!(team_slug("Górnik Łęczna"), "gornik-leczna");
        assert_eq!(adjust_team_name("Żółta Łódź", "_"), "zolta_lodz");
    }

    #[test]
    fn slugging_is_idempotent() {
        for name in ["Górnik Łęczna", "Śląsk Wrocław II", "fc-orly"] {
            let once = team_slug(name);
            assert_eq!(team_slug(&once), once);
        }
    }
}
