// src/extractors/mod.rs
pub mod form;
pub mod links;
pub mod names;
pub mod report;
pub mod roster;
pub mod standings;
pub mod table;

// Re-export key extraction functions for convenience
pub use form::{divide_events, form_codes, form_frame, string_divide, team_form, triple_strings, FormEntry, FormResult};
pub use links::{extract_link_table, find_links};
pub use names::{adjust_team_name, extract_round, team_slug};
pub use report::extract_match_report;
pub use roster::extract_roster;
pub use standings::{normalize_standings, team_form_from_table};
pub use table::{extract_table, extract_text_table, find_tables, first_table};
