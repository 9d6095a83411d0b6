// src/tabular/mod.rs
pub mod cell;
pub mod frame;

pub use cell::CellValue;
pub use frame::{Frame, Record, SortOrder};
