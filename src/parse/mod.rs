//! Parsing of mapping-spreadsheet content into canonical control identifiers

pub mod cell;
pub mod columns;
pub mod ident;

pub use cell::split_control_cell;
pub use columns::{resolve_column, ResolvedColumn};
pub use ident::{expand_range, normalize_control_id};
