//! CMT: Control Mapping Toolkit
//!
//! Imports policy-to-control mapping spreadsheets into a local SQLite
//! compliance catalog, normalizing free-text control references into
//! canonical identifiers along the way.

pub mod cli;
pub mod core;
pub mod import;
pub mod parse;
pub mod source;
