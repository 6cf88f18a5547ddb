//! Catalog row types

use serde::Serialize;

/// A single compliance control, keyed by canonical identifier (e.g. `A.6.1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRow {
    pub control_id: String,
    /// Defaults to the identifier itself when the control is first created
    /// by an import; refined later by other tooling, never by the importer.
    pub title: String,
    pub description: String,
}

/// A policy template, mapped to controls via `template_controls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyTemplateRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Default word budget for generated policy text.
    pub max_words: u32,
    /// Optional prompt-template reference, owned by the generation side.
    pub prompt_template: Option<String>,
    pub created: String,
    pub updated: String,
}

/// Control and template counts, for status output and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub controls: usize,
    pub templates: usize,
    pub associations: usize,
}
