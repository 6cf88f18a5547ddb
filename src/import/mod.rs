//! Import orchestration
//!
//! Takes a loaded [`Table`], resolves the three mapping columns, reduces
//! every row to its policy name / description / control list, and applies
//! the result to the catalog inside one transaction. Parsing and persistence
//! are split so the dry-run path never touches the database.

use miette::{IntoDiagnostic, Result};
use thiserror::Error;

use crate::core::catalog::{self, Catalog};
use crate::parse::cell::split_control_cell;
use crate::parse::columns::{
    resolve_column, ResolvedColumn, MAPPED_CONTROLS_COLS, POLICY_DESC_COLS, POLICY_NAME_COLS,
};
use crate::source::Table;

/// How many parsed rows the preview block prints.
pub const PREVIEW_ROWS: usize = 15;

/// One spreadsheet row reduced to its mapping content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub name: String,
    pub description: String,
    /// Canonical control identifiers, deduplicated, source order preserved.
    pub controls: Vec<String>,
}

/// The parsed state of a whole source, before any persistence.
#[derive(Debug)]
pub struct ParsedMapping {
    pub policy_col: ResolvedColumn,
    pub desc_col: Option<ResolvedColumn>,
    /// `None` means degraded mode: every row gets an empty control list.
    pub mapped_col: Option<ResolvedColumn>,
    pub rows: Vec<ParsedRow>,
    /// Rows dropped for an empty policy-name cell. Not errors.
    pub skipped: usize,
}

/// Summary counts for a completed import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub rows_processed: usize,
    pub templates_created: usize,
    pub templates_updated: usize,
    pub controls_created: usize,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("couldn't find a policy name column. Found columns: {0:?}")]
    NoPolicyColumn(Vec<String>),
}

/// Resolve columns and reduce every data row to a [`ParsedRow`].
///
/// Fails only when no policy-name column can be resolved. A missing
/// mapped-controls column leaves every control list empty; the caller
/// decides how loudly to warn.
pub fn parse_mapping(table: &Table) -> Result<ParsedMapping, ImportError> {
    let policy_col = resolve_column(&table.headers, POLICY_NAME_COLS)
        .ok_or_else(|| ImportError::NoPolicyColumn(table.headers.clone()))?;
    let desc_col = resolve_column(&table.headers, POLICY_DESC_COLS);
    let mapped_col = resolve_column(&table.headers, MAPPED_CONTROLS_COLS);

    let mut rows = Vec::new();
    let mut skipped = 0;

    for row in &table.rows {
        let Some(name) = cell(row, policy_col.index) else {
            skipped += 1;
            continue;
        };

        let description = desc_col
            .as_ref()
            .and_then(|c| cell(row, c.index))
            .unwrap_or_default();

        let controls = match &mapped_col {
            Some(c) => split_control_cell(row.get(c.index).map(String::as_str)),
            None => Vec::new(),
        };

        rows.push(ParsedRow {
            name,
            description,
            controls,
        });
    }

    Ok(ParsedMapping {
        policy_col,
        desc_col,
        mapped_col,
        rows,
        skipped,
    })
}

fn cell(row: &[String], index: usize) -> Option<String> {
    row.get(index)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Apply parsed rows to the catalog inside one transaction.
///
/// Per row: get-or-create the template by exact name; count an update only
/// when the incoming description is non-empty and differs; then clear and
/// rebuild the template's control set, creating controls on first encounter
/// (titled with their own identifier). Any error aborts the whole batch -
/// the transaction is dropped uncommitted and nothing persists.
pub fn apply(catalog: &mut Catalog, parsed: &ParsedMapping) -> Result<ImportStats> {
    let mut stats = ImportStats {
        rows_processed: parsed.rows.len(),
        skipped: parsed.skipped,
        ..Default::default()
    };

    let tx = catalog.transaction()?;

    for row in &parsed.rows {
        let (template_id, created) =
            catalog::get_or_create_template(&tx, &row.name, &row.description)?;
        if created {
            stats.templates_created += 1;
        } else if !row.description.is_empty()
            && catalog::template_description(&tx, template_id)? != row.description
        {
            catalog::update_template_description(&tx, template_id, &row.description)?;
            stats.templates_updated += 1;
        }

        catalog::clear_template_controls(&tx, template_id)?;
        for (position, control_id) in row.controls.iter().enumerate() {
            if control_id.is_empty() {
                continue;
            }
            if catalog::get_or_create_control(&tx, control_id)? {
                stats.controls_created += 1;
            }
            catalog::attach_control(&tx, template_id, control_id, position)?;
        }
    }

    tx.commit().into_diagnostic()?;
    Ok(stats)
}
