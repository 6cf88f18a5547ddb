//! SQLite-backed compliance catalog
//!
//! Durable store for controls, policy templates, and their associations.
//! Import batches mutate it through row-level primitives that all take one
//! [`rusqlite::Transaction`]: the batch either commits as a whole or, when
//! the transaction is dropped on an error path, rolls back entirely.

mod schema;
mod types;

pub use types::*;

use chrono::Utc;
use miette::{IntoDiagnostic, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::fs;

use crate::core::project::Project;

/// Current schema version - catalog is rebuilt on version mismatch
const SCHEMA_VERSION: i32 = 1;

/// The compliance catalog backed by SQLite
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open or create the catalog for a project
    pub fn open(project: &Project) -> Result<Self> {
        let path = project.catalog_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }

        let needs_init = !path.exists();
        let conn = Connection::open(&path).into_diagnostic()?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .into_diagnostic()?;

        let mut catalog = Self { conn };
        if needs_init {
            catalog.init_schema()?;
        } else if catalog.needs_schema_rebuild()? {
            catalog.reinitialize_schema()?;
        }

        Ok(catalog)
    }

    /// Open an in-memory catalog (tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().into_diagnostic()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .into_diagnostic()?;

        let mut catalog = Self { conn };
        catalog.init_schema()?;
        Ok(catalog)
    }

    fn needs_schema_rebuild(&self) -> Result<bool> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(current_version != SCHEMA_VERSION)
    }

    /// Begin the all-or-nothing mutation transaction for an import batch
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction().into_diagnostic()
    }

    // =========================================================================
    // Read side (consumed by list/show commands and the prompt builder)
    // =========================================================================

    /// List controls, optionally filtered by a substring of id or title
    pub fn list_controls(&self, search: Option<&str>) -> Result<Vec<ControlRow>> {
        let pattern = format!("%{}%", search.unwrap_or(""));
        let mut stmt = self
            .conn
            .prepare(
                "SELECT control_id, title, description FROM controls
                 WHERE control_id LIKE ?1 OR title LIKE ?1
                 ORDER BY control_id",
            )
            .into_diagnostic()?;

        let rows = stmt
            .query_map(params![pattern], |row| {
                Ok(ControlRow {
                    control_id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .into_diagnostic()?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .into_diagnostic()
    }

    /// Look up a single control by canonical identifier
    pub fn get_control(&self, control_id: &str) -> Result<Option<ControlRow>> {
        self.conn
            .query_row(
                "SELECT control_id, title, description FROM controls WHERE control_id = ?1",
                params![control_id],
                |row| {
                    Ok(ControlRow {
                        control_id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()
            .into_diagnostic()
    }

    /// List policy templates, optionally filtered by a substring of name or
    /// description
    pub fn list_templates(&self, search: Option<&str>) -> Result<Vec<PolicyTemplateRow>> {
        let pattern = format!("%{}%", search.unwrap_or(""));
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description, max_words, prompt_template, created, updated
                 FROM policy_templates
                 WHERE name LIKE ?1 OR description LIKE ?1
                 ORDER BY name",
            )
            .into_diagnostic()?;

        let rows = stmt
            .query_map(params![pattern], map_template_row)
            .into_diagnostic()?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .into_diagnostic()
    }

    /// Look up a policy template by exact name
    pub fn get_template_by_name(&self, name: &str) -> Result<Option<PolicyTemplateRow>> {
        self.conn
            .query_row(
                "SELECT id, name, description, max_words, prompt_template, created, updated
                 FROM policy_templates WHERE name = ?1",
                params![name],
                map_template_row,
            )
            .optional()
            .into_diagnostic()
    }

    /// Controls mapped to a template, in the parse order of the source cell
    pub fn controls_for_template(&self, template_id: i64) -> Result<Vec<ControlRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT c.control_id, c.title, c.description
                 FROM template_controls tc
                 JOIN controls c ON c.control_id = tc.control_id
                 WHERE tc.template_id = ?1
                 ORDER BY tc.position",
            )
            .into_diagnostic()?;

        let rows = stmt
            .query_map(params![template_id], |row| {
                Ok(ControlRow {
                    control_id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                })
            })
            .into_diagnostic()?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .into_diagnostic()
    }

    /// Names of templates that map a given control
    pub fn templates_for_control(&self, control_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.name FROM template_controls tc
                 JOIN policy_templates t ON t.id = tc.template_id
                 WHERE tc.control_id = ?1
                 ORDER BY t.name",
            )
            .into_diagnostic()?;

        let rows = stmt
            .query_map(params![control_id], |row| row.get(0))
            .into_diagnostic()?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .into_diagnostic()
    }

    /// Total row counts
    pub fn counts(&self) -> Result<CatalogCounts> {
        let count = |sql: &str| -> Result<usize> {
            self.conn
                .query_row(sql, [], |row| row.get::<_, i64>(0))
                .into_diagnostic()
                .map(|n| n as usize)
        };

        Ok(CatalogCounts {
            controls: count("SELECT COUNT(*) FROM controls")?,
            templates: count("SELECT COUNT(*) FROM policy_templates")?,
            associations: count("SELECT COUNT(*) FROM template_controls")?,
        })
    }
}

fn map_template_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PolicyTemplateRow> {
    Ok(PolicyTemplateRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        max_words: row.get(3)?,
        prompt_template: row.get(4)?,
        created: row.get(5)?,
        updated: row.get(6)?,
    })
}

// =========================================================================
// Write side: row-level primitives for the import transaction
// =========================================================================

/// Fetch a template id by exact name, inserting the row when absent.
/// The given description is only used at creation time. Returns the id and
/// whether the row was created.
pub fn get_or_create_template(
    tx: &Transaction<'_>,
    name: &str,
    description: &str,
) -> Result<(i64, bool)> {
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM policy_templates WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()
        .into_diagnostic()?;

    if let Some(id) = existing {
        return Ok((id, false));
    }

    let now = Utc::now().to_rfc3339();
    tx.execute(
        "INSERT INTO policy_templates (name, description, created, updated)
         VALUES (?1, ?2, ?3, ?3)",
        params![name, description, now],
    )
    .into_diagnostic()?;

    Ok((tx.last_insert_rowid(), true))
}

/// Current description of a template
pub fn template_description(tx: &Transaction<'_>, template_id: i64) -> Result<String> {
    tx.query_row(
        "SELECT description FROM policy_templates WHERE id = ?1",
        params![template_id],
        |row| row.get(0),
    )
    .into_diagnostic()
}

/// Replace a template's description, bumping `updated`
pub fn update_template_description(
    tx: &Transaction<'_>,
    template_id: i64,
    description: &str,
) -> Result<()> {
    tx.execute(
        "UPDATE policy_templates SET description = ?2, updated = ?3 WHERE id = ?1",
        params![template_id, description, Utc::now().to_rfc3339()],
    )
    .into_diagnostic()?;
    Ok(())
}

/// Drop every control association for a template
pub fn clear_template_controls(tx: &Transaction<'_>, template_id: i64) -> Result<()> {
    tx.execute(
        "DELETE FROM template_controls WHERE template_id = ?1",
        params![template_id],
    )
    .into_diagnostic()?;
    Ok(())
}

/// Insert a control row if absent, titled with its own identifier.
/// Existing titles and descriptions are left untouched. Returns whether the
/// row was created.
pub fn get_or_create_control(tx: &Transaction<'_>, control_id: &str) -> Result<bool> {
    let exists: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM controls WHERE control_id = ?1",
            params![control_id],
            |row| row.get(0),
        )
        .optional()
        .into_diagnostic()?;

    if exists.is_some() {
        return Ok(false);
    }

    tx.execute(
        "INSERT INTO controls (control_id, title) VALUES (?1, ?1)",
        params![control_id],
    )
    .into_diagnostic()?;
    Ok(true)
}

/// Attach a control to a template at the given display position
pub fn attach_control(
    tx: &Transaction<'_>,
    template_id: i64,
    control_id: &str,
    position: usize,
) -> Result<()> {
    tx.execute(
        "INSERT INTO template_controls (template_id, control_id, position) VALUES (?1, ?2, ?3)",
        params![template_id, control_id, position as i64],
    )
    .into_diagnostic()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_template_is_idempotent() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let tx = catalog.transaction().unwrap();

        let (id1, created1) = get_or_create_template(&tx, "Access Control Policy", "v1").unwrap();
        let (id2, created2) = get_or_create_template(&tx, "Access Control Policy", "v2").unwrap();

        assert!(created1);
        assert!(!created2);
        assert_eq!(id1, id2);
        // existing description untouched by get-or-create
        assert_eq!(template_description(&tx, id1).unwrap(), "v1");
    }

    #[test]
    fn test_control_title_defaults_to_id_and_is_never_overwritten() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        {
            let tx = catalog.transaction().unwrap();
            assert!(get_or_create_control(&tx, "A.5.1").unwrap());
            tx.execute(
                "UPDATE controls SET title = 'Policies for information security' WHERE control_id = 'A.5.1'",
                [],
            )
            .unwrap();
            assert!(!get_or_create_control(&tx, "A.5.1").unwrap());
            tx.commit().unwrap();
        }

        let ctrl = catalog.get_control("A.5.1").unwrap().unwrap();
        assert_eq!(ctrl.title, "Policies for information security");
    }

    #[test]
    fn test_clear_then_rebuild_replaces_association_set() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        {
            let tx = catalog.transaction().unwrap();
            let (id, _) = get_or_create_template(&tx, "Crypto Policy", "").unwrap();
            for (pos, cid) in ["A.8.24", "A.8.25"].iter().enumerate() {
                get_or_create_control(&tx, cid).unwrap();
                attach_control(&tx, id, cid, pos).unwrap();
            }

            clear_template_controls(&tx, id).unwrap();
            get_or_create_control(&tx, "A.5.1").unwrap();
            attach_control(&tx, id, "A.5.1", 0).unwrap();
            tx.commit().unwrap();
        }

        let template = catalog.get_template_by_name("Crypto Policy").unwrap().unwrap();
        let controls = catalog.controls_for_template(template.id).unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].control_id, "A.5.1");
        // orphaned controls stay in the catalog; the importer never deletes
        assert_eq!(catalog.counts().unwrap().controls, 3);
    }

    #[test]
    fn test_dropped_transaction_rolls_back_everything() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        {
            let tx = catalog.transaction().unwrap();
            let (id, _) = get_or_create_template(&tx, "Orphan Policy", "").unwrap();
            get_or_create_control(&tx, "A.6.1").unwrap();
            attach_control(&tx, id, "A.6.1", 0).unwrap();
            // dropped without commit
        }

        let counts = catalog.counts().unwrap();
        assert_eq!(counts, CatalogCounts::default());
    }

    #[test]
    fn test_controls_for_template_keeps_parse_order() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        {
            let tx = catalog.transaction().unwrap();
            let (id, _) = get_or_create_template(&tx, "Secure Dev Policy", "").unwrap();
            // deliberately not in lexicographic order
            for (pos, cid) in ["A.8.28", "A.5.1", "A.8.24"].iter().enumerate() {
                get_or_create_control(&tx, cid).unwrap();
                attach_control(&tx, id, cid, pos).unwrap();
            }
            tx.commit().unwrap();
        }

        let template = catalog.get_template_by_name("Secure Dev Policy").unwrap().unwrap();
        let ids: Vec<String> = catalog
            .controls_for_template(template.id)
            .unwrap()
            .into_iter()
            .map(|c| c.control_id)
            .collect();
        assert_eq!(ids, vec!["A.8.28", "A.5.1", "A.8.24"]);
    }

    #[test]
    fn test_new_template_defaults() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        {
            let tx = catalog.transaction().unwrap();
            get_or_create_template(&tx, "Backup Policy", "How we back up").unwrap();
            tx.commit().unwrap();
        }

        let t = catalog.get_template_by_name("Backup Policy").unwrap().unwrap();
        assert_eq!(t.description, "How we back up");
        assert_eq!(t.max_words, 600);
        assert!(t.prompt_template.is_none());
    }

    #[test]
    fn test_list_controls_search() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        {
            let tx = catalog.transaction().unwrap();
            for cid in ["A.5.1", "A.5.2", "A.8.24"] {
                get_or_create_control(&tx, cid).unwrap();
            }
            tx.commit().unwrap();
        }

        assert_eq!(catalog.list_controls(None).unwrap().len(), 3);
        assert_eq!(catalog.list_controls(Some("A.5")).unwrap().len(), 2);
        assert!(catalog.list_controls(Some("A.9")).unwrap().is_empty());
    }
}
