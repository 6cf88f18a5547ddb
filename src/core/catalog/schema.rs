//! Catalog schema initialization

use miette::{IntoDiagnostic, Result};
use rusqlite::params;

use super::{Catalog, SCHEMA_VERSION};

impl Catalog {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Compliance controls, keyed by canonical identifier
            CREATE TABLE IF NOT EXISTS controls (
                control_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );

            -- Policy templates
            CREATE TABLE IF NOT EXISTS policy_templates (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                max_words INTEGER NOT NULL DEFAULT 600,
                prompt_template TEXT,
                created TEXT NOT NULL,
                updated TEXT NOT NULL
            );

            -- Template-to-control associations, rebuilt per row on import.
            -- position preserves the parse order of the source cell.
            CREATE TABLE IF NOT EXISTS template_controls (
                template_id INTEGER NOT NULL,
                control_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (template_id, control_id),
                FOREIGN KEY (template_id) REFERENCES policy_templates(id) ON DELETE CASCADE,
                FOREIGN KEY (control_id) REFERENCES controls(control_id)
            );
            CREATE INDEX IF NOT EXISTS idx_template_controls_control
                ON template_controls(control_id);
            "#,
            )
            .into_diagnostic()?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .into_diagnostic()?;

        Ok(())
    }

    /// Drop all tables and reinitialize (schema version mismatch)
    pub(super) fn reinitialize_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                DROP TABLE IF EXISTS schema_version;
                DROP TABLE IF EXISTS template_controls;
                DROP TABLE IF EXISTS policy_templates;
                DROP TABLE IF EXISTS controls;
                "#,
            )
            .into_diagnostic()?;

        self.init_schema()
    }
}
