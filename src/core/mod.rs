//! Core module - catalog and project plumbing

pub mod catalog;
pub mod project;

pub use catalog::{Catalog, CatalogCounts, ControlRow, PolicyTemplateRow};
pub use project::{Project, ProjectError};
