//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory marking a catalog project root.
const CMT_DIR: &str = ".cmt";

/// A catalog project (the directory holding `.cmt/`)
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::Io(e.to_string()))?;

        loop {
            if current.join(CMT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(CMT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_dirs(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .cmt/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_dirs(&root)?;
        Ok(Self { root })
    }

    fn create_dirs(root: &Path) -> Result<(), ProjectError> {
        std::fs::create_dir_all(root.join(CMT_DIR))
            .map_err(|e| ProjectError::Io(e.to_string()))?;
        Ok(())
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .cmt configuration directory
    pub fn cmt_dir(&self) -> PathBuf {
        self.root.join(CMT_DIR)
    }

    /// Get the catalog database path
    pub fn catalog_path(&self) -> PathBuf {
        self.cmt_dir().join("catalog.db")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a cmt project (searched from {searched_from:?}). Run 'cmt init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("cmt project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.cmt_dir().is_dir());
        assert!(project.catalog_path().starts_with(project.cmt_dir()));
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_project_discover_finds_cmt_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_cmt_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
