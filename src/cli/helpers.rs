//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::project::Project;

/// Truncate a string to max_len characters, adding "..." if truncated.
/// Counts chars rather than bytes so multibyte text never splits mid-char.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let keep: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{keep}...")
    }
}

/// Open the project from --project/CMT_PROJECT or by walking up from the cwd
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let result = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    result.map_err(|e| miette::miette!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        let name = "Política de Segurança da Informação çç";
        let short = truncate_str(name, 40);
        assert_eq!(short, name);
        let cut = truncate_str(name, 20);
        assert_eq!(cut, "Política de Segur...");
        assert_eq!(cut.chars().count(), 20);
    }
}
