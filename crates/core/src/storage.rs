//! Rules for files kept in the server's upload directory.
//!
//! Clients refer to previously stored files (trajectory logs, robot and
//! equipment pictures) by path. Every such path must resolve inside the
//! configured files directory.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

/// Resolve a client-supplied path against `base`.
///
/// Relative paths are joined onto `base`; absolute paths are accepted only
/// when they already lie under it. `..` components are refused outright,
/// so the check is purely lexical and does not touch the filesystem.
pub fn resolve_within(base: &Path, requested: &str) -> Result<PathBuf, CoreError> {
    if requested.trim().is_empty() {
        return Err(CoreError::Validation("file path must not be empty".to_string()));
    }
    let requested = Path::new(requested);
    if requested
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(CoreError::Validation(format!(
            "file path '{}' must not contain '..'",
            requested.display()
        )));
    }

    let resolved = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        base.join(requested)
    };

    if !resolved.starts_with(base) || resolved == base {
        return Err(CoreError::Validation(format!(
            "file path '{}' is outside the files directory",
            requested.display()
        )));
    }
    Ok(resolved)
}

/// Reduce an uploaded file name to a safe single path segment.
///
/// Directory parts are dropped and any byte outside `[A-Za-z0-9._-]`
/// becomes `_`.
pub fn sanitize_file_name(original: &str) -> Result<String, CoreError> {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CoreError::Validation(format!("invalid file name '{original}'")))?;

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        return Err(CoreError::Validation(format!("invalid file name '{original}'")));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn relative_paths_join_the_base() {
        let base = Path::new("/srv/files");
        assert_eq!(
            resolve_within(base, "field-a.traj").unwrap(),
            PathBuf::from("/srv/files/field-a.traj")
        );
    }

    #[test]
    fn absolute_paths_inside_base_are_kept() {
        let base = Path::new("/srv/files");
        assert_eq!(
            resolve_within(base, "/srv/files/sub/run.traj").unwrap(),
            PathBuf::from("/srv/files/sub/run.traj")
        );
    }

    #[test]
    fn escapes_are_rejected() {
        let base = Path::new("/srv/files");
        assert_matches!(resolve_within(base, "../etc/passwd"), Err(CoreError::Validation(_)));
        assert_matches!(resolve_within(base, "/etc/passwd"), Err(CoreError::Validation(_)));
        assert_matches!(resolve_within(base, "/srv/filesystem/x"), Err(CoreError::Validation(_)));
        assert_matches!(resolve_within(base, "/srv/files"), Err(CoreError::Validation(_)));
        assert_matches!(resolve_within(base, "  "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(sanitize_file_name("run 1.traj").unwrap(), "run_1.traj");
        assert_eq!(sanitize_file_name("a/b/c.traj").unwrap(), "c.traj");
        assert_eq!(sanitize_file_name("champ-été.traj").unwrap(), "champ-_t_.traj");
        assert_matches!(sanitize_file_name(".."), Err(CoreError::Validation(_)));
        assert_matches!(sanitize_file_name(""), Err(CoreError::Validation(_)));
    }
}
