//! Enumeration of the context files available under a registry root.

use std::io;
use std::path::{Path, PathBuf};

use log::error;
use walkdir::WalkDir;

use super::error::StoreError;

/// File extension that marks a context file.
const CONTEXT_EXTENSION: &str = "properties";

/// Walks `root` recursively and returns every file whose extension is
/// exactly `properties`, sorted for deterministic output.
///
/// An unreadable or missing root is logged and surfaced as an I/O error.
pub(crate) fn list_contexts(root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut contexts = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            error!("error listing contexts under '{}': {e}", root.display());
            StoreError::Io {
                path: root.to_path_buf(),
                source: io::Error::from(e),
            }
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(CONTEXT_EXTENSION) {
            contexts.push(path.to_path_buf());
        }
    }

    contexts.sort();
    Ok(contexts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_contexts_filters_on_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.properties"), "x=1\n").unwrap();
        fs::write(dir.path().join("b.properties"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();
        fs::write(dir.path().join(".LOCK"), "").unwrap();

        let contexts = list_contexts(dir.path()).unwrap();

        assert_eq!(
            contexts,
            vec![
                dir.path().join("a.properties"),
                dir.path().join("b.properties"),
            ]
        );
    }

    #[test]
    fn test_list_contexts_walks_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/inner.properties"), "").unwrap();
        fs::write(dir.path().join("top.properties"), "").unwrap();

        let contexts = list_contexts(dir.path()).unwrap();

        assert_eq!(contexts.len(), 2);
        assert!(contexts.contains(&dir.path().join("nested/inner.properties")));
    }

    #[test]
    fn test_list_contexts_missing_root() {
        let result = list_contexts(Path::new("/nonexistent/registry/root"));

        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
