//! Recursive discovery of reference record files

use crate::types::{Result, ValidatorError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find every file under `root` whose extension is in `extensions`
///
/// Matching is case-insensitive. The result is sorted so that records from a
/// tree are always visited in the same order. A plain file is returned as-is
/// when its extension matches.
pub fn discover_json_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ValidatorError::SourceNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| ValidatorError::DiscoveryError(e.to_string()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    log::debug!("Discovered {} file(s) under {:?}", files.len(), root);
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn json() -> Vec<String> {
        vec!["json".to_string()]
    }

    #[test]
    fn test_recursive_sorted_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("tpms").join("schrader");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("tpms").join("a.JSON"), "{}").unwrap();
        fs::write(nested.join("signal.cu8"), [0u8; 4]).unwrap();

        let files = discover_json_files(dir.path(), &json()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("tpms/a.JSON"));
        assert!(files[1].ends_with("tpms/schrader/b.json"));
    }

    #[test]
    fn test_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.json");
        fs::write(&file, "{}").unwrap();

        assert_eq!(discover_json_files(&file, &json()).unwrap(), vec![file]);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_json_files(&dir.path().join("absent"), &json());
        assert!(matches!(result, Err(ValidatorError::SourceNotFound(_))));
    }
}
