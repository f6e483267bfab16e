//! Workflow file discovery
//!
//! Walks the workflow root depth-first with entries sorted by name, following
//! symlinks. Traversal errors abort the run rather than silently dropping files.

use crate::domain::violations::{GuardianError, GuardianResult};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognised as workflow definitions
pub const WORKFLOW_EXTENSIONS: [&str; 2] = [".yml", ".yaml"];

/// Whether a file name looks like a workflow definition.
///
/// Compares raw bytes so names that are not valid UTF-8 are still recognised.
pub fn is_workflow_file<S: AsRef<OsStr>>(file_name: S) -> bool {
    let name = file_name.as_ref().as_encoded_bytes();
    WORKFLOW_EXTENSIONS.iter().any(|ext| name.ends_with(ext.as_bytes()))
}

/// Recursively collect every `.yml`/`.yaml` regular file under `root`.
///
/// A missing root yields an empty list. A root that is not a directory, or any
/// entry that cannot be inspected (permission denied, broken symlink, symlink
/// loop), is an error.
pub fn find_workflow_files<P: AsRef<Path>>(root: P) -> GuardianResult<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        tracing::debug!("Workflow root {} does not exist", root.display());
        return Ok(Vec::new());
    }

    if !root.is_dir() {
        return Err(GuardianError::collection(root, "not a directory"));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            GuardianError::collection(path, e.to_string())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if is_workflow_file(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!("Collected {} workflow files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "on: push\n").unwrap();
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = find_workflow_files(temp_dir.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_root_that_is_a_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "workflows");
        let result = find_workflow_files(temp_dir.path().join("workflows"));
        assert!(matches!(result, Err(GuardianError::Collection { .. })));
    }

    #[test]
    fn test_collects_yaml_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "ci.yml");
        touch(root, "release.yaml");
        touch(root, "nested/deep/deploy.yml");
        touch(root, "README.md");
        touch(root, "notes.yml.bak");
        touch(root, "upper.YML");

        let mut names: Vec<_> = find_workflow_files(root)
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                PathBuf::from("ci.yml"),
                PathBuf::from("nested/deep/deploy.yml"),
                PathBuf::from("release.yaml"),
            ]
        );
    }

    #[test]
    fn test_directory_named_like_workflow_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("odd.yml")).unwrap();
        touch(temp_dir.path(), "odd.yml/inner.yaml");

        let files = find_workflow_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("odd.yml/inner.yaml")]);
    }

    #[test]
    fn test_each_file_is_visited_once() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.yml");
        touch(temp_dir.path(), "b/a.yml");

        let files = find_workflow_files(temp_dir.path()).unwrap();
        let again = find_workflow_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files, again);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_fails_the_walk() {
        let temp_dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone.yml"), temp_dir.path().join("link.yml"))
            .unwrap();

        let result = find_workflow_files(temp_dir.path());
        assert!(matches!(result, Err(GuardianError::Collection { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_collected() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(OsStr::from_bytes(b"rel\xffease.yml"));
        if fs::write(&path, "  - candidate\n").is_err() {
            // Some file systems refuse non-UTF-8 names outright
            return;
        }

        let files = find_workflow_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_and_directory_are_followed() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let outside = temp_dir.path().join("shared");
        touch(&outside, "deploy.yml");
        touch(&outside, "reusable/build.yaml");

        let root = temp_dir.path().join("workflows");
        fs::create_dir_all(&root).unwrap();
        symlink(outside.join("deploy.yml"), root.join("linked.yml")).unwrap();
        symlink(outside.join("reusable"), root.join("reusable")).unwrap();

        let files = find_workflow_files(&root).unwrap();
        assert_eq!(files, vec![root.join("linked.yml"), root.join("reusable/build.yaml")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_named_like_workflow_is_not_listed() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "ci.yml");
        let fifo = temp_dir.path().join("pipe.yml");

        let created = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !created {
            return;
        }

        let files = find_workflow_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("ci.yml")]);
    }

    #[test]
    fn test_extension_check() {
        assert!(is_workflow_file("ci.yml"));
        assert!(is_workflow_file("ci.yaml"));
        assert!(!is_workflow_file("ci.json"));
        assert!(!is_workflow_file("yml"));
    }
}
