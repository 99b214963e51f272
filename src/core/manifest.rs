//! # Directory Manifest
//!
//! Builds the list of `(install directory, files)` pairs needed to ship a whole
//! directory tree as package data. Each directory under the source root that
//! keeps at least one file after extension filtering contributes one entry.

use crate::{core::paths, models::ManifestEntry};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Source directory '{0}' does not exist")]
    SourceNotFound(PathBuf),
}

/// Walks `source_path` and returns one manifest entry per directory with files.
///
/// * `install_path` - Base install location. A trailing copy of `source_path` is
///   stripped first, then a leading `~` is expanded. Anything else, `$` included,
///   is taken literally.
/// * `source_path` - The root directory to include.
/// * `exclude` - File name suffixes to leave out (e.g. `".pyc"`, `".tmp"`).
///
/// Entries come in pre-order (a directory before its subdirectories), and files
/// are sorted by name, so the result is stable across platforms. Unreadable
/// entries below the root are skipped with a warning.
///
/// # Errors
/// Returns `ManifestError::SourceNotFound` if `source_path` does not exist.
pub fn include_directory(
    install_path: &str,
    source_path: &str,
    exclude: &[String],
) -> Result<Vec<ManifestEntry>, ManifestError> {
    let source_root = Path::new(source_path);
    if !source_root.exists() {
        return Err(ManifestError::SourceNotFound(source_root.to_path_buf()));
    }

    let install_prefix = install_path.strip_suffix(source_path).unwrap_or(install_path);
    let install_base = paths::expand_home(install_prefix);
    debug!(
        "Building manifest of '{}' for install base '{}'",
        source_root.display(),
        install_base.display()
    );

    // Directories in visit order, each with the files kept so far.
    let mut directories: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();
    let mut slots: HashMap<PathBuf, usize> = HashMap::new();

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry while building manifest: {}", e);
                continue;
            }
        };
        let path = entry.path();

        // Symlinks to directories count as directories, like the walk itself treats them.
        if entry.file_type().is_dir() || path.is_dir() {
            if entry.file_type().is_dir() {
                slots.insert(path.to_path_buf(), directories.len());
                directories.push((path.to_path_buf(), Vec::new()));
            }
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if exclude.iter().any(|suffix| file_name.ends_with(suffix.as_str())) {
            debug!("Excluding '{}'", path.display());
            continue;
        }

        let slot = path.parent().and_then(|parent| slots.get(parent)).copied();
        match slot.and_then(|index| directories.get_mut(index)) {
            Some((_, files)) => files.push(path.to_path_buf()),
            None => warn!("No parent directory recorded for '{}'", path.display()),
        }
    }

    let manifest: Vec<ManifestEntry> = directories
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(dir, files)| ManifestEntry {
            install_dir: install_base.join(&dir),
            files,
        })
        .collect();

    debug!("Manifest has {} entries", manifest.len());
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // --- Helper: creates a small tree under a temp dir ---
    //   root/a.txt, root/b.pyc
    //   root/sub/c.txt
    //   root/empty/
    //   root/only_excluded/d.pyc
    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b.pyc"), "b").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("c.txt"), "c").unwrap();
        fs::create_dir(root.join("empty")).unwrap();
        fs::create_dir(root.join("only_excluded")).unwrap();
        fs::write(root.join("only_excluded").join("d.pyc"), "d").unwrap();
        dir
    }

    fn excludes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_include_directory_filters_and_groups() {
        // --- Setup ---
        let tree = sample_tree();
        let source = tree.path().to_str().unwrap();

        // --- Execute ---
        let manifest = include_directory("share/pkg", source, &excludes(&[".pyc"])).unwrap();

        // --- Assert ---
        assert_eq!(manifest.len(), 2);

        let root = tree.path();
        assert_eq!(manifest[0].install_dir, Path::new("share/pkg").join(root));
        assert_eq!(manifest[0].files, vec![root.join("a.txt")]);

        assert_eq!(manifest[1].install_dir, Path::new("share/pkg").join(root.join("sub")));
        assert_eq!(manifest[1].files, vec![root.join("sub").join("c.txt")]);
    }

    #[test]
    fn test_include_directory_without_excludes() {
        let tree = sample_tree();
        let source = tree.path().to_str().unwrap();

        let manifest = include_directory("share/pkg", source, &[]).unwrap();

        let all_files: Vec<_> = manifest.iter().flat_map(|e| e.files.iter()).collect();
        assert_eq!(all_files.len(), 4);
        // Pre-order, sorted by name: root, only_excluded, sub.
        assert_eq!(manifest[0].files, vec![tree.path().join("a.txt"), tree.path().join("b.pyc")]);
        assert!(manifest[1].install_dir.ends_with("only_excluded"));
        assert!(manifest[2].install_dir.ends_with("sub"));
    }

    #[test]
    fn test_install_suffix_is_stripped() {
        // --- Setup ---
        let tree = sample_tree();
        let root = tree.path();
        let source = format!("{}/sub", root.display());

        // --- Execute: the install path ends with the source path, which gets stripped ---
        let install = format!("/opt/pkg/{}", source);
        let manifest = include_directory(&install, &source, &[]).unwrap();

        // --- Assert ---
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest[0].install_dir, Path::new("/opt/pkg/").join(&source));
        assert_eq!(manifest[0].files, vec![root.join("sub").join("c.txt")]);
    }

    #[test]
    fn test_dollar_in_install_path_is_literal() {
        let tree = sample_tree();
        let root = tree.path();
        let source = root.to_str().unwrap();

        let manifest = include_directory("share/$pkgdata_unset", source, &[]).unwrap();

        assert_eq!(
            manifest[0].install_dir,
            Path::new("share/$pkgdata_unset").join(root)
        );
    }

    #[test]
    fn test_missing_source_fails() {
        let tree = TempDir::new().unwrap();
        let missing = tree.path().join("nope");

        let result = include_directory("share", missing.to_str().unwrap(), &[]);

        assert!(matches!(result, Err(ManifestError::SourceNotFound(_))));
    }

    #[test]
    fn test_all_files_excluded_yields_empty_manifest() {
        let tree = sample_tree();
        let source = tree.path().to_str().unwrap();

        let manifest =
            include_directory("share", source, &excludes(&[".txt", ".pyc"])).unwrap();

        assert!(manifest.is_empty());
    }
}
