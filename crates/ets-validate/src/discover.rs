// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source file discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into: package caches, VCS metadata,
/// build output and generated bindings.
pub const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "oh_modules",
    ".git",
    "dist",
    "build",
    ".conda",
    "bindings",
    ".hvigor",
];

pub const EXTENSION: &str = "ets";

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EXTENSION)
}

/// Collect every `.ets` file under `root`, sorted by path.
///
/// A missing root yields no files. Entries that cannot be read are logged
/// and skipped.
pub fn find_sources(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        tracing::warn!(root = %root.display(), "target directory does not exist");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped_dir(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered sources");
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn finds_nested_sources_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "pages/Index.ets");
        touch(dir.path(), "common/Util.ets");
        touch(dir.path(), "common/readme.md");
        touch(dir.path(), "App.ets");

        let found: Vec<_> = find_sources(dir.path())
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(found, vec!["App.ets", "common/Util.ets", "pages/Index.ets"]);
    }

    #[test]
    fn skips_dependency_and_build_directories() {
        let dir = tempfile::tempdir().unwrap();
        for skipped in SKIPPED_DIRS {
            touch(dir.path(), &format!("{skipped}/Hidden.ets"));
        }
        touch(dir.path(), "src/build_utils/Kept.ets");

        let found = find_sources(dir.path());
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("src/build_utils/Kept.ets"));
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_sources(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn root_named_like_skipped_dir_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "build/Main.ets");
        assert_eq!(find_sources(&dir.path().join("build")).len(), 1);
    }
}
