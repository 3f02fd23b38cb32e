//! Filesystem snapshot used to seed `@` mention path candidates.

use std::path::Path;

use ignore::WalkBuilder;

use crate::domain::candidate::{IndexablePath, PathKind};

const MAX_DEPTH: usize = 10;
const MAX_ENTRIES: usize = 500;

/// Lists files and directories recursively under `root`, respecting
/// `.gitignore`.
///
/// Folder paths carry a trailing `/` so downstream candidate kinds can
/// be derived from the path alone. Returns at most [`MAX_ENTRIES`]
/// entries with a maximum depth of [`MAX_DEPTH`]; folders sort before
/// files, alphabetically within each group.
pub fn index_paths(root: &Path) -> Vec<IndexablePath> {
    let walker = WalkBuilder::new(root)
        .max_depth(Some(MAX_DEPTH))
        .hidden(false)
        .build();

    let mut entries: Vec<IndexablePath> = walker
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_type()
                .is_some_and(|ft| ft.is_file() || ft.is_dir())
        })
        .filter_map(|entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());

            entry.path().strip_prefix(root).ok().and_then(|relative| {
                let path = relative.to_string_lossy().to_string();
                if path.is_empty() {
                    return None;
                }

                if is_dir {
                    return Some(IndexablePath {
                        kind: PathKind::Folder,
                        path: format!("{path}/"),
                    });
                }

                Some(IndexablePath {
                    kind: PathKind::File,
                    path,
                })
            })
        })
        .collect();

    entries.sort_by(|first, second| {
        let first_is_dir = first.kind == PathKind::Folder;
        let second_is_dir = second.kind == PathKind::Folder;

        second_is_dir
            .cmp(&first_is_dir)
            .then_with(|| first.path.cmp(&second.path))
    });
    entries.truncate(MAX_ENTRIES);

    entries
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_index_paths_empty_directory() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");

        // Act
        let entries = index_paths(temp_dir.path());

        // Assert
        assert!(entries.is_empty());
    }

    #[test]
    fn test_index_paths_folders_carry_trailing_slash() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::create_dir_all(temp_dir.path().join("src")).expect("test expectation should hold");
        fs::write(temp_dir.path().join("src/main.rs"), "").expect("test expectation should hold");

        // Act
        let entries = index_paths(temp_dir.path());

        // Assert
        assert_eq!(
            entries,
            vec![
                IndexablePath {
                    kind: PathKind::Folder,
                    path: "src/".to_string(),
                },
                IndexablePath {
                    kind: PathKind::File,
                    path: "src/main.rs".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_index_paths_sorts_folders_before_files() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::write(temp_dir.path().join("aaa_file.txt"), "").expect("test expectation should hold");
        fs::create_dir_all(temp_dir.path().join("zzz_dir")).expect("test expectation should hold");

        // Act
        let entries = index_paths(temp_dir.path());

        // Assert
        assert_eq!(entries[0].path, "zzz_dir/");
        assert_eq!(entries[0].kind, PathKind::Folder);
        assert_eq!(entries[1].path, "aaa_file.txt");
        assert_eq!(entries[1].kind, PathKind::File);
    }

    #[test]
    fn test_index_paths_respects_gitignore() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        std::process::Command::new("git")
            .args(["init", "-q"])
            .current_dir(temp_dir.path())
            .output()
            .expect("test expectation should hold");
        fs::write(temp_dir.path().join(".gitignore"), "ignored.txt\n")
            .expect("test expectation should hold");
        fs::write(temp_dir.path().join("kept.txt"), "").expect("test expectation should hold");
        fs::write(temp_dir.path().join("ignored.txt"), "").expect("test expectation should hold");

        // Act
        let entries = index_paths(temp_dir.path());

        // Assert
        let paths: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
        assert!(paths.contains(&"kept.txt"));
        assert!(!paths.contains(&"ignored.txt"));
    }

    #[test]
    fn test_index_paths_respects_max_entries() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        for index in 0..MAX_ENTRIES + 50 {
            fs::write(temp_dir.path().join(format!("file_{index:04}.txt")), "")
                .expect("test expectation should hold");
        }

        // Act
        let entries = index_paths(temp_dir.path());

        // Assert
        assert_eq!(entries.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_index_paths_respects_max_depth() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        let mut deep_path = temp_dir.path().to_path_buf();
        for level in 0..MAX_DEPTH + 2 {
            deep_path = deep_path.join(format!("d{level}"));
        }
        fs::create_dir_all(&deep_path).expect("test expectation should hold");
        fs::write(deep_path.join("deep.txt"), "").expect("test expectation should hold");
        fs::write(temp_dir.path().join("shallow.txt"), "").expect("test expectation should hold");

        // Act
        let entries = index_paths(temp_dir.path());

        // Assert
        let paths: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
        assert!(paths.contains(&"shallow.txt"));
        assert!(!paths.iter().any(|path| path.contains("deep.txt")));
    }
}
