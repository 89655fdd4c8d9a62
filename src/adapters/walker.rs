use crate::domain::model::{ModuleId, SourceFile};
use crate::domain::ports::SourceWalker;
use crate::utils::error::{BundleError, Result};
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Recursive walker over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWalker;

impl FsWalker {
    pub fn new() -> Self {
        Self
    }
}

impl SourceWalker for FsWalker {
    fn walk(&self, root: &Path) -> Result<Vec<SourceFile>> {
        if !root.is_dir() {
            return Err(BundleError::Discovery {
                path: root.to_path_buf(),
                reason: "Incorrect path: not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_broken_link(&e) => {
                    if let Some(path) = e.path() {
                        tracing::warn!("Skipping broken link {}", path.display());
                    }
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let bytes = std::fs::read(path)?;
            let text = String::from_utf8(bytes).map_err(|e| BundleError::Discovery {
                path: path.to_path_buf(),
                reason: format!("file is not valid UTF-8: {}", e),
            })?;
            tracing::trace!("Discovered {}", path.display());
            files.push(SourceFile {
                path: path.to_path_buf(),
                text,
            });
        }
        Ok(files)
    }
}

/// True for a link whose target is missing. Loops and permission errors still fail the walk.
fn is_broken_link(error: &walkdir::Error) -> bool {
    error.path().is_some()
        && error.loop_ancestor().is_none()
        && error
            .io_error()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// Maps a file under `root` to its canonical identifier.
///
/// The last extension of the file name is dropped (`a.tar.gz` becomes `a.tar`) and
/// directory segments are joined with `/` regardless of platform.
pub fn canonical_identifier(path: &Path, root: &Path) -> Result<ModuleId> {
    let relative = path.strip_prefix(root).map_err(|_| BundleError::Discovery {
        path: path.to_path_buf(),
        reason: format!("file is not under root {}", root.display()),
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(BundleError::Discovery {
                    path: path.to_path_buf(),
                    reason: "file path escapes the root directory".to_string(),
                })
            }
        }
    }

    let file_stem = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| BundleError::Discovery {
            path: path.to_path_buf(),
            reason: "path has no file name".to_string(),
        })?;

    match segments.last_mut() {
        Some(last) => *last = file_stem,
        None => {
            return Err(BundleError::Discovery {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
            })
        }
    }

    Ok(ModuleId::new(segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_identifier_strips_extension_and_joins_segments() {
        let root = PathBuf::from("/project/src");
        let path = root.join("lib").join("util.txt");
        assert_eq!(canonical_identifier(&path, &root).unwrap().as_str(), "lib/util");
    }

    #[test]
    fn test_identifier_keeps_inner_dots() {
        let root = PathBuf::from("/r");
        assert_eq!(
            canonical_identifier(&root.join("a.tar.gz"), &root).unwrap().as_str(),
            "a.tar"
        );
        assert_eq!(
            canonical_identifier(&root.join("Makefile"), &root).unwrap().as_str(),
            "Makefile"
        );
    }

    #[test]
    fn test_identifier_outside_root_fails() {
        let err = canonical_identifier(Path::new("/elsewhere/a.txt"), Path::new("/r")).unwrap_err();
        assert!(matches!(err, BundleError::Discovery { .. }));
    }

    #[test]
    fn test_walk_rejects_non_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let err = FsWalker::new().walk(&file).unwrap_err();
        assert!(matches!(err, BundleError::Discovery { .. }));
    }

    #[test]
    fn test_walk_collects_nested_files_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("top.txt"), "top").unwrap();
        std::fs::write(dir.path().join("a/b/deep.txt"), "deep").unwrap();

        let mut files = FsWalker::new().walk(dir.path()).unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].text, "deep");
        assert_eq!(files[1].text, "top");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_dangling_symlink() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "require ‘b’").unwrap();
        std::fs::write(dir.path().join("b.txt"), "hi").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();

        let mut files = FsWalker::new().walk(dir.path()).unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_still_fails_on_symlink_loop() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/back")).unwrap();

        let err = FsWalker::new().walk(dir.path()).unwrap_err();
        assert!(matches!(err, BundleError::Walk(_)));
    }
}
