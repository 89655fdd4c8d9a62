use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes files below a base directory. With the bundle root as base this overwrites in place.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .write_file(Path::new("nested/deeper/out.txt"), b"bundled")
            .unwrap();

        let written = fs::read_to_string(dir.path().join("nested/deeper/out.txt")).unwrap();
        assert_eq!(written, "bundled");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "old").unwrap();

        LocalStorage::new(dir.path())
            .write_file(Path::new("a.txt"), b"new")
            .unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
    }
}
