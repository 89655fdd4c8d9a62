use crate::domain::model::SourceFile;
use crate::utils::error::Result;
use std::path::Path;

/// Yields every regular file under a root directory.
pub trait SourceWalker {
    fn walk(&self, root: &Path) -> Result<Vec<SourceFile>>;
}

/// Persistence for bundled output. Paths are relative to the storage's base.
pub trait Storage {
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn root(&self) -> &str;
    fn out_dir(&self) -> Option<&str>;
    fn dry_run(&self) -> bool;
    fn monitor(&self) -> bool;
}
