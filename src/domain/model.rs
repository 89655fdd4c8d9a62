use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Canonical identifier of a module: root-relative path without extension, `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A file as yielded by the directory walker.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// One discovered file. Its text is the content at discovery time and never changes.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub text: String,
}

impl Module {
    /// File name including extension; the registry sorts on this.
    pub fn base_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// A directive occurrence, either matched to a known module or kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Resolved(ModuleId),
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub module: ModuleId,
    pub directive: String,
}

impl UnresolvedReference {
    pub fn new(module: ModuleId, directive: impl Into<String>) -> Self {
        Self {
            module,
            directive: directive.into(),
        }
    }
}

/// Final text of one module after substitution.
#[derive(Debug, Clone, Serialize)]
pub struct BundledModule {
    pub id: ModuleId,
    pub relative_path: PathBuf,
    #[serde(skip)]
    pub text: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteFailure {
    pub id: ModuleId,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one run, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub root: PathBuf,
    pub order: Vec<ModuleId>,
    pub modules: Vec<BundledModule>,
    pub written: usize,
    pub write_failures: Vec<WriteFailure>,
    pub dry_run: bool,
}

impl BuildReport {
    pub fn changed_count(&self) -> usize {
        self.modules.iter().filter(|m| m.changed).count()
    }

    pub fn module(&self, id: &str) -> Option<&BundledModule> {
        self.modules.iter().find(|m| m.id.as_str() == id)
    }
}
