//! The set of discovered modules and the identifier lookup over them.

use crate::adapters::walker::canonical_identifier;
use crate::domain::model::{Module, ModuleId, SourceFile};
use crate::domain::ports::SourceWalker;
use crate::utils::error::{BundleError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Immutable module set, kept sorted by file base name (ties broken by identifier).
///
/// That order is the one every graph traversal and diagnostic listing follows.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
    index: HashMap<ModuleId, usize>,
}

impl ModuleRegistry {
    /// Walks `root` and registers every regular file found below it.
    pub fn load<W: SourceWalker>(root: &Path, walker: &W) -> Result<Self> {
        if !root.is_dir() {
            return Err(BundleError::Discovery {
                path: root.to_path_buf(),
                reason: "Incorrect path: not a directory".to_string(),
            });
        }

        let files = walker.walk(root)?;
        tracing::debug!("Walker yielded {} files under {}", files.len(), root.display());
        Self::from_sources(root, files)
    }

    pub fn from_sources(root: &Path, files: Vec<SourceFile>) -> Result<Self> {
        let mut modules = Vec::with_capacity(files.len());
        for file in files {
            let id = canonical_identifier(&file.path, root)?;
            let relative_path = file
                .path
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| file.path.clone());
            modules.push(Module {
                id,
                path: file.path,
                relative_path,
                text: file.text,
            });
        }
        Self::from_modules(modules)
    }

    pub fn from_modules(mut modules: Vec<Module>) -> Result<Self> {
        modules.sort_by(|a, b| {
            a.base_name()
                .cmp(b.base_name())
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut index = HashMap::with_capacity(modules.len());
        for (position, module) in modules.iter().enumerate() {
            if let Some(previous) = index.insert(module.id.clone(), position) {
                return Err(BundleError::DuplicateIdentifier {
                    identifier: module.id.clone(),
                    first: modules[previous].path.clone(),
                    second: module.path.clone(),
                });
            }
        }

        Ok(Self { modules, index })
    }

    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.index.get(id).map(|&position| &self.modules[position])
    }

    /// Exact lookup by identifier text.
    pub fn resolve(&self, payload: &str) -> Option<&ModuleId> {
        self.index
            .get_key_value(&ModuleId::from(payload))
            .map(|(id, _)| id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.index.contains_key(id)
    }

    /// Modules in stable (base name) order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.iter().map(|m| &m.id)
    }

    /// Position in the stable order, used to sort batches of identifiers.
    pub fn position(&self, id: &ModuleId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
