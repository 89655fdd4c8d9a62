use crate::core::cycles::ensure_acyclic;
use crate::core::extractor::ReferenceExtractor;
use crate::core::graph::DependencyGraph;
use crate::core::order::topological_order;
use crate::core::registry::ModuleRegistry;
use crate::core::substitute::substitute;
use crate::domain::model::{BuildReport, WriteFailure};
use crate::domain::ports::{SourceWalker, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::path::Path;

/// Runs discovery, validation, ordering, substitution and persistence for one root.
///
/// Nothing is written unless every check passes and every module has been substituted.
pub struct BundleEngine<W: SourceWalker, S: Storage> {
    walker: W,
    storage: S,
    extractor: ReferenceExtractor,
    monitor: SystemMonitor,
    dry_run: bool,
}

impl<W: SourceWalker, S: Storage> BundleEngine<W, S> {
    pub fn new(walker: W, storage: S) -> Self {
        Self::new_with_monitoring(walker, storage, false)
    }

    pub fn new_with_monitoring(walker: W, storage: S, enable_monitoring: bool) -> Self {
        Self {
            walker,
            storage,
            extractor: ReferenceExtractor::new(),
            monitor: SystemMonitor::new(enable_monitoring),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Everything except persistence. The report has `written == 0`.
    pub fn plan(&self, root: &Path) -> Result<BuildReport> {
        tracing::info!("Getting files from {}", root.display());
        let registry = ModuleRegistry::load(root, &self.walker)?;
        tracing::info!("Discovered {} files", registry.len());
        self.monitor.log_stats("Discover");

        tracing::info!("Updating dependencies...");
        let graph = DependencyGraph::build(&registry, &self.extractor)?;
        tracing::debug!("Dependency matrix:\n{}", graph.render_matrix());
        self.monitor.log_stats("Dependencies");

        tracing::info!("Searching loops...");
        ensure_acyclic(&graph)?;
        self.monitor.log_stats("Loops");

        tracing::info!("Ordering files by dependency...");
        let order = topological_order(&graph)?;
        tracing::debug!("Processing order: {:?}", order);
        self.monitor.log_stats("Order");

        tracing::info!("Building files...");
        let modules = substitute(&registry, &order, &self.extractor);
        self.monitor.log_stats("Substitute");

        Ok(BuildReport {
            root: root.to_path_buf(),
            order,
            modules,
            written: 0,
            write_failures: Vec::new(),
            dry_run: self.dry_run,
        })
    }

    /// Plans and then writes every bundled module, unless in dry-run mode.
    ///
    /// Write failures are logged and recorded in the report; remaining writes continue.
    pub fn run(&self, root: &Path) -> Result<BuildReport> {
        let mut report = self.plan(root)?;

        if self.dry_run {
            tracing::info!("Dry run: {} files would be written", report.modules.len());
            self.monitor.log_final_stats();
            return Ok(report);
        }

        for module in &report.modules {
            match self
                .storage
                .write_file(&module.relative_path, module.text.as_bytes())
            {
                Ok(()) => report.written += 1,
                Err(e) => {
                    tracing::warn!("Failed to write {}: {}", module.relative_path.display(), e);
                    report.write_failures.push(WriteFailure {
                        id: module.id.clone(),
                        path: module.relative_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        self.monitor.log_stats("Write");

        tracing::info!(
            "Wrote {} of {} files ({} changed)",
            report.written,
            report.modules.len(),
            report.changed_count()
        );
        self.monitor.log_final_stats();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SourceFile;
    use crate::utils::error::BundleError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct MemoryWalker {
        files: Vec<(&'static str, &'static str)>,
    }

    impl SourceWalker for MemoryWalker {
        fn walk(&self, root: &Path) -> Result<Vec<SourceFile>> {
            Ok(self
                .files
                .iter()
                .map(|(path, text)| SourceFile {
                    path: root.join(path),
                    text: text.to_string(),
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
        fail_on: Option<&'static str>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(Path::new(path))
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for &MockStorage {
        fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            if self.fail_on.map(Path::new) == Some(path) {
                return Err(BundleError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.files.borrow_mut().insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    fn engine<'a>(
        files: Vec<(&'static str, &'static str)>,
        storage: &'a MockStorage,
    ) -> BundleEngine<MemoryWalker, &'a MockStorage> {
        BundleEngine::new(MemoryWalker { files }, storage)
    }

    fn root() -> tempfile::TempDir {
        tempfile::TempDir::new().unwrap()
    }

    #[test]
    fn test_run_writes_substituted_text() {
        let dir = root();
        let storage = MockStorage::default();
        let report = engine(vec![("A.txt", "require ‘B’"), ("B.txt", "hello")], &storage)
            .run(dir.path())
            .unwrap();

        assert_eq!(report.order.iter().map(|id| id.as_str()).collect::<Vec<_>>(), ["B", "A"]);
        assert_eq!(report.written, 2);
        assert_eq!(storage.get_file("A.txt").as_deref(), Some("hello"));
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let dir = root();
        let storage = MockStorage::default();
        let err = engine(
            vec![("a.txt", "require ‘b’"), ("b.txt", "require ‘a’"), ("c.txt", "fine")],
            &storage,
        )
        .run(dir.path())
        .unwrap_err();

        assert!(matches!(err, BundleError::CyclicReference(_)));
        assert!(storage.files.borrow().is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = root();
        let storage = MockStorage::default();
        let report = engine(vec![("a.txt", "require ‘b’"), ("b.txt", "x")], &storage)
            .with_dry_run(true)
            .run(dir.path())
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.written, 0);
        assert_eq!(report.module("a").unwrap().text, "x");
        assert!(storage.files.borrow().is_empty());
    }

    #[test]
    fn test_write_failure_does_not_stop_other_writes() {
        let dir = root();
        let storage = MockStorage {
            fail_on: Some("a.txt"),
            ..Default::default()
        };
        let report = engine(
            vec![("a.txt", "1"), ("b.txt", "2"), ("c.txt", "3")],
            &storage,
        )
        .run(dir.path())
        .unwrap();

        assert_eq!(report.written, 2);
        assert_eq!(report.write_failures.len(), 1);
        assert_eq!(report.write_failures[0].id.as_str(), "a");
        assert_eq!(storage.get_file("c.txt").as_deref(), Some("3"));
    }

    #[test]
    fn test_missing_root_is_discovery_error() {
        let storage = MockStorage::default();
        let err = engine(vec![], &storage)
            .run(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, BundleError::Discovery { .. }));
    }
}
