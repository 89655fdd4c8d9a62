use crate::domain::model::{ModuleId, UnresolvedReference};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Discovery failed for {}: {reason}", .path.display())]
    Discovery { path: PathBuf, reason: String },

    #[error(
        "Duplicate module identifier '{identifier}': {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateIdentifier {
        identifier: ModuleId,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Incorrect dependencies\n{}", render_unresolved(.0))]
    UnresolvedReference(Vec<UnresolvedReference>),

    #[error("There are loops in files:\n{}", render_modules(.0))]
    CyclicReference(Vec<ModuleId>),

    #[error("Ordering stopped with modules left over:\n{}", render_modules(.0))]
    OrderingInternal(Vec<ModuleId>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

pub type Result<T> = std::result::Result<T, BundleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Discovery,
    Reference,
    Internal,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BundleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BundleError::Discovery { .. }
            | BundleError::DuplicateIdentifier { .. }
            | BundleError::Walk(_) => ErrorCategory::Discovery,
            BundleError::UnresolvedReference(_) | BundleError::CyclicReference(_) => {
                ErrorCategory::Reference
            }
            BundleError::OrderingInternal(_) | BundleError::Serialization(_) => {
                ErrorCategory::Internal
            }
            BundleError::Io(_) => ErrorCategory::Io,
            BundleError::ConfigValidation { .. }
            | BundleError::InvalidConfigValue { .. }
            | BundleError::MissingConfig { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Internal => ErrorSeverity::Critical,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Discovery | ErrorCategory::Reference | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BundleError::Discovery { .. } | BundleError::Walk(_) => {
                "Check that the root path exists, is a directory and contains UTF-8 text files"
            }
            BundleError::DuplicateIdentifier { .. } => {
                "Rename one of the files so their paths differ without the extension"
            }
            BundleError::UnresolvedReference(_) => {
                "Fix the listed require directives so each names an existing file"
            }
            BundleError::CyclicReference(_) => {
                "Break the loop by removing one require directive between the listed files"
            }
            BundleError::OrderingInternal(_) => {
                "This is a bug in the bundler; please report it with the input tree"
            }
            BundleError::Io(_) => "Check file permissions and free disk space, then retry",
            BundleError::Serialization(_) => "Retry without --json",
            BundleError::ConfigValidation { .. }
            | BundleError::InvalidConfigValue { .. }
            | BundleError::MissingConfig { .. } => {
                "Review the configuration file or command line arguments"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BundleError::UnresolvedReference(items) => {
                let modules: std::collections::BTreeSet<&ModuleId> =
                    items.iter().map(|item| &item.module).collect();
                format!(
                    "{} unresolved require directive(s) in {} file(s)\n{}",
                    items.len(),
                    modules.len(),
                    self
                )
            }
            BundleError::CyclicReference(modules) => {
                format!("{} file(s) require each other in a loop\n{}", modules.len(), self)
            }
            _ => self.to_string(),
        }
    }
}

/// Groups occurrences by module, keeping the order in which they were found.
fn render_unresolved(items: &[UnresolvedReference]) -> String {
    let mut out = String::new();
    let mut current: Option<&ModuleId> = None;
    for item in items {
        if current != Some(&item.module) {
            out.push_str(&format!(
                "File {} have dependency with nonexistent files:\n",
                item.module
            ));
            current = Some(&item.module);
        }
        out.push_str(&item.directive);
        out.push('\n');
    }
    out
}

fn render_modules(modules: &[ModuleId]) -> String {
    modules.iter().map(|m| format!("{}\n", m)).collect()
}
