pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FsWalker, LocalStorage};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::bundle::BundleEngine;
pub use domain::model::{BuildReport, ModuleId};
pub use utils::error::{BundleError, Result};
