pub mod bundle;
pub mod cycles;
pub mod extractor;
pub mod graph;
pub mod order;
pub mod registry;
pub mod substitute;

pub use crate::domain::model::{BuildReport, BundledModule, Module, ModuleId, Reference};
pub use crate::domain::ports::{ConfigProvider, SourceWalker, Storage};
pub use crate::utils::error::Result;
