// Adapters layer: filesystem implementations of the domain ports.

pub mod storage;
pub mod walker;

pub use storage::LocalStorage;
pub use walker::{canonical_identifier, FsWalker};
