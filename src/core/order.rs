//! Topological order: dependencies before the modules that require them.

use crate::core::graph::DependencyGraph;
use crate::domain::model::ModuleId;
use crate::utils::error::{BundleError, Result};

/// Peels leaves off a snapshot in batches, each batch in registry order.
///
/// For every edge A -> B, B comes before A. A non-empty remainder means a cycle slipped
/// past the cycle gate and is reported as an internal error.
pub fn topological_order(graph: &DependencyGraph) -> Result<Vec<ModuleId>> {
    let mut snapshot = graph.snapshot();
    let mut order = Vec::with_capacity(graph.len());

    loop {
        let leaves = snapshot.leaves();
        if leaves.is_empty() {
            break;
        }
        for id in &leaves {
            snapshot.remove_node(id);
        }
        tracing::trace!("Ordering batch: {:?}", leaves);
        order.extend(leaves);
    }

    if !snapshot.is_empty() {
        return Err(BundleError::OrderingInternal(snapshot.nodes().to_vec()));
    }
    Ok(order)
}
