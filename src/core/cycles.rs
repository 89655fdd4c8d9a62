//! Cycle gate: strips leaves and roots until nothing more can go.

use crate::core::graph::{DependencyGraph, GraphSnapshot};
use crate::domain::model::ModuleId;
use crate::utils::error::{BundleError, Result};

/// Repeatedly removes the whole leaf-and-root frontier from `snapshot`.
///
/// Returns the number of rounds taken. Every non-final round removes at least one node.
pub fn strip_leaves_and_roots(snapshot: &mut GraphSnapshot) -> usize {
    let mut rounds = 0;
    loop {
        let frontier = snapshot.leaves_and_roots();
        if frontier.is_empty() {
            return rounds;
        }
        for id in &frontier {
            snapshot.remove_node(id);
        }
        rounds += 1;
        tracing::trace!("Cycle check round {} removed {} nodes", rounds, frontier.len());
    }
}

/// Modules that lie on at least one cycle, in registry order. Empty for an acyclic graph.
///
/// Stripping can leave behind a node that only connects two separate cycles, so the
/// residual is narrowed to the nodes that can reach themselves.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<ModuleId> {
    let mut snapshot = graph.snapshot();
    strip_leaves_and_roots(&mut snapshot);

    snapshot
        .nodes()
        .iter()
        .filter(|id| snapshot.reaches(id, id))
        .cloned()
        .collect()
}

/// Fails with every module involved in a cycle.
pub fn ensure_acyclic(graph: &DependencyGraph) -> Result<()> {
    let cyclic = find_cycles(graph);
    if cyclic.is_empty() {
        Ok(())
    } else {
        tracing::debug!("{} modules are part of a cycle", cyclic.len());
        Err(BundleError::CyclicReference(cyclic))
    }
}
