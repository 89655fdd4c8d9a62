//! Dependency graph: an edge A -> B means A's text requires B.

use crate::core::extractor::ReferenceExtractor;
use crate::core::registry::ModuleRegistry;
use crate::domain::model::{ModuleId, Reference, UnresolvedReference};
use crate::utils::error::{BundleError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Canonical graph, immutable once built. Traversals work on [`GraphSnapshot`]s.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<ModuleId>,
    outgoing: HashMap<ModuleId, BTreeSet<ModuleId>>,
}

impl DependencyGraph {
    /// Builds the graph, failing with every unresolved directive of every module at once.
    pub fn build(registry: &ModuleRegistry, extractor: &ReferenceExtractor) -> Result<Self> {
        let mut outgoing = HashMap::with_capacity(registry.len());
        let mut unresolved = Vec::new();

        for module in registry.iter() {
            let mut targets = BTreeSet::new();
            for reference in extractor.extract(&module.text, registry) {
                match reference {
                    Reference::Resolved(target) => {
                        targets.insert(target);
                    }
                    Reference::Unresolved(raw) => {
                        unresolved.push(UnresolvedReference::new(module.id.clone(), raw));
                    }
                }
            }
            outgoing.insert(module.id.clone(), targets);
        }

        if !unresolved.is_empty() {
            tracing::debug!("Found {} unresolved directives", unresolved.len());
            return Err(BundleError::UnresolvedReference(unresolved));
        }

        let graph = Self {
            nodes: registry.ids().cloned().collect(),
            outgoing,
        };
        tracing::debug!(
            "Dependency graph has {} nodes and {} edges",
            graph.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn nodes(&self) -> &[ModuleId] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn dependencies(&self, id: &ModuleId) -> Option<&BTreeSet<ModuleId>> {
        self.outgoing.get(id)
    }

    pub fn has_edge(&self, from: &ModuleId, to: &ModuleId) -> bool {
        self.outgoing
            .get(from)
            .map(|targets| targets.contains(to))
            .unwrap_or(false)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&ModuleId, &ModuleId)> {
        self.nodes.iter().flat_map(move |from| {
            self.outgoing
                .get(from)
                .into_iter()
                .flatten()
                .map(move |to| (from, to))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(BTreeSet::len).sum()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A disposable copy for destructive traversal.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut incoming: HashMap<ModuleId, HashSet<ModuleId>> = self
            .nodes
            .iter()
            .map(|id| (id.clone(), HashSet::new()))
            .collect();
        for (from, to) in self.edges() {
            if let Some(sources) = incoming.get_mut(to) {
                sources.insert(from.clone());
            }
        }

        GraphSnapshot {
            nodes: self.nodes.clone(),
            outgoing: self
                .outgoing
                .iter()
                .map(|(id, targets)| (id.clone(), targets.iter().cloned().collect()))
                .collect(),
            incoming,
        }
    }

    /// Rows and columns in registry order, `1` where the row module requires the column module.
    pub fn render_matrix(&self) -> String {
        let mut out = String::new();
        for from in &self.nodes {
            let row: Vec<&str> = self
                .nodes
                .iter()
                .map(|to| if self.has_edge(from, to) { "1" } else { "0" })
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        out
    }
}

/// Working copy of a [`DependencyGraph`]. Node order stays the registry order.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    nodes: Vec<ModuleId>,
    outgoing: HashMap<ModuleId, HashSet<ModuleId>>,
    incoming: HashMap<ModuleId, HashSet<ModuleId>>,
}

impl GraphSnapshot {
    fn is_leaf(&self, id: &ModuleId) -> bool {
        self.outgoing.get(id).map_or(true, HashSet::is_empty)
    }

    fn is_root(&self, id: &ModuleId) -> bool {
        self.incoming.get(id).map_or(true, HashSet::is_empty)
    }

    /// Nodes with no outgoing edges.
    pub fn leaves(&self) -> Vec<ModuleId> {
        self.nodes
            .iter()
            .filter(|id| self.is_leaf(id))
            .cloned()
            .collect()
    }

    /// Nodes with no outgoing edges or no incoming edges.
    pub fn leaves_and_roots(&self) -> Vec<ModuleId> {
        self.nodes
            .iter()
            .filter(|id| self.is_leaf(id) || self.is_root(id))
            .cloned()
            .collect()
    }

    /// Deletes `id` and every edge touching it.
    pub fn remove_node(&mut self, id: &ModuleId) {
        self.nodes.retain(|node| node != id);
        if let Some(targets) = self.outgoing.remove(id) {
            for target in targets {
                if let Some(sources) = self.incoming.get_mut(&target) {
                    sources.remove(id);
                }
            }
        }
        if let Some(sources) = self.incoming.remove(id) {
            for source in sources {
                if let Some(targets) = self.outgoing.get_mut(&source) {
                    targets.remove(id);
                }
            }
        }
    }

    /// Whether `to` can be reached from `from` by following at least one edge.
    pub fn reaches(&self, from: &ModuleId, to: &ModuleId) -> bool {
        let mut stack: Vec<&ModuleId> = self
            .outgoing
            .get(from)
            .map(|targets| targets.iter().collect())
            .unwrap_or_default();
        let mut visited: HashSet<&ModuleId> = HashSet::new();

        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if !visited.insert(node) {
                continue;
            }
            if let Some(targets) = self.outgoing.get(node) {
                stack.extend(targets.iter());
            }
        }
        false
    }

    pub fn nodes(&self) -> &[ModuleId] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.outgoing.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
