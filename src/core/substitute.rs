//! Replaces each directive with the current text of the module it names.

use crate::core::extractor::ReferenceExtractor;
use crate::core::registry::ModuleRegistry;
use crate::domain::model::{BundledModule, ModuleId};
use std::collections::HashMap;

/// Substitutes modules in `order`, which must place every dependency before its dependents.
///
/// Working texts start as copies of the registry's texts; the registry itself is untouched.
/// The result follows `order`.
pub fn substitute(
    registry: &ModuleRegistry,
    order: &[ModuleId],
    extractor: &ReferenceExtractor,
) -> Vec<BundledModule> {
    let mut current: HashMap<&ModuleId, String> = registry
        .iter()
        .map(|module| (&module.id, module.text.clone()))
        .collect();
    let mut bundled = Vec::with_capacity(order.len());

    for id in order {
        let Some(module) = registry.get(id) else {
            continue;
        };

        let text = extractor
            .replace_all(&module.text, registry, |target| {
                if target == id {
                    return None;
                }
                current.get(target).cloned()
            })
            .into_owned();

        let changed = text != module.text;
        if changed {
            tracing::debug!("Substituted directives in {}", id);
        }
        current.insert(&module.id, text.clone());
        bundled.push(BundledModule {
            id: module.id.clone(),
            relative_path: module.relative_path.clone(),
            text,
            changed,
        });
    }

    bundled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::DependencyGraph;
    use crate::core::order::topological_order;
    use crate::core::registry::tests::registry;

    fn bundle(entries: &[(&str, &str)]) -> Vec<BundledModule> {
        let reg = registry(entries);
        let extractor = ReferenceExtractor::new();
        let graph = DependencyGraph::build(&reg, &extractor).unwrap();
        let order = topological_order(&graph).unwrap();
        substitute(&reg, &order, &extractor)
    }

    fn text_of<'a>(bundled: &'a [BundledModule], id: &str) -> &'a str {
        &bundled.iter().find(|m| m.id.as_str() == id).unwrap().text
    }

    #[test]
    fn test_simple_substitution() {
        let out = bundle(&[("A", "require ‘B’"), ("B", "hello")]);
        assert_eq!(text_of(&out, "A"), "hello");
        assert_eq!(text_of(&out, "B"), "hello");
        assert!(out.iter().find(|m| m.id.as_str() == "A").unwrap().changed);
        assert!(!out.iter().find(|m| m.id.as_str() == "B").unwrap().changed);
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let out = bundle(&[("A", "[require ‘B’|require ‘B’]"), ("B", "x")]);
        assert_eq!(text_of(&out, "A"), "[x|x]");
    }

    #[test]
    fn test_transitive_text_is_already_substituted() {
        let out = bundle(&[
            ("top", "top(require ‘mid’)"),
            ("mid", "mid(require ‘dir/leaf’)"),
            ("dir/leaf", "leaf"),
        ]);
        assert_eq!(text_of(&out, "top"), "top(mid(leaf))");
    }

    #[test]
    fn test_replacement_text_is_literal() {
        let out = bundle(&[("a", "require ‘b’"), ("b", "$1 \\n ${x}")]);
        assert_eq!(text_of(&out, "a"), "$1 \\n ${x}");
    }

    #[test]
    fn test_rerun_on_substituted_output_is_noop() {
        let first = bundle(&[("a", "<require ‘b’>"), ("b", "body")]);
        let second_input: Vec<(String, String)> = first
            .iter()
            .map(|m| (m.id.to_string(), m.text.clone()))
            .collect();
        let borrowed: Vec<(&str, &str)> = second_input
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
            .collect();

        let second = bundle(&borrowed);
        assert!(second.iter().all(|m| !m.changed));
        assert_eq!(text_of(&second, "a"), "<body>");
    }
}
