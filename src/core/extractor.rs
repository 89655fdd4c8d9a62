//! Finds `require ‘<id>’` directives in module text.
//!
//! The delimiters are the typographic quotes U+2018 and U+2019. The payload is the
//! shortest non-empty run up to the next closing quote and never spans a line break.

use crate::core::registry::ModuleRegistry;
use crate::domain::model::{ModuleId, Reference};
use regex::{Captures, Regex};
use std::borrow::Cow;

pub const DIRECTIVE_KEYWORD: &str = "require";
pub const OPEN_QUOTE: char = '\u{2018}';
pub const CLOSE_QUOTE: char = '\u{2019}';

/// Directive text for a given identifier, as it appears in source.
pub fn directive_for(id: &ModuleId) -> String {
    format!("{} {}{}{}", DIRECTIVE_KEYWORD, OPEN_QUOTE, id, CLOSE_QUOTE)
}

#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    pattern: Regex,
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceExtractor {
    pub fn new() -> Self {
        let source = format!(
            "{} {}(.+?){}",
            DIRECTIVE_KEYWORD,
            regex::escape(&OPEN_QUOTE.to_string()),
            regex::escape(&CLOSE_QUOTE.to_string())
        );
        let pattern = Regex::new(&source).expect("directive pattern is valid");
        Self { pattern }
    }

    /// Every directive occurrence in `text`, in order, resolved against `registry`.
    pub fn extract(&self, text: &str, registry: &ModuleRegistry) -> Vec<Reference> {
        self.pattern
            .captures_iter(text)
            .map(|caps| self.classify(&caps, registry))
            .collect()
    }

    /// Resolved targets in first-occurrence order, without repeats.
    pub fn targets(&self, text: &str, registry: &ModuleRegistry) -> Vec<ModuleId> {
        let mut targets: Vec<ModuleId> = Vec::new();
        for reference in self.extract(text, registry) {
            if let Reference::Resolved(id) = reference {
                if !targets.contains(&id) {
                    targets.push(id);
                }
            }
        }
        targets
    }

    /// Replaces every resolved directive with the text `lookup` returns for its target.
    ///
    /// Uses the same matching rule as [`extract`](Self::extract), so the replacements
    /// line up one-to-one with the graph edges. Directives `lookup` declines are kept.
    pub fn replace_all<'t, F>(&self, text: &'t str, registry: &ModuleRegistry, lookup: F) -> Cow<'t, str>
    where
        F: Fn(&ModuleId) -> Option<String>,
    {
        self.pattern.replace_all(text, |caps: &Captures| {
            match self.classify(caps, registry) {
                Reference::Resolved(id) => lookup(&id).unwrap_or_else(|| caps[0].to_string()),
                Reference::Unresolved(raw) => raw,
            }
        })
    }

    fn classify(&self, caps: &Captures, registry: &ModuleRegistry) -> Reference {
        match registry.resolve(&caps[1]) {
            Some(id) => Reference::Resolved(id.clone()),
            None => Reference::Unresolved(caps[0].to_string()),
        }
    }
}
