//! Groups of checkboxes ↔ one comma-separated list
//!
//! Two sets may share a key. Each loads its state from the shared value, but only
//! the set whose gate is active writes it.

use std::collections::BTreeSet;
use tracing::{debug, info};

use super::Section;
use crate::constants::tokens;
use crate::field::{Field, FieldId, FieldRegistry, Subscription};

/// Decides whether a test set currently owns its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// Active while `selector` shows `active`
    When { selector: FieldId, active: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct TestSetBinding {
    pub key: &'static str,
    /// Canonical order of the tests, each with its checkbox
    pub tests: &'static [(&'static str, FieldId)],
    pub default: &'static str,
    pub gate: Gate,
    /// Written when nothing is selected
    pub empty_fallback: &'static str,
}

/// Names present in a stored list, trimmed, case preserved
pub fn parse_list(raw: &str) -> BTreeSet<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

impl TestSetBinding {
    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let selector = match self.gate {
            Gate::Always => None,
            Gate::When { selector, active } => match registry.lookup::<usize>(selector).bound() {
                Some(field) => Some((field, active)),
                None => return Vec::new(),
            },
        };
        let toggles: Vec<(&'static str, Field<bool>)> = self
            .tests
            .iter()
            .filter_map(|(name, id)| registry.lookup::<bool>(*id).bound().map(|f| (*name, f)))
            .collect();
        if toggles.is_empty() {
            return Vec::new();
        }

        let stored = section.get(self.key, self.default);
        let present = parse_list(&stored);
        for (name, toggle) in &toggles {
            toggle.seed(present.contains(name));
        }

        toggles
            .iter()
            .map(|(name, toggle)| {
                let binding = *self;
                let section = section.clone();
                let selector = selector.clone();
                let toggles = toggles.clone();
                let name = *name;
                toggle.subscribe(move |_: &bool| {
                    if let Some((selector, active)) = &selector {
                        if selector.get() != *active {
                            info!(key = binding.key, test = name, "Test set inactive, change not saved");
                            return;
                        }
                    }
                    let selected: Vec<&str> = toggles
                        .iter()
                        .filter(|(_, toggle)| toggle.get())
                        .map(|(name, _)| *name)
                        .collect();
                    let value = if selected.is_empty() {
                        binding.empty_fallback.to_string()
                    } else {
                        selected.join(tokens::LIST_SEPARATOR)
                    };
                    debug!(key = binding.key, value = %value, "Rebuilt test list");
                    section.write(binding.key, &value);
                })
            })
            .collect()
    }
}
