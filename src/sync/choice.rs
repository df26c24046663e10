//! Enumerated choice ↔ canonical string

use tracing::{info, warn};

use super::Section;
use crate::field::{FieldId, FieldRegistry, Subscription};

/// Ordered canonical strings of an enumeration; the position is the UI index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceMap {
    options: &'static [&'static str],
}

impl ChoiceMap {
    pub const fn new(options: &'static [&'static str]) -> Self {
        Self { options }
    }

    pub fn canonical(&self, index: usize) -> Option<&'static str> {
        self.options.get(index).copied()
    }

    /// Reverse lookup; surrounding whitespace in the stored value is ignored
    pub fn index_of(&self, value: &str) -> Option<usize> {
        let value = value.trim();
        self.options.iter().position(|option| *option == value)
    }
}

/// One combo box or radio group bound to one key
#[derive(Debug, Clone, Copy)]
pub struct ChoiceBinding {
    pub field: FieldId,
    pub key: &'static str,
    pub choices: ChoiceMap,
    pub default: &'static str,
}

impl ChoiceBinding {
    /// Index shown for `stored`; unknown values fall back to the first option
    pub fn load_index(&self, section: &Section) -> usize {
        let stored = section.get(self.key, self.default);
        self.choices.index_of(&stored).unwrap_or_else(|| {
            info!(
                section = section.name(),
                key = self.key,
                value = %stored,
                fallback = self.choices.canonical(0).unwrap_or_default(),
                "Unknown stored choice, showing first option"
            );
            0
        })
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(field) = registry.lookup::<usize>(self.field).bound() else {
            return Vec::new();
        };
        field.seed(self.load_index(section));

        let binding = *self;
        let section = section.clone();
        vec![field.subscribe(move |index: &usize| {
            match binding.choices.canonical(*index) {
                Some(value) => {
                    section.write(binding.key, value);
                }
                None => warn!(field = %binding.field, index, "Choice index out of range, not saved"),
            }
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::Harness;

    const MODES: ChoiceMap = ChoiceMap::new(&["Medium", "Slowest", "Slow", "Fast", "Fastest"]);
    const MODE: FieldId = FieldId::new("linpack.mode");

    fn binding() -> ChoiceBinding {
        ChoiceBinding {
            field: MODE,
            key: "mode",
            choices: MODES,
            default: "Medium",
        }
    }

    #[test]
    fn test_choice_map_lookup() {
        assert_eq!(MODES.index_of("Fast"), Some(3));
        assert_eq!(MODES.index_of(" Slow "), Some(2));
        assert_eq!(MODES.index_of("fast"), None);
        assert_eq!(MODES.canonical(4), Some("Fastest"));
        assert_eq!(MODES.canonical(5), None);
    }

    #[test]
    fn test_load_and_select_writes_canonical() {
        let h = Harness::new("[Linpack]\nmode = Slowest\n");
        let mut registry = FieldRegistry::new();
        let field = registry.register(MODE, 0_usize);

        let _subs = binding().attach(&h.ctx.section("Linpack"), &registry);
        assert_eq!(field.get(), 1);

        field.set(3);
        assert_eq!(h.stored("Linpack", "mode").as_deref(), Some("Fast"));
    }

    #[test]
    fn test_unknown_value_selects_first_without_write() {
        let h = Harness::new("[Linpack]\nmode = Quantum\n");
        let before = h.snapshot();
        let mut registry = FieldRegistry::new();
        let field = registry.register(MODE, 2_usize);

        let _subs = binding().attach(&h.ctx.section("Linpack"), &registry);

        assert_eq!(field.get(), 0);
        assert_eq!(h.snapshot(), before);

        // The next user selection overwrites the unknown value
        field.set(4);
        assert_eq!(h.stored("Linpack", "mode").as_deref(), Some("Fastest"));
    }

    #[test]
    fn test_missing_field_is_skipped() {
        let h = Harness::new("");
        let registry = FieldRegistry::new();
        assert!(binding().attach(&h.ctx.section("Linpack"), &registry).is_empty());
    }
}
