//! Line edits ↔ string keys

use tracing::warn;

use super::{Notice, Section};
use crate::field::{FieldId, FieldRegistry, Subscription};

/// Free text written trimmed. An empty edit writes `empty_fallback` when set.
#[derive(Debug, Clone, Copy)]
pub struct TextBinding {
    pub field: FieldId,
    pub key: &'static str,
    pub default: &'static str,
    pub empty_fallback: Option<&'static str>,
}

impl TextBinding {
    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(field) = registry.lookup::<String>(self.field).bound() else {
            return Vec::new();
        };
        field.seed(section.get(self.key, self.default));

        let binding = *self;
        let section = section.clone();
        vec![field.subscribe(move |text: &String| {
            let value = match (text.trim(), binding.empty_fallback) {
                ("", Some(fallback)) => fallback,
                (trimmed, _) => trimmed,
            };
            section.write(binding.key, value);
        })]
    }
}

/// Free text that must hold an integer
#[derive(Debug, Clone, Copy)]
pub struct IntegerTextBinding {
    pub field: FieldId,
    pub key: &'static str,
    pub default: &'static str,
}

impl IntegerTextBinding {
    pub const fn new(field: FieldId, key: &'static str, default: &'static str) -> Self {
        Self { field, key, default }
    }

    /// Last good value: the stored one if it is an integer, else the default
    fn persisted(&self, section: &Section) -> String {
        section
            .get_raw(self.key)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| raw.parse::<i64>().is_ok())
            .unwrap_or_else(|| self.default.to_string())
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(field) = registry.lookup::<String>(self.field).bound() else {
            return Vec::new();
        };
        field.seed(section.get(self.key, self.default));

        let binding = *self;
        let section = section.clone();
        let handle = field.clone();
        vec![field.subscribe(move |text: &String| {
            let value = text.trim();
            if value.is_empty() {
                handle.seed(binding.default.to_string());
                section.write(binding.key, binding.default);
            } else if value.parse::<i64>().is_ok() {
                section.write(binding.key, value);
            } else {
                let restored = binding.persisted(&section);
                warn!(section = section.name(), key = binding.key, value, restored = %restored, "Rejected non-integer input");
                section.notify(Notice::InvalidInput {
                    section: section.name().to_string(),
                    key: binding.key.to_string(),
                    value: value.to_string(),
                    message: "must be an integer.".to_string(),
                });
                handle.seed(restored);
            }
        })]
    }
}

/// Checkbox enabling a free-text value; unchecked persists the empty string
#[derive(Debug, Clone, Copy)]
pub struct OptionalTextBinding {
    pub toggle: FieldId,
    pub field: FieldId,
    pub key: &'static str,
}

impl OptionalTextBinding {
    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let (Some(toggle), Some(text)) = (
            registry.lookup::<bool>(self.toggle).bound(),
            registry.lookup::<String>(self.field).bound(),
        ) else {
            return Vec::new();
        };
        let stored = section.get(self.key, "");
        toggle.seed(!stored.trim().is_empty());
        text.seed(stored);

        let key = self.key;
        let on_toggle = {
            let section = section.clone();
            let text = text.clone();
            toggle.subscribe(move |checked: &bool| {
                if !*checked {
                    section.write(key, "");
                    return;
                }
                let value = text.get();
                let value = value.trim();
                if !value.is_empty() {
                    section.write(key, value);
                }
            })
        };
        let on_text = {
            let section = section.clone();
            let toggle = toggle.clone();
            text.subscribe(move |value: &String| {
                if toggle.get() {
                    section.write(key, value.trim());
                }
            })
        };
        vec![on_toggle, on_text]
    }
}
