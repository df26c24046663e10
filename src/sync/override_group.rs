//! Choice + free-text pairs where one control overrides the other
//!
//! Two trigger shapes exist. A separate checkbox hands authority to the text
//! (Prime95 mode), or the choice itself has a "Custom" entry that does
//! (Prime95 FFT size, core test order). Authority is always derived from the
//! current field values, so it cannot drift from what the user sees.

use tracing::{debug, info};

use super::{ChoiceMap, Section};
use crate::field::{Field, FieldId, FieldRegistry, Subscription};

/// Which control currently decides the stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Choice,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideShape {
    /// A separate checkbox switches to the text
    Checkbox(FieldId),
    /// Selecting `custom_index` switches to the text
    InBand { custom_index: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct OverrideGroup {
    pub choice: FieldId,
    pub text: FieldId,
    pub key: &'static str,
    pub choices: ChoiceMap,
    pub default: &'static str,
    pub shape: OverrideShape,
    /// Written while the text is authoritative but empty
    pub fallback: &'static str,
}

/// Resolved fields of one group
#[derive(Debug, Clone)]
pub struct OverrideFields {
    pub choice: Field<usize>,
    pub text: Field<String>,
    pub checkbox: Option<Field<bool>>,
}

/// A group bound to its fields
#[derive(Debug, Clone)]
pub struct OverrideHandle {
    group: OverrideGroup,
    fields: OverrideFields,
}

impl OverrideHandle {
    pub fn authority(&self) -> Authority {
        let text_rules = match (self.group.shape, &self.fields.checkbox) {
            (OverrideShape::Checkbox(_), Some(checkbox)) => checkbox.get(),
            (OverrideShape::Checkbox(_), None) => false,
            (OverrideShape::InBand { custom_index }, _) => self.fields.choice.get() == custom_index,
        };
        if text_rules { Authority::Text } else { Authority::Choice }
    }

    /// Trimmed text, or the fallback token when empty
    fn text_value(&self) -> String {
        let text = self.fields.text.get();
        match text.trim() {
            "" => self.group.fallback.to_string(),
            trimmed => trimmed.to_string(),
        }
    }

    fn choice_value(&self) -> &'static str {
        let index = self.fields.choice.get();
        self.group
            .choices
            .canonical(index)
            .or_else(|| self.group.choices.canonical(0))
            .unwrap_or(self.group.default)
    }

    /// Value the store should hold for the current field state
    pub fn value(&self) -> String {
        match self.authority() {
            Authority::Text => self.text_value(),
            Authority::Choice => self.choice_value().to_string(),
        }
    }

    fn load(&self, section: &Section) {
        let stored = section.get(self.group.key, self.group.default);
        let stored = stored.trim();
        let OverrideFields { choice, text, checkbox } = &self.fields;

        match self.group.shape {
            OverrideShape::Checkbox(_) => {
                let (index, overridden, custom) = if stored == self.group.fallback {
                    (0, true, "")
                } else if let Some(index) = self.group.choices.index_of(stored) {
                    (index, false, "")
                } else {
                    info!(section = section.name(), key = self.group.key, value = stored, "Unknown stored value, treating it as custom text");
                    (0, true, stored)
                };
                choice.seed(index);
                text.seed(custom.to_string());
                if let Some(checkbox) = checkbox {
                    checkbox.seed(overridden);
                }
            }
            OverrideShape::InBand { custom_index } => match self.group.choices.index_of(stored) {
                Some(index) if index != custom_index => {
                    choice.seed(index);
                    text.seed(String::new());
                }
                _ if stored == self.group.fallback => {
                    choice.seed(custom_index);
                    text.seed(String::new());
                }
                _ => {
                    choice.seed(custom_index);
                    text.seed(stored.to_string());
                }
            },
        }
    }
}

impl OverrideGroup {
    /// Resolve the group's fields; `None` when any of them is missing
    pub fn resolve(&self, registry: &FieldRegistry) -> Option<OverrideHandle> {
        let choice = registry.lookup::<usize>(self.choice).bound()?;
        let text = registry.lookup::<String>(self.text).bound()?;
        let checkbox = match self.shape {
            OverrideShape::Checkbox(id) => Some(registry.lookup::<bool>(id).bound()?),
            OverrideShape::InBand { .. } => None,
        };
        Some(OverrideHandle {
            group: *self,
            fields: OverrideFields { choice, text, checkbox },
        })
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(handle) = self.resolve(registry) else {
            return Vec::new();
        };
        handle.load(section);

        let mut subs = Vec::with_capacity(3);

        subs.push({
            let handle = handle.clone();
            let section = section.clone();
            handle.fields.choice.clone().subscribe(move |_: &usize| {
                match (handle.group.shape, handle.authority()) {
                    (OverrideShape::Checkbox(_), Authority::Text) => {
                        debug!(key = handle.group.key, "Override active, choice change not saved");
                    }
                    (OverrideShape::Checkbox(_), Authority::Choice) => {
                        section.write(handle.group.key, handle.choice_value());
                    }
                    (OverrideShape::InBand { .. }, Authority::Text) => {
                        section.write(handle.group.key, &handle.text_value());
                    }
                    (OverrideShape::InBand { .. }, Authority::Choice) => {
                        section.write(handle.group.key, handle.choice_value());
                        handle.fields.text.set(String::new());
                    }
                }
            })
        });

        subs.push({
            let handle = handle.clone();
            let section = section.clone();
            handle.fields.text.clone().subscribe(move |_: &String| {
                if handle.authority() == Authority::Text {
                    section.write(handle.group.key, &handle.text_value());
                } else {
                    debug!(key = handle.group.key, "Choice is authoritative, text change not saved");
                }
            })
        });

        if let Some(checkbox) = handle.fields.checkbox.clone() {
            let handle = handle.clone();
            let section = section.clone();
            subs.push(checkbox.subscribe(move |checked: &bool| {
                if *checked {
                    section.write(handle.group.key, &handle.text_value());
                } else {
                    // Authority is already back on the choice, so clearing the text writes nothing
                    handle.fields.text.set(String::new());
                    section.write(handle.group.key, handle.choice_value());
                }
            }));
        }

        subs
    }
}
