//! Checkbox ↔ boolean key

use super::Section;
use crate::config::parse_bool;
use crate::field::{FieldId, FieldRegistry, Subscription};

/// How a stored string is read back as a boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolStyle {
    /// Only `1` is true
    Numeric,
    /// configparser grammar (`yes`, `on`, `true`, `1`, ...)
    Lenient,
}

impl BoolStyle {
    pub fn decode(self, raw: Option<&str>, default: bool) -> bool {
        match (self, raw) {
            (_, None) => default,
            (BoolStyle::Numeric, Some(raw)) => raw.trim() == "1",
            (BoolStyle::Lenient, Some(raw)) => parse_bool(raw).unwrap_or(default),
        }
    }
}

pub fn encode_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

#[derive(Debug, Clone, Copy)]
pub struct ToggleBinding {
    pub field: FieldId,
    pub key: &'static str,
    pub style: BoolStyle,
    pub default: bool,
}

impl ToggleBinding {
    pub const fn numeric(field: FieldId, key: &'static str) -> Self {
        Self {
            field,
            key,
            style: BoolStyle::Numeric,
            default: false,
        }
    }

    pub const fn lenient(field: FieldId, key: &'static str) -> Self {
        Self {
            field,
            key,
            style: BoolStyle::Lenient,
            default: false,
        }
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(field) = registry.lookup::<bool>(self.field).bound() else {
            return Vec::new();
        };
        let stored = section.get_raw(self.key);
        field.seed(self.style.decode(stored.as_deref(), self.default));

        let key = self.key;
        let section = section.clone();
        vec![field.subscribe(move |checked: &bool| {
            section.write(key, encode_bool(*checked));
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::Harness;

    #[test]
    fn test_styles_decode_differently() {
        assert!(BoolStyle::Numeric.decode(Some("1"), false));
        assert!(!BoolStyle::Numeric.decode(Some("yes"), true));
        assert!(!BoolStyle::Numeric.decode(Some("True"), false));
        assert!(BoolStyle::Numeric.decode(None, true));

        assert!(BoolStyle::Lenient.decode(Some("Yes"), false));
        assert!(!BoolStyle::Lenient.decode(Some("off"), true));
        // Unparseable falls back like getboolean(fallback=...)
        assert!(BoolStyle::Lenient.decode(Some("maybe"), true));
    }

    #[test]
    fn test_toggle_writes_one_and_zero() {
        let h = Harness::new("[Aida64]\nuseavx = true\n");
        let mut registry = FieldRegistry::new();
        let id = FieldId::new("aida64.useavx");
        let field = registry.register(id, false);

        let _subs = ToggleBinding::lenient(id, "useavx").attach(&h.ctx.section("Aida64"), &registry);
        assert!(field.get());

        field.set(false);
        assert_eq!(h.stored("Aida64", "useavx").as_deref(), Some("0"));
        field.set(true);
        assert_eq!(h.stored("Aida64", "useavx").as_deref(), Some("1"));
    }
}
