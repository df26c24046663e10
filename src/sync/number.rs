//! Spin boxes ↔ numeric keys
//!
//! Stored values outside the range are clamped for display only; the store keeps
//! them until the user edits the control.

use std::rc::Rc;
use tracing::{debug, info};

use super::Section;
use crate::constants::{HOURS_PER_DAY, tokens};
use crate::field::{Field, FieldId, FieldRegistry, Subscription};

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub const fn new((min, max): (i64, i64)) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

/// Textual encoding of the displayed number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntCodec {
    /// Plain decimal
    Plain,
    /// `auto` for zero, `<n>m` otherwise
    Minutes,
    /// Displayed in days, stored in hours
    DaysAsHours,
}

impl IntCodec {
    /// Displayed value for a stored string; anything unreadable yields `default`
    pub fn decode(self, raw: &str, default: i64) -> i64 {
        let raw = raw.trim();
        match self {
            IntCodec::Plain => raw.parse().unwrap_or(default),
            IntCodec::Minutes => {
                if raw.eq_ignore_ascii_case(tokens::AUTO) {
                    return 0;
                }
                let digits = raw
                    .strip_suffix(tokens::MINUTES_SUFFIX)
                    .or_else(|| raw.strip_suffix("M"))
                    .unwrap_or(raw);
                digits.trim().parse().unwrap_or(default)
            }
            IntCodec::DaysAsHours => raw
                .parse::<i64>()
                .map(|hours| hours.div_euclid(HOURS_PER_DAY))
                .unwrap_or(default),
        }
    }

    pub fn encode(self, value: i64) -> String {
        match self {
            IntCodec::Plain => value.to_string(),
            IntCodec::Minutes if value == 0 => tokens::AUTO.to_string(),
            IntCodec::Minutes => format!("{value}{}", tokens::MINUTES_SUFFIX),
            IntCodec::DaysAsHours => (value * HOURS_PER_DAY).to_string(),
        }
    }
}

/// Integer spin box bound to one key
#[derive(Debug, Clone, Copy)]
pub struct NumberBinding {
    pub field: FieldId,
    pub key: &'static str,
    /// Displayed value when the key is missing or unreadable
    pub default: i64,
    pub bounds: Bounds,
    pub codec: IntCodec,
}

impl NumberBinding {
    pub const fn plain(field: FieldId, key: &'static str, default: i64, bounds: (i64, i64)) -> Self {
        Self {
            field,
            key,
            default,
            bounds: Bounds::new(bounds),
            codec: IntCodec::Plain,
        }
    }

    pub fn load(&self, section: &Section) -> i64 {
        let decoded = section
            .get_raw(self.key)
            .map(|raw| self.codec.decode(&raw, self.default))
            .unwrap_or(self.default);
        let clamped = self.bounds.clamp(decoded);
        if clamped != decoded {
            info!(section = section.name(), key = self.key, stored = decoded, shown = clamped, "Stored value out of range, clamped for display");
        }
        clamped
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let Some(field) = registry.lookup::<i64>(self.field).bound() else {
            return Vec::new();
        };
        field.seed(self.load(section));

        let binding = *self;
        let section = section.clone();
        let handle = field.clone();
        vec![field.subscribe(move |value: &i64| {
            let clamped = binding.bounds.clamp(*value);
            if clamped != *value {
                // The clamped value comes back through this handler and is written then
                debug!(field = %binding.field, value, clamped, "Value out of range, clamping");
                handle.set(clamped);
                return;
            }
            section.write(binding.key, &binding.codec.encode(clamped));
        })]
    }
}

/// Checkbox that replaces a decimal value with a literal token
#[derive(Debug, Clone, Copy)]
pub struct Sentinel {
    pub toggle: FieldId,
    pub token: &'static str,
}

/// Double spin box bound to one key, optionally with a sentinel checkbox
#[derive(Debug, Clone, Copy)]
pub struct DecimalBinding {
    pub field: FieldId,
    pub key: &'static str,
    pub default: f64,
    pub bounds: (f64, f64),
    pub sentinel: Option<Sentinel>,
}

/// Whole numbers are written without a fractional part
pub fn format_decimal(value: f64) -> String {
    format!("{value}")
}

impl DecimalBinding {
    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.bounds.0, self.bounds.1)
    }

    pub fn attach(&self, section: &Section, registry: &FieldRegistry) -> Vec<Subscription> {
        let value = registry.lookup::<f64>(self.field).bound();
        let sentinel = self.sentinel.and_then(|sentinel| {
            registry
                .lookup::<bool>(sentinel.toggle)
                .bound()
                .map(|toggle| (sentinel.token, toggle))
        });
        if value.is_none() && sentinel.is_none() {
            return Vec::new();
        }

        let stored = section.get_raw(self.key);
        let stored = stored.as_deref().map(str::trim);
        let is_token = matches!((stored, self.sentinel), (Some(raw), Some(s)) if raw == s.token);

        if let Some(field) = &value {
            let parsed = match stored {
                Some(raw) if !is_token => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
                _ => None,
            };
            let shown = self.clamp(parsed.unwrap_or(self.default));
            if parsed.is_some_and(|v| v != shown) {
                info!(section = section.name(), key = self.key, shown, "Stored value out of range, clamped for display");
            }
            field.seed(shown);
        }
        if let Some((_, toggle)) = &sentinel {
            toggle.seed(is_token);
        }

        let persist: Rc<dyn Fn()> = Rc::new({
            let binding = *self;
            let section = section.clone();
            let value = value.clone();
            let sentinel = sentinel.clone();
            move || {
                let text = match (&sentinel, &value) {
                    (Some((token, toggle)), _) if toggle.get() => token.to_string(),
                    (_, Some(field)) => format_decimal(binding.clamp(field.get())),
                    (_, None) => format_decimal(binding.default),
                };
                section.write(binding.key, &text);
            }
        });

        let mut subs = Vec::new();
        if let Some(field) = value {
            subs.push(self.subscribe_value(&field, Rc::clone(&persist)));
        }
        if let Some((_, toggle)) = sentinel {
            let persist = Rc::clone(&persist);
            subs.push(toggle.subscribe(move |_: &bool| persist()));
        }
        subs
    }

    fn subscribe_value(&self, field: &Field<f64>, persist: Rc<dyn Fn()>) -> Subscription {
        let binding = *self;
        let handle = field.clone();
        field.subscribe(move |value: &f64| {
            let clamped = binding.clamp(*value);
            if clamped != *value {
                handle.set(clamped);
                return;
            }
            persist();
        })
    }
}
