//! Explicit registry of the fields a deployment provides
//!
//! The UI layer registers one handle per control under a stable symbolic id.
//! Synchronizers resolve their fields once at construction; a control that the
//! deployment does not provide resolves to `Presence::Missing` and the binding
//! that needed it is skipped for the session.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

use super::Field;
use crate::config::parse_bool;

/// Stable identifier of a bound control, e.g. `prime95.mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(&'static str);

impl FieldId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Result of resolving a field id against the registry
#[derive(Debug, Clone)]
pub enum Presence<T> {
    Bound(T),
    /// The control does not exist in this deployment
    Missing,
}

impl<T> Presence<T> {
    pub fn bound(self) -> Option<T> {
        match self {
            Presence::Bound(value) => Some(value),
            Presence::Missing => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Presence::Bound(_))
    }
}

/// Type-erased field handle, one variant per control kind
#[derive(Debug, Clone)]
pub enum FieldHandle {
    /// Checkbox
    Toggle(Field<bool>),
    /// Combo box index or radio group position
    Choice(Field<usize>),
    /// Spin box
    Integer(Field<i64>),
    /// Double spin box
    Decimal(Field<f64>),
    /// Line edit
    Text(Field<String>),
}

#[derive(Debug, Error)]
pub enum FieldValueError {
    #[error("'{raw}' is not a valid {kind} value")]
    Invalid { kind: &'static str, raw: String },
}

impl FieldHandle {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldHandle::Toggle(_) => bool::KIND,
            FieldHandle::Choice(_) => usize::KIND,
            FieldHandle::Integer(_) => i64::KIND,
            FieldHandle::Decimal(_) => f64::KIND,
            FieldHandle::Text(_) => String::KIND,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldHandle::Toggle(f) => serde_json::Value::from(f.get()),
            FieldHandle::Choice(f) => serde_json::Value::from(f.get()),
            FieldHandle::Integer(f) => serde_json::Value::from(f.get()),
            FieldHandle::Decimal(f) => serde_json::Value::from(f.get()),
            FieldHandle::Text(f) => serde_json::Value::from(f.get()),
        }
    }

    /// Re-deliver the current value to the control's subscribers
    pub fn emit(&self) {
        match self {
            FieldHandle::Toggle(f) => f.emit(),
            FieldHandle::Choice(f) => f.emit(),
            FieldHandle::Integer(f) => f.emit(),
            FieldHandle::Decimal(f) => f.emit(),
            FieldHandle::Text(f) => f.emit(),
        }
    }

    /// Parse `raw` for this control kind and apply it as a user change
    pub fn set_from_str(&self, raw: &str) -> Result<(), FieldValueError> {
        let invalid = || FieldValueError::Invalid {
            kind: self.kind(),
            raw: raw.to_string(),
        };
        match self {
            FieldHandle::Toggle(f) => f.set(parse_bool(raw).ok_or_else(invalid)?),
            FieldHandle::Choice(f) => f.set(raw.trim().parse().map_err(|_| invalid())?),
            FieldHandle::Integer(f) => f.set(raw.trim().parse().map_err(|_| invalid())?),
            FieldHandle::Decimal(f) => {
                let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
                if !value.is_finite() {
                    return Err(invalid());
                }
                f.set(value)
            }
            FieldHandle::Text(f) => f.set(raw.to_string()),
        }
        Ok(())
    }
}

/// Value types a control can hold
pub trait FieldKind: Clone + PartialEq + 'static {
    const KIND: &'static str;

    fn wrap(field: Field<Self>) -> FieldHandle;

    fn unwrap(handle: &FieldHandle) -> Option<Field<Self>>;
}

macro_rules! field_kind {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FieldKind for $ty {
            const KIND: &'static str = $name;

            fn wrap(field: Field<Self>) -> FieldHandle {
                FieldHandle::$variant(field)
            }

            fn unwrap(handle: &FieldHandle) -> Option<Field<Self>> {
                match handle {
                    FieldHandle::$variant(field) => Some(field.clone()),
                    _ => None,
                }
            }
        }
    };
}

field_kind!(bool, Toggle, "toggle");
field_kind!(usize, Choice, "choice");
field_kind!(i64, Integer, "integer");
field_kind!(f64, Decimal, "decimal");
field_kind!(String, Text, "text");

/// Mapping from field ids to the controls of one deployment
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: BTreeMap<FieldId, FieldHandle>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field with an initial value and register it under `id`
    pub fn register<T: FieldKind>(&mut self, id: FieldId, initial: T) -> Field<T> {
        let field = Field::new(initial);
        self.fields.insert(id, T::wrap(field.clone()));
        field
    }

    /// Drop a control from the deployment
    pub fn remove(&mut self, id: FieldId) -> Option<FieldHandle> {
        self.fields.remove(&id)
    }

    /// Resolve `id` to a typed field, warning when it is absent or of another kind
    pub fn lookup<T: FieldKind>(&self, id: FieldId) -> Presence<Field<T>> {
        match self.fields.get(&id) {
            Some(handle) => match T::unwrap(handle) {
                Some(field) => Presence::Bound(field),
                None => {
                    warn!(field = %id, expected = T::KIND, found = handle.kind(), "Field has unexpected kind, binding skipped");
                    Presence::Missing
                }
            },
            None => {
                warn!(field = %id, "Field not present in this deployment, binding skipped");
                Presence::Missing
            }
        }
    }

    pub fn handle(&self, id: FieldId) -> Option<&FieldHandle> {
        self.fields.get(&id)
    }

    /// Find a handle by its textual id
    pub fn find(&self, name: &str) -> Option<(FieldId, &FieldHandle)> {
        self.fields
            .iter()
            .find(|(id, _)| id.as_str() == name)
            .map(|(id, handle)| (*id, handle))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldHandle)> {
        self.fields.iter().map(|(id, handle)| (*id, handle))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
