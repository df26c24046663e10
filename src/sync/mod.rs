//! Field ↔ store synchronization
//!
//! Each binding kind loads its field(s) from one section of the store, then
//! subscribes and writes every change straight through. Nothing is batched and
//! no unsaved state is kept beyond the event being handled.

pub mod choice;
pub mod flag_ladder;
pub mod notice;
pub mod number;
pub mod override_group;
pub mod test_set;
pub mod text;
pub mod toggle;

pub use choice::{ChoiceBinding, ChoiceMap};
pub use flag_ladder::FlagLadder;
pub use notice::{ConsoleNotifier, Notice, Notifier};
pub use number::{Bounds, DecimalBinding, IntCodec, NumberBinding};
pub use override_group::{Authority, OverrideFields, OverrideGroup, OverrideHandle, OverrideShape};
pub use test_set::{Gate, TestSetBinding};
pub use text::{IntegerTextBinding, OptionalTextBinding, TextBinding};
pub use toggle::{BoolStyle, ToggleBinding};

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info};

use crate::config::SettingsStore;

/// Store handle injected into every synchronizer
pub type SharedStore = Rc<RefCell<dyn SettingsStore>>;

/// Everything a synchronizer needs besides its fields
#[derive(Clone)]
pub struct SyncContext {
    store: SharedStore,
    notifier: Rc<dyn Notifier>,
}

impl SyncContext {
    pub fn new(store: SharedStore, notifier: Rc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn section(&self, name: &'static str) -> Section {
        Section {
            name,
            store: Rc::clone(&self.store),
            notifier: Rc::clone(&self.notifier),
        }
    }
}

/// Write-through access to one store section
#[derive(Clone)]
pub struct Section {
    name: &'static str,
    store: SharedStore,
    notifier: Rc<dyn Notifier>,
}

impl Section {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.store.borrow().get_raw(self.name, key)
    }

    pub fn get(&self, key: &str, default: &str) -> String {
        self.store.borrow().get(self.name, key, default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.store.borrow().get_bool(self.name, key, default)
    }

    /// Persist `value` under `key`. Failures are logged and reported to the
    /// user; the return value tells whether the write reached the disk.
    pub fn write(&self, key: &str, value: &str) -> bool {
        let result = self.store.borrow_mut().write(self.name, key, value);
        match result {
            Ok(()) => {
                info!(section = self.name, key, value, "Updated config");
                true
            }
            Err(e) => {
                error!(section = self.name, key, value, error = %e, "Error writing config");
                self.notifier.notify(Notice::WriteFailed {
                    section: self.name.to_string(),
                    key: key.to_string(),
                    message: e.to_string(),
                });
                false
            }
        }
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }
}
