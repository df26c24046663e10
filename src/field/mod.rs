//! Observable UI fields
//!
//! A `Field<T>` is the core's view of one control: it holds the displayed value
//! and notifies subscribers when that value changes. Everything is single-threaded
//! (`Rc`/`RefCell`); the UI event loop delivers changes one at a time.

pub mod registry;

pub use registry::{FieldHandle, FieldId, FieldKind, FieldRegistry, Presence};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Observer<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<(u64, Observer<T>)>>,
    next_id: Cell<u64>,
}

/// Shared handle to one observable value. Clones refer to the same field.
pub struct Field<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("value", &*self.inner.value.borrow())
            .field("observers", &self.inner.observers.borrow().len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Field<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(initial),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Change the value and notify subscribers. No-op when the value is unchanged.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value.clone();
        }
        self.notify(&value);
    }

    /// Deliver the current value to subscribers again, as a UI does when a
    /// control re-emits its change signal
    pub fn emit(&self) {
        let value = self.get();
        self.notify(&value);
    }

    fn notify(&self, value: &T) {
        // Snapshot so observers may subscribe, set other fields, or re-enter this one
        let observers: Vec<Observer<T>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(value);
        }
    }

    /// Change the value without notifying anyone. Used while loading from the store.
    pub fn seed(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
    }

    /// Register a change handler. The handler stays registered until the
    /// returned `Subscription` is dropped.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let observer: Observer<T> = Rc::new(handler);
        self.inner.observers.borrow_mut().push((id, observer));

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.observers.borrow_mut().retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }
}

/// Keeps a change handler registered; dropping it unsubscribes.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}
