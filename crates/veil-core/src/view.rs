//! Read-only views over private stores
//!
//! [`create_view`] hands back two halves of the same data: a [`View`] that
//! can be shared freely and only reads, and a [`Store`] that the creator keeps
//! and is the only path through which the data changes.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Behaviors, Key, Value, VeilError, VeilResult};

type Fields = BTreeMap<Key, Value>;

/// Privately owned backing store of a view
#[derive(Clone, Default)]
pub struct Store {
    fields: Arc<RwLock<Fields>>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Build a store seeded with `fields`
    pub fn from_fields<K, V, I>(fields: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Store {
            fields: Arc::new(RwLock::new(fields)),
        }
    }

    /// Read a field; missing fields read as [`Value::Nil`]
    pub fn get(&self, key: impl Into<Key>) -> Value {
        self.fields
            .read()
            .get(&key.into())
            .cloned()
            .unwrap_or_default()
    }

    /// Set a field, returning the previous value
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.fields.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: impl Into<Key>) -> Option<Value> {
        self.fields.write().remove(&key.into())
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.fields.read().contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    /// Point-in-time copy of every field, in key order
    pub fn snapshot(&self) -> Vec<(Key, Value)> {
        self.fields
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("fields", &self.len()).finish()
    }
}

/// Read-only handle over exactly one [`Store`]
#[derive(Clone)]
pub struct View {
    store: Store,
    behaviors: Arc<Behaviors>,
}

/// Create a view over `store` (empty if omitted) with optional behaviors.
///
/// Returns the view together with the store handle that mutates it.
pub fn create_view(store: Option<Store>, behaviors: Option<Behaviors>) -> (View, Store) {
    let store = store.unwrap_or_default();
    let view = View::shared(store.clone(), Arc::new(behaviors.unwrap_or_default()));
    (view, store)
}

impl View {
    /// Build a view that shares its behavior set with other views
    pub(crate) fn shared(store: Store, behaviors: Arc<Behaviors>) -> Self {
        View { store, behaviors }
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    /// Read delegated to the private store
    #[inline]
    pub fn get(&self, key: impl Into<Key>) -> Value {
        self.store.get(key)
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.store.contains(key)
    }

    /// Point-in-time copy of the visible fields
    pub fn snapshot(&self) -> Vec<(Key, Value)> {
        self.store.snapshot()
    }

    /// Writes through a view are always rejected
    pub fn try_set(&self, key: impl Into<Key>, _value: impl Into<Value>) -> VeilResult<()> {
        let key = key.into();
        tracing::trace!(target: "veil::view", %key, "rejected write through view");
        Err(VeilError::UnsupportedOperation(format!(
            "cannot assign field {key} of a read-only view"
        )))
    }

    /// The behavior table is never handed out
    pub fn structure(&self) -> VeilResult<&Behaviors> {
        Err(VeilError::UnsupportedOperation(
            "behavior table of a view is concealed".to_string(),
        ))
    }

    /// Size through the size hook, or the number of fields
    pub fn len(&self) -> usize {
        match self.behaviors.size() {
            Some(size) => size(self),
            None => self.store.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke through the invocation hook
    pub fn invoke(&self, args: &[Value]) -> VeilResult<Value> {
        match self.behaviors.invoke() {
            Some(invoke) => invoke(self, args),
            None => Err(VeilError::UnsupportedOperation(
                "view is not callable".to_string(),
            )),
        }
    }

    /// Ordering through the order hook.
    ///
    /// Views that do not share one behavior set are unordered.
    pub fn compare(&self, other: &View) -> Option<Ordering> {
        if !self.shares_behaviors(other) {
            return None;
        }
        self.behaviors.order().and_then(|order| order(self, other))
    }

    /// True when both views were built with the same behavior set
    #[inline]
    pub fn shares_behaviors(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.behaviors, &other.behaviors)
    }

    /// True when both views read the same store
    #[inline]
    pub fn same_store(&self, other: &View) -> bool {
        self.store.ptr_eq(&other.store)
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        if self.same_store(other) {
            return true;
        }
        match self.behaviors.equal() {
            Some(equal) if self.shares_behaviors(other) => equal(self, other),
            _ => false,
        }
    }
}

impl PartialOrd for View {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.behaviors.display() {
            Some(display) => f.write_str(&display(self)),
            None => write!(f, "view({} fields)", self.store.len()),
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("fields", &self.store.len())
            .field("behaviors", &self.behaviors)
            .finish()
    }
}
