//! Probes for observing pipelines from the outside

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use veil_core::{ErrorKind, Key, Value, View};
use veil_stream::Source;

/// Shared count of pulls made on wrapped sources
#[derive(Clone, Debug, Default)]
pub struct PullCounter(Arc<AtomicUsize>);

impl PullCounter {
    pub fn new() -> Self {
        PullCounter::default()
    }

    /// Pulls made so far, including the final one that returned `None`
    pub fn pulls(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    pub fn wrap<S: Source>(&self, source: S) -> CountingSource<S> {
        CountingSource {
            inner: source,
            counter: self.clone(),
        }
    }
}

/// Source that records every pull on a [`PullCounter`]
pub struct CountingSource<S> {
    inner: S,
    counter: PullCounter,
}

impl<S: Source> Source for CountingSource<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        self.counter.0.fetch_add(1, Ordering::Relaxed);
        self.inner.pull()
    }
}

/// True when writing `key` through `view` fails with `UnsupportedOperation`
/// and leaves the field unchanged
pub fn write_rejected(view: &View, key: impl Into<Key>) -> bool {
    let key = key.into();
    let before = view.get(&key);
    let rejected = matches!(
        view.try_set(&key, Value::text("overwritten")),
        Err(err) if err.kind() == ErrorKind::UnsupportedOperation
    );
    rejected && view.get(&key) == before
}
