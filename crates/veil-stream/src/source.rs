//! Pull sources
//!
//! Every stage of a stream speaks one contract: [`Source::pull`] yields the
//! next `(key, value)` pair, or `None` once the source is exhausted. Two
//! source shapes are adapted to it:
//! - [`Snapshot`]: the contents of an associative container, captured when the
//!   stream is created
//! - [`Generator`]: a function handed the previously yielded key

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

/// A lazy, single-pass sequence of key/value pairs
pub trait Source {
    type Key;
    type Value;

    /// Next pair, or `None` once exhausted
    fn pull(&mut self) -> Option<(Self::Key, Self::Value)>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Key = S::Key;
    type Value = S::Value;

    #[inline]
    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        (**self).pull()
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    type Key = S::Key;
    type Value = S::Value;

    #[inline]
    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        (**self).pull()
    }
}

/// Type-erased source
pub type BoxSource<'a, K, V> = Box<dyn Source<Key = K, Value = V> + 'a>;

/// Snapshot of an associative container
#[derive(Debug)]
pub struct Snapshot<K, V> {
    pairs: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Snapshot<K, V> {
    pub fn new<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Snapshot {
            pairs: pairs.into_iter().collect::<Vec<_>>().into_iter(),
        }
    }

    /// Pairs not yet pulled
    pub fn remaining(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> Source for Snapshot<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn pull(&mut self) -> Option<(K, V)> {
        self.pairs.next()
    }
}

impl<K, V> From<Vec<(K, V)>> for Snapshot<K, V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Snapshot {
            pairs: pairs.into_iter(),
        }
    }
}

impl<K, V> From<BTreeMap<K, V>> for Snapshot<K, V> {
    fn from(map: BTreeMap<K, V>) -> Self {
        Snapshot::new(map)
    }
}

impl<K, V, H> From<HashMap<K, V, H>> for Snapshot<K, V> {
    fn from(map: HashMap<K, V, H>) -> Self {
        Snapshot::new(map)
    }
}

/// Generator-function source.
///
/// The function receives the key it yielded last (`None` on the first pull)
/// and returns the next pair. Once it returns `None` it is not called again.
pub struct Generator<K, V, F> {
    generate: F,
    last: Option<K>,
    done: bool,
    _values: PhantomData<fn() -> V>,
}

impl<K, V, F> Generator<K, V, F>
where
    K: Clone,
    F: FnMut(Option<&K>) -> Option<(K, V)>,
{
    pub fn new(generate: F) -> Self {
        Generator {
            generate,
            last: None,
            done: false,
            _values: PhantomData,
        }
    }
}

impl<K, V, F> Source for Generator<K, V, F>
where
    K: Clone,
    F: FnMut(Option<&K>) -> Option<(K, V)>,
{
    type Key = K;
    type Value = V;

    fn pull(&mut self) -> Option<(K, V)> {
        if self.done {
            return None;
        }
        match (self.generate)(self.last.as_ref()) {
            Some((key, value)) => {
                self.last = Some(key.clone());
                Some((key, value))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Lazily pulls from any iterator of pairs
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        IterSource { iter }
    }
}

impl<I, K, V> Source for IterSource<I>
where
    I: Iterator<Item = (K, V)>,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn pull(&mut self) -> Option<(K, V)> {
        self.iter.next()
    }
}

/// Source that is exhausted from the start
#[derive(Debug)]
pub struct Empty<K, V> {
    _pairs: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Empty<K, V> {
    pub fn new() -> Self {
        Empty {
            _pairs: PhantomData,
        }
    }
}

impl<K, V> Default for Empty<K, V> {
    fn default() -> Self {
        Empty::new()
    }
}

impl<K, V> Source for Empty<K, V> {
    type Key = K;
    type Value = V;

    #[inline]
    fn pull(&mut self) -> Option<(K, V)> {
        None
    }
}
