//! Lazy combinators
//!
//! Each combinator wraps its upstream source(s) and does work only when it is
//! pulled. Intermediate state (which side of a merge is exhausted, which
//! source a concatenation is draining) is private to the combinator.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::Source;

/// Keeps the pairs a predicate accepts
pub struct Filter<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> Filter<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        Filter { source, predicate }
    }
}

impl<S, P> Source for Filter<S, P>
where
    S: Source,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    type Key = S::Key;
    type Value = S::Value;

    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        loop {
            let (key, value) = self.source.pull()?;
            if (self.predicate)(&key, &value) {
                return Some((key, value));
            }
        }
    }
}

/// Replaces every pair with the transform's output
pub struct Map<S, F, K, V> {
    source: S,
    transform: F,
    _pairs: PhantomData<fn() -> (K, V)>,
}

impl<S, F, K, V> Map<S, F, K, V> {
    pub(crate) fn new(source: S, transform: F) -> Self {
        Map {
            source,
            transform,
            _pairs: PhantomData,
        }
    }
}

impl<S, F, K, V> Source for Map<S, F, K, V>
where
    S: Source,
    F: FnMut(S::Key, S::Value) -> (K, V),
{
    type Key = K;
    type Value = V;

    #[inline]
    fn pull(&mut self) -> Option<(K, V)> {
        let (key, value) = self.source.pull()?;
        Some((self.transform)(key, value))
    }
}

/// Steps two sources side by side.
///
/// A step happens while either side still has pairs; an exhausted side
/// contributes `None` until the other side runs out too. The number of steps
/// is the length of the longer source.
pub struct Merge<A, B, F, K, V> {
    left: A,
    right: B,
    combine: F,
    left_done: bool,
    right_done: bool,
    _pairs: PhantomData<fn() -> (K, V)>,
}

impl<A, B, F, K, V> Merge<A, B, F, K, V> {
    pub(crate) fn new(left: A, right: B, combine: F) -> Self {
        Merge {
            left,
            right,
            combine,
            left_done: false,
            right_done: false,
            _pairs: PhantomData,
        }
    }
}

fn pull_side<S: Source>(source: &mut S, done: &mut bool) -> Option<(S::Key, S::Value)> {
    if *done {
        return None;
    }
    let pair = source.pull();
    if pair.is_none() {
        *done = true;
    }
    pair
}

impl<A, B, F, K, V> Source for Merge<A, B, F, K, V>
where
    A: Source,
    B: Source,
    F: FnMut(Option<(A::Key, A::Value)>, Option<(B::Key, B::Value)>) -> (K, V),
{
    type Key = K;
    type Value = V;

    fn pull(&mut self) -> Option<(K, V)> {
        let left = pull_side(&mut self.left, &mut self.left_done);
        let right = pull_side(&mut self.right, &mut self.right_done);
        if left.is_none() && right.is_none() {
            return None;
        }
        Some((self.combine)(left, right))
    }
}

/// Ordered concatenation of sources.
///
/// Each source is drained before the next one is touched; sources that yield
/// nothing are skipped.
pub struct FlatMap<S> {
    sources: VecDeque<S>,
}

impl<S> FlatMap<S> {
    pub(crate) fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        FlatMap {
            sources: sources.into_iter().collect(),
        }
    }

    /// Sources not yet exhausted, including the one being drained
    pub fn pending(&self) -> usize {
        self.sources.len()
    }
}

impl<S: Source> Source for FlatMap<S> {
    type Key = S::Key;
    type Value = S::Value;

    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        while let Some(current) = self.sources.front_mut() {
            if let Some(pair) = current.pull() {
                return Some(pair);
            }
            self.sources.pop_front();
        }
        None
    }
}

/// Observes every pair without changing it
pub struct Peek<S, F> {
    source: S,
    observe: F,
}

impl<S, F> Peek<S, F> {
    pub(crate) fn new(source: S, observe: F) -> Self {
        Peek { source, observe }
    }
}

impl<S, F> Source for Peek<S, F>
where
    S: Source,
    F: FnMut(&S::Key, &S::Value),
{
    type Key = S::Key;
    type Value = S::Value;

    #[inline]
    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        let (key, value) = self.source.pull()?;
        (self.observe)(&key, &value);
        Some((key, value))
    }
}
