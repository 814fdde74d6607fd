//! Stream pipeline
//!
//! [`Stream`] wraps a [`Source`] and chains combinators on it. Nothing runs
//! until a terminal operation ([`collect`](Stream::collect),
//! [`for_each`](Stream::for_each), [`count`](Stream::count)) or an iterator
//! pulls from the end of the chain.

use crate::{
    BoxSource, Empty, Filter, FlatMap, Generator, IterSource, Map, Merge, Peek, Snapshot, Source,
};

const TARGET: &str = "veil::stream";

/// Lazy chain of combinators over a source
#[must_use = "streams are lazy and do nothing unless pulled"]
pub struct Stream<S> {
    source: S,
}

impl<S: Source> Stream<S> {
    pub fn new(source: S) -> Self {
        Stream { source }
    }

    /// Keep only the pairs `predicate` accepts
    pub fn filter<P>(self, predicate: P) -> Stream<Filter<S, P>>
    where
        P: FnMut(&S::Key, &S::Value) -> bool,
    {
        Stream::new(Filter::new(self.source, predicate))
    }

    /// Replace every pair with `transform(key, value)`
    pub fn map<K, V, F>(self, transform: F) -> Stream<Map<S, F, K, V>>
    where
        F: FnMut(S::Key, S::Value) -> (K, V),
    {
        Stream::new(Map::new(self.source, transform))
    }

    /// Step this stream and `other` together until both are exhausted.
    ///
    /// `combine` receives `None` for a side that has run out.
    pub fn merge<B, K, V, F>(self, other: B, combine: F) -> Stream<Merge<S, B, F, K, V>>
    where
        B: Source,
        F: FnMut(Option<(S::Key, S::Value)>, Option<(B::Key, B::Value)>) -> (K, V),
    {
        Stream::new(Merge::new(self.source, other, combine))
    }

    /// Call `observe` on every pair as it passes
    pub fn peek<F>(self, observe: F) -> Stream<Peek<S, F>>
    where
        F: FnMut(&S::Key, &S::Value),
    {
        Stream::new(Peek::new(self.source, observe))
    }

    /// Erase the source type, e.g. to concatenate different kinds of streams
    pub fn boxed<'a>(self) -> Stream<BoxSource<'a, S::Key, S::Value>>
    where
        S: 'a,
    {
        Stream::new(Box::new(self.source))
    }

    /// Drain into an associative container; later duplicate keys win
    pub fn collect<C>(self) -> C
    where
        C: FromIterator<(S::Key, S::Value)>,
    {
        let mut pulled = 0usize;
        let collected = self.into_iter().inspect(|_| pulled += 1).collect();
        tracing::trace!(target: TARGET, pulled, "stream collected");
        collected
    }

    /// Drain, calling `action` on every pair; its result is discarded
    pub fn for_each<F, R>(self, mut action: F)
    where
        F: FnMut(S::Key, S::Value) -> R,
    {
        let mut pulled = 0usize;
        for (key, value) in self {
            pulled += 1;
            let _ = action(key, value);
        }
        tracing::trace!(target: TARGET, pulled, "stream drained");
    }

    /// Drain, counting the pairs
    pub fn count(self) -> usize {
        self.into_iter().count()
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<K, V> Stream<Snapshot<K, V>> {
    /// Stream over a snapshot of `pairs`
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Stream::new(Snapshot::new(pairs))
    }
}

impl<K, V, F> Stream<Generator<K, V, F>>
where
    K: Clone,
    F: FnMut(Option<&K>) -> Option<(K, V)>,
{
    /// Stream over `generate`, which is handed the previous key
    pub fn generate(generate: F) -> Self {
        Stream::new(Generator::new(generate))
    }
}

impl<S: Source> Source for Stream<S> {
    type Key = S::Key;
    type Value = S::Value;

    #[inline]
    fn pull(&mut self) -> Option<(S::Key, S::Value)> {
        self.source.pull()
    }
}

impl<S: Source> IntoIterator for Stream<S> {
    type Item = (S::Key, S::Value);
    type IntoIter = Pairs<S>;

    fn into_iter(self) -> Pairs<S> {
        Pairs {
            source: self.source,
        }
    }
}

/// Iterator over the pairs of a stream
pub struct Pairs<S> {
    source: S,
}

impl<S: Source> Iterator for Pairs<S> {
    type Item = (S::Key, S::Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.source.pull()
    }
}

/// Stream over a snapshot of `container`
pub fn snapshot<C, K, V>(container: C) -> Stream<Snapshot<K, V>>
where
    C: IntoIterator<Item = (K, V)>,
{
    Stream::from_pairs(container)
}

/// Stream over a generator function handed the previous key
pub fn generate<K, V, F>(generate: F) -> Stream<Generator<K, V, F>>
where
    K: Clone,
    F: FnMut(Option<&K>) -> Option<(K, V)>,
{
    Stream::generate(generate)
}

/// Stream pulling lazily from an iterator of pairs
pub fn from_iter<I, K, V>(pairs: I) -> Stream<IterSource<I::IntoIter>>
where
    I: IntoIterator<Item = (K, V)>,
{
    Stream::new(IterSource::new(pairs.into_iter()))
}

/// Stream with no pairs
pub fn empty<K, V>() -> Stream<Empty<K, V>> {
    Stream::new(Empty::new())
}

/// Concatenate `sources` in order, draining each before the next
pub fn flat_map<I, S>(sources: I) -> Stream<FlatMap<S>>
where
    I: IntoIterator<Item = S>,
    S: Source,
{
    Stream::new(FlatMap::new(sources))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use proptest::prelude::*;

    use super::*;

    fn tens() -> BTreeMap<i32, i32> {
        BTreeMap::from([(1, 10), (2, 20), (3, 30)])
    }

    #[test]
    fn test_filter_collect_scenario() {
        let collected: BTreeMap<i32, i32> = snapshot(tens()).filter(|k, _| *k > 1).collect();
        assert_eq!(collected, BTreeMap::from([(2, 20), (3, 30)]));
    }

    #[test]
    fn test_map_collect() {
        let collected: HashMap<String, i32> = snapshot(tens())
            .map(|k, v| (format!("k{k}"), v / 10))
            .collect();
        assert_eq!(collected.len(), 3);
        assert_eq!(collected["k2"], 2);
    }

    #[test]
    fn test_collect_later_keys_overwrite() {
        let collected: BTreeMap<&str, i32> =
            snapshot(vec![("a", 1), ("b", 2), ("a", 3)]).collect();
        assert_eq!(collected, BTreeMap::from([("a", 3), ("b", 2)]));
    }

    #[test]
    fn test_merge_mismatched_lengths() {
        let short = snapshot(vec![(1, 'x')]);
        let mut steps = 0;
        let merged: Vec<(usize, (Option<i32>, Option<char>))> = snapshot(tens())
            .merge(short, |a, b| {
                steps += 1;
                (steps, (a.map(|(k, _)| k), b.map(|(_, c)| c)))
            })
            .into_iter()
            .collect();

        assert_eq!(
            merged,
            vec![
                (1, (Some(1), Some('x'))),
                (2, (Some(2), None)),
                (3, (Some(3), None)),
            ]
        );
    }

    #[test]
    fn test_merge_left_shorter() {
        let count = snapshot(vec![(0, 0)])
            .merge(snapshot(tens()), |a, b| (a.is_none(), b.is_none()))
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_flat_map_with_empty_between() {
        let a = snapshot(vec![(1, "a1"), (2, "a2")]).boxed();
        let b = generate(|previous: Option<&i32>| {
            let next = previous.map_or(10, |k| k + 1);
            (next < 12).then_some((next, "b"))
        })
        .boxed();

        let order: Vec<(i32, &str)> = flat_map(vec![a, empty().boxed(), b]).into_iter().collect();
        assert_eq!(order, vec![(1, "a1"), (2, "a2"), (10, "b"), (11, "b")]);
    }

    #[test]
    fn test_peek_then_for_each() {
        let mut peeked = Vec::new();
        let mut acted = Vec::new();
        snapshot(tens())
            .peek(|k, _| peeked.push(*k))
            .for_each(|k, v| {
                acted.push(v);
                k
            });
        assert_eq!(peeked, vec![1, 2, 3]);
        assert_eq!(acted, vec![10, 20, 30]);
    }

    #[test]
    fn test_pipeline_is_lazy() {
        let mut observed = 0;
        let stream = snapshot(tens()).peek(|_, _| observed += 1);
        let mut source = stream.into_source();
        assert_eq!(source.pull(), Some((1, 10)));
        drop(source);
        assert_eq!(observed, 1);
    }

    #[test]
    fn test_associated_constructors() {
        let doubled: Vec<(u8, u8)> = Stream::from_pairs(vec![(1u8, 1u8), (2, 2)])
            .map(|k, v| (k, v * 2))
            .into_iter()
            .collect();
        assert_eq!(doubled, vec![(1, 2), (2, 4)]);

        let counted = Stream::generate(|previous: Option<&u8>| match previous {
            None => Some((0u8, ())),
            Some(&k) if k < 4 => Some((k + 1, ())),
            Some(_) => None,
        })
        .count();
        assert_eq!(counted, 5);
    }

    #[test]
    fn test_from_iter_and_empty() {
        assert_eq!(from_iter((0..4).map(|i| (i, i))).count(), 4);
        assert_eq!(empty::<u8, u8>().count(), 0);
    }

    proptest! {
        #[test]
        fn generator_count_matches_bound(bound in 0u32..200, keep in 1u32..5) {
            let kept = generate(|previous: Option<&u32>| {
                let next = previous.map_or(0, |k| k + 1);
                (next < bound).then_some((next, ()))
            })
            .filter(|k, _| k % keep == 0)
            .count();
            prop_assert_eq!(kept, (0..bound).filter(|k| k % keep == 0).count());
        }
    }
}
