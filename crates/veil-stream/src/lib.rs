//! VEIL Stream
//!
//! Lazy key/value pipelines:
//! - Sources: container snapshots, generator functions, iterators
//! - Combinators: filter, map, merge, flat_map, peek
//! - Terminals: collect, for_each, count
//!
//! Every stage pulls from the one before it, so no pair is produced until a
//! terminal operation asks for it.

pub mod combinator;
pub mod source;
pub mod stream;

pub use combinator::{Filter, FlatMap, Map, Merge, Peek};
pub use source::{BoxSource, Empty, Generator, IterSource, Snapshot, Source};
pub use stream::{empty, flat_map, from_iter, generate, snapshot, Pairs, Stream};
