//! Deterministic fixtures

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use veil_core::{create_view, Handle, Kind, Task, Value};

/// Pairs `(k, k * 10)` for keys `1..=n`
pub fn numbered_pairs(n: u32) -> Vec<(u32, u32)> {
    (1..=n).map(|k| (k, k * 10)).collect()
}

/// `n` distinct keys in a seeded random order, each with a random value
pub fn shuffled_pairs(n: u32, seed: u64) -> Vec<(u32, u64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<u32> = (0..n).collect();
    keys.shuffle(&mut rng);
    keys.into_iter().map(|k| (k, rng.gen())).collect()
}

/// `member_0` .. `member_{n-1}`
pub fn member_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("member_{i}")).collect()
}

/// One value of every kind, in [`Kind::ALL`] order
pub fn sample_values() -> Vec<Value> {
    let (record, _) = create_view(None, None);
    let values = vec![
        Value::Nil,
        Value::text("sample"),
        Value::Boolean(false),
        Value::Number(42.0),
        Value::callable(|args| Ok(args.first().cloned().unwrap_or_default())),
        Value::Handle(Handle::new("opaque")),
        Value::Task(Task::new(|| None)),
        Value::Record(record),
    ];
    debug_assert!(values.iter().map(Value::kind).eq(Kind::ALL));
    values
}
