//! Proptest strategies

use std::collections::BTreeMap;

use proptest::collection::{btree_map, btree_set, vec};
use proptest::prelude::*;
use veil_core::Value;

/// Between 1 and `max` enum names, distinct even after uppercasing, in
/// random order
pub fn unique_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    btree_set("[a-z][a-z0-9_]{0,7}", 1..=max)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Associative container with up to `max` entries
pub fn pair_map(max: usize) -> impl Strategy<Value = BTreeMap<i32, i32>> {
    btree_map(-1000i32..1000, any::<i32>(), 0..max)
}

/// Pair list with up to `max` entries; keys may repeat
pub fn pair_list(max: usize) -> impl Strategy<Value = Vec<(u8, i32)>> {
    vec((any::<u8>(), any::<i32>()), 0..max)
}

/// Nil, text, boolean or finite number
pub fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        "[a-z ]{0,12}".prop_map(Value::Text),
        any::<bool>().prop_map(Value::Boolean),
        (-1.0e9f64..1.0e9).prop_map(Value::Number),
    ]
}
