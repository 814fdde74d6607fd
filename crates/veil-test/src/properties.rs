//! Properties of views, enums, guards and streams

use std::collections::BTreeMap;

use proptest::prelude::*;
use veil_core::{create_enum, create_view, ErrorKind, Kind, Store, VeilError};
use veil_stream::{empty, flat_map, snapshot, Stream};

use crate::{
    pair_list, pair_map, sample_values, scalar_value, unique_names, write_rejected, PullCounter,
};

proptest! {
    #[test]
    fn enum_cardinality_and_ordinals(names in unique_names(24)) {
        let (set, accessor) = create_enum(&names, None).unwrap();
        prop_assert_eq!(set.len(), names.len());
        prop_assert_eq!(accessor.len(), names.len());

        for (position, name) in names.iter().enumerate() {
            let member = set.get(name).unwrap();
            prop_assert_eq!(member.ordinal() as usize, position + 1);
            prop_assert_eq!(member.name(), name.to_uppercase());
        }
    }

    #[test]
    fn enum_rejects_case_insensitive_duplicates(
        names in unique_names(12),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut names = names;
        let duplicate = pick.get(&names).to_uppercase();
        names.push(duplicate);

        let err = create_enum(&names, None).unwrap_err();
        prop_assert!(matches!(err, VeilError::DuplicateName(_)));
        prop_assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn enum_order_follows_ordinals(names in unique_names(16)) {
        let (set, _) = create_enum(&names, None).unwrap();
        let members: Vec<_> = set.iter().collect();

        for a in &members {
            for b in &members {
                prop_assert_eq!(a < b, a.ordinal() < b.ordinal());
                prop_assert_eq!(a.partial_cmp(b), Some(a.ordinal().cmp(&b.ordinal())));
            }
        }
    }

    #[test]
    fn every_view_rejects_writes(names in unique_names(8), key in "[a-z]{1,6}", index in any::<i64>()) {
        let (set, _) = create_enum(&names, None).unwrap();
        prop_assert!(write_rejected(set.view(), key.as_str()));
        prop_assert!(write_rejected(set.view(), index));
        for member in set.iter() {
            prop_assert!(write_rejected(member.view(), "name"));
            prop_assert!(write_rejected(member.view(), key.as_str()));
        }

        let (plain, _) = create_view(Some(Store::from_fields([(key.as_str(), index)])), None);
        prop_assert!(write_rejected(&plain, key.as_str()));
    }

    #[test]
    fn guards_accept_only_their_kind(value in scalar_value()) {
        let actual = value.kind();
        for kind in Kind::ALL {
            let checked = kind.check(value.clone());
            if kind == actual {
                prop_assert_eq!(checked.unwrap(), value.clone());
            } else {
                prop_assert!(checked.is_err());
                prop_assert!(!kind.matches(&value));
            }
        }
    }

    #[test]
    fn filter_collects_the_matching_subset(map in pair_map(64), modulus in 1i32..5) {
        let collected: BTreeMap<i32, i32> = snapshot(map.clone())
            .filter(|k, _| k % modulus == 0)
            .collect();
        let expected: BTreeMap<i32, i32> = map
            .into_iter()
            .filter(|(k, _)| k % modulus == 0)
            .collect();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn map_collects_the_transformed_pairs(pairs in pair_list(64)) {
        let transform = |k: u8, v: i32| (k / 2, v.wrapping_add(k as i32));
        let collected: BTreeMap<u8, i32> = snapshot(pairs.clone()).map(transform).collect();
        let expected: BTreeMap<u8, i32> = pairs.into_iter().map(|(k, v)| transform(k, v)).collect();
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn merge_exhausted_side_supplies_none(left in pair_list(16), right in pair_list(16)) {
        let (left_len, right_len) = (left.len(), right.len());
        let sides: Vec<(bool, bool)> = snapshot(left)
            .merge(snapshot(right), |a, b| (a.is_some(), b.is_some()))
            .into_iter()
            .collect();

        prop_assert_eq!(sides.len(), left_len.max(right_len));
        for (step, (has_left, has_right)) in sides.into_iter().enumerate() {
            prop_assert_eq!(has_left, step < left_len);
            prop_assert_eq!(has_right, step < right_len);
        }
    }

    #[test]
    fn flat_map_is_concatenation(a in pair_list(16), b in pair_list(16)) {
        let sources = vec![
            snapshot(a.clone()).boxed(),
            empty().boxed(),
            snapshot(b.clone()).boxed(),
        ];
        let joined: Vec<(u8, i32)> = flat_map(sources).into_iter().collect();
        let expected: Vec<(u8, i32)> = a.into_iter().chain(b).collect();
        prop_assert_eq!(joined, expected);
    }

    #[test]
    fn pipelines_do_not_pull_before_a_terminal(pairs in pair_list(32)) {
        let counter = PullCounter::new();
        let pipeline = Stream::new(counter.wrap(veil_stream::Snapshot::new(pairs.clone())))
            .filter(|_, v| v % 2 == 0)
            .map(|k, v| (v, k))
            .peek(|_, _| {});
        prop_assert_eq!(counter.pulls(), 0);

        pipeline.for_each(|_, _| ());
        prop_assert_eq!(counter.pulls(), pairs.len() + 1);
    }
}

#[test]
fn sample_values_guard_round_trip() {
    for (kind, value) in Kind::ALL.into_iter().zip(sample_values()) {
        assert_eq!(kind.check(value.clone()).unwrap(), value);
    }
}
