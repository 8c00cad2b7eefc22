//! Statistical aggregation over parsed records
//!
//! Each shard folds its records into a [`PartialAggregate`]; partials are
//! combined with [`Merge`] into one [`GlobalAggregate`], and only then are
//! averages and rankings derived into [`DerivedStats`].
//!
//! Every accumulator here forms a commutative monoid: `Default` is the
//! identity and `merge` is associative and commutative, so partials can be
//! combined in whatever order workers finish.

pub mod metrics;
pub mod partial;
pub mod salary;

pub use metrics::{DerivedStats, MetricsOptions};
pub use partial::{GlobalAggregate, PartialAggregate};
pub use salary::SalaryAccumulator;

use std::collections::BTreeMap;

/// Associative, commutative combination with `Default` as identity
pub trait Merge: Default {
    fn merge(&mut self, other: Self);

    fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

impl Merge for u64 {
    fn merge(&mut self, other: Self) {
        *self += other;
    }
}

impl<K: Ord, V: Merge> Merge for BTreeMap<K, V> {
    fn merge(&mut self, other: Self) {
        for (key, value) in other {
            self.entry(key).or_default().merge(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_merge_adds_matching_keys() {
        let a = BTreeMap::from([("x", 1u64), ("y", 2)]);
        let b = BTreeMap::from([("y", 3u64), ("z", 4)]);

        let merged = a.clone().merged(b.clone());
        assert_eq!(merged, BTreeMap::from([("x", 1u64), ("y", 5), ("z", 4)]));
        assert_eq!(merged, b.merged(a));
    }

    #[test]
    fn test_map_merge_identity() {
        let a = BTreeMap::from([(2021, 3u64)]);
        assert_eq!(a.clone().merged(BTreeMap::new()), a);
        assert_eq!(BTreeMap::new().merged(a.clone()), a);
    }
}
