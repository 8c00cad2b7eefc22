//! Running salary totals
//!
//! Salaries are kept as a `(sum, count)` pair rather than a list, so memory
//! per key stays constant no matter how many records a shard holds. The sum
//! is an exact integer in fixed-point salary units (see
//! [`SALARY_SCALE`](crate::constants::SALARY_SCALE)), so merging partials in
//! any order yields the same total.

use super::Merge;
use crate::constants::SALARY_SCALE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryAccumulator {
    /// Sum of salaries, in `1 / SALARY_SCALE` roubles
    pub sum: i128,
    pub count: u64,
}

impl SalaryAccumulator {
    /// Add one salary given in salary units
    pub fn add(&mut self, salary_units: i128) {
        self.sum += salary_units;
        self.count += 1;
    }

    /// `sum / count` in roubles, truncated toward zero; 0 when nothing was added
    pub fn truncated_mean(&self) -> i64 {
        if self.count == 0 {
            return 0;
        }
        let mean = self.sum / (i128::from(self.count) * SALARY_SCALE);
        mean.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Merge for SalaryAccumulator {
    fn merge(&mut self, other: Self) {
        self.sum += other.sum;
        self.count += other.count;
    }
}

impl FromIterator<i128> for SalaryAccumulator {
    fn from_iter<I: IntoIterator<Item = i128>>(iter: I) -> Self {
        let mut acc = Self::default();
        for salary_units in iter {
            acc.add(salary_units);
        }
        acc
    }
}
