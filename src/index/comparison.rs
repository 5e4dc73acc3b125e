use std::collections::BTreeMap;
use std::ops::Range;

use super::bitmap::CandidateBitmap;
use crate::codec::ScalarColumn;
use crate::types::ScalarOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Rows grouped by threshold, thresholds sorted ascending.
///
/// A row with threshold `t` accepts input `v` when `v op t` holds, so a
/// lookup unions a contiguous run of threshold groups: `Gt` takes every
/// threshold below `v`, `Lte` every threshold at or above `v`.
#[derive(Debug, Clone)]
pub struct ComparisonIndex {
    bound: Bound,
    thresholds: Vec<i32>,
    rows: Vec<CandidateBitmap>,
    blank_rows: CandidateBitmap,
}

impl ComparisonIndex {
    /// Build for an ordering comparison. Returns `None` for `Eq` and `Ne`.
    #[must_use]
    pub fn build(column: &ScalarColumn, op: ScalarOp) -> Option<Self> {
        let bound = match op {
            ScalarOp::Gt => Bound::Gt,
            ScalarOp::Gte => Bound::Gte,
            ScalarOp::Lt => Bound::Lt,
            ScalarOp::Lte => Bound::Lte,
            ScalarOp::Eq | ScalarOp::Ne => return None,
        };
        let count = column.len();
        let mut groups: BTreeMap<i32, CandidateBitmap> = BTreeMap::new();
        let mut blank_rows = CandidateBitmap::empty(count);
        for row in 0..count {
            match column.get(row) {
                Some(t) => groups
                    .entry(t)
                    .or_insert_with(|| CandidateBitmap::empty(count))
                    .set(row),
                None => blank_rows.set(row),
            }
        }
        let (thresholds, rows) = groups.into_iter().unzip();
        Some(Self {
            bound,
            thresholds,
            rows,
            blank_rows,
        })
    }

    fn matching_thresholds(&self, input: i32) -> Range<usize> {
        let below = self.thresholds.partition_point(|&t| t < input);
        let at_or_below = self.thresholds.partition_point(|&t| t <= input);
        match self.bound {
            Bound::Gt => 0..below,
            Bound::Gte => 0..at_or_below,
            Bound::Lt => at_or_below..self.thresholds.len(),
            Bound::Lte => below..self.thresholds.len(),
        }
    }

    /// Rows whose threshold accepts `input`, plus every blank row.
    #[must_use]
    pub fn candidates(&self, input: i32) -> CandidateBitmap {
        let mut result = self.blank_rows.clone();
        for rows in &self.rows[self.matching_thresholds(input)] {
            result.or_in_place(rows);
        }
        result
    }

    #[must_use]
    pub fn thresholds(&self) -> &[i32] {
        &self.thresholds
    }

    /// Approximate heap footprint.
    #[must_use]
    pub fn memory_size_bytes(&self) -> usize {
        self.blank_rows.memory_size_bytes()
            + self.thresholds.len() * std::mem::size_of::<i32>()
            + self
                .rows
                .iter()
                .map(CandidateBitmap::memory_size_bytes)
                .sum::<usize>()
    }
}
