use std::collections::HashMap;

use super::bitmap::CandidateBitmap;
use crate::codec::ScalarColumn;

/// Rows grouped by their exact stored value.
#[derive(Debug, Clone)]
pub struct EqualityIndex {
    rows_by_value: HashMap<i32, CandidateBitmap>,
    blank_rows: CandidateBitmap,
}

impl EqualityIndex {
    #[must_use]
    pub fn build(column: &ScalarColumn) -> Self {
        let rows = column.len();
        let mut rows_by_value: HashMap<i32, CandidateBitmap> = HashMap::new();
        let mut blank_rows = CandidateBitmap::empty(rows);
        for row in 0..rows {
            match column.get(row) {
                Some(v) => rows_by_value
                    .entry(v)
                    .or_insert_with(|| CandidateBitmap::empty(rows))
                    .set(row),
                None => blank_rows.set(row),
            }
        }
        Self {
            rows_by_value,
            blank_rows,
        }
    }

    /// Rows storing exactly `input`, plus every blank row.
    #[must_use]
    pub fn candidates(&self, input: i32) -> CandidateBitmap {
        match self.rows_by_value.get(&input) {
            Some(rows) => rows.or(&self.blank_rows),
            None => self.blank_rows.clone(),
        }
    }

    #[must_use]
    pub fn distinct_values(&self) -> usize {
        self.rows_by_value.len()
    }

    /// Approximate heap footprint.
    #[must_use]
    pub fn memory_size_bytes(&self) -> usize {
        self.blank_rows.memory_size_bytes()
            + self
                .rows_by_value
                .values()
                .map(|b| b.memory_size_bytes() + std::mem::size_of::<i32>())
                .sum::<usize>()
    }
}
