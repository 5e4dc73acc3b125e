/// Fixed-capacity set of row numbers packed into 64-bit words.
///
/// Row `i` lives in word `i / 64` at bit `i % 64`, least significant bit
/// first. Bits past the row count are always clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBitmap {
    words: Vec<u64>,
}

impl CandidateBitmap {
    #[must_use]
    pub fn word_count(rows: usize) -> usize {
        rows.div_ceil(64)
    }

    /// Every row in `0..rows` set.
    #[must_use]
    pub fn all_ones(rows: usize) -> Self {
        let mut words = vec![u64::MAX; Self::word_count(rows)];
        let tail = rows % 64;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        Self { words }
    }

    /// No rows set, with room for `rows` rows.
    #[must_use]
    pub fn empty(rows: usize) -> Self {
        Self {
            words: vec![0; Self::word_count(rows)],
        }
    }

    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Rows set in both; the result is as long as the shorter operand.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        Self {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    /// Keep only rows also set in `other`. Words `other` lacks are cleared.
    pub fn and_in_place(&mut self, other: &Self) {
        for (i, word) in self.words.iter_mut().enumerate() {
            *word &= other.words.get(i).copied().unwrap_or(0);
        }
    }

    /// Rows set in either; the result is as long as the longer operand.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.or_in_place(other);
        result
    }

    pub fn or_in_place(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (word, o) in self.words.iter_mut().zip(&other.words) {
            *word |= o;
        }
    }

    /// Rows set in `self` but not in `other`.
    #[must_use]
    pub fn and_not(&self, other: &Self) -> Self {
        Self {
            words: self
                .words
                .iter()
                .enumerate()
                .map(|(i, w)| w & !other.words.get(i).copied().unwrap_or(0))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_set(&self, row: usize) -> bool {
        self.words
            .get(row / 64)
            .is_some_and(|w| w & (1u64 << (row % 64)) != 0)
    }

    /// Set `row`. Rows beyond the capacity are ignored.
    pub fn set(&mut self, row: usize) {
        if let Some(w) = self.words.get_mut(row / 64) {
            *w |= 1u64 << (row % 64);
        }
    }

    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Lowest set row.
    #[must_use]
    pub fn find_first(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Set rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            let mut rest = w;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * 64 + bit)
            })
        })
    }

    /// Heap bytes held by the word array.
    #[must_use]
    pub fn memory_size_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_ones_masks_tail() {
        let b = CandidateBitmap::all_ones(70);
        assert_eq!(b.words(), [u64::MAX, 0b11_1111]);
        assert_eq!(b.cardinality(), 70);
        assert!(b.is_set(69));
        assert!(!b.is_set(70));
    }

    #[test]
    fn all_ones_exact_word_boundary() {
        let b = CandidateBitmap::all_ones(128);
        assert_eq!(b.words(), [u64::MAX, u64::MAX]);
        assert!(CandidateBitmap::all_ones(0).is_empty());
    }

    #[test]
    fn set_and_query() {
        let mut b = CandidateBitmap::empty(130);
        b.set(0);
        b.set(64);
        b.set(129);
        b.set(500);
        assert_eq!(b.cardinality(), 3);
        assert_eq!(b.find_first(), Some(0));
        assert_eq!(b.iter().collect::<Vec<_>>(), [0, 64, 129]);
    }

    #[test]
    fn and_in_place_clears_missing_words() {
        let mut a = CandidateBitmap::all_ones(128);
        let b = CandidateBitmap::all_ones(64);
        a.and_in_place(&b);
        assert_eq!(a.words(), [u64::MAX, 0]);
        assert_eq!(a.cardinality(), 64);
    }

    #[test]
    fn and_or_and_not() {
        let mut a = CandidateBitmap::empty(10);
        let mut b = CandidateBitmap::empty(10);
        a.set(1);
        a.set(2);
        b.set(2);
        b.set(3);
        assert_eq!(a.and(&b).iter().collect::<Vec<_>>(), [2]);
        assert_eq!(a.or(&b).iter().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(a.and_not(&b).iter().collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn or_grows_to_longer_operand() {
        let a = CandidateBitmap::empty(1);
        let mut b = CandidateBitmap::empty(100);
        b.set(99);
        assert!(a.or(&b).is_set(99));
    }

    #[test]
    fn find_first_of_empty() {
        assert_eq!(CandidateBitmap::empty(256).find_first(), None);
    }
}
