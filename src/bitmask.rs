//! Fixed-capacity bit vector over sample indices.
//!
//! A [`PatientBitmask`] records which samples of the cohort support a
//! candidate subnetwork. Capacity is fixed at construction (one bit per
//! sample) and never grows; the population count is maintained
//! incrementally so that support-threshold checks are O(1).

/// Supporting-sample set of one candidate subnetwork.
///
/// Each instance is exclusively owned by one index entry. Growth paths
/// sharing a common prefix must copy-then-intersect rather than mutate a
/// parent's mask in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientBitmask {
    capacity: usize,
    count: usize,
    words: Vec<u64>,
}

impl PatientBitmask {
    /// Zero-filled mask able to hold `capacity` bits.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            count: 0,
            words: vec![0u64; capacity.div_ceil(64)],
        }
    }

    /// Number of bits this mask can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set or clear one bit. The population count moves only if the bit
    /// actually changes.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the mask's capacity; an out-of-range
    /// sample index is a programming error, not a data condition.
    pub fn set_bit(&mut self, pos: usize, value: bool) {
        assert!(
            pos < self.capacity,
            "bit {pos} out of range for bitmask of capacity {}",
            self.capacity
        );
        let word = pos / 64;
        let bit = 1u64 << (pos % 64);
        let old = self.words[word] & bit != 0;
        if old != value {
            self.words[word] ^= bit;
            if value {
                self.count += 1;
            } else {
                self.count -= 1;
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `pos` is outside the mask's capacity.
    pub fn get_bit(&self, pos: usize) -> bool {
        assert!(
            pos < self.capacity,
            "bit {pos} out of range for bitmask of capacity {}",
            self.capacity
        );
        self.words[pos / 64] & (1u64 << (pos % 64)) != 0
    }

    /// O(1) population count.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Index of the lowest set bit.
    ///
    /// # Panics
    ///
    /// Panics on an empty mask; callers must check [`len`](Self::len) first.
    pub fn first_set_bit(&self) -> usize {
        assert!(self.count > 0, "empty bitmask has no first set bit");
        for (i, word) in self.words.iter().enumerate() {
            if *word != 0 {
                return i * 64 + word.trailing_zeros() as usize;
            }
        }
        unreachable!("nonzero count with all-zero words");
    }

    /// In-place intersection: keep only samples supporting both operands.
    /// Commutative and associative, so join order cannot change the
    /// resulting support set.
    pub fn intersect_with(&mut self, other: &PatientBitmask) {
        debug_assert_eq!(self.capacity, other.capacity);
        self.count = 0;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= *b;
            self.count += a.count_ones() as usize;
        }
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &PatientBitmask) {
        debug_assert_eq!(self.capacity, other.capacity);
        self.count = 0;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
            self.count += a.count_ones() as usize;
        }
    }

    /// In-place difference: clear every bit set in `other`.
    pub fn difference_with(&mut self, other: &PatientBitmask) {
        debug_assert_eq!(self.capacity, other.capacity);
        self.count = 0;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !*b;
            self.count += a.count_ones() as usize;
        }
    }

    /// Iterator over set bit positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.capacity).filter(|&pos| self.get_bit(pos))
    }
}
