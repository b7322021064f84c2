//! Fixed-width bitset over the tag space.
//!
//! Used for the two liveness views of the tag space ("active" and
//! "has-checkpoint") and for the staged set/clear masks that commit at tick
//! boundaries. The width is fixed at construction to `2^tag_bits`.

/// A fixed-width bitset indexed by tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSet {
    words: Vec<u64>,
    width: usize,
}

impl TagSet {
    /// Creates an empty set over `width` bit positions.
    pub fn new(width: usize) -> Self {
        Self {
            words: vec![0; width.div_ceil(64)],
            width,
        }
    }

    /// Number of bit positions this set covers.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Sets the bit at `idx`.
    #[inline]
    pub fn insert(&mut self, idx: usize) {
        debug_assert!(idx < self.width);
        self.words[idx / 64] |= 1 << (idx % 64);
    }

    /// Clears the bit at `idx`.
    #[inline]
    pub fn remove(&mut self, idx: usize) {
        debug_assert!(idx < self.width);
        self.words[idx / 64] &= !(1 << (idx % 64));
    }

    /// Returns whether the bit at `idx` is set.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        debug_assert!(idx < self.width);
        self.words[idx / 64] & (1 << (idx % 64)) != 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /// Commits staged masks: `self = (self | set) & !clear`.
    ///
    /// Clear wins over set for a bit present in both, matching the
    /// synchronous-update rule for the liveness views.
    pub fn apply(&mut self, set: &Self, clear: &Self) {
        debug_assert!(self.width == set.width && self.width == clear.width);
        for ((word, s), c) in self.words.iter_mut().zip(&set.words).zip(&clear.words) {
            *word = (*word | s) & !c;
        }
    }

    /// Sets every bit in the cyclic range `[from, to)`, walking modulo the
    /// set width. `from == to` is the empty range.
    pub fn insert_range_cyclic(&mut self, from: usize, to: usize) {
        debug_assert!(from < self.width && to < self.width);
        let mut idx = from;
        while idx != to {
            self.insert(idx);
            idx = (idx + 1) % self.width;
        }
    }

    /// Iterates over the indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(|&idx| self.contains(idx))
    }
}
