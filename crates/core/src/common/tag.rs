//! Tag and checkpoint identifiers.

/// Unique tag identifying a speculative instruction group's position in the
/// rename stream.
///
/// Tags are allocated from a circular counter over `[0, 2^tag_bits)` and
/// compare by identity, not by age: ordering between two tags is only
/// meaningful relative to the allocator's head and tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Tag(pub u16);

impl Tag {
    /// Index of this tag into tag-space-sized structures.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for one slot of saved mapping-table state, in
/// `[0, checkpoint_count)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Checkpoint(pub u16);

impl Checkpoint {
    /// Index of this checkpoint into the snapshot store.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
