//! Circular allocators for tags and checkpoints.
//!
//! Two head/tail counter pairs with deliberately different full conventions:
//! 1. **`TagRing`** — `head == tail` means *full*, not empty. At least one tag
//!    is always allocated (tag 0 from reset), because freeing a tag requires a
//!    successor to exist.
//! 2. **`CheckpointRing`** — conventional ring with an explicit `full` flag,
//!    since `head == tail` is ambiguous there. Rollback may reset the head
//!    directly, discarding the suffix of allocated checkpoints in one step.
//!
//! Both stage their pointer movement and commit it at [`update`](TagRing::update),
//! so allocation, freeing, and rollback reclaim within one tick all observe
//! start-of-tick state.

use tracing::trace;

use crate::common::tag::{Checkpoint, Tag};

/// Circular allocator over the `2^tag_bits` tag space.
#[derive(Debug)]
pub struct TagRing {
    tag_bits: u32,
    /// Next tag to allocate.
    head: u16,
    /// Oldest tag not yet retired.
    tail: u16,
    next_head: Option<u16>,
    next_tail: Option<u16>,
}

impl TagRing {
    /// Creates the ring with tag 0 already allocated (head 1, tail 0).
    pub fn new(tag_bits: u32) -> Self {
        Self {
            tag_bits,
            head: 1,
            tail: 0,
            next_head: None,
            next_tail: None,
        }
    }

    #[inline]
    const fn mask(&self) -> u16 {
        ((1u32 << self.tag_bits) - 1) as u16
    }

    /// Whether every tag is allocated. Inverted convention: `head == tail`
    /// means full.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.head == self.tail
    }

    /// The next tag the ring would hand out.
    #[inline]
    pub const fn head(&self) -> Tag {
        Tag(self.head)
    }

    /// The oldest allocated tag.
    #[inline]
    pub const fn tail(&self) -> Tag {
        Tag(self.tail)
    }

    /// Number of currently allocated tags, in `[1, 2^tag_bits]`.
    pub const fn allocated(&self) -> usize {
        let space = 1usize << self.tag_bits;
        if self.tail < self.head {
            (self.head - self.tail) as usize
        } else {
            space - self.tail as usize + self.head as usize
        }
    }

    /// Allocates the tag at the head, or `None` when the ring is full.
    pub fn allocate(&mut self) -> Option<Tag> {
        if self.is_full() {
            return None;
        }
        debug_assert!(self.next_head.is_none(), "one tag allocation per tick");
        let tag = Tag(self.head);
        self.next_head = Some(self.head.wrapping_add(1) & self.mask());
        trace!(tag = tag.0, "tag allocated");
        Some(tag)
    }

    /// Frees exactly the oldest tag and returns it.
    ///
    /// # Panics
    ///
    /// Panics if only one tag remains allocated: the freeing protocol needs a
    /// successor tag, so draining the ring completely is a caller bug.
    pub fn free(&mut self) -> Tag {
        assert!(
            self.tail.wrapping_add(1) & self.mask() != self.head,
            "tag free underflow"
        );
        debug_assert!(self.next_tail.is_none(), "one tag free per tick");
        let freed = Tag(self.tail);
        self.next_tail = Some(self.tail.wrapping_add(1) & self.mask());
        freed
    }

    /// Commits staged pointer movement.
    pub fn update(&mut self) {
        if let Some(head) = self.next_head.take() {
            self.head = head;
        }
        if let Some(tail) = self.next_tail.take() {
            self.tail = tail;
        }
    }
}

/// Circular allocator over the checkpoint pool.
#[derive(Debug)]
pub struct CheckpointRing {
    count: u16,
    head: u16,
    tail: u16,
    full: bool,
    next_alloc_head: Option<u16>,
    next_rollback_head: Option<u16>,
    free_pending: bool,
}

impl CheckpointRing {
    /// Creates an empty pool of `count` checkpoint slots.
    pub fn new(count: usize) -> Self {
        Self {
            count: count as u16,
            head: 0,
            tail: 0,
            full: false,
            next_alloc_head: None,
            next_rollback_head: None,
            free_pending: false,
        }
    }

    #[inline]
    const fn succ(&self, slot: u16) -> u16 {
        if slot + 1 == self.count { 0 } else { slot + 1 }
    }

    /// Whether every checkpoint slot is allocated.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.full
    }

    /// Number of currently allocated checkpoints.
    pub const fn allocated(&self) -> usize {
        if self.tail < self.head || (self.tail == self.head && !self.full) {
            (self.head - self.tail) as usize
        } else {
            (self.count - self.tail + self.head) as usize
        }
    }

    /// Checkpoints allocated from `checkpoint` (inclusive) up to the head —
    /// the suffix a rollback head reset to `checkpoint` discards.
    pub(crate) const fn allocated_since(&self, checkpoint: Checkpoint) -> usize {
        if self.head == checkpoint.0 {
            if self.full { self.count as usize } else { 0 }
        } else {
            (self.head as usize + self.count as usize - checkpoint.index()) % self.count as usize
        }
    }

    /// Allocates the checkpoint at the head, or `None` when the pool is full.
    pub fn allocate(&mut self) -> Option<Checkpoint> {
        if self.full {
            return None;
        }
        debug_assert!(
            self.next_alloc_head.is_none(),
            "one checkpoint allocation per tick"
        );
        let checkpoint = Checkpoint(self.head);
        self.next_alloc_head = Some(self.succ(self.head));
        trace!(checkpoint = checkpoint.0, "checkpoint allocated");
        Some(checkpoint)
    }

    /// Frees the oldest checkpoint and returns it. Retirement-driven; always
    /// oldest-first.
    pub fn free_oldest(&mut self) -> Checkpoint {
        debug_assert!(!self.free_pending, "one checkpoint free per tick");
        self.free_pending = true;
        Checkpoint(self.tail)
    }

    /// Resets the head to `checkpoint`, discarding every checkpoint allocated
    /// after it (rollback reclaim). Clears `full`.
    pub fn reset_head(&mut self, checkpoint: Checkpoint) {
        self.next_rollback_head = Some(checkpoint.0);
    }

    /// Commits staged pointer movement, resolving same-tick races:
    /// a rollback reset wins over an allocation, and an allocation recomputes
    /// `full` against a tail a same-tick free may have advanced.
    pub fn update(&mut self) {
        let new_tail = if self.free_pending {
            self.succ(self.tail)
        } else {
            self.tail
        };
        if let Some(head) = self.next_rollback_head.take() {
            self.next_alloc_head = None;
            self.head = head;
            self.full = false;
        } else if let Some(head) = self.next_alloc_head.take() {
            self.head = head;
            self.full = head == new_tail;
        } else if self.free_pending {
            self.full = false;
        }
        self.tail = new_tail;
        self.free_pending = false;
    }
}
