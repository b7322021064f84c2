//! Event counters for the checkpoint RAT.
//!
//! Tracks the allocation, rollback, and retirement traffic the model has
//! serviced. Occupancy (how many tags/checkpoints are live right now) is a
//! state query, not a counter — see
//! [`CheckpointRat::allocated_tags`](crate::rat::CheckpointRat::allocated_tags)
//! and friends.

/// Cumulative event counts since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatStats {
    /// Tick boundaries committed.
    pub ticks: u64,
    /// Rename requests serviced (including locked-out no-ops).
    pub renames: u64,
    /// Tag issuance requests answered (normal or flushing).
    pub tags_issued: u64,
    /// New tags allocated from the ring.
    pub tags_allocated: u64,
    /// Tags retired oldest-first.
    pub tags_freed: u64,
    /// Checkpoints captured at branch boundaries.
    pub checkpoints_created: u64,
    /// Checkpoints retired oldest-first.
    pub checkpoints_freed: u64,
    /// Checkpoints discarded wholesale by rollback head resets.
    pub checkpoints_reclaimed: u64,
    /// Rollback requests accepted.
    pub rollbacks: u64,
    /// Issuance requests refused this tick (ring full or flush rendezvous).
    pub issue_stalls: u64,
}

impl RatStats {
    /// Creates a zeroed counter block.
    pub fn new() -> Self {
        Self::default()
    }
}
