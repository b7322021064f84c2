//! The rollback/restore pipeline.
//!
//! A rollback request runs through three ticks:
//! 1. **Request tick:** validate the target, invalidate the abandoned-path
//!    suffix of the active view, enter flushing mode, lock the mapping table,
//!    and issue the tag→checkpoint index read.
//! 2. **Index response:** reset the checkpoint ring head to the located
//!    checkpoint (discarding every checkpoint allocated after it), drop the
//!    target's own checkpointed bit (the restored state becomes live, so the
//!    saved copy is no longer needed), fetch the snapshot, and publish the
//!    ready tag the issuance controller rendezvouses on.
//! 3. **Snapshot response:** overwrite the mapping table wholesale, still
//!    under the lock.
//!
//! The lock guarantees that a rename whose tag predates the unblocking tag
//! can never corrupt the restored table; only the rename carrying the
//! unblocking tag (or later) writes again.

use tracing::debug;

use crate::common::tag::Tag;

use super::CheckpointRat;

/// Sequential state of the restore pipeline.
#[derive(Debug)]
pub(crate) struct RestoreState {
    /// Rollback target between the index request and its response.
    pub(crate) pending_target: Option<Tag>,
    /// Published once the snapshot fetch is underway; the issuance
    /// controller's unblock condition.
    pub(crate) ready_tag: Option<Tag>,
    next_ready: Option<Tag>,
}

impl RestoreState {
    pub(crate) const fn new() -> Self {
        Self {
            pending_target: None,
            ready_tag: None,
            next_ready: None,
        }
    }

    pub(crate) fn update(&mut self) {
        if let Some(tag) = self.next_ready.take() {
            self.ready_tag = Some(tag);
        }
    }
}

impl CheckpointRat {
    /// Rolls the mapping back to the state checkpointed at `tag`.
    ///
    /// At most one rollback may be in flight; the caller must not request
    /// another until issuance has resynchronized.
    ///
    /// # Panics
    ///
    /// Panics with `rollback to illegal tag` unless `tag` is currently both
    /// active and checkpointed — a defect in the surrounding control logic,
    /// never recovered.
    pub fn rollback(&mut self, tag: Tag) {
        assert!(
            self.active.contains(tag.index()) && self.checkpointed.contains(tag.index()),
            "rollback to illegal tag"
        );
        debug_assert!(
            !self.flushing && self.restore.pending_target.is_none(),
            "rollback while another rollback is draining"
        );

        self.index.read_req(tag.index());
        self.restore.pending_target = Some(tag);

        // Invalidate every tag issued strictly after the target. The range
        // runs to the ring tail so it also covers a fresh tag staged at the
        // committed head by a same-tick issue; the bits between head and
        // tail are unallocated and already zero. Slots are not reclaimed
        // here; retirement frees them in order later.
        let space = self.config().tag_space();
        self.active_clear
            .insert_range_cyclic((tag.index() + 1) % space, self.tags.tail().index());

        self.begin_flush = Some(tag);
        self.stats.rollbacks += 1;
        debug!(target = tag.0, "rollback requested");
    }

    /// Advances the memory-response stages of the pipeline; called from
    /// [`tick`](CheckpointRat::tick) before the commit phase.
    pub(crate) fn advance_restore(&mut self) {
        // Stage 3: snapshot response overwrites the table (still locked).
        if let Some(snapshot) = self.snapshots.take_response() {
            debug!("mapping table restored");
            self.map_table.stage_restore(snapshot);
        }

        // Stage 2: index response locates the checkpoint.
        if let Some(checkpoint) = self.index.take_response() {
            if let Some(target) = self.restore.pending_target.take() {
                self.stats.checkpoints_reclaimed +=
                    self.checkpoints.allocated_since(checkpoint) as u64;
                self.checkpoints.reset_head(checkpoint);
                // Only the rollback target stays active without a checkpoint:
                // its saved copy becomes the live state.
                self.checkpointed_clear.insert(target.index());
                self.snapshots.read_req(checkpoint.index());
                self.restore.next_ready = Some(target);
                debug!(
                    target = target.0,
                    checkpoint = checkpoint.0,
                    "checkpoint located, fetching snapshot"
                );
            }
        }
    }
}
