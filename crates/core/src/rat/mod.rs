//! The checkpoint RAT: speculative renaming with bounded rollback.
//!
//! [`CheckpointRat`] owns every piece of renaming state and exposes the five
//! operations the surrounding core calls:
//! 1. **[`tag`](CheckpointRat::tag):** per-group tag issuance (and
//!    post-rollback resynchronization).
//! 2. **[`rename`](CheckpointRat::rename):** source lookup, destination write,
//!    and checkpoint capture at branch boundaries.
//! 3. **[`rollback`](CheckpointRat::rollback):** restore the mapping to a
//!    checkpointed tag.
//! 4. **[`free_tag`](CheckpointRat::free_tag):** oldest-first retirement of
//!    tags and their checkpoints.
//! 5. **[`get_active_tags`](CheckpointRat::get_active_tags):** liveness view
//!    for validity-tracking collaborators.
//!
//! Execution is tick-synchronous: each operation may be called at most once
//! between two [`tick`](CheckpointRat::tick) boundaries, reads the state
//! committed at the previous boundary, and stages its writes for the next.
//! `None` returns are flow control ("not ready this tick, retry"), never
//! errors.

use tracing::{debug, trace};

use crate::common::bitset::TagSet;
use crate::common::error::ConfigError;
use crate::common::tag::{Checkpoint, Tag};
use crate::config::Config;
use crate::stats::RatStats;

/// Addressable storage with one-tick read latency.
pub mod storage;

/// Circular tag and checkpoint allocators.
pub mod rings;

/// The live architectural→physical mapping.
pub mod map_table;

/// Tag issuance and post-rollback resynchronization.
pub mod issue;

/// The rollback/restore pipeline.
pub mod restore;

use issue::IssueState;
use map_table::MapTable;
use restore::RestoreState;
use rings::{CheckpointRing, TagRing};
use storage::SyncMem;

pub use issue::{TagIssue, TagRequest};

/// Per-group input to [`CheckpointRat::rename`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RenameRequest {
    /// Physical register newly bound to the destination.
    pub rp_dst: u16,
    /// Architectural destination register; 0 is hard-wired and never written.
    pub rl_dst: usize,
    /// First architectural source register.
    pub rl_s1: usize,
    /// Second architectural source register.
    pub rl_s2: usize,
    /// Tag of the instruction group, from [`CheckpointRat::tag`].
    pub tag: Tag,
    /// Capture a checkpoint for this tag (branch boundary).
    pub commit_checkpoint: bool,
}

/// Source operand mappings returned by [`CheckpointRat::rename`], looked up
/// before the destination write of the same request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenameResult {
    /// Physical mapping of `rl_s1` at read time.
    pub rp_s1: u16,
    /// Physical mapping of `rl_s2` at read time.
    pub rp_s2: u16,
}

/// The checkpointing register alias table.
///
/// See the [module documentation](self) for the operation contract.
#[derive(Debug)]
pub struct CheckpointRat {
    config: Config,

    pub(crate) map_table: MapTable,
    pub(crate) tags: TagRing,
    pub(crate) checkpoints: CheckpointRing,
    /// Snapshot store: one full mapping-table copy per checkpoint slot.
    pub(crate) snapshots: SyncMem<Vec<u16>>,
    /// Tag→checkpoint index; only meaningful for checkpointed tags.
    pub(crate) index: SyncMem<Checkpoint>,

    /// Tags on a valid (non-abandoned) speculative path.
    pub(crate) active: TagSet,
    /// Tags that own a live checkpoint.
    pub(crate) checkpointed: TagSet,
    // Staged bitset masks, committed `(bits | set) & !clear` at the boundary.
    pub(crate) active_set: TagSet,
    pub(crate) active_clear: TagSet,
    pub(crate) checkpointed_set: TagSet,
    pub(crate) checkpointed_clear: TagSet,

    /// Snapshot value staged at capture time; the store write lands one tick
    /// later so it can never race later renames.
    pending_capture: Option<(Checkpoint, Vec<u16>)>,

    /// Issuance is resynchronizing after a rollback.
    pub(crate) flushing: bool,
    /// Tag the in-flight rollback restores to; meaningful while flushing.
    pub(crate) rollback_target: Tag,
    /// Mapping table is locked against writer updates.
    pub(crate) lock: bool,
    /// The only tag allowed to write while the lock drains; `None` while the
    /// resynchronized tag has not been issued yet.
    pub(crate) unlock_tag: Option<Tag>,

    // Staged control events. Rollback has priority over a same-tick rename
    // lock release and a same-tick flush completion.
    pub(crate) begin_flush: Option<Tag>,
    pub(crate) end_flush: Option<Tag>,
    pub(crate) release_lock: bool,

    pub(crate) issue: IssueState,
    pub(crate) restore: RestoreState,
    pub(crate) stats: RatStats,
}

impl CheckpointRat {
    /// Builds the subsystem from a validated geometry. Tag 0 starts
    /// allocated and active; the mapping table starts as the identity map.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is illegal.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let tag_space = config.tag_space();
        let identity: Vec<u16> = (0..config.reg_count).map(|rl| rl as u16).collect();
        let mut active = TagSet::new(tag_space);
        active.insert(0);

        Ok(Self {
            map_table: MapTable::new(config.reg_count),
            tags: TagRing::new(config.tag_bits),
            checkpoints: CheckpointRing::new(config.checkpoint_count),
            snapshots: SyncMem::new(config.checkpoint_count, identity),
            index: SyncMem::new(tag_space, Checkpoint(0)),
            active,
            checkpointed: TagSet::new(tag_space),
            active_set: TagSet::new(tag_space),
            active_clear: TagSet::new(tag_space),
            checkpointed_set: TagSet::new(tag_space),
            checkpointed_clear: TagSet::new(tag_space),
            pending_capture: None,
            flushing: false,
            rollback_target: Tag(0),
            lock: false,
            unlock_tag: None,
            begin_flush: None,
            end_flush: None,
            release_lock: false,
            issue: IssueState::new(),
            restore: RestoreState::new(),
            stats: RatStats::new(),
            config,
        })
    }

    /// Renames one instruction group: looks up both sources from the
    /// committed table, then stages the destination write and, at a branch
    /// boundary, captures a checkpoint for the group's tag.
    ///
    /// Returns `None` (retry next tick) when a capture is requested but the
    /// checkpoint pool is full. Under an active lock, a request whose tag is
    /// not the unblocking tag is accepted but writes nothing; a request
    /// carrying the unblocking tag clears the lock.
    pub fn rename(&mut self, req: &RenameRequest) -> Option<RenameResult> {
        let tag_valid = !self.lock || self.unlock_tag == Some(req.tag);
        // Read-before-write: sources observe the committed table even when
        // the destination aliases one of them.
        let result = RenameResult {
            rp_s1: self.map_table.lookup(req.rl_s1),
            rp_s2: self.map_table.lookup(req.rl_s2),
        };

        if tag_valid {
            if req.commit_checkpoint {
                let checkpoint = self.checkpoints.allocate()?;
                self.index.write(req.tag.index(), checkpoint);
                self.checkpointed_set.insert(req.tag.index());
                // The snapshot holds the table state after this instruction
                // (a checkpointing JALR's rd write is part of it). Stage the
                // value now; the store write lands one tick later.
                self.pending_capture =
                    Some((checkpoint, self.map_table.snapshot_with(req.rl_dst, req.rp_dst)));
                self.stats.checkpoints_created += 1;
                debug!(
                    tag = req.tag.0,
                    checkpoint = checkpoint.0,
                    "checkpoint created"
                );
            }
            self.release_lock = true;
            self.map_table.stage_write(req.rl_dst, req.rp_dst);
        } else {
            trace!(tag = req.tag.0, "rename ignored, mapping table locked");
        }

        self.stats.renames += 1;
        Some(result)
    }

    /// Retires exactly the oldest tag, and with it the oldest checkpoint if
    /// the tag still owns one. Retirement is always oldest-first; identity is
    /// never an input.
    ///
    /// # Panics
    ///
    /// Panics with `tag free underflow` when no tag can be freed (a caller
    /// accounting bug: more frees than allocations).
    pub fn free_tag(&mut self) {
        let freed = self.tags.free();
        self.active_clear.insert(freed.index());

        // A rollback-invalidated tag keeps its checkpointed bit until it is
        // freed here, but its checkpoint slot was already reclaimed by the
        // head reset, so only active owners advance the tail.
        if self.active.contains(freed.index()) && self.checkpointed.contains(freed.index()) {
            let checkpoint = self.checkpoints.free_oldest();
            self.stats.checkpoints_freed += 1;
            debug!(checkpoint = checkpoint.0, "checkpoint freed");
        }
        self.checkpointed_clear.insert(freed.index());

        self.stats.tags_freed += 1;
        debug!(tag = freed.0, "tag freed");
    }

    /// The committed "active" liveness view: a bit per tag, set for tags on a
    /// valid speculative path. Side-effect free.
    #[inline]
    pub fn get_active_tags(&self) -> &TagSet {
        &self.active
    }

    /// Commits the tick boundary: advances the restore pipeline, drains the
    /// deferred capture write, then makes every staged write visible.
    pub fn tick(&mut self) {
        self.advance_restore();

        if let Some((checkpoint, snapshot)) = self.pending_capture.take() {
            self.snapshots.write(checkpoint.index(), snapshot);
        }

        self.tags.update();
        self.checkpoints.update();
        self.snapshots.update();
        self.index.update();
        self.map_table.update();
        self.issue.update();
        self.restore.update();

        self.active.apply(&self.active_set, &self.active_clear);
        self.checkpointed
            .apply(&self.checkpointed_set, &self.checkpointed_clear);
        self.active_set.clear_all();
        self.active_clear.clear_all();
        self.checkpointed_set.clear_all();
        self.checkpointed_clear.clear_all();

        if std::mem::take(&mut self.release_lock) {
            self.lock = false;
        }
        if let Some(tag) = self.end_flush.take() {
            self.flushing = false;
            self.unlock_tag = Some(tag);
            self.restore.ready_tag = None;
        }
        if let Some(target) = self.begin_flush.take() {
            self.flushing = true;
            self.rollback_target = target;
            self.lock = true;
            self.unlock_tag = None;
        }

        self.stats.ticks += 1;
    }

    /// The construction-time geometry.
    #[inline]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Committed physical mapping of architectural register `rl`.
    #[inline]
    pub fn mapping(&self, rl: usize) -> u16 {
        self.map_table.lookup(rl)
    }

    /// The committed mapping table as a slice.
    #[inline]
    pub fn mapping_table(&self) -> &[u16] {
        self.map_table.regs()
    }

    /// Number of currently allocated tags, in `[1, 2^tag_bits]`.
    #[inline]
    pub const fn allocated_tags(&self) -> usize {
        self.tags.allocated()
    }

    /// Number of currently allocated checkpoints.
    #[inline]
    pub const fn allocated_checkpoints(&self) -> usize {
        self.checkpoints.allocated()
    }

    /// Number of tags currently on a valid speculative path.
    #[inline]
    pub fn active_tag_count(&self) -> usize {
        self.active.count_ones()
    }

    /// Whether issuance is resynchronizing after a rollback.
    #[inline]
    pub const fn is_flushing(&self) -> bool {
        self.flushing
    }

    /// Cumulative event counters.
    #[inline]
    pub const fn stats(&self) -> &RatStats {
        &self.stats
    }
}
