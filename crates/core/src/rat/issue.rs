//! Tag issuance and post-rollback resynchronization.
//!
//! Every instruction group asks for its tag here, once per tick. In normal
//! operation a fresh tag is allocated only when the previous group closed
//! with a checkpoint boundary; otherwise the last tag is reused, so a tag
//! names the whole run of groups between two branches.
//!
//! After a rollback the controller runs in *flushing* mode. Issuance and
//! rollback resolution are temporally decoupled, so the two rendezvous on tag
//! identity instead of a global stall: groups still on the abandoned path
//! receive tags that are never marked active, the group that names the
//! rollback target stalls until the restore pipeline publishes its ready tag,
//! and then exactly one new active tag is issued, recorded as the mapping
//! table's unblocking tag, and normal issuance resumes.

use tracing::{debug, trace};

use crate::common::tag::Tag;

use super::CheckpointRat;

/// Per-group input to [`CheckpointRat::tag`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TagRequest {
    /// Tag at which a re-fetched stream expects to resynchronize.
    pub rollback_tag: Tag,
    /// Whether `rollback_tag` carries a meaningful value.
    pub rollback_tag_valid: bool,
    /// This group closes with a checkpoint boundary (branch).
    pub commit_checkpoint: bool,
}

/// Per-group output of [`CheckpointRat::tag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagIssue {
    /// Tag assigned to the group.
    pub tag: Tag,
    /// Whether this call allocated a fresh tag (as opposed to reusing the
    /// previous one).
    pub tag_increment: bool,
    /// `commit_checkpoint` as the downstream rename must see it; forced off
    /// on the abandoned path.
    pub commit_checkpoint: bool,
}

/// Sequential state of the issuance controller.
#[derive(Debug)]
pub(crate) struct IssueState {
    /// Tag handed to the previous group.
    pub(crate) last_tag: Tag,
    /// The previous group closed with a checkpoint, so the next one gets a
    /// fresh tag.
    pub(crate) pending_increment: bool,
    next_last_tag: Option<Tag>,
    next_increment: Option<bool>,
}

impl IssueState {
    pub(crate) const fn new() -> Self {
        Self {
            last_tag: Tag(0),
            pending_increment: false,
            next_last_tag: None,
            next_increment: None,
        }
    }

    fn stage(&mut self, last_tag: Tag, increment: bool) {
        debug_assert!(self.next_last_tag.is_none(), "tag() called twice in a tick");
        self.next_last_tag = Some(last_tag);
        self.next_increment = Some(increment);
    }

    pub(crate) fn update(&mut self) {
        if let Some(tag) = self.next_last_tag.take() {
            self.last_tag = tag;
        }
        if let Some(increment) = self.next_increment.take() {
            self.pending_increment = increment;
        }
    }
}

impl CheckpointRat {
    /// Issues the tag for the next instruction group.
    ///
    /// Returns `None` (retry next tick) when a fresh tag is needed but the
    /// ring is full, or when the group names the rollback target before the
    /// restore pipeline is ready for it.
    pub fn tag(&mut self, req: &TagRequest) -> Option<TagIssue> {
        let issue = if self.flushing {
            self.tag_flushing(req)
        } else {
            self.tag_normal(req)
        };
        if issue.is_some() {
            self.stats.tags_issued += 1;
        }
        issue
    }

    fn tag_normal(&mut self, req: &TagRequest) -> Option<TagIssue> {
        let increment = self.issue.pending_increment;
        let tag = if increment {
            self.allocate_issue_tag(true)?
        } else {
            self.issue.last_tag
        };
        self.issue.stage(tag, req.commit_checkpoint);
        trace!(
            tag = tag.0,
            increment,
            commit_checkpoint = req.commit_checkpoint,
            "tag issued"
        );
        Some(TagIssue {
            tag,
            tag_increment: increment,
            commit_checkpoint: req.commit_checkpoint,
        })
    }

    fn tag_flushing(&mut self, req: &TagRequest) -> Option<TagIssue> {
        let at_target = req.rollback_tag_valid && req.rollback_tag == self.rollback_target;
        let restore_ready =
            req.rollback_tag_valid && self.restore.ready_tag == Some(req.rollback_tag);

        if at_target && !restore_ready {
            // The restore has not reached the unblock point yet.
            self.stats.issue_stalls += 1;
            trace!(rollback_tag = req.rollback_tag.0, "issue stalled on restore");
            return None;
        }

        if at_target {
            // Rendezvous reached: one fresh active tag unblocks the table and
            // ends the flush.
            let tag = self.allocate_issue_tag(true)?;
            self.end_flush = Some(tag);
            self.issue.stage(tag, req.commit_checkpoint);
            debug!(tag = tag.0, "flush complete, issuance resynchronized");
            return Some(TagIssue {
                tag,
                tag_increment: true,
                commit_checkpoint: req.commit_checkpoint,
            });
        }

        // Abandoned path: tags keep flowing so independent groups are not
        // globally stalled, but they never become active and never capture.
        let increment = self.issue.pending_increment;
        let tag = if increment {
            self.allocate_issue_tag(false)?
        } else {
            self.issue.last_tag
        };
        self.issue.stage(tag, false);
        trace!(tag = tag.0, "inactive tag issued while flushing");
        Some(TagIssue {
            tag,
            tag_increment: increment,
            commit_checkpoint: false,
        })
    }

    fn allocate_issue_tag(&mut self, active: bool) -> Option<Tag> {
        let Some(tag) = self.tags.allocate() else {
            self.stats.issue_stalls += 1;
            return None;
        };
        if active {
            self.active_set.insert(tag.index());
        }
        self.stats.tags_allocated += 1;
        Some(tag)
    }
}
