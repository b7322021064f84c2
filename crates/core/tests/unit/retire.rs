//! # Retirement Tests
//!
//! Retirement is oldest-first and identity-free: `free_tag` takes no
//! argument, frees exactly the oldest allocated tag, and reclaims the
//! oldest checkpoint only when the freed tag still owns one.

use rat_core::common::Tag;

use crate::common::TestRat;

#[test]
fn test_free_retires_oldest() {
    let mut t = TestRat::new(3, 4, 8);
    assert_eq!(t.group(1, 10, true), Tag(0));
    assert_eq!(t.group(2, 11, true), Tag(1));
    assert_eq!(t.group(3, 12, false), Tag(2));
    assert_eq!(t.rat.allocated_tags(), 3);
    assert_eq!(t.active(), vec![0, 1, 2]);

    t.rat.free_tag();
    t.rat.tick();
    assert_eq!(t.rat.allocated_tags(), 2);
    assert_eq!(t.active(), vec![1, 2]);

    t.rat.free_tag();
    t.rat.tick();
    assert_eq!(t.rat.allocated_tags(), 1);
    assert_eq!(t.active(), vec![2]);
}

#[test]
fn test_free_reclaims_owned_checkpoint() {
    let mut t = TestRat::new(3, 4, 8);
    assert_eq!(t.group(1, 10, true), Tag(0)); // captures
    assert_eq!(t.group(2, 11, false), Tag(1)); // no capture
    assert_eq!(t.rat.allocated_checkpoints(), 1);

    // Tag 0 owns a checkpoint; freeing it releases the slot.
    t.rat.free_tag();
    t.rat.tick();
    assert_eq!(t.rat.allocated_checkpoints(), 0);
    assert_eq!(t.rat.stats().checkpoints_freed, 1);
}

#[test]
fn test_free_of_uncheckpointed_tag_leaves_pool() {
    let mut t = TestRat::new(3, 4, 8);
    assert_eq!(t.group(1, 10, false), Tag(0)); // no boundary
    assert_eq!(t.group(2, 11, true), Tag(0)); // same tag, captures this time
    assert_eq!(t.group(3, 12, false), Tag(1));

    // Tag 0 owns the only checkpoint; freeing it drains the pool.
    assert_eq!(t.rat.allocated_checkpoints(), 1);
    t.rat.free_tag();
    t.rat.tick();
    assert_eq!(t.rat.allocated_checkpoints(), 0);

    // Allocate tag 2 so tag 1 is retirable, then free tag 1.
    assert_eq!(t.group(4, 13, true), Tag(1)); // boundary group
    assert_eq!(t.group(5, 14, false), Tag(2));
    assert_eq!(t.rat.allocated_checkpoints(), 1);
    // Tag 1 owns the live checkpoint now; freeing it drains the pool again.
    t.rat.free_tag();
    t.rat.tick();
    assert_eq!(t.rat.allocated_checkpoints(), 0);
    assert_eq!(t.rat.allocated_tags(), 1);
}

#[test]
fn test_invalidated_tag_frees_no_checkpoint() {
    // After a rollback the abandoned suffix keeps its checkpointed bits, but
    // the head reset already reclaimed those slots; retirement must not
    // double-free them.
    let mut t = TestRat::new(3, 4, 4);
    assert_eq!(t.group(1, 10, true), Tag(0));
    assert_eq!(t.group(2, 11, true), Tag(1));
    assert_eq!(t.group(3, 12, true), Tag(2));
    t.rat.rollback(Tag(1));
    t.rat.tick();
    t.rat.tick();
    let issue = t.issue_resync(Tag(1), false).unwrap();
    assert_eq!(issue.tag, Tag(3));
    t.rat.tick();
    assert_eq!(t.rat.allocated_checkpoints(), 1); // tag 0's

    t.rat.free_tag(); // tag 0: active + checkpointed, frees its slot
    t.rat.tick();
    assert_eq!(t.rat.allocated_checkpoints(), 0);

    t.rat.free_tag(); // tag 1: rollback target, checkpointed bit dropped
    t.rat.tick();
    t.rat.free_tag(); // tag 2: invalidated, inactive
    t.rat.tick();
    assert_eq!(t.rat.allocated_checkpoints(), 0);
    assert_eq!(t.rat.allocated_tags(), 1);
    assert_eq!(t.rat.stats().checkpoints_freed, 1);
}

#[test]
#[should_panic(expected = "tag free underflow")]
fn test_free_underflow_panics() {
    let mut t = TestRat::new(3, 4, 8);
    // Only the reset tag is allocated; the protocol always keeps at least
    // one tag live.
    t.rat.free_tag();
}

#[test]
#[should_panic(expected = "tag free underflow")]
fn test_free_below_one_tag_panics() {
    let mut t = TestRat::new(3, 4, 8);
    assert_eq!(t.group(1, 10, true), Tag(0));
    assert_eq!(t.group(2, 11, false), Tag(1));
    t.rat.free_tag();
    t.rat.tick();
    t.rat.free_tag(); // only tag 1 remains
}
