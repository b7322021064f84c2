//! The mapping table: live architectural→physical register map.
//!
//! One staged writer (rename) and one staged override (restore) per tick;
//! lookups always observe the committed state, giving read-before-write
//! semantics within a tick.

use tracing::trace;

/// Architectural→physical register mapping, initialized to the identity map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTable {
    regs: Vec<u16>,
    pending_write: Option<(usize, u16)>,
    pending_restore: Option<Vec<u16>>,
}

impl MapTable {
    /// Creates the identity mapping over `reg_count` architectural registers.
    pub fn new(reg_count: usize) -> Self {
        Self {
            regs: (0..reg_count).map(|rl| rl as u16).collect(),
            pending_write: None,
            pending_restore: None,
        }
    }

    /// Committed physical mapping of architectural register `rl`.
    #[inline]
    pub fn lookup(&self, rl: usize) -> u16 {
        self.regs[rl]
    }

    /// The committed mapping as a slice.
    #[inline]
    pub fn regs(&self) -> &[u16] {
        &self.regs
    }

    /// Stages `rl -> rp`, visible from the next tick. Register 0 is
    /// hard-wired and never written.
    pub fn stage_write(&mut self, rl: usize, rp: u16) {
        if rl == 0 {
            return;
        }
        debug_assert!(self.pending_write.is_none(), "one rename write per tick");
        trace!(rl, rp, "mapping table write");
        self.pending_write = Some((rl, rp));
    }

    /// Stages a wholesale overwrite with `snapshot`, visible from the next
    /// tick.
    pub fn stage_restore(&mut self, snapshot: Vec<u16>) {
        debug_assert_eq!(snapshot.len(), self.regs.len());
        self.pending_restore = Some(snapshot);
    }

    /// The committed mapping with `rl -> rp` applied on top — the state a
    /// checkpoint captured at this rename must hold.
    pub fn snapshot_with(&self, rl: usize, rp: u16) -> Vec<u16> {
        let mut snapshot = self.regs.clone();
        if rl != 0 {
            snapshot[rl] = rp;
        }
        snapshot
    }

    /// Commits the tick boundary. A restore and a rename write never coexist
    /// in one tick: the table is locked for the whole restore window.
    pub fn update(&mut self) {
        if let Some(snapshot) = self.pending_restore.take() {
            debug_assert!(self.pending_write.is_none(), "write staged under lock");
            self.regs = snapshot;
            self.pending_write = None;
        } else if let Some((rl, rp)) = self.pending_write.take() {
            self.regs[rl] = rp;
        }
    }
}
