//! Configuration for the checkpoint RAT model.
//!
//! This module defines the construction-time parameters of the subsystem.
//! It provides:
//! 1. **Defaults:** Baseline geometry (tag width, checkpoint pool, register counts).
//! 2. **Deserialization:** JSON-friendly `serde` support for harness-driven runs.
//! 3. **Validation:** The invariants a legal geometry must satisfy.
//!
//! Parameters are fixed at construction and never runtime-mutable.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default geometry when not explicitly overridden.
mod defaults {
    /// Tag bit width (16 tags in flight).
    pub const TAG_BITS: u32 = 4;

    /// Checkpoint pool size (6 nested speculation points).
    ///
    /// Must stay strictly below `2^TAG_BITS`: tags outnumber checkpoints
    /// because only branch-closing groups capture one.
    pub const CHECKPOINT_COUNT: usize = 6;

    /// Architectural register count (RV32/RV64 integer file).
    pub const REG_COUNT: usize = 32;

    /// Physical register file size backing the mapping table.
    pub const PHYS_REGS: usize = 64;
}

/// Construction-time parameters of the checkpoint RAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag bit width `B`; the tag space is `[0, 2^B)`.
    pub tag_bits: u32,
    /// Number of checkpoint slots; must be at least 2 and below `2^tag_bits`.
    pub checkpoint_count: usize,
    /// Number of architectural registers in the mapping table. Register 0 is
    /// hard-wired and never renamed.
    pub reg_count: usize,
    /// Number of physical registers the mapping table may name.
    pub phys_regs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_bits: defaults::TAG_BITS,
            checkpoint_count: defaults::CHECKPOINT_COUNT,
            reg_count: defaults::REG_COUNT,
            phys_regs: defaults::PHYS_REGS,
        }
    }
}

impl Config {
    /// Size of the tag space, `2^tag_bits`.
    #[inline]
    pub const fn tag_space(&self) -> usize {
        1 << self.tag_bits
    }

    /// Checks that the geometry is legal.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.tag_bits) {
            return Err(ConfigError::TagBits(self.tag_bits));
        }
        if self.checkpoint_count < 2 {
            return Err(ConfigError::CheckpointCount(self.checkpoint_count));
        }
        if self.tag_space() <= self.checkpoint_count {
            return Err(ConfigError::TagSpaceTooSmall {
                tag_bits: self.tag_bits,
                checkpoint_count: self.checkpoint_count,
            });
        }
        if self.reg_count < 1 {
            return Err(ConfigError::RegCount(self.reg_count));
        }
        if self.phys_regs < self.reg_count {
            return Err(ConfigError::PhysRegs {
                phys_regs: self.phys_regs,
                reg_count: self.reg_count,
            });
        }
        Ok(())
    }
}
