//! Configuration validation errors.
//!
//! Construction is the only fallible surface of this crate: once a
//! [`Config`](crate::config::Config) has validated, runtime misuse is a caller
//! bug and panics rather than propagating a value (illegal rollback target,
//! retirement underflow). Everything else is `Option`-typed flow control.

use thiserror::Error;

/// Errors reported when a [`Config`](crate::config::Config) fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The checkpoint pool is degenerate. A capacity of one cannot work with
    /// oldest-first retirement freeing.
    #[error("checkpoint_count must be at least 2, got {0}")]
    CheckpointCount(usize),

    /// The tag space must be strictly larger than the checkpoint pool, since
    /// not every tag carries a checkpoint.
    #[error("tag space 2^{tag_bits} must exceed checkpoint_count {checkpoint_count}")]
    TagSpaceTooSmall {
        /// Configured tag bit width.
        tag_bits: u32,
        /// Configured checkpoint pool size.
        checkpoint_count: usize,
    },

    /// Tag identifiers are 16-bit; zero-width tag spaces are meaningless.
    #[error("tag_bits must be in 1..=16, got {0}")]
    TagBits(u32),

    /// The mapping table must cover at least one architectural register.
    #[error("reg_count must be at least 1, got {0}")]
    RegCount(usize),

    /// The physical register file must be able to back the initial identity
    /// mapping.
    #[error("phys_regs ({phys_regs}) must be at least reg_count ({reg_count})")]
    PhysRegs {
        /// Configured physical register count.
        phys_regs: usize,
        /// Configured architectural register count.
        reg_count: usize,
    },
}
