//! Cycle-level model of a checkpointing register alias table.
//!
//! This crate implements the speculative rename/rollback subsystem of an
//! out-of-order core:
//! 1. **Mapping table:** the live architectural→physical register map.
//! 2. **Rings:** circularly allocated instruction-group tags and checkpoint slots.
//! 3. **Capture:** saving the full map at branch boundaries, one tick deferred.
//! 4. **Rollback:** restoring the map to any checkpointed tag while issuance
//!    keeps flowing on independent groups.
//! 5. **Retirement:** oldest-first reclamation of tags and checkpoints.
//!
//! Execution is tick-synchronous: operations called between two
//! [`CheckpointRat::tick`] boundaries observe the state committed at the
//! previous boundary, and their writes become visible at the next. `None`
//! returns mean "not ready this tick, retry"; fatal invariant violations
//! (illegal rollback target, retirement underflow) panic.

/// Common types (identifiers, bitsets, errors).
pub mod common;
/// Construction-time configuration.
pub mod config;
/// The checkpoint RAT and its components.
pub mod rat;
/// Cumulative event counters.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Configuration validation error.
pub use crate::common::error::ConfigError;
/// The checkpointing register alias table; construct with `CheckpointRat::new`.
pub use crate::rat::CheckpointRat;
