//! Common types shared across the checkpoint RAT model.
//!
//! This module provides the fundamental building blocks used by every other
//! module. It includes:
//! 1. **Identifiers:** Strong types for tags and checkpoint ids.
//! 2. **Bitsets:** The fixed-width tag-space bitset used for liveness views.
//! 3. **Error Handling:** Configuration validation errors.

/// Fixed-width bitset over the tag space.
pub mod bitset;

/// Configuration validation errors.
pub mod error;

/// Tag and checkpoint identifier types.
pub mod tag;

pub use bitset::TagSet;
pub use error::ConfigError;
pub use tag::{Checkpoint, Tag};
