//! # Scenario Tests
//!
//! Protocol-level tests for the checkpoint RAT, grouped by concern.


/// Tag issuance: reuse vs. increment, stalls, and flush-mode behavior.
pub mod issue;


/// Oldest-first retirement and checkpoint reclamation.
pub mod retire;
