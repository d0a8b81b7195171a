//! Quorum Batch - Proposal artifact construction
//!
//! Turns an owner edit script into a reviewable transaction batch:
//! - Contract-call descriptors for the multisig owner manager
//! - Lockstep assembly against the simulated owner list
//! - Batch document compatible with the batch-execution tool
//! - Canonical checksum stamping and verification
//! - Replay of a finished batch against a fresh owner list

pub mod transaction;
pub mod assembler;
pub mod batch;
pub mod checksum;
pub mod replay;

pub use transaction::*;
pub use assembler::*;
pub use batch::*;
pub use checksum::*;
pub use replay::*;
