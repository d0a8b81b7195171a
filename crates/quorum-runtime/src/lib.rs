//! Quorum Runtime - Owner reconciliation pipeline
//!
//! Runs one reconciliation end to end:
//! 1. Fetch current owners and threshold
//! 2. Resolve and validate the target threshold
//! 3. Align desired owners against current positions
//! 4. Compute the minimal edit script
//! 5. Assemble transactions against the simulated owner list
//! 6. Build and stamp the batch

pub mod config;
pub mod fetcher;
pub mod logging;
pub mod reconciler;

pub use config::*;
pub use fetcher::*;
pub use logging::*;
pub use reconciler::*;
