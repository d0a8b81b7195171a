//! Quorum Core - Fundamental types for owner reconciliation
//!
//! This crate defines the types shared by every pipeline stage:
//! - Owner addresses and the linked-list sentinel
//! - Owner sets and signing thresholds
//! - The fetched on-chain snapshot
//! - Error kinds

pub mod address;
pub mod owners;
pub mod error;

pub use address::*;
pub use owners::*;
pub use error::*;
