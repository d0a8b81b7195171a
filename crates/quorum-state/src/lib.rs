//! Quorum State Engine - Owner diffing and list simulation
//!
//! This crate implements the reconciliation core:
//! - Owner alignment against current positions
//! - Minimal edit script (swap/add/remove)
//! - Simulation of the contract's singly-linked owner list

pub mod align;
pub mod edit;
pub mod linked_list;

pub use align::*;
pub use edit::*;
pub use linked_list::*;
