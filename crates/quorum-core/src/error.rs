//! Error types for owner reconciliation

use thiserror::Error;

use crate::Address;

/// Broad classification of a failure.
///
/// Validation errors come from caller input, state fetch errors from the
/// read-only contract calls, and invariant errors indicate a defect in the
/// pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    StateFetch,
    Invariant,
}

/// Core Quorum errors
#[derive(Error, Debug)]
pub enum QuorumError {
    // Validation errors
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Address checksum mismatch: {0}")]
    AddressChecksumMismatch(String),

    #[error("Reserved address cannot be an owner: {0}")]
    ReservedAddress(Address),

    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Threshold {threshold} out of range for {owners} owners")]
    ThresholdOutOfRange { threshold: u64, owners: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed batch: {0}")]
    MalformedBatch(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    // State fetch errors
    #[error("State fetch failed: {0}")]
    StateFetch(String),

    // Invariant errors
    #[error("Edit script dead end at ({row}, {col})")]
    BacktrackDeadEnd { row: usize, col: usize },

    #[error("Owner not linked: {0}")]
    OwnerNotLinked(Address),

    #[error("Owner already linked: {0}")]
    OwnerAlreadyLinked(Address),

    #[error("Stale predecessor for {owner}: expected {expected}, got {actual}")]
    StalePredecessor {
        owner: Address,
        expected: Address,
        actual: Address,
    },

    #[error("Linked list corrupted: {0}")]
    LinkedListCorrupted(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl QuorumError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuorumError::InvalidAddress(_)
            | QuorumError::AddressChecksumMismatch(_)
            | QuorumError::ReservedAddress(_)
            | QuorumError::DuplicateOwner(_)
            | QuorumError::MissingInput(_)
            | QuorumError::InvalidConfig(_)
            | QuorumError::ThresholdOutOfRange { .. }
            | QuorumError::MalformedBatch(_)
            | QuorumError::ChecksumMismatch { .. } => ErrorKind::Validation,
            QuorumError::StateFetch(_) => ErrorKind::StateFetch,
            QuorumError::BacktrackDeadEnd { .. }
            | QuorumError::OwnerNotLinked(_)
            | QuorumError::OwnerAlreadyLinked(_)
            | QuorumError::StalePredecessor { .. }
            | QuorumError::LinkedListCorrupted(_)
            | QuorumError::Serialization(_) => ErrorKind::Invariant,
        }
    }
}

/// Result type for Quorum operations
pub type QuorumResult<T> = Result<T, QuorumError>;
