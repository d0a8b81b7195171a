//! Owner sets, thresholds and the fetched multisig snapshot

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, QuorumError, QuorumResult};

/// Ordered, duplicate-free owner list as held on-chain.
///
/// Order only matters for linked-list pointer construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OwnerSet(Vec<Address>);

impl OwnerSet {
    /// Validate and wrap an owner list
    pub fn new(owners: Vec<Address>) -> QuorumResult<Self> {
        let mut seen = HashSet::with_capacity(owners.len());
        for owner in &owners {
            if owner.is_reserved() {
                return Err(QuorumError::ReservedAddress(*owner));
            }
            if !seen.insert(*owner) {
                return Err(QuorumError::DuplicateOwner(*owner));
            }
        }
        Ok(OwnerSet(owners))
    }

    /// Parse a list of hex addresses
    pub fn parse<S: AsRef<str>>(owners: &[S]) -> QuorumResult<Self> {
        let parsed = owners
            .iter()
            .map(|s| Address::parse(s.as_ref()))
            .collect::<QuorumResult<Vec<_>>>()?;
        OwnerSet::new(parsed)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, owner: &Address) -> bool {
        self.0.contains(owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Address> {
        self.0
    }

    /// Membership equality, ignoring order
    pub fn same_members(&self, other: &OwnerSet) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}

impl<'de> Deserialize<'de> for OwnerSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let owners = Vec::<Address>::deserialize(deserializer)?;
        OwnerSet::new(owners).map_err(serde::de::Error::custom)
    }
}

/// Signing threshold
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(pub u64);

impl Threshold {
    #[inline]
    pub fn new(value: u64) -> Self {
        Threshold(value)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Check `1 <= threshold <= owner_count`
    pub fn validate_for(self, owner_count: usize) -> QuorumResult<()> {
        if self.0 < 1 || self.0 > owner_count as u64 {
            return Err(QuorumError::ThresholdOutOfRange {
                threshold: self.0,
                owners: owner_count,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Threshold({})", self.0)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a deployed multisig, fetched once and never mutated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeState {
    pub address: Address,
    pub owners: OwnerSet,
    pub threshold: Threshold,
}

impl SafeState {
    pub fn new(address: Address, owners: OwnerSet, threshold: Threshold) -> Self {
        SafeState {
            address,
            owners,
            threshold,
        }
    }
}
