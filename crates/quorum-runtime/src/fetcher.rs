//! State fetching seam
//!
//! The two read-only contract calls live behind [`OwnerReader`]; transport and
//! endpoint selection belong to whoever implements it.

use quorum_core::{Address, OwnerSet, QuorumError, QuorumResult, SafeState, Threshold};

/// Read-only access to a deployed multisig
pub trait OwnerReader {
    fn get_owners(&self, safe: Address) -> QuorumResult<Vec<Address>>;
    fn get_threshold(&self, safe: Address) -> QuorumResult<u64>;
}

/// Produces the current snapshot of a multisig
pub trait StateFetcher {
    fn fetch(&self, safe: Address) -> QuorumResult<SafeState>;
}

fn fetch_error(err: QuorumError) -> QuorumError {
    match err {
        QuorumError::StateFetch(_) => err,
        other => QuorumError::StateFetch(other.to_string()),
    }
}

/// Fetcher backed by the contract's `getOwners` / `getThreshold` calls
pub struct ContractStateFetcher<R> {
    reader: R,
}

impl<R: OwnerReader> ContractStateFetcher<R> {
    pub fn new(reader: R) -> Self {
        ContractStateFetcher { reader }
    }
}

impl<R: OwnerReader> StateFetcher for ContractStateFetcher<R> {
    fn fetch(&self, safe: Address) -> QuorumResult<SafeState> {
        let owners = self.reader.get_owners(safe).map_err(fetch_error)?;
        let threshold = self.reader.get_threshold(safe).map_err(fetch_error)?;

        let owners = OwnerSet::new(owners).map_err(fetch_error)?;
        let threshold = Threshold::new(threshold);
        threshold.validate_for(owners.len()).map_err(fetch_error)?;

        tracing::debug!(%safe, owners = owners.len(), %threshold, "state fetched");
        Ok(SafeState::new(safe, owners, threshold))
    }
}

/// Fetcher returning a fixed snapshot
#[derive(Clone, Debug)]
pub struct StaticFetcher {
    state: SafeState,
}

impl StaticFetcher {
    pub fn new(state: SafeState) -> Self {
        StaticFetcher { state }
    }
}

impl StateFetcher for StaticFetcher {
    fn fetch(&self, safe: Address) -> QuorumResult<SafeState> {
        if safe != self.state.address {
            return Err(QuorumError::StateFetch(format!("unknown multisig {safe}")));
        }
        Ok(self.state.clone())
    }
}
