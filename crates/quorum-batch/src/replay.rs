//! Batch replay
//!
//! Re-executes a finished batch against a freshly seeded owner list the way
//! the contract would, so a reviewer can check every `prevOwner` argument and
//! the resulting owner set before signing.

use quorum_core::{Address, QuorumError, QuorumResult, SafeState, Threshold};
use quorum_state::OwnerList;

use crate::{Batch, SafeCall};

/// State reached after replaying a batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub owners: Vec<Address>,
    pub threshold: Threshold,
}

fn expect_prev(list: &OwnerList, owner: Address, given: Address) -> QuorumResult<()> {
    let actual = list.prev_of(&owner)?;
    if actual != given {
        return Err(QuorumError::StalePredecessor {
            owner,
            expected: actual,
            actual: given,
        });
    }
    Ok(())
}

/// Replay `batch` against the snapshot it was built from
pub fn replay_batch(state: &SafeState, batch: &Batch) -> QuorumResult<ReplayOutcome> {
    let mut list = OwnerList::new(&state.owners);
    let mut threshold = state.threshold;

    for tx in &batch.transactions {
        if tx.to != state.address {
            return Err(QuorumError::MalformedBatch(format!(
                "transaction targets {} instead of {}",
                tx.to, state.address
            )));
        }

        match SafeCall::from_descriptor(tx)? {
            SafeCall::SwapOwner {
                prev_owner,
                old_owner,
                new_owner,
            } => {
                expect_prev(&list, old_owner, prev_owner)?;
                list.apply_swap(old_owner, new_owner)?;
            }
            SafeCall::RemoveOwner {
                prev_owner,
                owner,
                threshold: t,
            } => {
                expect_prev(&list, owner, prev_owner)?;
                list.apply_remove(owner)?;
                threshold = t;
            }
            SafeCall::AddOwnerWithThreshold { owner, threshold: t } => {
                list.apply_add(owner)?;
                threshold = t;
            }
            SafeCall::ChangeThreshold { threshold: t } => threshold = t,
        }
    }

    let owners = list.owners()?;
    threshold.validate_for(owners.len())?;
    Ok(ReplayOutcome { owners, threshold })
}
