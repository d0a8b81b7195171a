//! Transaction assembler
//!
//! Walks the edit script in lockstep with the simulated owner list. Each
//! operation reads its predecessor from the list, becomes a descriptor, and
//! is applied to the list before the next operation is looked at.

use std::fmt;

use quorum_core::{Address, QuorumResult, SafeState, Threshold};
use quorum_state::{EditOperation, OwnerList};

use crate::{SafeCall, TransactionDescriptor};

/// What a reconciliation run is going to change
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub swaps: u32,
    pub adds: u32,
    pub removes: u32,
    pub old_threshold: Threshold,
    pub new_threshold: Threshold,
    /// A trailing `changeThreshold` call was emitted
    pub threshold_call: bool,
}

impl PlanSummary {
    pub fn operation_count(&self) -> u32 {
        self.swaps + self.adds + self.removes
    }

    pub fn is_noop(&self) -> bool {
        self.operation_count() == 0 && self.old_threshold == self.new_threshold
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} swap, {} add, {} remove; threshold {} -> {}",
            self.swaps, self.adds, self.removes, self.old_threshold, self.new_threshold
        )
    }
}

/// Output of one assembly pass
#[derive(Clone, Debug)]
pub struct Assembly {
    pub transactions: Vec<TransactionDescriptor>,
    pub summary: PlanSummary,
}

/// Lockstep transaction assembler
pub struct TransactionAssembler {
    safe: Address,
    list: OwnerList,
    current_threshold: Threshold,
    target_threshold: Threshold,
}

impl TransactionAssembler {
    /// Create an assembler for `state`, checking `target_threshold` against
    /// the size of the final desired owner set.
    pub fn new(
        state: &SafeState,
        desired_owner_count: usize,
        target_threshold: Threshold,
    ) -> QuorumResult<Self> {
        target_threshold.validate_for(desired_owner_count)?;

        Ok(TransactionAssembler {
            safe: state.address,
            list: OwnerList::new(&state.owners),
            current_threshold: state.threshold,
            target_threshold,
        })
    }

    /// Simulated list as it stands after the operations assembled so far
    pub fn list(&self) -> &OwnerList {
        &self.list
    }

    /// Convert one operation and apply it to the simulated list
    fn emit(&mut self, op: &EditOperation) -> QuorumResult<SafeCall> {
        let call = match *op {
            EditOperation::Swap { old, new } => SafeCall::SwapOwner {
                prev_owner: self.list.prev_of(&old)?,
                old_owner: old,
                new_owner: new,
            },
            EditOperation::Remove { owner } => SafeCall::RemoveOwner {
                prev_owner: self.list.prev_of(&owner)?,
                owner,
                threshold: self.target_threshold,
            },
            EditOperation::Add { owner } => SafeCall::AddOwnerWithThreshold {
                owner,
                threshold: self.target_threshold,
            },
        };

        self.list.apply(op)?;
        Ok(call)
    }

    /// Assemble the full transaction list for `ops`
    pub fn assemble(mut self, ops: &[EditOperation]) -> QuorumResult<Assembly> {
        let mut summary = PlanSummary {
            old_threshold: self.current_threshold,
            new_threshold: self.target_threshold,
            ..PlanSummary::default()
        };
        let mut transactions = Vec::with_capacity(ops.len() + 1);

        for op in ops {
            let call = self.emit(op)?;
            match op {
                EditOperation::Swap { .. } => summary.swaps += 1,
                EditOperation::Add { .. } => summary.adds += 1,
                EditOperation::Remove { .. } => summary.removes += 1,
            }
            tracing::debug!(method = call.method_name(), ?op, "transaction emitted");
            transactions.push(call.to_descriptor(self.safe));
        }

        // Add/Remove already carry the target threshold
        let carries_threshold = ops.iter().any(EditOperation::changes_membership_count);
        if self.target_threshold != self.current_threshold && !carries_threshold {
            let call = SafeCall::ChangeThreshold {
                threshold: self.target_threshold,
            };
            tracing::debug!(threshold = %self.target_threshold, "threshold-only change emitted");
            transactions.push(call.to_descriptor(self.safe));
            summary.threshold_call = true;
        }

        self.list.check_invariant()?;
        Ok(Assembly {
            transactions,
            summary,
        })
    }
}
