//! Linked-list owner simulator
//!
//! Mirrors the contract's owner storage: a singly-linked cycle that starts
//! and ends at [`SENTINEL_OWNERS`]. Every emitted transaction is applied here
//! before the next one is built, so each `prevOwner` argument reflects the
//! list as it will be once the earlier transactions in the batch executed.
//!
//! A reverse index is kept beside the successor map so predecessor lookups
//! do not scan the whole list.

use std::collections::HashMap;

use quorum_core::{Address, OwnerSet, QuorumError, QuorumResult, SENTINEL_OWNERS};

use crate::EditOperation;

/// Simulated owner linked list
#[derive(Clone, Debug)]
pub struct OwnerList {
    next: HashMap<Address, Address>,
    prev: HashMap<Address, Address>,
}

impl OwnerList {
    /// Seed from an ordered owner list
    pub fn new(owners: &OwnerSet) -> Self {
        let mut list = OwnerList {
            next: HashMap::with_capacity(owners.len() + 1),
            prev: HashMap::with_capacity(owners.len() + 1),
        };

        let mut cursor = SENTINEL_OWNERS;
        for owner in owners.iter() {
            list.link(cursor, *owner);
            cursor = *owner;
        }
        list.link(cursor, SENTINEL_OWNERS);
        list
    }

    fn link(&mut self, from: Address, to: Address) {
        self.next.insert(from, to);
        self.prev.insert(to, from);
    }

    /// Number of owners currently linked
    pub fn len(&self) -> usize {
        self.next.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if an owner is linked
    pub fn contains(&self, owner: &Address) -> bool {
        *owner != SENTINEL_OWNERS && self.next.contains_key(owner)
    }

    /// Successor of an owner (or of the sentinel)
    pub fn next_of(&self, owner: &Address) -> QuorumResult<Address> {
        self.next
            .get(owner)
            .copied()
            .ok_or(QuorumError::OwnerNotLinked(*owner))
    }

    /// Predecessor of a linked owner; the sentinel for the head
    pub fn prev_of(&self, owner: &Address) -> QuorumResult<Address> {
        if !self.contains(owner) {
            return Err(QuorumError::OwnerNotLinked(*owner));
        }
        self.prev
            .get(owner)
            .copied()
            .ok_or_else(|| QuorumError::LinkedListCorrupted(format!("{owner} has no predecessor")))
    }

    /// Tail of the list, or the sentinel when empty
    pub fn last_owner(&self) -> Address {
        self.prev
            .get(&SENTINEL_OWNERS)
            .copied()
            .unwrap_or(SENTINEL_OWNERS)
    }

    /// Replace `old` in place with `new`
    pub fn apply_swap(&mut self, old: Address, new: Address) -> QuorumResult<()> {
        self.ensure_absent(&new)?;
        let prev = self.prev_of(&old)?;
        let next = self.next_of(&old)?;

        self.drop_owner(&old);
        self.link(prev, new);
        self.link(new, next);
        Ok(())
    }

    /// Unlink `owner`, joining its neighbours
    pub fn apply_remove(&mut self, owner: Address) -> QuorumResult<()> {
        let prev = self.prev_of(&owner)?;
        let next = self.next_of(&owner)?;

        self.drop_owner(&owner);
        self.link(prev, next);
        Ok(())
    }

    /// Append `owner` at the tail
    pub fn apply_add(&mut self, owner: Address) -> QuorumResult<()> {
        self.ensure_absent(&owner)?;
        let last = self.last_owner();

        self.link(last, owner);
        self.link(owner, SENTINEL_OWNERS);
        Ok(())
    }

    /// Apply one edit operation
    pub fn apply(&mut self, op: &EditOperation) -> QuorumResult<()> {
        match *op {
            EditOperation::Swap { old, new } => self.apply_swap(old, new),
            EditOperation::Add { owner } => self.apply_add(owner),
            EditOperation::Remove { owner } => self.apply_remove(owner),
        }
    }

    fn ensure_absent(&self, owner: &Address) -> QuorumResult<()> {
        if owner.is_reserved() {
            return Err(QuorumError::ReservedAddress(*owner));
        }
        if self.contains(owner) {
            return Err(QuorumError::OwnerAlreadyLinked(*owner));
        }
        Ok(())
    }

    fn drop_owner(&mut self, owner: &Address) {
        self.next.remove(owner);
        self.prev.remove(owner);
    }

    /// Walk from the sentinel and collect owners in list order.
    ///
    /// Fails if the walk does not visit every linked owner exactly once
    /// before returning to the sentinel.
    pub fn owners(&self) -> QuorumResult<Vec<Address>> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self.next_of(&SENTINEL_OWNERS)?;

        while cursor != SENTINEL_OWNERS {
            if out.len() >= self.len() {
                return Err(QuorumError::LinkedListCorrupted(
                    "cycle does not return to sentinel".into(),
                ));
            }
            out.push(cursor);
            cursor = self.next_of(&cursor)?;
        }

        if out.len() != self.len() || self.prev.len() != self.next.len() {
            return Err(QuorumError::LinkedListCorrupted(format!(
                "walk visited {} of {} owners",
                out.len(),
                self.len()
            )));
        }
        Ok(out)
    }

    /// Verify the cycle invariant
    pub fn check_invariant(&self) -> QuorumResult<()> {
        self.owners().map(|_| ())
    }
}
