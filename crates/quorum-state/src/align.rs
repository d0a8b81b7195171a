//! Owner alignment
//!
//! Reorders the desired owners so that owners kept from the current list sit
//! at their current index. Without this, an unrelated insertion or removal
//! shifts indices and unchanged owners show up as swaps.

use std::collections::HashSet;

use quorum_core::{Address, OwnerSet, QuorumResult};

/// Align `desired` against `current`.
///
/// Kept owners are placed at their current index; the resulting holes are
/// filled left to right with the remaining desired owners in their original
/// order, and leftovers are appended past the end of `current`. Holes nothing
/// fills are dropped and resolve to removals.
pub fn align_owners(current: &OwnerSet, desired: &[Address]) -> QuorumResult<OwnerSet> {
    let desired = OwnerSet::new(desired.to_vec())?;
    let wanted: HashSet<Address> = desired.iter().copied().collect();

    let mut pool = desired
        .iter()
        .filter(|owner| !current.contains(owner))
        .copied();

    let mut aligned = Vec::with_capacity(current.len().max(desired.len()));
    for owner in current.iter() {
        if wanted.contains(owner) {
            aligned.push(*owner);
        } else if let Some(filler) = pool.next() {
            aligned.push(filler);
        }
    }
    aligned.extend(pool);

    OwnerSet::new(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(0x100 + n)
    }

    fn set(ids: &[u64]) -> OwnerSet {
        OwnerSet::new(ids.iter().map(|&n| addr(n)).collect()).unwrap()
    }

    fn list(ids: &[u64]) -> Vec<Address> {
        ids.iter().map(|&n| addr(n)).collect()
    }

    #[test]
    fn test_kept_owners_hold_position() {
        // current [A, B, C], desired {A, C, D}
        let aligned = align_owners(&set(&[1, 2, 3]), &list(&[1, 3, 4])).unwrap();
        assert_eq!(aligned.as_slice(), list(&[1, 4, 3]).as_slice());
    }

    #[test]
    fn test_leftovers_appended() {
        let aligned = align_owners(&set(&[1, 2]), &list(&[5, 2, 6, 7])).unwrap();
        assert_eq!(aligned.as_slice(), list(&[5, 2, 6, 7]).as_slice());
    }

    #[test]
    fn test_unfilled_holes_dropped() {
        let aligned = align_owners(&set(&[1, 2, 3, 4]), &list(&[3, 9])).unwrap();
        assert_eq!(aligned.as_slice(), list(&[9, 3]).as_slice());
    }

    #[test]
    fn test_empty_current_keeps_desired_order() {
        let aligned = align_owners(&set(&[]), &list(&[3, 1, 2])).unwrap();
        assert_eq!(aligned.as_slice(), list(&[3, 1, 2]).as_slice());
    }

    #[test]
    fn test_empty_desired() {
        let aligned = align_owners(&set(&[1, 2]), &[]).unwrap();
        assert!(aligned.is_empty());
    }

    #[test]
    fn test_duplicate_desired_rejected() {
        let err = align_owners(&set(&[1]), &list(&[2, 2])).unwrap_err();
        assert_eq!(err.kind(), quorum_core::ErrorKind::Validation);
    }
}
