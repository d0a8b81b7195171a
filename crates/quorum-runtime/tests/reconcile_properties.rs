//! Property-based tests for the reconciliation pipeline.
//!
//! Every generated case fetches a random owner list, reconciles it against a
//! random desired set and threshold, and checks the produced batch.

use proptest::prelude::*;

use quorum_batch::{
    compute_checksum, replay_batch, verify_checksum, SafeCall, METHOD_ADD_OWNER,
    METHOD_CHANGE_THRESHOLD, METHOD_REMOVE_OWNER,
};
use quorum_core::{Address, OwnerSet, SafeState, Threshold};
use quorum_runtime::{FixedClock, ReconcileConfig, ReconcileRequest, Reconciler, StaticFetcher};
use quorum_state::{align_owners, OwnerList};

const SAFE: u64 = 0xfeed;

fn addr(n: u64) -> Address {
    Address::from_low_u64(0x1000 + n)
}

/// Strategy for a shuffled, duplicate-free owner list drawn from a small pool
/// so current and desired sets overlap often.
fn owner_list() -> impl Strategy<Value = Vec<Address>> {
    prop::sample::subsequence((0u64..12).collect::<Vec<_>>(), 1..=8)
        .prop_shuffle()
        .prop_map(|ids| ids.into_iter().map(addr).collect())
}

/// Strategy for (current owners, current threshold, desired owners, target threshold)
fn scenario() -> impl Strategy<Value = (Vec<Address>, u64, Vec<Address>, u64)> {
    (owner_list(), owner_list()).prop_flat_map(|(current, desired)| {
        let current_len = current.len() as u64;
        let desired_len = desired.len() as u64;
        (
            Just(current),
            1..=current_len,
            Just(desired),
            1..=desired_len,
        )
    })
}

/// Reference two-row Levenshtein distance
fn reference_distance(a: &[Address], b: &[Address]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, x) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, y) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(x != y);
            row[j + 1] = sub.min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

fn run(
    current: &[Address],
    current_threshold: u64,
    desired: &[Address],
    target: u64,
) -> quorum_runtime::Reconciliation {
    let state = SafeState::new(
        addr(SAFE),
        OwnerSet::new(current.to_vec()).unwrap(),
        Threshold::new(current_threshold),
    );
    let reconciler = Reconciler::with_clock(
        StaticFetcher::new(state),
        ReconcileConfig::new("1"),
        FixedClock(1_700_000_000_000),
    );
    reconciler
        .run(&ReconcileRequest::new(addr(SAFE), desired.to_vec()).with_threshold(Threshold::new(target)))
        .unwrap()
}

proptest! {
    /// Property: replaying the batch reaches exactly the desired owner set.
    #[test]
    fn prop_replay_reaches_desired_set(
        (current, current_t, desired, target) in scenario()
    ) {
        let result = run(&current, current_t, &desired, target);
        let outcome = replay_batch(&result.state, &result.batch).unwrap();

        let reached = OwnerSet::new(outcome.owners).unwrap();
        let wanted = OwnerSet::new(desired).unwrap();
        prop_assert!(reached.same_members(&wanted));
        prop_assert_eq!(outcome.threshold, Threshold::new(target));
    }

    /// Property: operation count equals the edit distance to the aligned list.
    #[test]
    fn prop_operation_count_is_edit_distance(
        (current, current_t, desired, target) in scenario()
    ) {
        let result = run(&current, current_t, &desired, target);
        let aligned = align_owners(&result.state.owners, &desired).unwrap();

        prop_assert_eq!(
            result.operations.len(),
            reference_distance(&current, aligned.as_slice())
        );
        prop_assert_eq!(result.summary.operation_count() as usize, result.operations.len());
    }

    /// Property: every prevOwner argument is the live predecessor when its
    /// transaction executes.
    #[test]
    fn prop_prev_owner_never_stale(
        (current, current_t, desired, target) in scenario()
    ) {
        let result = run(&current, current_t, &desired, target);
        let mut list = OwnerList::new(&result.state.owners);

        for tx in &result.batch.transactions {
            match SafeCall::from_descriptor(tx).unwrap() {
                SafeCall::SwapOwner { prev_owner, old_owner, new_owner } => {
                    prop_assert_eq!(list.prev_of(&old_owner).unwrap(), prev_owner);
                    list.apply_swap(old_owner, new_owner).unwrap();
                }
                SafeCall::RemoveOwner { prev_owner, owner, .. } => {
                    prop_assert_eq!(list.prev_of(&owner).unwrap(), prev_owner);
                    list.apply_remove(owner).unwrap();
                }
                SafeCall::AddOwnerWithThreshold { owner, .. } => {
                    list.apply_add(owner).unwrap();
                }
                SafeCall::ChangeThreshold { .. } => {}
            }
            list.check_invariant().unwrap();
        }
    }

    /// Property: a changeThreshold call appears iff the threshold changed and
    /// no add/remove carries it, and never more than once.
    #[test]
    fn prop_change_threshold_rule(
        (current, current_t, desired, target) in scenario()
    ) {
        let result = run(&current, current_t, &desired, target);
        let methods: Vec<&str> = result
            .batch
            .transactions
            .iter()
            .map(|tx| tx.contract_method.name.as_str())
            .collect();

        let threshold_calls = methods.iter().filter(|m| **m == METHOD_CHANGE_THRESHOLD).count();
        let membership = methods
            .iter()
            .any(|m| *m == METHOD_ADD_OWNER || *m == METHOD_REMOVE_OWNER);
        let expected = usize::from(current_t != target && !membership);

        prop_assert_eq!(threshold_calls, expected);
        if threshold_calls == 1 {
            prop_assert_eq!(*methods.last().unwrap(), METHOD_CHANGE_THRESHOLD);
        }
    }

    /// Property: the checksum is stable and any field mutation changes it.
    #[test]
    fn prop_checksum_stable_and_sensitive(
        (current, current_t, desired, target) in scenario(),
        bump in 1i64..1_000_000,
    ) {
        let result = run(&current, current_t, &desired, target);
        let batch = result.batch;

        verify_checksum(&batch).unwrap();
        prop_assert_eq!(compute_checksum(&batch).unwrap(), batch.meta.checksum.clone());

        let mut tampered = batch.clone();
        tampered.created_at += bump;
        prop_assert_ne!(compute_checksum(&tampered).unwrap(), batch.meta.checksum.clone());

        let mut tampered = batch.clone();
        tampered.meta.name.push('!');
        prop_assert!(verify_checksum(&tampered).is_err());

        if let Some(tx) = batch.transactions.first() {
            let mut tampered = batch.clone();
            tampered.transactions[0].contract_method.payable = !tx.contract_method.payable;
            prop_assert!(verify_checksum(&tampered).is_err());
        }
    }
}

#[test]
fn example_kept_owners_with_replacement() {
    // current [A, B, C], desired {A, C, D}: D takes over B's slot in one swap
    let (a, b, c, d) = (addr(1), addr(2), addr(3), addr(4));
    let result = run(&[a, b, c], 2, &[a, c, d], 2);

    let calls: Vec<_> = result
        .batch
        .transactions
        .iter()
        .map(|tx| SafeCall::from_descriptor(tx).unwrap())
        .collect();
    assert_eq!(
        calls,
        vec![SafeCall::SwapOwner {
            prev_owner: a,
            old_owner: b,
            new_owner: d,
        }]
    );
}

#[test]
fn example_replacement_and_addition() {
    // current [A, B, C], desired {A, C, D, E}: B swapped for D, E appended
    let (a, b, c, d, e) = (addr(1), addr(2), addr(3), addr(4), addr(5));
    let result = run(&[a, b, c], 2, &[a, c, d, e], 3);

    let calls: Vec<_> = result
        .batch
        .transactions
        .iter()
        .map(|tx| SafeCall::from_descriptor(tx).unwrap())
        .collect();
    assert_eq!(
        calls,
        vec![
            SafeCall::SwapOwner {
                prev_owner: a,
                old_owner: b,
                new_owner: d,
            },
            SafeCall::AddOwnerWithThreshold {
                owner: e,
                threshold: Threshold::new(3),
            },
        ]
    );
}

#[test]
fn example_threshold_only() {
    let (a, b) = (addr(1), addr(2));
    let result = run(&[a, b], 1, &[a, b], 2);
    assert_eq!(result.batch.transactions.len(), 1);
    assert_eq!(
        result.batch.transactions[0].contract_inputs_values["_threshold"],
        "2"
    );
}

#[test]
fn example_pure_removal_uses_predecessor() {
    // current [A, B, C], desired {A, C}: removeOwner(A, B, threshold)
    let (a, b, c) = (addr(1), addr(2), addr(3));
    let result = run(&[a, b, c], 2, &[a, c], 2);
    assert_eq!(
        SafeCall::from_descriptor(&result.batch.transactions[0]).unwrap(),
        SafeCall::RemoveOwner {
            prev_owner: a,
            owner: b,
            threshold: Threshold::new(2),
        }
    );
}
