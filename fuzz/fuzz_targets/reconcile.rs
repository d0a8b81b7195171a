#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use quorum_batch::{replay_batch, verify_checksum, BatchBuilder, TransactionAssembler};
use quorum_core::{Address, OwnerSet, SafeState, Threshold};
use quorum_state::{align_owners, edit_distance, edit_script};

#[derive(Debug, Arbitrary)]
struct Input {
    current: Vec<u8>,
    desired: Vec<u8>,
    current_threshold: u8,
    target_threshold: u8,
}

fn owners(ids: &[u8]) -> Vec<Address> {
    let mut seen = Vec::new();
    for &id in ids.iter().take(32) {
        let owner = Address::from_low_u64(0x100 + id as u64);
        if !seen.contains(&owner) {
            seen.push(owner);
        }
    }
    seen
}

fuzz_target!(|input: Input| {
    let current = owners(&input.current);
    let desired = owners(&input.desired);
    if current.is_empty() {
        return;
    }

    let threshold = Threshold::new(1 + input.current_threshold as u64 % current.len() as u64);
    let state = SafeState::new(
        Address::from_low_u64(0xfeed),
        OwnerSet::new(current).unwrap(),
        threshold,
    );

    let aligned = align_owners(&state.owners, &desired).unwrap();
    let ops = edit_script(state.owners.as_slice(), aligned.as_slice()).unwrap();
    assert_eq!(ops.len(), edit_distance(state.owners.as_slice(), aligned.as_slice()));

    let target = Threshold::new(input.target_threshold as u64);
    let Ok(assembler) = TransactionAssembler::new(&state, aligned.len(), target) else {
        return;
    };
    let assembly = assembler.assemble(&ops).unwrap();
    let batch = BatchBuilder::new("1", state.address, 0)
        .transactions(assembly.transactions)
        .build()
        .unwrap();

    verify_checksum(&batch).unwrap();
    let outcome = replay_batch(&state, &batch).unwrap();
    assert!(OwnerSet::new(outcome.owners).unwrap().same_members(&aligned));
    assert_eq!(outcome.threshold, target);
});
