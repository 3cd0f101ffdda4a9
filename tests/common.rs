#![allow(dead_code)]

use std::collections::HashSet;

use cursor_table::{HashTable, ProbeMode, SlotRef, Status};

// Run the test on tables in every probe mode.
pub fn with_table<V>(size: usize, mut test: impl FnMut(HashTable<V>)) {
    init_logger();

    test(
        HashTable::builder()
            .size(size)
            .probe_mode(ProbeMode::StopAtEmpty)
            .build()
            .unwrap(),
    );

    test(
        HashTable::builder()
            .size(size)
            .probe_mode(ProbeMode::Exhaustive)
            .build()
            .unwrap(),
    );
}

// Installs a test logger. Set `RUST_LOG=trace` to see individual table operations.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Checks the structural invariants of a table:
//
// - No key is stored twice.
// - Every cursor links to another occupied slot, and cursor chains terminate.
// - The free list visits every deleted slot exactly once and terminates.
pub fn check_invariants<V>(table: &HashTable<V>) {
    let slots: Vec<_> = table.slots().collect();

    let mut keys = HashSet::new();
    for (index, slot) in &slots {
        if let SlotRef::Occupied { key, cursor, .. } = slot {
            assert!(keys.insert((*key).clone()), "duplicate key {key}");

            if let Some(next) = cursor {
                assert_ne!(next, index, "slot {index} links to itself");
                assert_eq!(
                    slots[*next].1.status(),
                    Status::Occupied,
                    "slot {index} links to non-occupied slot {next}"
                );
            }

            let chain: Vec<usize> = table.chain(*key).unwrap().collect();
            let unique: HashSet<_> = chain.iter().collect();
            assert_eq!(unique.len(), chain.len(), "cursor cycle through slot {index}");
        }
    }

    let free: Vec<usize> = table.free_list().collect();
    let unique: HashSet<_> = free.iter().collect();
    assert_eq!(unique.len(), free.len(), "free list revisits a slot");
    assert!(free
        .iter()
        .all(|&index| slots[index].1.status() == Status::Deleted));

    let stats = table.statistics();
    assert_eq!(free.len(), stats.deleted, "free list misses deleted slots");
    assert_eq!(stats.occupied, keys.len());
    assert_eq!(stats.occupied + stats.empty + stats.deleted, stats.total_slots);
}
