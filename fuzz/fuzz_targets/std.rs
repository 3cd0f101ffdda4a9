#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use cursor_table::{HashTable, Key, ProbeMode, SlotRef};
use std::collections::HashMap as StdHashMap;

// Small enough that the fuzzer regularly fills the table.
const SIZE: usize = 31;

#[derive(Debug, Arbitrary)]
enum FuzzKey {
    Int(i16),
    Text(String),
}

impl From<FuzzKey> for Key {
    fn from(key: FuzzKey) -> Key {
        match key {
            FuzzKey::Int(n) => Key::from(n),
            FuzzKey::Text(text) => Key::from(text),
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Operation {
    Insert(FuzzKey, u32),
    Delete(FuzzKey),
    Remove(FuzzKey),
    Search(FuzzKey),
    Clear,
    Len,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    exhaustive: bool,
    operations: Vec<Operation>,
}

fn fuzz_table(input: FuzzInput) {
    let mode = if input.exhaustive {
        ProbeMode::Exhaustive
    } else {
        ProbeMode::StopAtEmpty
    };

    let mut std_map: StdHashMap<Key, u32> = StdHashMap::new();
    let mut table = HashTable::builder()
        .size(SIZE)
        .probe_mode(mode)
        .build()
        .unwrap();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                let k = Key::from(k);
                let fits = std_map.contains_key(&k) || std_map.len() < SIZE;
                if fits {
                    std_map.insert(k.clone(), v);
                }
                assert_eq!(table.insert(k, v), Ok(fits));
            }
            Operation::Delete(k) => {
                let k = Key::from(k);
                let std_result = std_map.remove(&k).is_some();
                assert_eq!(table.delete(&k), Ok(std_result));
            }
            Operation::Remove(k) => {
                let k = Key::from(k);
                let std_result = std_map.remove(&k);
                assert_eq!(table.remove(&k), Ok(std_result));
            }
            Operation::Search(k) => {
                let k = Key::from(k);
                assert_eq!(table.search(&k), Ok(std_map.get(&k)));
            }
            Operation::Clear => {
                std_map.clear();
                table.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), table.len());
            }
        }
    }

    // Final consistency checks
    for (k, v) in std_map.iter() {
        assert_eq!(table.search(k), Ok(Some(v)));
    }

    let stats = table.statistics();
    assert_eq!(std_map.len(), stats.occupied);
    assert_eq!(table.free_list().count(), stats.deleted);

    for (index, slot) in table.slots() {
        if let SlotRef::Occupied {
            cursor: Some(next), ..
        } = slot
        {
            assert_ne!(next, index);
            assert!(matches!(
                table.slots().nth(next),
                Some((_, SlotRef::Occupied { .. }))
            ));
        }
    }
}

fuzz_target!(|data: FuzzInput| {
    fuzz_table(data);
});
