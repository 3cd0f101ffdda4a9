use cursor_table::{Error, HashTable, Key, ProbeMode, SlotRef, Status};

mod common;
use common::{check_invariants, with_table};

#[test]
fn new() {
    with_table::<usize>(11, |table| {
        assert_eq!(table.size(), 11);
        assert!(table.is_empty());
        assert_eq!(table.free_list_head(), None);
    });
}

#[test]
fn zero_size() {
    assert_eq!(
        HashTable::<usize>::new(0).err(),
        Some(Error::InvalidSize { size: 0 })
    );
    assert!(HashTable::<usize>::builder().size(0).build().is_err());
}

#[test]
fn default_size() {
    let table = HashTable::<usize>::default();
    assert_eq!(table.size(), HashTable::<usize>::DEFAULT_SIZE);
    assert_eq!(table.probe_mode(), ProbeMode::StopAtEmpty);
}

#[test]
fn insert() {
    with_table::<usize>(11, |mut table| {
        assert_eq!(table.insert(42, 0), Ok(true));
        assert_eq!(table.len(), 1);
    });
}

#[test]
fn search_empty() {
    with_table::<usize>(11, |table| {
        assert_eq!(table.search(42), Ok(None));
        assert_eq!(table.search("42"), Ok(None));
    });
}

#[test]
fn delete_empty() {
    with_table::<usize>(11, |mut table| {
        assert_eq!(table.delete(42), Ok(false));
        assert_eq!(table.statistics().deleted, 0);
    });
}

#[test]
fn insert_and_search() {
    with_table::<&str>(11, |mut table| {
        for k in [10, 22, 31, 4, 15] {
            table.insert(k, "v").unwrap();
        }

        for k in [10, 22, 31, 4, 15] {
            assert_eq!(table.search(k), Ok(Some(&"v")));
        }
        assert_eq!(table.search(5), Ok(None));
    });
}

#[test]
fn insert_and_delete() {
    with_table::<usize>(11, |mut table| {
        table.insert(42, 0).unwrap();
        assert_eq!(table.remove(42), Ok(Some(0)));
        assert_eq!(table.search(42), Ok(None));
        assert_eq!(table.remove(42), Ok(None));
        check_invariants(&table);
    });
}

#[test]
fn reinsert() {
    with_table::<usize>(11, |mut table| {
        table.insert(42, 0).unwrap();
        table.insert(42, 1).unwrap();

        let stats = table.statistics();
        assert_eq!(stats.occupied, 1);
        assert_eq!(table.search(42), Ok(Some(&1)));
    });
}

#[test]
fn search_mut() {
    with_table::<usize>(11, |mut table| {
        table.insert("counter", 0).unwrap();
        *table.search_mut("counter").unwrap().unwrap() += 5;
        assert_eq!(table.search("counter"), Ok(Some(&5)));
    });
}

#[test]
fn text_keys() {
    with_table::<u32>(13, |mut table| {
        let names = ["alice", "bob", "carol", "dave", "eve", "mallory"];
        for (i, name) in names.iter().enumerate() {
            assert_eq!(table.insert(*name, i as u32), Ok(true));
        }

        for (i, name) in names.iter().enumerate() {
            assert_eq!(table.search(*name), Ok(Some(&(i as u32))));
        }

        let owned = String::from("carol");
        assert_eq!(table.search(&owned), Ok(Some(&2)));
        assert_eq!(table.search("trent"), Ok(None));
        check_invariants(&table);
    });
}

#[test]
fn text_and_int_keys_are_distinct() {
    with_table::<&str>(11, |mut table| {
        // "a" normalizes to 97, so both keys share a probe sequence.
        table.insert("a", "text").unwrap();
        table.insert(97, "int").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.search("a"), Ok(Some(&"text")));
        assert_eq!(table.search(97), Ok(Some(&"int")));
    });
}

#[test]
fn type_mismatch() {
    with_table::<usize>(11, |mut table| {
        assert!(matches!(
            table.insert(1.5, 0),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            table.search(f64::INFINITY),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            table.delete(0.25f32),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(table.is_empty());

        // Whole floats are numeric keys.
        assert_eq!(table.insert(4.0, 4), Ok(true));
        assert_eq!(table.search(4), Ok(Some(&4)));
    });
}

#[test]
fn negative_keys() {
    with_table::<i64>(11, |mut table| {
        for k in -11i64..0 {
            assert_eq!(table.insert(k, k), Ok(true));
        }

        // Eleven keys fill the table.
        for k in -20i64..-11 {
            assert_eq!(table.insert(k, k), Ok(false));
        }

        for k in -11i64..0 {
            assert_eq!(table.search(k), Ok(Some(&k)));
        }
        check_invariants(&table);
    });
}

#[test]
fn update_keeps_cursors() {
    with_table::<usize>(11, |mut table| {
        table.insert(22, 0).unwrap();
        table.insert(88, 1).unwrap();
        let before: Vec<usize> = table.chain(22).unwrap().collect();

        table.insert(22, 2).unwrap();
        let after: Vec<usize> = table.chain(22).unwrap().collect();

        assert_eq!(before, [0, 3]);
        assert_eq!(before, after);
    });
}

#[test]
fn tombstone_reuse() {
    with_table::<usize>(11, |mut table| {
        // 22 and 88 share base position 0.
        table.insert(22, 0).unwrap();
        table.insert(88, 1).unwrap();
        table.delete(22).unwrap();

        let before = table.statistics();
        assert_eq!((before.occupied, before.deleted), (1, 1));
        assert_eq!(table.free_list_head(), Some(0));

        // 0 probes slot 0 first.
        table.insert(0, 2).unwrap();
        let after = table.statistics();
        assert_eq!(after.deleted, before.deleted - 1);
        assert_eq!(after.occupied, before.occupied + 1);
        assert_eq!(table.position(0), Ok(Some(0)));
        assert_eq!(table.free_list_head(), None);

        // 88 is still reachable past the recycled slot.
        assert_eq!(table.search(88), Ok(Some(&1)));
        check_invariants(&table);
    });
}

#[test]
fn update_past_tombstone() {
    with_table::<usize>(11, |mut table| {
        table.insert(22, 0).unwrap();
        table.insert(88, 1).unwrap();
        table.delete(22).unwrap();

        // The tombstone at slot 0 precedes 88 in its sequence, but the existing
        // entry must be updated rather than duplicated.
        table.insert(88, 2).unwrap();
        assert_eq!(table.position(88), Ok(Some(3)));
        assert_eq!(table.search(88), Ok(Some(&2)));

        let stats = table.statistics();
        assert_eq!((stats.occupied, stats.deleted), (1, 1));
        check_invariants(&table);
    });
}

#[test]
fn capacity_boundary() {
    with_table::<usize>(11, |mut table| {
        // Every key shares base position 0.
        for i in 0..11usize {
            assert_eq!(table.insert(i as i64 * 11, i), Ok(true));
        }

        let stats = table.statistics();
        assert_eq!((stats.occupied, stats.empty), (11, 0));
        assert_eq!(stats.load_factor, 1.0);

        assert_eq!(table.insert(121, 11), Ok(false));
        assert_eq!(table.search(121), Ok(None));

        // Updating an existing key still succeeds when full.
        assert_eq!(table.insert(55, 100), Ok(true));
        assert_eq!(table.search(55), Ok(Some(&100)));

        for i in 0..11i64 {
            assert!(table.contains_key(i * 11).unwrap());
        }
        check_invariants(&table);
    });
}

#[test]
fn recycle_in_full_table() {
    with_table::<usize>(11, |mut table| {
        for k in 0..11 {
            table.insert(k, k as usize).unwrap();
        }

        table.delete(5).unwrap();
        assert_eq!(table.statistics().empty, 0);

        // No slot is empty, so the walk runs to the end and recycles the tombstone.
        assert_eq!(table.insert(100, 100), Ok(true));
        assert_eq!(table.position(100), Ok(Some(5)));
        assert_eq!(table.free_list_head(), None);

        // A miss in a table with no empty slots walks the whole sequence.
        assert_eq!(table.search(200), Ok(None));
        assert_eq!(table.delete(200), Ok(false));
        check_invariants(&table);
    });
}

#[test]
fn free_list_order() {
    with_table::<usize>(11, |mut table| {
        for k in 0..6 {
            table.insert(k, k as usize).unwrap();
        }

        for k in [1, 4, 2] {
            table.delete(k).unwrap();
        }

        let free: Vec<usize> = table.free_list().collect();
        assert_eq!(free, [2, 4, 1]);

        // 4 probes its own slot first, in the middle of the list.
        table.insert(4, 4).unwrap();
        let free: Vec<usize> = table.free_list().collect();
        assert_eq!(free, [2, 1]);

        // 1 is the tail.
        table.insert(1, 1).unwrap();
        let free: Vec<usize> = table.free_list().collect();
        assert_eq!(free, [2]);
        check_invariants(&table);
    });
}

#[test]
fn delete_redirects_cursors() {
    with_table::<usize>(11, |mut table| {
        // 0, 11 and 33 share base position 0 with steps 7, 3 and 3.
        table.insert(0, 0).unwrap();
        table.insert(11, 1).unwrap();
        assert_eq!(table.chain(0).unwrap().collect::<Vec<_>>(), [0, 3]);

        // 33 walks 0 -> 3 -> 6 and links from 11.
        table.insert(33, 2).unwrap();
        assert_eq!(table.chain(0).unwrap().collect::<Vec<_>>(), [0, 3, 6]);

        table.delete(11).unwrap();
        assert_eq!(table.chain(0).unwrap().collect::<Vec<_>>(), [0, 6]);
        assert_eq!(table.search(33), Ok(Some(&2)));
        check_invariants(&table);
    });
}

#[test]
fn clear() {
    with_table::<usize>(11, |mut table| {
        for k in 0..5 {
            table.insert(k, k as usize).unwrap();
        }
        table.delete(3).unwrap();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.free_list_head(), None);
        assert_eq!(table.statistics().empty, 11);

        assert_eq!(table.insert(3, 3), Ok(true));
        assert_eq!(table.position(3), Ok(Some(3)));
    });
}

#[test]
fn iter() {
    with_table::<usize>(11, |mut table| {
        for k in [10, 22, 31] {
            table.insert(k, k as usize * 2).unwrap();
        }

        // Slot order: 22 at 0, 31 at 9, 10 at 10.
        let entries: Vec<_> = table.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(
            entries,
            [(Key::Int(22), 44), (Key::Int(31), 62), (Key::Int(10), 20)]
        );

        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, [Key::Int(22), Key::Int(31), Key::Int(10)]);

        let sum: usize = table.values().sum();
        assert_eq!(sum, 126);

        assert_eq!((&table).into_iter().count(), 3);
    });
}

#[test]
fn slots() {
    with_table::<&str>(11, |mut table| {
        table.insert(22, "a").unwrap();
        table.insert(88, "b").unwrap();
        table.delete(88).unwrap();

        let slots: Vec<_> = table.slots().collect();
        assert_eq!(slots.len(), 11);

        match slots[0].1 {
            SlotRef::Occupied { key, value, cursor } => {
                assert_eq!(*key, Key::Int(22));
                assert_eq!(*value, "a");
                // The cursor to 88 was dropped with it.
                assert_eq!(cursor, None);
            }
            ref slot => panic!("unexpected slot {slot:?}"),
        }

        assert_eq!(slots[3].1.status(), Status::Deleted);
        assert_eq!(slots[3].1.link(), None);
        assert_eq!(slots[1].1.status(), Status::Empty);
    });
}

#[test]
fn display() {
    let mut table = HashTable::new(3).unwrap();
    table.insert(0, "zero").unwrap();
    table.insert(3, "three").unwrap();
    table.delete(0).unwrap();

    let rendered = table.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2 + 3 + 1);
    assert!(lines[2].starts_with("0 "));
    assert!(lines[2].contains("deleted"));
    assert!(rendered.contains("three"));
    assert_eq!(lines[5], "free list head: 0");

    let debug = format!("{table:?}");
    assert_eq!(debug, r#"{Int(3): "three"}"#);
}
