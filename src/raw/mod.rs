mod probe;
mod slot;

use std::mem;

use log::{debug, trace};

use crate::{Key, KeyRef, ProbeMode};

pub use probe::{h1, normalize, Probe};
pub use slot::{Slot, Status};

// A fixed-size open addressing table.
//
// Collisions are resolved with double hashing. Deleted slots are kept as
// tombstones threaded onto a free list, and occupied slots carry a cursor to
// the next slot inserted further along a probe sequence passing through them.
pub struct Table<V> {
    slots: Box<[Slot<V>]>,
    // The most recently deleted slot, if any.
    free_head: Option<usize>,
    mode: ProbeMode,
}

impl<V> Table<V> {
    pub fn new(len: usize, mode: ProbeMode) -> Table<V> {
        debug_assert!(len > 0, "a table needs at least one slot");

        Table {
            slots: (0..len).map(|_| Slot::Empty).collect(),
            free_head: None,
            mode,
        }
    }

    // The number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    #[inline]
    pub fn free_head(&self) -> Option<usize> {
        self.free_head
    }

    #[inline]
    pub fn mode(&self) -> ProbeMode {
        self.mode
    }

    #[inline]
    pub fn probe(&self, key: KeyRef<'_>) -> Probe {
        Probe::start(key, self.len())
    }

    // Returns the position of the slot holding `key`.
    pub fn find(&self, key: KeyRef<'_>) -> Option<usize> {
        for (_, pos) in self.probe(key).iter() {
            match &self.slots[pos] {
                Slot::Occupied { key: existing, .. } if *existing == key => return Some(pos),
                // Inserts never extend a sequence past an empty slot, so the key
                // cannot be further along.
                Slot::Empty if self.mode == ProbeMode::StopAtEmpty => return None,
                _ => {}
            }
        }

        None
    }

    pub fn get(&self, key: KeyRef<'_>) -> Option<&V> {
        let pos = self.find(key)?;

        match &self.slots[pos] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: KeyRef<'_>) -> Option<&mut V> {
        let pos = self.find(key)?;

        match &mut self.slots[pos] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    // Inserts a key-value pair, overwriting the value if the key is present.
    //
    // Returns `false` if the key is absent and no slot along its probe
    // sequence is free.
    pub fn insert(&mut self, key: Key, value: V) -> bool {
        let probe = self.probe(key.view());

        // The probe index and position of the first tombstone seen.
        let mut first_deleted: Option<(usize, usize)> = None;

        for (i, pos) in probe.iter() {
            match &mut self.slots[pos] {
                Slot::Occupied {
                    key: existing,
                    value: current,
                    ..
                } => {
                    // The key may sit past a tombstone, so keep walking until it
                    // is found or the sequence ends.
                    if *existing == key {
                        trace!("updating key {key} in place at slot {pos}");
                        *current = value;
                        return true;
                    }
                }
                Slot::Deleted { .. } => {
                    if first_deleted.is_none() {
                        first_deleted = Some((i, pos));
                    }
                }
                Slot::Empty => {
                    let (at, target) = first_deleted.unwrap_or((i, pos));
                    trace!("inserting key {key} at slot {target} (probe {at})");
                    self.occupy(target, key, value);
                    self.link_predecessor(&probe, at, target);
                    return true;
                }
            }
        }

        // The sequence had no empty slot. Recycle a tombstone without chaining,
        // there is nothing further along the sequence to link from.
        if let Some((at, target)) = first_deleted {
            trace!("inserting key {key} at recycled slot {target} (probe {at})");
            self.occupy(target, key, value);
            return true;
        }

        debug!("table full, rejected key {key}");
        false
    }

    // Removes a key, returning the key and value it held.
    pub fn remove(&mut self, key: KeyRef<'_>) -> Option<(Key, V)> {
        let pos = self.find(key)?;

        let tombstone = Slot::Deleted {
            next_free: self.free_head,
        };

        let Slot::Occupied { key, value, cursor } = mem::replace(&mut self.slots[pos], tombstone)
        else {
            unreachable!("`find` returns occupied slots")
        };

        self.free_head = Some(pos);

        // Skip over the removed slot in any chain that passed through it.
        let mut repaired = 0;
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied { cursor: link, .. } = slot {
                if *link == Some(pos) {
                    *link = cursor;
                    repaired += 1;
                }
            }
        }

        trace!("deleted key {key} at slot {pos}, repaired {repaired} cursor(s)");
        Some((key, value))
    }

    // Resets every slot to empty.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.free_head = None;
    }

    // Writes a new occupied slot, taking it off the free list if it was a
    // tombstone.
    fn occupy(&mut self, pos: usize, key: Key, value: V) {
        let occupied = Slot::Occupied {
            key,
            value,
            cursor: None,
        };

        if let Slot::Deleted { next_free } = mem::replace(&mut self.slots[pos], occupied) {
            self.unlink_free(pos, next_free);
        }
    }

    // Removes `pos` from the free list, where it was followed by `next`.
    fn unlink_free(&mut self, pos: usize, next: Option<usize>) {
        if self.free_head == Some(pos) {
            self.free_head = next;
            return;
        }

        let mut current = self.free_head;
        while let Some(i) = current {
            let Slot::Deleted { next_free } = &mut self.slots[i] else {
                debug_assert!(false, "free list reached live slot {i}");
                return;
            };

            if *next_free == Some(pos) {
                *next_free = next;
                return;
            }

            current = *next_free;
        }
    }

    // Links the nearest occupied slot before probe index `at` to `target`.
    fn link_predecessor(&mut self, probe: &Probe, at: usize, target: usize) {
        for j in (0..at).rev() {
            let pos = probe.at(j);
            if pos == target {
                continue;
            }

            if let Slot::Occupied { cursor, .. } = &mut self.slots[pos] {
                trace!("linking slot {pos} to slot {target}");
                *cursor = Some(target);
                return;
            }
        }
    }
}
