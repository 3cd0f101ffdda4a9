//! Read-only reports derived from the slot layout of a table.

use std::collections::BTreeMap;
use std::fmt;

use crate::raw::{self, Slot};
use crate::Key;

/// Slot counts of a table, returned by [`HashTable::statistics`](crate::HashTable::statistics).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// The number of slots.
    pub total_slots: usize,
    /// The number of slots holding a key.
    pub occupied: usize,
    /// The number of slots that have never held a key.
    pub empty: usize,
    /// The number of tombstones.
    pub deleted: usize,
    /// The fraction of slots holding a key.
    pub load_factor: f64,
}

/// A key stored away from its base position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub key: Key,
    /// The position the primary hash assigns to the key.
    pub base_position: usize,
    /// The position the key actually occupies.
    pub actual_position: usize,
    /// The distance from the base position, wrapping around the table.
    pub offset: usize,
}

/// The keys of a table that were displaced by collisions.
///
/// Returned by [`HashTable::analyze_collisions`](crate::HashTable::analyze_collisions).
/// Collisions are listed in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollisionReport {
    pub collisions: Vec<Collision>,
}

impl CollisionReport {
    /// Returns the number of displaced keys.
    pub fn len(&self) -> usize {
        self.collisions.len()
    }

    /// Returns `true` if every key sits at its base position.
    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    /// Groups the collisions by the base position they share, in position order.
    pub fn groups(&self) -> BTreeMap<usize, Vec<&Collision>> {
        let mut groups: BTreeMap<usize, Vec<&Collision>> = BTreeMap::new();
        for collision in &self.collisions {
            groups
                .entry(collision.base_position)
                .or_default()
                .push(collision);
        }
        groups
    }
}

pub(crate) fn statistics<V>(table: &raw::Table<V>) -> Statistics {
    let (mut occupied, mut empty, mut deleted) = (0, 0, 0);

    for slot in table.slots() {
        match slot {
            Slot::Empty => empty += 1,
            Slot::Occupied { .. } => occupied += 1,
            Slot::Deleted { .. } => deleted += 1,
        }
    }

    let total_slots = table.len();
    let load_factor = if total_slots == 0 {
        0.0
    } else {
        occupied as f64 / total_slots as f64
    };

    Statistics {
        total_slots,
        occupied,
        empty,
        deleted,
        load_factor,
    }
}

pub(crate) fn collisions<V>(table: &raw::Table<V>) -> CollisionReport {
    let len = table.len();

    let collisions = table
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(actual, slot)| {
            let Slot::Occupied { key, .. } = slot else {
                return None;
            };

            let base = raw::h1(raw::normalize(key.view()), len);
            (base != actual).then(|| Collision {
                key: key.clone(),
                base_position: base,
                actual_position: actual,
                offset: (actual + len - base) % len,
            })
        })
        .collect();

    CollisionReport { collisions }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total slots: {}", self.total_slots)?;
        writeln!(f, "occupied:    {}", self.occupied)?;
        writeln!(f, "empty:       {}", self.empty)?;
        writeln!(f, "deleted:     {}", self.deleted)?;
        write!(f, "load factor: {:.2}%", self.load_factor * 100.0)
    }
}

impl fmt::Display for CollisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no collisions");
        }

        writeln!(f, "{} collision(s):", self.len())?;
        for (base, group) in self.groups() {
            write!(f, "  base {base}:")?;
            for collision in group {
                write!(
                    f,
                    " {} -> {} (+{})",
                    collision.key, collision.actual_position, collision.offset
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
