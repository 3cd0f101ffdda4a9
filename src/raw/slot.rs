use crate::Key;

// A position in the table.
//
// The cursor of an occupied slot links to the next slot inserted as a
// collision continuation of a probe sequence passing through it. The link of
// a deleted slot threads the free list.
#[derive(Debug, Clone)]
pub enum Slot<V> {
    Empty,
    Occupied {
        key: Key,
        value: V,
        cursor: Option<usize>,
    },
    Deleted {
        next_free: Option<usize>,
    },
}

/// The state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The slot has never held a key since construction or the last clear.
    Empty,
    /// The slot holds a live key.
    Occupied,
    /// The slot held a key that was deleted, and is on the free list.
    Deleted,
}

impl Status {
    /// Returns the name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Empty => "empty",
            Status::Occupied => "occupied",
            Status::Deleted => "deleted",
        }
    }
}

impl<V> Slot<V> {
    #[inline]
    pub fn status(&self) -> Status {
        match self {
            Slot::Empty => Status::Empty,
            Slot::Occupied { .. } => Status::Occupied,
            Slot::Deleted { .. } => Status::Deleted,
        }
    }

    // The cursor of an occupied slot, or the free-list link of a deleted one.
    #[inline]
    pub fn link(&self) -> Option<usize> {
        match self {
            Slot::Empty => None,
            Slot::Occupied { cursor, .. } => *cursor,
            Slot::Deleted { next_free } => *next_free,
        }
    }
}
