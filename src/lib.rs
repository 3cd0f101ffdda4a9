#![doc = include_str!("../README.md")]

mod diagnostics;
mod error;
mod key;
mod raw;
mod table;

#[cfg(feature = "serde")]
mod serde_impls;

pub use diagnostics::{Collision, CollisionReport, Statistics};
pub use error::Error;
pub use key::{Key, KeyRef};
pub use raw::Status;
pub use table::{
    Chain, FreeList, HashTable, HashTableBuilder, Iter, Keys, ProbeMode, SlotRef, Slots, Values,
};
