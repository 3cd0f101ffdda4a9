use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use log::debug;

use crate::diagnostics::{self, CollisionReport, Statistics};
use crate::raw::{self, Slot, Status};
use crate::{Error, Key, KeyRef};

/// A fixed-capacity hash table using double hashing.
///
/// Keys are text or whole numbers (see [`Key`]). Collisions are resolved by
/// probing `(h1(k) + i * h2(k)) mod size`. Deleted slots become tombstones
/// that are threaded onto a free list and recycled by later inserts, and each
/// occupied slot records a cursor to the slot inserted after it along a
/// colliding probe sequence.
///
/// The table never grows. When no slot along a key's probe sequence is free,
/// [`insert`](HashTable::insert) returns `Ok(false)`.
///
/// # Examples
///
/// ```
/// use cursor_table::HashTable;
///
/// let mut table = HashTable::new(11)?;
/// assert!(table.insert("alice", 1)?);
/// assert!(table.insert(22, 2)?);
///
/// assert_eq!(table.search("alice")?, Some(&1));
/// assert!(table.delete(22)?);
/// assert_eq!(table.search(22)?, None);
/// # Ok::<(), cursor_table::Error>(())
/// ```
pub struct HashTable<V> {
    raw: raw::Table<V>,
}

/// How far lookups walk a key's probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    /// Stop at the first empty slot.
    ///
    /// Inserts never place a key past an empty slot in its probe sequence, so an
    /// empty slot proves the key is absent. This is the default.
    #[default]
    StopAtEmpty,
    /// Walk the entire probe sequence, skipping empty slots.
    ///
    /// Lookups give the same answers as with [`ProbeMode::StopAtEmpty`], but a
    /// miss always costs `size` probes.
    Exhaustive,
}

/// A builder for a [`HashTable`].
///
/// # Examples
///
/// ```rust
/// use cursor_table::{HashTable, ProbeMode};
///
/// let table: HashTable<String> = HashTable::builder()
///     // Set the number of slots, ideally a prime.
///     .size(101)
///     // Set how far lookups walk.
///     .probe_mode(ProbeMode::StopAtEmpty)
///     // Construct the table.
///     .build()?;
/// # Ok::<(), cursor_table::Error>(())
/// ```
pub struct HashTableBuilder<V> {
    size: usize,
    probe_mode: ProbeMode,
    _v: PhantomData<V>,
}

impl<V> HashTableBuilder<V> {
    /// Set the number of slots in the table.
    ///
    /// The size is fixed for the lifetime of the table. It should be a prime
    /// larger than 7: the secondary hash only approximates coprimality with the
    /// size, and other sizes may leave some slots unreachable for some keys.
    pub fn size(self, size: usize) -> HashTableBuilder<V> {
        HashTableBuilder { size, ..self }
    }

    /// Set how far lookups walk a key's probe sequence. See [`ProbeMode`] for details.
    pub fn probe_mode(self, probe_mode: ProbeMode) -> HashTableBuilder<V> {
        HashTableBuilder { probe_mode, ..self }
    }

    /// Construct a [`HashTable`] from the builder, using the configured options.
    ///
    /// Returns [`Error::InvalidSize`] if the size is zero.
    pub fn build(self) -> Result<HashTable<V>, Error> {
        if self.size == 0 {
            return Err(Error::InvalidSize { size: self.size });
        }

        debug!(
            "creating table with {} slots ({:?})",
            self.size, self.probe_mode
        );

        Ok(HashTable {
            raw: raw::Table::new(self.size, self.probe_mode),
        })
    }
}

impl<V> Default for HashTableBuilder<V> {
    fn default() -> Self {
        HashTableBuilder {
            size: HashTable::<V>::DEFAULT_SIZE,
            probe_mode: ProbeMode::default(),
            _v: PhantomData,
        }
    }
}

impl<V> fmt::Debug for HashTableBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTableBuilder")
            .field("size", &self.size)
            .field("probe_mode", &self.probe_mode)
            .finish()
    }
}

impl<V> HashTable<V> {
    /// The number of slots used by [`HashTable::default`].
    pub const DEFAULT_SIZE: usize = 11;

    /// Creates an empty `HashTable` with `size` slots.
    ///
    /// Returns [`Error::InvalidSize`] if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_table::{Error, HashTable};
    ///
    /// let table: HashTable<u32> = HashTable::new(13)?;
    /// assert_eq!(table.size(), 13);
    ///
    /// assert!(matches!(HashTable::<u32>::new(0), Err(Error::InvalidSize { .. })));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn new(size: usize) -> Result<HashTable<V>, Error> {
        HashTable::builder().size(size).build()
    }

    /// Returns a builder for a `HashTable`.
    ///
    /// The builder can be used for more complex configuration, such as the
    /// [`ProbeMode`].
    pub fn builder() -> HashTableBuilder<V> {
        HashTableBuilder::default()
    }

    /// Returns the number of slots, which never changes.
    #[inline]
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// Returns the configured [`ProbeMode`].
    #[inline]
    pub fn probe_mode(&self) -> ProbeMode {
        self.raw.mode()
    }

    /// Returns the number of keys in the table.
    ///
    /// This counts occupied slots, and takes time proportional to the size of
    /// the table.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Inserts a key-value pair into the table.
    ///
    /// If the key is already present its value is replaced in place. Otherwise
    /// the key is written to the first tombstone along its probe sequence, or
    /// to the first empty slot if no tombstone precedes it.
    ///
    /// Returns `Ok(false)` if the key is absent and the table has no room
    /// for it along its probe sequence. Returns [`Error::TypeMismatch`] if
    /// `key` is not text or a whole number, without touching the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_table::HashTable;
    ///
    /// let mut table = HashTable::new(11)?;
    /// assert!(table.insert(37, "a")?);
    /// assert!(table.insert(37, "b")?);
    /// assert_eq!(table.search(37)?, Some(&"b"));
    /// # Ok::<(), cursor_table::Error>(())
    /// ```
    pub fn insert<K>(&mut self, key: K, value: V) -> Result<bool, Error>
    where
        K: TryInto<Key>,
        Error: From<K::Error>,
    {
        let key = key.try_into()?;
        Ok(self.raw.insert(key, value))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_table::HashTable;
    ///
    /// let mut table = HashTable::new(11)?;
    /// table.insert("bob", 1)?;
    /// assert_eq!(table.search("bob")?, Some(&1));
    /// assert_eq!(table.search("eve")?, None);
    /// # Ok::<(), cursor_table::Error>(())
    /// ```
    pub fn search<'k, K>(&self, key: K) -> Result<Option<&V>, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(self.raw.get(key.try_into()?))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn search_mut<'k, K>(&mut self, key: K) -> Result<Option<&mut V>, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(self.raw.get_mut(key.try_into()?))
    }

    /// Returns `true` if the table contains a value for the specified key.
    pub fn contains_key<'k, K>(&self, key: K) -> Result<bool, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(self.raw.find(key.try_into()?).is_some())
    }

    /// Returns the index of the slot holding the key.
    pub fn position<'k, K>(&self, key: K) -> Result<Option<usize>, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(self.raw.find(key.try_into()?))
    }

    /// Deletes a key from the table, returning `true` if it was present.
    ///
    /// The slot becomes a tombstone at the head of the free list, and any
    /// cursor that linked to it is redirected to the slot it linked to.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_table::HashTable;
    ///
    /// let mut table = HashTable::new(11)?;
    /// table.insert(15, ())?;
    /// assert!(table.delete(15)?);
    /// assert!(!table.delete(15)?);
    /// # Ok::<(), cursor_table::Error>(())
    /// ```
    pub fn delete<'k, K>(&mut self, key: K) -> Result<bool, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(self.raw.remove(key.try_into()?).is_some())
    }

    /// Deletes a key from the table, returning its value if it was present.
    ///
    /// This behaves exactly like [`HashTable::delete`].
    pub fn remove<'k, K>(&mut self, key: K) -> Result<Option<V>, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(self.raw.remove(key.try_into()?).map(|(_, value)| value))
    }

    /// Resets every slot to empty, dropping all keys and emptying the free list.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Counts the slots in each state.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_table::HashTable;
    ///
    /// let mut table = HashTable::new(11)?;
    /// table.insert(10, ())?;
    /// table.insert(22, ())?;
    /// table.delete(22)?;
    ///
    /// let stats = table.statistics();
    /// assert_eq!((stats.occupied, stats.deleted, stats.empty), (1, 1, 9));
    /// # Ok::<(), cursor_table::Error>(())
    /// ```
    pub fn statistics(&self) -> Statistics {
        diagnostics::statistics(&self.raw)
    }

    /// Finds every key stored away from its base position.
    ///
    /// See [`CollisionReport`] for details.
    pub fn analyze_collisions(&self) -> CollisionReport {
        diagnostics::collisions(&self.raw)
    }

    /// Returns an iterator over the keys and values, in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.raw.slots().iter(),
        }
    }

    /// Returns an iterator over the keys, in slot order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { iter: self.iter() }
    }

    /// Returns an iterator over the values, in slot order.
    pub fn values(&self) -> Values<'_, V> {
        Values { iter: self.iter() }
    }

    /// Returns an iterator over every slot and its index.
    pub fn slots(&self) -> Slots<'_, V> {
        Slots {
            slots: self.raw.slots().iter().enumerate(),
        }
    }

    /// Returns the index of the first slot on the free list.
    pub fn free_list_head(&self) -> Option<usize> {
        self.raw.free_head()
    }

    /// Returns an iterator over the indices of the free list, starting at the
    /// most recently deleted slot.
    pub fn free_list(&self) -> FreeList<'_, V> {
        FreeList {
            slots: self.raw.slots(),
            next: self.raw.free_head(),
            remaining: self.raw.len(),
        }
    }

    /// Returns an iterator over the cursor chain starting at the key's slot.
    ///
    /// The first index is the slot holding the key itself. The chain is empty
    /// if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_table::HashTable;
    ///
    /// let mut table = HashTable::new(11)?;
    /// // Both keys hash to slot 0, 88 lands three slots later.
    /// table.insert(22, ())?;
    /// table.insert(88, ())?;
    ///
    /// let chain: Vec<usize> = table.chain(22)?.collect();
    /// assert_eq!(chain, [0, 3]);
    /// # Ok::<(), cursor_table::Error>(())
    /// ```
    pub fn chain<'k, K>(&self, key: K) -> Result<Chain<'_, V>, Error>
    where
        K: TryInto<KeyRef<'k>>,
        Error: From<K::Error>,
    {
        Ok(Chain {
            slots: self.raw.slots(),
            next: self.raw.find(key.try_into()?),
            remaining: self.raw.len(),
        })
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        HashTable {
            raw: raw::Table::new(HashTable::<V>::DEFAULT_SIZE, ProbeMode::default()),
        }
    }
}

impl<V> fmt::Debug for HashTable<V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// Renders the full slot layout, one row per slot.
impl<V> fmt::Display for HashTable<V>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6} | {:<12} | {:<18} | {:<8} | {:<6}",
            "index", "key", "value", "status", "cursor"
        )?;
        writeln!(f, "{}", "-".repeat(62))?;

        for (index, slot) in self.slots() {
            let (key, value) = match slot {
                SlotRef::Occupied { key, value, .. } => (key.to_string(), value.to_string()),
                _ => ("-".to_owned(), "-".to_owned()),
            };

            let link = slot
                .link()
                .map_or_else(|| "-".to_owned(), |link| link.to_string());

            writeln!(
                f,
                "{index:<6} | {key:<12} | {value:<18} | {:<8} | {link:<6}",
                slot.status().as_str()
            )?;
        }

        match self.free_list_head() {
            Some(head) => write!(f, "free list head: {head}"),
            None => write!(f, "free list: empty"),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A borrowed view of a slot.
#[derive(Debug)]
pub enum SlotRef<'a, V> {
    /// The slot has never held a key.
    Empty,
    /// The slot holds a key.
    Occupied {
        key: &'a Key,
        value: &'a V,
        /// The slot inserted after this one along a colliding probe sequence.
        cursor: Option<usize>,
    },
    /// The slot is a tombstone on the free list.
    Deleted {
        /// The next slot on the free list.
        next_free: Option<usize>,
    },
}

impl<V> SlotRef<'_, V> {
    /// Returns the status of the slot.
    pub fn status(&self) -> Status {
        match self {
            SlotRef::Empty => Status::Empty,
            SlotRef::Occupied { .. } => Status::Occupied,
            SlotRef::Deleted { .. } => Status::Deleted,
        }
    }

    /// Returns the cursor of an occupied slot, or the free-list link of a
    /// deleted one.
    pub fn link(&self) -> Option<usize> {
        match self {
            SlotRef::Empty => None,
            SlotRef::Occupied { cursor, .. } => *cursor,
            SlotRef::Deleted { next_free } => *next_free,
        }
    }
}

impl<V> Clone for SlotRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for SlotRef<'_, V> {}

impl<'a, V> From<&'a Slot<V>> for SlotRef<'a, V> {
    fn from(slot: &'a Slot<V>) -> Self {
        match slot {
            Slot::Empty => SlotRef::Empty,
            Slot::Occupied { key, value, cursor } => SlotRef::Occupied {
                key,
                value,
                cursor: *cursor,
            },
            Slot::Deleted { next_free } => SlotRef::Deleted {
                next_free: *next_free,
            },
        }
    }
}

/// An iterator over a table's entries.
///
/// This struct is created by the [`iter`](HashTable::iter) method on [`HashTable`].
pub struct Iter<'a, V> {
    slots: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a Key, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied { key, value, .. } => Some((key, value)),
            _ => None,
        })
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
        }
    }
}

impl<V> fmt::Debug for Iter<'_, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over a table's keys.
///
/// This struct is created by the [`keys`](HashTable::keys) method on [`HashTable`].
pub struct Keys<'a, V> {
    iter: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a Key;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }
}

/// An iterator over a table's values.
///
/// This struct is created by the [`values`](HashTable::values) method on [`HashTable`].
pub struct Values<'a, V> {
    iter: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }
}

/// An iterator over every slot of a table and its index.
///
/// This struct is created by the [`slots`](HashTable::slots) method on [`HashTable`].
pub struct Slots<'a, V> {
    slots: std::iter::Enumerate<std::slice::Iter<'a, Slot<V>>>,
}

impl<'a, V> Iterator for Slots<'a, V> {
    type Item = (usize, SlotRef<'a, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .next()
            .map(|(index, slot)| (index, SlotRef::from(slot)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<V> ExactSizeIterator for Slots<'_, V> {}

/// An iterator over the indices of a table's free list.
///
/// This struct is created by the [`free_list`](HashTable::free_list) method on [`HashTable`].
pub struct FreeList<'a, V> {
    slots: &'a [Slot<V>],
    next: Option<usize>,
    // Bounds the walk by the number of slots.
    remaining: usize,
}

impl<V> Iterator for FreeList<'_, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.next?;
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        self.next = match self.slots[index] {
            Slot::Deleted { next_free } => next_free,
            _ => None,
        };

        Some(index)
    }
}

/// An iterator over a cursor chain.
///
/// This struct is created by the [`chain`](HashTable::chain) method on [`HashTable`].
pub struct Chain<'a, V> {
    slots: &'a [Slot<V>],
    next: Option<usize>,
    // Bounds the walk by the number of slots.
    remaining: usize,
}

impl<V> Iterator for Chain<'_, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.next?;
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        self.next = match self.slots[index] {
            Slot::Occupied { cursor, .. } => cursor,
            _ => None,
        };

        Some(index)
    }
}
