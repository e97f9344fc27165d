use core::fmt::Debug;

use crate::arena_array::ArenaArray;
use crate::map::DEFAULT_LOAD_FACTOR;
use crate::map::sanitize_load_factor;
use crate::map::table_size_for;
use crate::map::table_size_for_threshold;
use crate::map::threshold;

/// Slot count used by [`OpenTable::new`].
const DEFAULT_TABLE_SIZE: usize = 8;

#[derive(Clone, Debug)]
enum Slot<T> {
    Free,
    Deleted,
    Occupied { hash: u64, value: T },
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

/// An open-addressing hash table with linear probing and tombstones.
///
/// `OpenTable<T>` keeps every value directly in a flat slot array. A slot is
/// free, occupied, or deleted: removal leaves a tombstone behind so that the
/// probe sequences of other values stay intact. Lookups step over tombstones;
/// inserts reuse the first tombstone on their probe path.
///
/// Two counters are tracked: [`len`](Self::len) counts occupied slots, and
/// [`occupation`](Self::occupation) counts occupied and deleted slots. The
/// table rehashes to double its size before a write would bring the
/// occupation up to `floor(size * load_factor)`, which guarantees that every
/// probe meets a free slot.
///
/// Like [`ChainedTable`](crate::ChainedTable), the table takes a precomputed
/// hash and an equality predicate for every operation.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use arena_hash::open_table::OpenTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_str(s: &str) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     s.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table: OpenTable<(&str, u32)> = OpenTable::new();
/// table.entry(hash_str("a"), |&(k, _)| k == "a").or_insert(("a", 1));
/// table.entry(hash_str("b"), |&(k, _)| k == "b").or_insert(("b", 2));
///
/// assert_eq!(table.remove(hash_str("a"), |&(k, _)| k == "a"), Some(("a", 1)));
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.occupation(), 2);
/// assert_eq!(table.find(hash_str("b"), |&(k, _)| k == "b"), Some(&("b", 2)));
/// ```
#[derive(Clone)]
pub struct OpenTable<T> {
    slots: ArenaArray<Slot<T>>,
    count: usize,
    occupation: usize,
    threshold: usize,
    load_factor: f32,
}

impl<T: Debug> Debug for OpenTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OpenTable")
            .field("slots", &self.slots)
            .field("populated", &self.count)
            .field("occupation", &self.occupation)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl<T> Default for OpenTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OpenTable<T> {
    /// Creates a table with 8 slots and the default load factor.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_TABLE_SIZE, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a table with at least `size_hint` slots, rounded up to a power
    /// of two no smaller than 4.
    ///
    /// A load factor outside `(0, 1]` is replaced by
    /// [`DEFAULT_LOAD_FACTOR`](crate::DEFAULT_LOAD_FACTOR); one below
    /// [`MIN_LOAD_FACTOR`](crate::MIN_LOAD_FACTOR) is raised to it.
    ///
    /// ```rust
    /// # use arena_hash::open_table::OpenTable;
    /// #
    /// let table: OpenTable<u64> = OpenTable::with_size(100, 2.0);
    /// assert_eq!(table.table_size(), 128);
    /// assert_eq!(table.load_factor(), 0.75);
    /// ```
    pub fn with_size(size_hint: usize, load_factor: f32) -> Self {
        let load_factor = sanitize_load_factor(load_factor);
        let size = table_size_for(size_hint);

        let mut slots = ArenaArray::with_capacity(size);
        slots.resize_with(size, || Slot::Free);

        Self {
            slots,
            count: 0,
            occupation: 0,
            threshold: threshold(size, load_factor),
            load_factor,
        }
    }

    /// Creates a table that holds at least `capacity` values before it needs
    /// to grow.
    ///
    /// ```rust
    /// # use arena_hash::open_table::OpenTable;
    /// #
    /// let table: OpenTable<u64> = OpenTable::with_capacity(1000);
    /// assert!(table.capacity() >= 1000);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_size(
            table_size_for_threshold(capacity.saturating_add(1), DEFAULT_LOAD_FACTOR),
            DEFAULT_LOAD_FACTOR,
        )
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of occupied and deleted slots.
    ///
    /// Tombstones count toward the rehash threshold until the next rehash
    /// clears them.
    pub fn occupation(&self) -> usize {
        self.occupation
    }

    /// Returns the number of slots.
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of values a freshly rehashed table holds before it
    /// grows again.
    pub fn capacity(&self) -> usize {
        self.threshold.saturating_sub(1)
    }

    /// Returns the load factor the table resizes at.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Returns the number of heap bytes held by the slot array.
    pub fn memory_occupation(&self) -> usize {
        self.slots.memory_occupation()
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Walks the probe sequence of `hash` until a match or a free slot.
    ///
    /// A vacant result points at the first tombstone seen, or at the free
    /// slot when there was none.
    fn probe(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Probe {
        let mask = self.mask();
        let start = hash as usize & mask;
        let mut index = start;
        let mut tombstone = None;

        loop {
            match &self.slots[index] {
                Slot::Free => return Probe::Vacant(tombstone.unwrap_or(index)),
                Slot::Deleted => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        return Probe::Found(index);
                    }
                }
            }

            index = (index + 1) & mask;
            if index == start {
                unreachable!("probe wrapped around a table with no free slot");
            }
        }
    }

    /// First free slot on the probe sequence of `hash`. Only valid on a table
    /// without tombstones.
    fn free_slot(&self, hash: u64) -> usize {
        let mask = self.mask();
        let mut index = hash as usize & mask;
        while !matches!(self.slots[index], Slot::Free) {
            debug_assert!(matches!(self.slots[index], Slot::Occupied { .. }));
            index = (index + 1) & mask;
        }
        index
    }

    fn occupied(&self, index: usize) -> &T {
        match &self.slots[index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    fn occupied_mut(&mut self, index: usize) -> &mut T {
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    /// Returns a reference to the value matching `eq`, if any.
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Some(self.occupied(index)),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Some(self.occupied_mut(index)),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a cursor positioned on the value matching `eq`, if any.
    pub fn find_cursor_mut(
        &mut self,
        hash: u64,
        eq: impl Fn(&T) -> bool,
    ) -> Option<CursorMut<'_, T>> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Some(CursorMut { table: self, index }),
            Probe::Vacant(_) => None,
        }
    }

    /// Gets the entry for `hash` and `eq` for in-place manipulation.
    ///
    /// A vacant entry remembers the slot the value would be written to; the
    /// table only grows when that value is actually inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use arena_hash::open_table::Entry;
    /// # use arena_hash::open_table::OpenTable;
    /// #
    /// let mut table: OpenTable<(u64, u32)> = OpenTable::new();
    ///
    /// match table.entry(17, |&(k, _)| k == 17) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((17, 1));
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// if let Entry::Occupied(mut entry) = table.entry(17, |&(k, _)| k == 17) {
    ///     entry.get_mut().1 += 1;
    /// }
    /// assert_eq!(table.find(17, |&(k, _)| k == 17), Some(&(17, 2)));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Entry<'_, T> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            }),
        }
    }

    /// Removes the value matching `eq` and returns it, leaving a tombstone.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<T> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Some(self.take(index)),
            Probe::Vacant(_) => None,
        }
    }

    fn take(&mut self, index: usize) -> T {
        match core::mem::replace(&mut self.slots[index], Slot::Deleted) {
            Slot::Occupied { value, .. } => {
                self.count -= 1;
                value
            }
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    /// Writes `value` into the vacant slot `index` found by `probe`, first
    /// rehashing when filling a free slot would reach the threshold.
    ///
    /// When live values fill less than half the threshold the rehash keeps
    /// the size and only drops tombstones; otherwise the table doubles.
    fn insert_vacant(&mut self, hash: u64, mut index: usize, value: T) -> usize {
        if matches!(self.slots[index], Slot::Free) {
            if self.occupation + 1 >= self.threshold {
                if self.count + 1 < self.threshold / 2 {
                    self.rehash(self.slots.len());
                }
                while self.occupation + 1 >= self.threshold {
                    let size = self
                        .slots
                        .len()
                        .checked_mul(2)
                        .expect("allocation size overflow");
                    self.rehash(size);
                }
                index = self.free_slot(hash);
            }
            self.occupation += 1;
        }

        self.slots[index] = Slot::Occupied { hash, value };
        self.count += 1;
        index
    }

    /// Moves every value into a fresh array of `size` free slots, dropping
    /// all tombstones.
    #[cold]
    fn rehash(&mut self, size: usize) {
        debug_assert!(size.is_power_of_two());
        let mut slots = ArenaArray::with_capacity(size);
        slots.resize_with(size, || Slot::Free);
        self.slots.swap_with(&mut slots);
        self.threshold = threshold(size, self.load_factor);
        self.occupation = self.count;

        for slot in slots {
            if let Slot::Occupied { hash, value } = slot {
                let index = self.free_slot(hash);
                self.slots[index] = Slot::Occupied { hash, value };
            }
        }
    }

    /// Removes every value and tombstone, keeping the slot count.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Free;
        }
        self.count = 0;
        self.occupation = 0;
    }

    /// Makes room for at least `additional` more values without rehashing.
    ///
    /// Never shrinks the table. Rehashes (dropping tombstones) when the
    /// current occupation leaves too little room.
    pub fn reserve(&mut self, additional: usize) {
        let required = self
            .occupation
            .checked_add(additional)
            .expect("allocation size overflow");
        if required < self.threshold {
            return;
        }

        let wanted = self
            .count
            .checked_add(additional)
            .and_then(|n| n.checked_add(1))
            .expect("allocation size overflow");
        let size = table_size_for_threshold(wanted, self.load_factor).max(self.slots.len());
        self.rehash(size);
    }

    /// Returns an iterator over the values, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.count,
        }
    }

    /// Returns an iterator over mutable references to the values, in slot
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.slots.iter_mut(),
            remaining: self.count,
        }
    }

    /// Removes and yields every value. The slot count is kept.
    ///
    /// Values not yet yielded when the iterator is dropped are dropped with
    /// it, and every slot is free again afterwards.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Returns a cursor on the first value in slot order.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        let mut cursor = CursorMut {
            table: self,
            index: 0,
        };
        cursor.seek(0);
        cursor
    }

    /// Checks counters, sizing and probe reachability.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.slots.len().is_power_of_two());
        assert!(self.slots.len() >= crate::MIN_TABLE_SIZE);

        let occupied = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count();
        let deleted = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Deleted))
            .count();
        assert_eq!(occupied, self.count);
        assert_eq!(occupied + deleted, self.occupation);
        assert!(
            self.occupation == 0 || self.occupation < self.threshold,
            "occupation {} reached threshold {}",
            self.occupation,
            self.threshold
        );

        let mask = self.mask();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let mut probe = *hash as usize & mask;
                while probe != index {
                    assert!(
                        !matches!(self.slots[probe], Slot::Free),
                        "slot {index} unreachable: free slot {probe} on its probe path"
                    );
                    probe = (probe + 1) & mask;
                }
            }
        }
    }
}

#[cfg(any(test, feature = "stats"))]
impl<T> OpenTable<T> {
    /// Returns a histogram of probe lengths: entry `n` counts the values
    /// stored `n` slots past their home slot.
    ///
    /// Requires the `stats` feature.
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        let mask = self.mask();
        let mut hist = alloc::vec::Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let distance = index.wrapping_sub(*hash as usize) & mask;
                if distance >= hist.len() {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }
        hist
    }

    /// Returns a snapshot of the table's shape.
    ///
    /// Requires the `stats` feature.
    pub fn stats(&self) -> crate::stats::TableStats {
        let mut empty = 0;
        let mut run = 0;
        let mut longest_run = 0;
        for slot in self.slots.iter() {
            if matches!(slot, Slot::Free) {
                empty += 1;
                run = 0;
            } else {
                run += 1;
                longest_run = longest_run.max(run);
            }
        }

        crate::stats::TableStats {
            len: self.count,
            table_size: self.slots.len(),
            capacity: self.capacity(),
            occupation: self.occupation,
            load_factor: self.load_factor,
            fill_ratio: self.count as f64 / self.slots.len() as f64,
            empty_buckets: empty,
            longest_run,
            memory_bytes: self.memory_occupation(),
        }
    }

    /// Prints the probe-length histogram as a bar chart.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(feature = "std")]
    pub fn print_probe_histogram(&self) {
        crate::stats::print_histogram("probe lengths", self.count, &self.probe_histogram());
    }
}

impl<T> IntoIterator for OpenTable<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.slots.into_iter(),
            remaining: self.count,
        }
    }
}

impl<'a, T> IntoIterator for &'a OpenTable<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut OpenTable<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`OpenTable`].
///
/// [`entry`]: OpenTable::entry
pub enum Entry<'a, T> {
    /// The table holds no matching value.
    Vacant(VacantEntry<'a, T>),
    /// The table holds a matching value.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Inserts `default` if the entry is vacant, and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant, and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value and returns it; returns `None`
    /// for a vacant entry.
    pub fn and_modify(self, f: impl FnOnce(&mut T)) -> Option<&'a mut T> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `T::default()` if the entry is vacant, and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut T
    where
        T: Default,
    {
        self.or_insert_with(T::default)
    }
}

/// A view into a vacant entry in an [`OpenTable`].
pub struct VacantEntry<'a, T> {
    table: &'a mut OpenTable<T>,
    hash: u64,
    index: usize,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Inserts `value` and returns a mutable reference to it.
    ///
    /// Reuses the first tombstone on the probe path when there is one.
    pub fn insert(self, value: T) -> &'a mut T {
        let table = self.table;
        let index = table.insert_vacant(self.hash, self.index, value);
        table.occupied_mut(index)
    }
}

/// A view into an occupied entry in an [`OpenTable`].
pub struct OccupiedEntry<'a, T> {
    table: &'a mut OpenTable<T>,
    index: usize,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &T {
        self.table.occupied(self.index)
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut T {
        self.table.occupied_mut(self.index)
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut T {
        let table = self.table;
        table.occupied_mut(self.index)
    }

    /// Removes the value from the table and returns it, leaving a tombstone.
    pub fn remove(self) -> T {
        self.table.take(self.index)
    }
}

/// A cursor over an [`OpenTable`] that can remove the value it points at.
///
/// The cursor walks values in slot order. Removing through the cursor leaves
/// a tombstone, so slot positions never move while it is alive.
pub struct CursorMut<'a, T> {
    table: &'a mut OpenTable<T>,
    index: usize,
}

impl<'a, T> CursorMut<'a, T> {
    fn seek(&mut self, from: usize) {
        self.index = (from..self.table.slots.len())
            .find(|&i| matches!(self.table.slots[i], Slot::Occupied { .. }))
            .unwrap_or(self.table.slots.len());
    }

    /// Returns `true` once the cursor has moved past the last value.
    pub fn is_end(&self) -> bool {
        self.index >= self.table.slots.len()
    }

    /// Returns the value under the cursor.
    pub fn current(&self) -> Option<&T> {
        if self.is_end() {
            return None;
        }
        Some(self.table.occupied(self.index))
    }

    /// Returns the value under the cursor mutably.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        if self.is_end() {
            return None;
        }
        Some(self.table.occupied_mut(self.index))
    }

    /// Advances to the next value. Does nothing at the end position.
    pub fn move_next(&mut self) {
        if !self.is_end() {
            self.seek(self.index + 1);
        }
    }

    /// Removes the value under the cursor and returns it, leaving the cursor on
    /// the value that followed it.
    ///
    /// Returns `None` at the end position.
    pub fn remove_current(&mut self) -> Option<T> {
        if self.is_end() {
            return None;
        }
        let value = self.table.take(self.index);
        self.seek(self.index + 1);
        Some(value)
    }
}

/// An iterator over the values of an [`OpenTable`], in slot order.
///
/// This struct is created by [`OpenTable::iter`].
pub struct Iter<'a, T> {
    inner: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.inner.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A mutable iterator over the values of an [`OpenTable`], in slot order.
///
/// This struct is created by [`OpenTable::iter_mut`].
pub struct IterMut<'a, T> {
    inner: core::slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.inner.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// A draining iterator over the values of an [`OpenTable`].
///
/// This struct is created by [`OpenTable::drain`].
pub struct Drain<'a, T> {
    table: &'a mut OpenTable<T>,
    index: usize,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.table.count > 0 && self.index < self.table.slots.len() {
            let index = self.index;
            self.index += 1;
            if matches!(self.table.slots[index], Slot::Occupied { .. }) {
                return Some(self.table.take(index));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.count, Some(self.table.count))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        self.table.clear();
    }
}

/// An owning iterator over the values of an [`OpenTable`], in slot order.
pub struct IntoIter<T> {
    inner: crate::arena_array::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.inner.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
