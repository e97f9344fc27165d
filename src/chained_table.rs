use core::fmt::Debug;
use core::marker::PhantomData;

use crate::arena_array::ArenaArray;
use crate::map::DEFAULT_LOAD_FACTOR;
use crate::map::sanitize_load_factor;
use crate::map::table_size_for;
use crate::map::table_size_for_threshold;
use crate::map::threshold;

/// Bucket count used by [`ChainedTable::new`].
const DEFAULT_TABLE_SIZE: usize = 16;

#[derive(Clone, Debug)]
struct PoolEntry<T> {
    hash: u64,
    next: Option<usize>,
    value: T,
}

/// Where a value lives: its bucket, its chain predecessor and its pool index.
#[derive(Clone, Copy, Debug)]
struct Found {
    bucket: usize,
    prev: Option<usize>,
    index: usize,
}

/// A chained hash table whose entries live in one compacting pool.
///
/// `ChainedTable<T>` stores values of type `T` in a contiguous
/// [`ArenaArray`] and threads each bucket's chain through that array with
/// index links. Like the other raw table in this crate it does not know how to
/// hash or compare values: every operation takes the value's 64-bit hash and an
/// equality predicate.
///
/// Removal keeps the pool dense. The removed entry's slot is filled with the
/// last entry of the pool, and the single link that referenced the moved
/// entry is retargeted. Entries cache their hash, so the moved entry's bucket
/// is found without rehashing anything.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use arena_hash::chained_table::ChainedTable;
/// # use arena_hash::chained_table::Entry;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table: ChainedTable<(u64, u64)> = ChainedTable::new();
///
/// for id in 0..100u64 {
///     table.entry(hash_id(id), |&(k, _)| k == id).or_insert((id, id * 10));
/// }
///
/// assert_eq!(table.find(hash_id(42), |&(k, _)| k == 42), Some(&(42, 420)));
///
/// match table.entry(hash_id(7), |&(k, _)| k == 7) {
///     Entry::Occupied(entry) => assert_eq!(entry.remove(), (7, 70)),
///     Entry::Vacant(_) => unreachable!(),
/// }
/// assert_eq!(table.len(), 99);
/// ```
#[derive(Clone)]
pub struct ChainedTable<T> {
    pool: ArenaArray<PoolEntry<T>>,
    buckets: ArenaArray<Option<usize>>,
    max_pop: usize,
    load_factor: f32,
}

impl<T: Debug> Debug for ChainedTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainedTable")
            .field("buckets", &self.buckets)
            .field("pool", &self.pool)
            .field("populated", &self.pool.len())
            .field("capacity", &self.max_pop)
            .finish()
    }
}

impl<T> Default for ChainedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChainedTable<T> {
    /// Creates a table with 16 buckets and the default load factor.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_TABLE_SIZE, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a table with at least `size_hint` buckets, rounded up to a
    /// power of two no smaller than 4.
    ///
    /// The pool is allocated for `floor(buckets * load_factor)` entries. A
    /// load factor outside `(0, 1]` is replaced by
    /// [`DEFAULT_LOAD_FACTOR`](crate::DEFAULT_LOAD_FACTOR); one below
    /// [`MIN_LOAD_FACTOR`](crate::MIN_LOAD_FACTOR) is raised to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use arena_hash::chained_table::ChainedTable;
    /// #
    /// let table: ChainedTable<u32> = ChainedTable::with_size(5, 0.5);
    /// assert_eq!(table.table_size(), 8);
    /// assert_eq!(table.capacity(), 4);
    /// ```
    pub fn with_size(size_hint: usize, load_factor: f32) -> Self {
        let load_factor = sanitize_load_factor(load_factor);
        let size = table_size_for(size_hint);
        let max_pop = threshold(size, load_factor);

        let mut buckets = ArenaArray::with_capacity(size);
        buckets.resize(size, None);

        Self {
            pool: ArenaArray::with_capacity(max_pop),
            buckets,
            max_pop,
            load_factor,
        }
    }

    /// Creates a table that holds at least `capacity` values before it needs
    /// to grow.
    ///
    /// ```rust
    /// # use arena_hash::chained_table::ChainedTable;
    /// #
    /// let table: ChainedTable<String> = ChainedTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_size(
            table_size_for_threshold(capacity, DEFAULT_LOAD_FACTOR),
            DEFAULT_LOAD_FACTOR,
        )
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Returns the number of buckets.
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of values the table holds before it rehashes.
    pub fn capacity(&self) -> usize {
        self.max_pop
    }

    /// Returns the load factor the table resizes at.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Returns the number of heap bytes held by the pool and bucket array.
    pub fn memory_occupation(&self) -> usize {
        self.pool.memory_occupation() + self.buckets.memory_occupation()
    }

    #[inline]
    fn bucket_for(&self, hash: u64) -> usize {
        hash as usize & (self.buckets.len() - 1)
    }

    #[inline]
    fn search(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<Found> {
        let bucket = self.bucket_for(hash);
        let mut prev = None;
        let mut link = self.buckets[bucket];
        while let Some(index) = link {
            let entry = &self.pool[index];
            if entry.hash == hash && eq(&entry.value) {
                return Some(Found {
                    bucket,
                    prev,
                    index,
                });
            }
            prev = Some(index);
            link = entry.next;
        }
        None
    }

    /// Returns a reference to the value matching `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use arena_hash::chained_table::ChainedTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = ChainedTable::new();
    /// table
    ///     .entry(hash_str("key"), |s: &String| s == "key")
    ///     .or_insert("key".to_string());
    ///
    /// assert!(table.find(hash_str("key"), |s| s == "key").is_some());
    /// assert!(table.find(hash_str("other"), |s| s == "other").is_none());
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let found = self.search(hash, eq)?;
        Some(&self.pool[found.index].value)
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let found = self.search(hash, eq)?;
        Some(&mut self.pool[found.index].value)
    }

    /// Returns a cursor positioned on the value matching `eq`, if any.
    pub fn find_cursor_mut(
        &mut self,
        hash: u64,
        eq: impl Fn(&T) -> bool,
    ) -> Option<CursorMut<'_, T>> {
        let found = self.search(hash, eq)?;
        Some(CursorMut {
            table: self,
            bucket: found.bucket,
            prev: found.prev,
            current: Some(found.index),
        })
    }

    /// Gets the entry for `hash` and `eq` for in-place manipulation.
    ///
    /// Looking up an entry never resizes the table; a rehash happens only when
    /// a vacant entry is filled while the pool is at capacity.
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Entry<'_, T> {
        match self.search(hash, eq) {
            Some(found) => Entry::Occupied(OccupiedEntry { table: self, found }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Removes the value matching `eq` and returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use arena_hash::chained_table::ChainedTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = ChainedTable::new();
    /// table.entry(hash_u64(42), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(hash_u64(42), |&n| n == 42), Some(42));
    /// assert_eq!(table.remove(hash_u64(42), |&n| n == 42), None);
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<T> {
        let found = self.search(hash, eq)?;
        Some(self.remove_found(found).0)
    }

    /// Removes every value, keeping the bucket count and pool allocation.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.buckets.fill(None);
    }

    /// Makes room for at least `additional` more values without rehashing.
    ///
    /// Never shrinks the table.
    pub fn reserve(&mut self, additional: usize) {
        let required = self
            .pool
            .len()
            .checked_add(additional)
            .expect("allocation size overflow");
        if required > self.max_pop {
            self.rehash(table_size_for_threshold(required, self.load_factor));
        }
    }

    /// Returns an iterator over the values, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            table: self,
            bucket: 0,
            link: None,
            remaining: self.pool.len(),
        }
    }

    /// Returns an iterator over mutable references to the values.
    ///
    /// Values are visited in pool order rather than bucket order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.pool.iter_mut(),
        }
    }

    /// Removes and yields every value. The bucket count is kept.
    ///
    /// ```rust
    /// # use arena_hash::chained_table::ChainedTable;
    /// #
    /// let mut table = ChainedTable::with_size(4, 0.75);
    /// for n in 0..3u64 {
    ///     table.entry(n, |&v: &u64| v == n).or_insert(n);
    /// }
    ///
    /// let mut values: Vec<u64> = table.drain().collect();
    /// values.sort();
    /// assert_eq!(values, [0, 1, 2]);
    /// assert!(table.is_empty());
    /// assert_eq!(table.table_size(), 4);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        let pool = core::mem::replace(&mut self.pool, ArenaArray::with_capacity(self.max_pop));
        self.buckets.fill(None);
        Drain {
            inner: pool.into_iter(),
            _table: PhantomData,
        }
    }

    /// Returns a cursor on the first value in bucket order.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        let mut cursor = CursorMut {
            table: self,
            bucket: 0,
            prev: None,
            current: None,
        };
        cursor.seek(0);
        cursor
    }

    /// Appends a value to the pool and makes it the head of its bucket,
    /// growing the table first if the pool is at capacity.
    fn push_entry(&mut self, hash: u64, value: T) -> usize {
        while self.pool.len() >= self.max_pop {
            let size = self
                .buckets
                .len()
                .checked_mul(2)
                .expect("allocation size overflow");
            self.rehash(size);
        }

        let bucket = self.bucket_for(hash);
        let index = self.pool.len();
        self.pool.push(PoolEntry {
            hash,
            next: self.buckets[bucket],
            value,
        });
        self.buckets[bucket] = Some(index);
        index
    }

    /// Unlinks and removes the entry at `found`, compacting the pool.
    ///
    /// Returns the value and, when the last pool entry was moved into the hole,
    /// the index it was moved from.
    fn remove_found(&mut self, found: Found) -> (T, Option<usize>) {
        let Found {
            bucket,
            prev,
            index,
        } = found;

        let next = self.pool[index].next;
        match prev {
            Some(prev) => self.pool[prev].next = next,
            None => self.buckets[bucket] = next,
        }

        // The last entry may still point at the victim; fix that before it
        // moves into the victim's slot or it would link to itself.
        let last = self.pool.len() - 1;
        if last != index && self.pool[last].next == Some(index) {
            self.pool[last].next = next;
        }

        let (entry, moved_from) = self.pool.fast_remove(index);
        if let Some(from) = moved_from {
            self.retarget(from, index);
        }
        (entry.value, moved_from)
    }

    /// Points the link that referenced pool index `from` at `to`, where the
    /// entry now lives.
    fn retarget(&mut self, from: usize, to: usize) {
        let bucket = self.bucket_for(self.pool[to].hash);
        if self.buckets[bucket] == Some(from) {
            self.buckets[bucket] = Some(to);
            return;
        }

        let mut link = self.buckets[bucket];
        while let Some(index) = link {
            let next = self.pool[index].next;
            if next == Some(from) {
                self.pool[index].next = Some(to);
                return;
            }
            link = next;
        }

        debug_assert!(false, "moved entry {from} not linked from bucket {bucket}");
    }

    /// Rebuilds the bucket array with `size` buckets.
    ///
    /// Pool indices survive the reallocation, so only the chains are rebuilt.
    #[cold]
    fn rehash(&mut self, size: usize) {
        debug_assert!(size.is_power_of_two());
        let max_pop = threshold(size, self.load_factor);
        debug_assert!(max_pop >= self.pool.len());
        self.pool.set_capacity(max_pop.max(self.pool.len()));

        let mut buckets = ArenaArray::with_capacity(size);
        buckets.resize(size, None);
        self.buckets.swap_with(&mut buckets);
        self.max_pop = max_pop;

        let mask = size - 1;
        for index in 0..self.pool.len() {
            let bucket = self.pool[index].hash as usize & mask;
            self.pool[index].next = self.buckets[bucket];
            self.buckets[bucket] = Some(index);
        }
    }

    /// Walks every chain and checks the structural invariants.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(self.buckets.len().is_power_of_two());
        assert!(self.buckets.len() >= crate::MIN_TABLE_SIZE);
        assert!(self.pool.len() <= self.max_pop, "{} > {}", self.pool.len(), self.max_pop);

        let mut seen = alloc::vec![false; self.pool.len()];
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut link = *head;
            while let Some(index) = link {
                assert!(index < self.pool.len(), "link {index} past pool end {}", self.pool.len());
                assert!(!seen[index], "entry {index} reachable twice");
                seen[index] = true;

                let entry = &self.pool[index];
                assert_eq!(self.bucket_for(entry.hash), bucket);
                assert_ne!(entry.next, Some(index), "entry {index} links to itself");
                link = entry.next;
            }
        }
        assert!(seen.iter().all(|s| *s), "unreachable pool entries");
    }
}

#[cfg(any(test, feature = "stats"))]
impl<T> ChainedTable<T> {
    fn chain_length(&self, bucket: usize) -> usize {
        let mut length = 0;
        let mut link = self.buckets[bucket];
        while let Some(index) = link {
            length += 1;
            link = self.pool[index].next;
        }
        length
    }

    /// Returns a histogram of chain lengths: entry `n` counts the buckets
    /// holding exactly `n` values.
    ///
    /// Requires the `stats` feature.
    pub fn bucket_occupation(&self) -> alloc::vec::Vec<usize> {
        let mut hist = alloc::vec![0usize; 1];
        for bucket in 0..self.buckets.len() {
            let length = self.chain_length(bucket);
            if length >= hist.len() {
                hist.resize(length + 1, 0);
            }
            hist[length] += 1;
        }
        hist
    }

    /// Returns a snapshot of the table's shape.
    ///
    /// Requires the `stats` feature.
    pub fn stats(&self) -> crate::stats::TableStats {
        let hist = self.bucket_occupation();
        crate::stats::TableStats {
            len: self.len(),
            table_size: self.table_size(),
            capacity: self.max_pop,
            occupation: self.len(),
            load_factor: self.load_factor,
            fill_ratio: self.len() as f64 / self.table_size() as f64,
            empty_buckets: hist[0],
            longest_run: hist.len() - 1,
            memory_bytes: self.memory_occupation(),
        }
    }

    /// Prints the chain-length histogram as a bar chart.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(feature = "std")]
    pub fn print_bucket_occupation(&self) {
        crate::stats::print_histogram("chain lengths", self.len(), &self.bucket_occupation());
    }
}

impl<T> IntoIterator for ChainedTable<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.pool.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a ChainedTable<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ChainedTable<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`ChainedTable`].
///
/// [`entry`]: ChainedTable::entry
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

/// A view into a vacant entry in a [`ChainedTable`].
pub struct VacantEntry<'a, T> {
    table: &'a mut ChainedTable<T>,
    hash: u64,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Inserts `value` at the head of its bucket's chain and returns a mutable
    /// reference to it.
    ///
    /// Rehashes to double the bucket count first if the pool is at capacity.
    pub fn insert(self, value: T) -> &'a mut T {
        let table = self.table;
        let index = table.push_entry(self.hash, value);
        &mut table.pool[index].value
    }
}

/// A view into an occupied entry in a [`ChainedTable`].
pub struct OccupiedEntry<'a, T> {
    table: &'a mut ChainedTable<T>,
    found: Found,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &T {
        &self.table.pool[self.found.index].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.table.pool[self.found.index].value
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut T {
        let table = self.table;
        &mut table.pool[self.found.index].value
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> T {
        self.table.remove_found(self.found).0
    }
}

/// A cursor over a [`ChainedTable`] that can remove the value it points at.
///
/// The cursor walks values in bucket order. After the last value it rests on
/// the end position, where [`current`](Self::current) returns `None`.
///
/// # Examples
///
/// ```rust
/// # use arena_hash::chained_table::ChainedTable;
/// #
/// let mut table = ChainedTable::with_size(4, 0.75);
/// for n in 0..10u64 {
///     table.entry(n, |&v: &u64| v == n).or_insert(n);
/// }
///
/// let mut cursor = table.cursor_front_mut();
/// while let Some(&value) = cursor.current() {
///     if value % 2 == 0 {
///         cursor.remove_current();
///     } else {
///         cursor.move_next();
///     }
/// }
///
/// assert_eq!(table.len(), 5);
/// assert!(table.iter().all(|v| v % 2 == 1));
/// ```
pub struct CursorMut<'a, T> {
    table: &'a mut ChainedTable<T>,
    bucket: usize,
    prev: Option<usize>,
    current: Option<usize>,
}

impl<'a, T> CursorMut<'a, T> {
    /// Moves to the first chain head at or after bucket `from`.
    fn seek(&mut self, from: usize) {
        self.prev = None;
        for bucket in from..self.table.buckets.len() {
            if let Some(head) = self.table.buckets[bucket] {
                self.bucket = bucket;
                self.current = Some(head);
                return;
            }
        }
        self.bucket = self.table.buckets.len();
        self.current = None;
    }

    /// Returns `true` once the cursor has moved past the last value.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the value under the cursor.
    pub fn current(&self) -> Option<&T> {
        let index = self.current?;
        Some(&self.table.pool[index].value)
    }

    /// Returns the value under the cursor mutably.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let index = self.current?;
        Some(&mut self.table.pool[index].value)
    }

    /// Advances to the next value. Does nothing at the end position.
    pub fn move_next(&mut self) {
        let Some(index) = self.current else {
            return;
        };

        match self.table.pool[index].next {
            Some(next) => {
                self.prev = Some(index);
                self.current = Some(next);
            }
            None => self.seek(self.bucket + 1),
        }
    }

    /// Removes the value under the cursor and returns it, leaving the cursor on
    /// the value that followed it.
    ///
    /// Returns `None` at the end position.
    pub fn remove_current(&mut self) -> Option<T> {
        let index = self.current?;
        let next = self.table.pool[index].next;
        let (value, moved_from) = self.table.remove_found(Found {
            bucket: self.bucket,
            prev: self.prev,
            index,
        });

        // The entry that filled the hole now answers to `index`.
        let relocate = |link: Option<usize>| {
            if link.is_some() && link == moved_from {
                Some(index)
            } else {
                link
            }
        };

        self.prev = relocate(self.prev);
        match relocate(next) {
            Some(next) => self.current = Some(next),
            None => self.seek(self.bucket + 1),
        }
        Some(value)
    }
}

/// An iterator over the values of a [`ChainedTable`], in bucket order.
///
/// This struct is created by [`ChainedTable::iter`].
pub struct Iter<'a, T> {
    table: &'a ChainedTable<T>,
    bucket: usize,
    link: Option<usize>,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            bucket: self.bucket,
            link: self.link,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        loop {
            if let Some(index) = self.link {
                let entry = &table.pool[index];
                self.link = entry.next;
                self.remaining -= 1;
                return Some(&entry.value);
            }

            if self.bucket >= table.buckets.len() {
                return None;
            }
            self.link = table.buckets[self.bucket];
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A mutable iterator over the values of a [`ChainedTable`], in pool order.
///
/// This struct is created by [`ChainedTable::iter_mut`].
pub struct IterMut<'a, T> {
    inner: core::slice::IterMut<'a, PoolEntry<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &mut entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// A draining iterator over the values of a [`ChainedTable`].
///
/// This struct is created by [`ChainedTable::drain`]. The table is already
/// empty when the iterator is returned; values not yet yielded are dropped
/// with the iterator.
pub struct Drain<'a, T> {
    inner: crate::arena_array::IntoIter<PoolEntry<T>>,
    _table: PhantomData<&'a mut ChainedTable<T>>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

/// An owning iterator over the values of a [`ChainedTable`], in pool order.
pub struct IntoIter<T> {
    inner: crate::arena_array::IntoIter<PoolEntry<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
