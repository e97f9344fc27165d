use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::chained_table::ChainedTable;
use crate::chained_table::Entry as TableEntry;
use crate::map::AssociativeMap;
use crate::map::DEFAULT_LOAD_FACTOR;
use crate::map::DefaultHashBuilder;
use crate::map::equivalent_key;
use crate::map::table_size_for_threshold;

/// Bucket count used by [`ChainedHashMap::new`] and
/// [`ChainedHashMap::with_hasher`].
const DEFAULT_TABLE_SIZE: usize = 16;

/// A hash map backed by a [`ChainedTable`].
///
/// `ChainedHashMap<K, V, S>` stores key-value pairs in a single compacting
/// pool and chains colliding keys through index links. Removal is O(1) beyond
/// the chain walk and gives memory back to the pool immediately, which makes
/// this map the better fit for workloads with many inserts and removals.
///
/// # Performance Characteristics
///
/// - **Memory**: one `Option<usize>` per bucket, plus a u64 hash and an
///   `Option<usize>` link per entry next to the `(K, V)` pair
///
/// # Examples
///
/// ```rust
/// use arena_hash::ChainedHashMap;
///
/// let mut ids: ChainedHashMap<u128, &str> = ChainedHashMap::new();
/// ids.insert(0x5f2e_11aa, "player");
/// ids.insert(0x77b0_9c03, "camera");
///
/// assert_eq!(ids.get(&0x5f2e_11aa), Some(&"player"));
/// assert_eq!(ids.remove(&0x77b0_9c03), Some("camera"));
/// assert_eq!(ids.len(), 1);
/// ```
#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    table: ChainedTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for ChainedHashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Creates a map with at least `size_hint` buckets (rounded up to a power
    /// of two no smaller than 4) that grows once it holds
    /// `floor(buckets * load_factor)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use arena_hash::ChainedHashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: ChainedHashMap<u32, u32, _> =
    ///     ChainedHashMap::with_size_and_hasher(100, 0.5, SimpleHasher);
    /// assert_eq!(map.table_size(), 128);
    /// assert_eq!(map.capacity(), 64);
    /// ```
    pub fn with_size_and_hasher(size_hint: usize, load_factor: f32, hash_builder: S) -> Self {
        Self {
            table: ChainedTable::with_size(size_hint, load_factor),
            hash_builder,
        }
    }

    /// Creates an empty map with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_size_and_hasher(DEFAULT_TABLE_SIZE, DEFAULT_LOAD_FACTOR, hash_builder)
    }

    /// Creates a map that holds at least `capacity` pairs before it needs to
    /// grow.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_size_and_hasher(
            table_size_for_threshold(capacity, DEFAULT_LOAD_FACTOR),
            DEFAULT_LOAD_FACTOR,
            hash_builder,
        )
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of pairs the map holds before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets.
    pub fn table_size(&self) -> usize {
        self.table.table_size()
    }

    /// Returns the load factor the map grows at.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the number of heap bytes held by the map.
    pub fn memory_occupation(&self) -> usize {
        self.table.memory_occupation()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements, keeping the bucket count.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs, bucket by bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields every pair, keeping the bucket count.
    ///
    /// ```rust
    /// use arena_hash::ChainedHashMap;
    ///
    /// let mut map: ChainedHashMap<u8, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
    /// let mut pairs: Vec<_> = map.drain().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(1, 'a'), (2, 'b')]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a cursor on the first pair, for walking the map while removing
    /// pairs.
    ///
    /// ```rust
    /// use arena_hash::ChainedHashMap;
    ///
    /// let mut map: ChainedHashMap<u32, u32> = (0..10).map(|n| (n, n * n)).collect();
    ///
    /// let mut cursor = map.cursor_front_mut();
    /// while let Some(&key) = cursor.key() {
    ///     if key % 3 == 0 {
    ///         cursor.remove_current();
    ///     } else {
    ///         cursor.move_next();
    ///     }
    /// }
    ///
    /// assert_eq!(map.len(), 6);
    /// assert!(!map.contains_key(&9));
    /// ```
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut {
            inner: self.table.cursor_front_mut(),
        }
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &ChainedTable<(K, V)> {
        &self.table
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Makes room for at least `additional` more pairs without rehashing.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Inserts `value` under `key`, replacing the stored value only when
    /// `overwrite` is `true`.
    ///
    /// Returns `false` exactly when the key was present and left untouched.
    ///
    /// ```rust
    /// use arena_hash::ChainedHashMap;
    ///
    /// let mut map: ChainedHashMap<&str, u32> = ChainedHashMap::new();
    /// assert!(map.put("hp", 10, false));
    /// assert!(!map.put("hp", 20, false));
    /// assert_eq!(map["hp"], 10);
    /// assert!(map.put("hp", 30, true));
    /// assert_eq!(map["hp"], 30);
    /// ```
    pub fn put(&mut self, key: K, value: V, overwrite: bool) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                if overwrite {
                    entry.get_mut().1 = value;
                }
                overwrite
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                true
            }
        }
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Inserts `value` unless `key` is present, and returns the value stored
    /// under `key`.
    pub fn insert_unique(&mut self, key: K, value: V) -> &mut V {
        self.entry(key).or_insert(value)
    }

    /// Like [`insert_unique`](Self::insert_unique), also reporting whether the
    /// pair was newly inserted.
    ///
    /// ```rust
    /// use arena_hash::ChainedHashMap;
    ///
    /// let mut map: ChainedHashMap<&str, u32> = ChainedHashMap::new();
    /// assert_eq!(map.test_insert("a", 1), (&mut 1, true));
    /// assert_eq!(map.test_insert("a", 2), (&mut 1, false));
    /// ```
    pub fn test_insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        match self.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(value), true),
        }
    }

    /// Returns the value under `key`, inserting `V::default()` first if the key
    /// is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, equivalent_key(key))
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, equivalent_key(key))
            .map(|(_, v)| v)
    }

    /// Returns a clone of the value corresponding to the key.
    pub fn lookup<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get(key).cloned()
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Removes a key from the map, returning the value if the key was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, equivalent_key(key))
    }

    /// Returns a cursor on the pair for `key`, or `None` if the key is absent.
    pub fn find_cursor_mut<Q>(&mut self, key: &Q) -> Option<CursorMut<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_cursor_mut(hash, equivalent_key(key))
            .map(|inner| CursorMut { inner })
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// ```rust
    /// use arena_hash::ChainedHashMap;
    ///
    /// let mut counts: ChainedHashMap<char, u32> = ChainedHashMap::new();
    /// for c in "hello".chars() {
    ///     counts.entry(c).and_modify(|n| *n += 1).or_insert(1);
    /// }
    /// assert_eq!(counts[&'l'], 2);
    /// assert_eq!(counts[&'o'], 1);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }
}

#[cfg(any(test, feature = "stats"))]
impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Returns a snapshot of the underlying table's shape.
    ///
    /// Requires the `stats` feature.
    pub fn stats(&self) -> crate::stats::TableStats {
        self.table.stats()
    }

    /// Returns the chain-length histogram of the underlying table.
    ///
    /// Requires the `stats` feature.
    pub fn bucket_occupation(&self) -> alloc::vec::Vec<usize> {
        self.table.bucket_occupation()
    }

    /// Prints the chain-length histogram as a bar chart.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(feature = "std")]
    pub fn print_bucket_occupation(&self) {
        self.table.print_bucket_occupation();
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map with 16 buckets using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a map that holds at least `capacity` pairs before it needs to
    /// grow, using the default hasher builder.
    ///
    /// ```rust
    /// use arena_hash::ChainedHashMap;
    ///
    /// let map: ChainedHashMap<i32, String> = ChainedHashMap::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, S> Eq for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> core::ops::Index<&Q> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in ChainedHashMap")
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Builds a map with twice as many buckets as the iterator reports items.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let size_hint = iter.size_hint().0.saturating_mul(2);
        let mut map = Self::with_size_and_hasher(size_hint, DEFAULT_LOAD_FACTOR, S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> AssociativeMap<K, V> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.len()
    }

    fn table_size(&self) -> usize {
        self.table_size()
    }

    fn load_factor(&self) -> f32 {
        self.load_factor()
    }

    fn put(&mut self, key: K, value: V, overwrite: bool) -> bool {
        self.put(key, value, overwrite)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn insert_unique(&mut self, key: K, value: V) -> &mut V {
        self.insert_unique(key, value)
    }

    fn test_insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        self.test_insert(key, value)
    }

    fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_default(key)
    }

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key)
    }

    fn clear(&mut self) {
        self.clear();
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`ChainedHashMap`].
///
/// [`entry`]: ChainedHashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::chained_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::chained_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A cursor over a [`ChainedHashMap`] that can remove the pair it points at.
///
/// Created by [`ChainedHashMap::cursor_front_mut`] and
/// [`ChainedHashMap::find_cursor_mut`].
pub struct CursorMut<'a, K, V> {
    inner: crate::chained_table::CursorMut<'a, (K, V)>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    /// Returns `true` once the cursor has moved past the last pair.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns the key under the cursor.
    pub fn key(&self) -> Option<&K> {
        self.inner.current().map(|(k, _)| k)
    }

    /// Returns the value under the cursor.
    pub fn value(&self) -> Option<&V> {
        self.inner.current().map(|(_, v)| v)
    }

    /// Returns the value under the cursor mutably.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.inner.current_mut().map(|(_, v)| v)
    }

    /// Advances to the next pair. Does nothing at the end position.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Removes the pair under the cursor and returns it, leaving the cursor on
    /// the pair that followed it.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        self.inner.remove_current()
    }
}

/// An iterator over the key-value pairs of a `ChainedHashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::chained_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A mutable iterator over the key-value pairs of a `ChainedHashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::chained_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|pair| (&pair.0, &mut pair.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `ChainedHashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a `ChainedHashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A mutable iterator over the values of a `ChainedHashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the key-value pairs of a `ChainedHashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::chained_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the key-value pairs of a `ChainedHashMap`.
pub struct IntoIter<K, V> {
    inner: crate::chained_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: ChainedHashMap<i32, String, SipHashBuilder> = ChainedHashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.table_size(), 16);
        assert_eq!(map.load_factor(), DEFAULT_LOAD_FACTOR);

        let map2 = ChainedHashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.capacity(), 12);
    }

    #[test]
    fn test_with_capacity() {
        let map: ChainedHashMap<i32, String, SipHashBuilder> = ChainedHashMap::with_capacity(100);
        assert!(map.capacity() >= 100);
        assert!(map.is_empty());

        let map2 =
            ChainedHashMap::<i32, String, _>::with_capacity_and_hasher(200, SipHashBuilder::default());
        assert!(map2.capacity() >= 200);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());

        assert_eq!(map.insert(1, "hello".to_string()), None);
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert_eq!(map.insert(1, "world".to_string()), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
        assert_eq!(map.lookup(&1), Some("world".to_string()));
        assert_eq!(map.get_key_value(&1), Some((&1, &"world".to_string())));
    }

    #[test]
    fn test_borrowed_lookups() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());
        map.insert("alpha".to_string(), 1);
        map.insert("beta".to_string(), 2);

        assert_eq!(map.get("alpha"), Some(&1));
        assert!(map.contains_key("beta"));
        assert_eq!(map["beta"], 2);
        *map.get_mut("beta").unwrap() += 10;
        assert_eq!(map.remove_entry("beta"), Some(("beta".to_string(), 12)));
        assert!(!map.contains_key("beta"));
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_remove() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));

        assert_eq!(map.remove(&1), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_many_removes_keep_links_valid() {
        let mut map = ChainedHashMap::with_size_and_hasher(4, 0.9, SipHashBuilder::default());
        for i in 0..2000u32 {
            map.insert(i, i.wrapping_mul(31));
        }
        for i in (0..2000u32).rev().step_by(2) {
            assert_eq!(map.remove(&i), Some(i.wrapping_mul(31)));
        }
        map.table().assert_consistent();

        assert_eq!(map.len(), 1000);
        for i in 0..2000u32 {
            assert_eq!(map.get(&i).is_some(), i % 2 == 0, "key {i}");
        }
    }

    #[test]
    fn test_entry_api() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());

        let value = map.entry(1).or_insert("default".to_string());
        assert_eq!(value, "default");

        let value = map.entry(1).or_insert("other".to_string());
        assert_eq!(value, "default");

        let value = map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(value, "computed");

        map.entry(1).and_modify(|v| v.push_str("_modified"));
        assert_eq!(map.get(&1), Some(&"default_modified".to_string()));

        let mut counts = ChainedHashMap::with_hasher(SipHashBuilder::default());
        for word in ["a", "b", "a"] {
            *counts.entry(word).or_default() += 1;
        }
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get_or_insert_default("c"), &mut 0);
        assert_eq!(counts.len(), 3);

        match map.entry(3) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &3);
                assert_eq!(entry.into_key(), 3);
            }
            Entry::Occupied(_) => panic!("key 3 should be vacant"),
        }

        match map.entry(2) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &2);
                assert_eq!(entry.insert("replaced".to_string()), "computed");
                assert_eq!(entry.remove_entry(), (2, "replaced".to_string()));
            }
            Entry::Vacant(_) => panic!("key 2 should be occupied"),
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iterators() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());
        for i in 0..50 {
            map.insert(i, i * 10);
        }

        assert_eq!(map.iter().len(), 50);
        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());

        let sum: i32 = map.values().sum();
        assert_eq!(sum, (0..50).map(|i| i * 10).sum());

        for value in map.values_mut() {
            *value += 1;
        }
        for (k, v) in &mut map {
            *v += *k;
        }
        for (k, v) in &map {
            assert_eq!(*v, k * 11 + 1);
        }

        let mut pairs: Vec<(i32, i32)> = map.into_iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs.len(), 50);
        assert_eq!(pairs[3], (3, 34));
    }

    #[test]
    fn test_drain_and_clear() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());
        for i in 0..40 {
            map.insert(i, i);
        }
        let size = map.table_size();

        let drained: Vec<_> = map.drain().collect();
        assert_eq!(drained.len(), 40);
        assert!(map.is_empty());
        assert_eq!(map.table_size(), size);

        map.insert(1, 1);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.table_size(), size);
        assert_eq!(map.get(&1), None);
    }

    #[test]
    fn test_cursor() {
        let mut map = ChainedHashMap::with_size_and_hasher(4, 1.0, SipHashBuilder::default());
        for i in 0..30u32 {
            map.insert(i, i);
        }

        let mut cursor = map.find_cursor_mut(&7).expect("7 is present");
        assert_eq!(cursor.key(), Some(&7));
        if let Some(value) = cursor.value_mut() {
            *value = 700;
        }
        assert_eq!(cursor.value(), Some(&700));
        assert_eq!(cursor.remove_current(), Some((7, 700)));
        assert!(map.find_cursor_mut(&7).is_none());

        let mut removed = 0;
        let mut cursor = map.cursor_front_mut();
        while !cursor.is_end() {
            if cursor.key().is_some_and(|k| k % 5 == 0) {
                cursor.remove_current();
                removed += 1;
            } else {
                cursor.move_next();
            }
        }

        assert_eq!(removed, 6);
        assert_eq!(map.len(), 23);
        map.table().assert_consistent();
        assert!(map.keys().all(|k| k % 5 != 0 && *k != 7));
    }

    #[test]
    fn test_clone_eq_debug() {
        let mut map = ChainedHashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one");
        map.insert(2, "two");

        let mut copy = map.clone();
        assert_eq!(copy, map);
        copy.insert(2, "deux");
        assert_ne!(copy, map);
        copy.insert(2, "two");
        copy.insert(3, "three");
        assert_ne!(copy, map);

        let single = {
            let mut m = ChainedHashMap::with_hasher(SipHashBuilder::default());
            m.insert(5, 'x');
            m
        };
        assert_eq!(format!("{single:?}"), "{5: 'x'}");
    }

    #[test]
    fn test_extend_and_from_iter() {
        let map: ChainedHashMap<u32, u32, SipHashBuilder> = (0..10).map(|i| (i, i)).collect();
        assert_eq!(map.len(), 10);
        assert!(map.table_size() >= 20);

        let mut map = map;
        map.extend((5..15).map(|i| (i, i * 2)));
        assert_eq!(map.len(), 15);
        assert_eq!(map.get(&5), Some(&10));
        assert_eq!(map.get(&4), Some(&4));
    }

    #[test]
    fn test_stats() {
        let mut map = ChainedHashMap::with_size_and_hasher(64, 0.75, SipHashBuilder::default());
        for i in 0..40u64 {
            map.insert(i, ());
        }

        let stats = map.stats();
        assert_eq!(stats.len, 40);
        assert_eq!(stats.table_size, 64);
        assert_eq!(stats.capacity, 48);
        let hist = map.bucket_occupation();
        assert_eq!(hist.iter().sum::<usize>(), 64);
        assert_eq!(hist.iter().enumerate().map(|(n, c)| n * c).sum::<usize>(), 40);
        assert!(map.memory_occupation() > 0);
    }
}
