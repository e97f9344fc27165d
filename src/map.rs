use core::borrow::Borrow;
use core::hash::Hash;

/// Load factor used when none is given, or when the given one is unusable.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Smallest load factor either table will use. Smaller requested values are
/// raised to this one so a single insert never triggers a run of doublings.
pub const MIN_LOAD_FACTOR: f32 = 0.0625;

/// Smallest bucket/slot count either table will use.
pub const MIN_TABLE_SIZE: usize = 4;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by `new()` and `with_capacity()`.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by `new()` and `with_capacity()`.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Without `std` or `foldhash` there is no default hasher; construct
        /// maps with `with_hasher` and friends instead.
        pub enum DefaultHashBuilder {}
    }
}

/// Returns a predicate matching stored `(K, V)` pairs whose key equals `key`.
#[inline]
pub(crate) fn equivalent_key<K, V, Q>(key: &Q) -> impl Fn(&(K, V)) -> bool + '_
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    move |x| key.eq(x.0.borrow())
}

/// Load factors outside `(0, 1]` (or NaN) fall back to the default; positive
/// ones below [`MIN_LOAD_FACTOR`] are raised to it.
#[inline]
pub(crate) fn sanitize_load_factor(load_factor: f32) -> f32 {
    if load_factor.is_finite() && load_factor > 0.0 && load_factor <= 1.0 {
        load_factor.max(MIN_LOAD_FACTOR)
    } else {
        DEFAULT_LOAD_FACTOR
    }
}

/// Rounds a size hint up to a power of two, never below [`MIN_TABLE_SIZE`].
#[inline]
pub(crate) fn table_size_for(size_hint: usize) -> usize {
    size_hint
        .max(MIN_TABLE_SIZE)
        .checked_next_power_of_two()
        .expect("allocation size overflow")
}

/// `floor(size * load_factor)`.
#[inline]
pub(crate) fn threshold(size: usize, load_factor: f32) -> usize {
    (size as f64 * load_factor as f64) as usize
}

/// Smallest table size whose threshold is at least `required`.
pub(crate) fn table_size_for_threshold(required: usize, load_factor: f32) -> usize {
    let mut size = table_size_for(((required as f64 / load_factor as f64) as usize).saturating_add(1));
    while threshold(size, load_factor) < required {
        size = size.checked_mul(2).expect("allocation size overflow");
    }
    size
}

/// The lookup/insert/remove contract shared by
/// [`ChainedHashMap`](crate::ChainedHashMap) and
/// [`OpenHashMap`](crate::OpenHashMap).
///
/// Both maps expose these operations as inherent methods too; the trait lets
/// callers write code that is generic over the collision strategy and pick
/// one per workload. Insert- and remove-heavy maps do well with the chained
/// table, whose removals compact storage immediately. Lookup-heavy maps that
/// rarely remove do well with the open-addressing table, which needs no
/// per-entry links.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use arena_hash::AssociativeMap;
/// use arena_hash::ChainedHashMap;
/// use arena_hash::OpenHashMap;
///
/// fn count_words<M: AssociativeMap<&'static str, usize>>(map: &mut M, text: &'static str) {
///     for word in text.split_whitespace() {
///         *map.get_or_insert_default(word) += 1;
///     }
/// }
///
/// let mut chained: ChainedHashMap<&str, usize> = ChainedHashMap::new();
/// let mut open: OpenHashMap<&str, usize> = OpenHashMap::new();
/// count_words(&mut chained, "a b a c a");
/// count_words(&mut open, "a b a c a");
/// assert_eq!(chained.get("a"), Some(&3));
/// assert_eq!(open.get("a"), Some(&3));
/// # }
/// ```
pub trait AssociativeMap<K, V> {
    /// Returns the number of key-value pairs in the map.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no key-value pairs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets (chained) or slots (open addressing).
    /// Always a power of two, at least [`MIN_TABLE_SIZE`].
    fn table_size(&self) -> usize;

    /// Returns the load factor the map resizes at.
    fn load_factor(&self) -> f32;

    /// Inserts `value` under `key`.
    ///
    /// If the key is already present its value is replaced only when
    /// `overwrite` is `true`. Returns `false` exactly when the key was present
    /// and left untouched.
    fn put(&mut self, key: K, value: V, overwrite: bool) -> bool;

    /// Inserts `value` under `key`, replacing and returning any previous value.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Inserts `value` under `key` unless the key is present, and returns the
    /// value stored under `key` afterwards.
    fn insert_unique(&mut self, key: K, value: V) -> &mut V;

    /// Like [`insert_unique`](Self::insert_unique), also reporting whether the
    /// key was newly inserted.
    fn test_insert(&mut self, key: K, value: V) -> (&mut V, bool);

    /// Returns the value under `key`, inserting `V::default()` first if the key
    /// is absent.
    fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default;

    /// Returns the stored key and value for `key`.
    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Returns a reference to the value under `key`.
    fn get<'a, Q>(&'a self, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q> + 'a,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value under `key`.
    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Returns a clone of the value under `key`.
    fn lookup<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get_key_value(key).map(|(_, v)| v.clone())
    }

    /// Returns `true` if the map holds `key`.
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Removes `key`, returning its value if it was present.
    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Removes every key-value pair, keeping the table size.
    fn clear(&mut self);
}
