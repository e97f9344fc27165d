use alloc::alloc::handle_alloc_error;
use core::alloc::Layout;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ops::Deref;
use core::ops::DerefMut;
use core::ptr::NonNull;

/// Capacity of the first allocation made by a growing push.
const MIN_GROWTH: usize = 2;

/// A contiguous, growable buffer with exact-capacity reallocation.
///
/// `ArenaArray<T>` is the storage substrate of both hash tables in this crate.
/// It differs from `Vec<T>` in the operations it promises:
///
/// - [`set_capacity`](Self::set_capacity) allocates *exactly* the requested
///   number of slots and keeps at most that many elements.
/// - [`push`](Self::push) doubles the capacity (starting from 2) when full.
/// - [`fast_remove`](Self::fast_remove) fills the hole with the last element
///   and reports where that element came from, so that callers holding
///   indices into the array can repair them.
///
/// Elements are relocated with a bitwise move when the buffer is reallocated.
///
/// ## Example
///
/// ```rust
/// use arena_hash::ArenaArray;
///
/// let mut array = ArenaArray::new();
/// array.push("a");
/// array.push("b");
/// array.push("c");
///
/// let (removed, moved_from) = array.fast_remove(0);
/// assert_eq!(removed, "a");
/// assert_eq!(moved_from, Some(2));
/// assert_eq!(&array[..], &["c", "b"]);
/// ```
pub struct ArenaArray<T> {
    ptr: NonNull<T>,
    len: usize,
    capacity: usize,
    _phantom: PhantomData<T>,
}

// SAFETY: `ArenaArray<T>` owns its elements exactly like `Vec<T>` does; the raw
// pointer is never shared outside of borrows tied to `&self`/`&mut self`.
unsafe impl<T: Send> Send for ArenaArray<T> {}
// SAFETY: Shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for ArenaArray<T> {}

impl<T> ArenaArray<T> {
    /// Creates an empty array without allocating.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            capacity: 0,
            _phantom: PhantomData,
        }
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    ///
    /// ```rust
    /// use arena_hash::ArenaArray;
    ///
    /// let array: ArenaArray<u32> = ArenaArray::with_capacity(10);
    /// assert_eq!(array.capacity(), 10);
    /// assert!(array.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ptr: Self::allocate(capacity),
            len: 0,
            capacity,
            _phantom: PhantomData,
        }
    }

    fn allocate(capacity: usize) -> NonNull<T> {
        let layout = Layout::array::<T>(capacity).expect("allocation size overflow");
        if layout.size() == 0 {
            return NonNull::dangling();
        }

        // SAFETY: We have validated that the layout size is non-zero, and we handle
        // allocation errors if `alloc` returns null.
        unsafe {
            let raw_alloc = alloc::alloc::alloc(layout);
            if raw_alloc.is_null() {
                handle_alloc_error(layout);
            }
            NonNull::new_unchecked(raw_alloc.cast())
        }
    }

    /// Releases a block obtained from `allocate`.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate(capacity)` and not freed yet.
    /// Live elements in the block are not dropped.
    unsafe fn deallocate(ptr: NonNull<T>, capacity: usize) {
        let layout = Layout::array::<T>(capacity).expect("allocation size overflow");
        if layout.size() != 0 {
            // SAFETY: Caller guarantees `ptr` came from `allocate` with this layout.
            unsafe { alloc::alloc::dealloc(ptr.as_ptr().cast(), layout) }
        }
    }

    /// Returns the number of elements in the array.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of heap bytes held by the array.
    pub fn memory_occupation(&self) -> usize {
        self.capacity * core::mem::size_of::<T>()
    }

    /// Extracts a slice containing every element.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is valid for `len` initialized elements (or dangling with
        // `len == 0`, which is a valid empty slice).
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice containing every element.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: See `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Reallocates the buffer to hold exactly `capacity` elements.
    ///
    /// At most `capacity` elements are kept; elements beyond that are dropped.
    /// Kept elements are moved into the new buffer and the old buffer is freed.
    ///
    /// ```rust
    /// use arena_hash::ArenaArray;
    ///
    /// let mut array: ArenaArray<u32> = (0..6).collect();
    /// array.set_capacity(4);
    /// assert_eq!(array.capacity(), 4);
    /// assert_eq!(&array[..], &[0, 1, 2, 3]);
    /// ```
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity == self.capacity {
            return;
        }

        self.truncate(capacity);
        let new_ptr = Self::allocate(capacity);

        // SAFETY: After truncation `len <= capacity`, so the new block has room for
        // every live element. The two blocks are distinct allocations (or zero-sized),
        // so they do not overlap. The old block came from `allocate(self.capacity)`.
        unsafe {
            core::ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
            Self::deallocate(self.ptr, self.capacity);
        }

        self.ptr = new_ptr;
        self.capacity = capacity;
    }

    /// Ensures room for at least `additional` more elements, doubling the
    /// capacity as many times as needed.
    pub fn reserve(&mut self, additional: usize) {
        let required = self
            .len
            .checked_add(additional)
            .expect("allocation size overflow");
        if required <= self.capacity {
            return;
        }

        let mut capacity = self.capacity.max(MIN_GROWTH);
        while capacity < required {
            capacity = capacity.checked_mul(2).expect("allocation size overflow");
        }
        self.set_capacity(capacity);
    }

    /// Shrinks the capacity to the current length.
    pub fn shrink_to_fit(&mut self) {
        self.set_capacity(self.len);
    }

    #[cold]
    fn grow(&mut self) {
        let capacity = if self.capacity == 0 {
            MIN_GROWTH
        } else {
            self.capacity
                .checked_mul(2)
                .expect("allocation size overflow")
        };
        self.set_capacity(capacity);
    }

    /// Appends an element, doubling the capacity first if the array is full.
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity {
            self.grow();
        }

        // SAFETY: `len < capacity` after growing, so the slot is inside the block
        // and currently uninitialized.
        unsafe {
            self.ptr.as_ptr().add(self.len).write(value);
        }
        self.len += 1;
    }

    /// Removes the last element and returns it, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        // SAFETY: The slot at the old last index is initialized and no longer
        // counted by `len`, so reading it transfers ownership to the caller.
        unsafe { Some(self.ptr.as_ptr().add(self.len).read()) }
    }

    /// Removes the element at `index` by moving the last element into its slot.
    ///
    /// Returns the removed element, and `Some(old_index)` if an element was
    /// relocated into `index` from `old_index` (always the former last index).
    /// Returns `None` as the second component when `index` was already last.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// ```rust
    /// use arena_hash::ArenaArray;
    ///
    /// let mut array: ArenaArray<char> = "wxyz".chars().collect();
    /// assert_eq!(array.fast_remove(3), ('z', None));
    /// assert_eq!(array.fast_remove(0), ('w', Some(2)));
    /// assert_eq!(&array[..], &['y', 'x']);
    /// ```
    pub fn fast_remove(&mut self, index: usize) -> (T, Option<usize>) {
        assert!(
            index < self.len,
            "fast_remove index {index} out of bounds (len {})",
            self.len
        );

        let last = self.len - 1;
        // SAFETY: Both `index` and `last` are below the old `len`, so both slots are
        // initialized. The removed value is read out before the last element is
        // moved over it, and `len` is shrunk so the old last slot is forgotten.
        unsafe {
            let base = self.ptr.as_ptr();
            let removed = base.add(index).read();
            self.len = last;
            if index == last {
                (removed, None)
            } else {
                core::ptr::copy_nonoverlapping(base.add(last), base.add(index), 1);
                (removed, Some(last))
            }
        }
    }

    /// Inserts an element at `index`, shifting later elements to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        assert!(
            index <= self.len,
            "insert index {index} out of bounds (len {})",
            self.len
        );

        if self.len == self.capacity {
            self.grow();
        }

        // SAFETY: `len < capacity`, so shifting `[index, len)` right by one stays
        // inside the block. `ptr::copy` handles the overlap.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            core::ptr::copy(slot, slot.add(1), self.len - index);
            slot.write(value);
        }
        self.len += 1;
    }

    /// Removes the element at `index`, shifting later elements to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "remove index {index} out of bounds (len {})",
            self.len
        );

        // SAFETY: The slot at `index` is initialized; after reading it, the tail
        // `[index + 1, len)` is shifted over it and `len` shrinks by one.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let removed = slot.read();
            core::ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            removed
        }
    }

    /// Shortens the array to `len` elements, dropping the rest.
    ///
    /// Has no effect if `len` is not smaller than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        // SAFETY: `[len, self.len)` is initialized. `len` is updated first so a
        // panicking destructor cannot cause a double drop.
        unsafe {
            let tail =
                core::ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(len), self.len - len);
            self.len = len;
            core::ptr::drop_in_place(tail);
        }
    }

    /// Drops every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the array to `len` elements, filling new slots with `f()`.
    ///
    /// Growing reallocates to exactly `len` slots when the current capacity is
    /// too small.
    pub fn resize_with(&mut self, len: usize, mut f: impl FnMut() -> T) {
        if len <= self.len {
            self.truncate(len);
            return;
        }

        if len > self.capacity {
            self.set_capacity(len);
        }
        while self.len < len {
            // SAFETY: `len <= capacity`, so every slot written here is in bounds and
            // uninitialized. `self.len` is bumped after each write.
            unsafe {
                self.ptr.as_ptr().add(self.len).write(f());
            }
            self.len += 1;
        }
    }

    /// Exchanges the contents and buffers of two arrays.
    pub fn swap_with(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

impl<T: Clone> ArenaArray<T> {
    /// Resizes the array to `len` elements, filling new slots with clones of
    /// `value`.
    pub fn resize(&mut self, len: usize, value: T) {
        self.resize_with(len, || value.clone());
    }

    /// Overwrites every element with a clone of `value`.
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }
}

impl<T> Drop for ArenaArray<T> {
    fn drop(&mut self) {
        self.truncate(0);
        // SAFETY: `ptr` came from `allocate(self.capacity)` and every element has
        // been dropped above.
        unsafe { Self::deallocate(self.ptr, self.capacity) }
    }
}

impl<T> Default for ArenaArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for ArenaArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for ArenaArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for ArenaArray<T> {
    fn clone(&self) -> Self {
        let mut array = Self::with_capacity(self.capacity);
        for value in self.iter() {
            array.push(value.clone());
        }
        array
    }
}

impl<T: Debug> Debug for ArenaArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArenaArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ArenaArray<T> {}

impl<T> Extend<T> for ArenaArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for ArenaArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<'a, T> IntoIterator for &'a ArenaArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ArenaArray<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for ArenaArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let array = ManuallyDrop::new(self);
        IntoIter {
            ptr: array.ptr,
            capacity: array.capacity,
            start: 0,
            end: array.len,
            _phantom: PhantomData,
        }
    }
}

/// An owning iterator over the elements of an [`ArenaArray`].
pub struct IntoIter<T> {
    ptr: NonNull<T>,
    capacity: usize,
    start: usize,
    end: usize,
    _phantom: PhantomData<T>,
}

// SAFETY: Same ownership model as `ArenaArray<T>`.
unsafe impl<T: Send> Send for IntoIter<T> {}
// SAFETY: The iterator only hands out owned values.
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: `[start, end)` holds the elements not yet yielded.
        let value = unsafe { self.ptr.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;
        // SAFETY: The slot at `end` was initialized and is now outside the range
        // of elements still owned by the iterator.
        unsafe { Some(self.ptr.as_ptr().add(self.end).read()) }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: `[start, end)` still holds initialized elements owned by the
        // iterator; the block came from `ArenaArray::allocate(capacity)`.
        unsafe {
            let rest = core::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr().add(self.start),
                self.end - self.start,
            );
            core::ptr::drop_in_place(rest);
            ArenaArray::<T>::deallocate(self.ptr, self.capacity);
        }
    }
}
