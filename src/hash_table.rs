use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::buckets::Buckets;
use crate::buckets::Slot;
use crate::policy::ResizePolicy;
use crate::policy::load;

/// A separate-chaining hash table storing values of type `V`.
///
/// The table does not hash anything itself. Callers supply a precomputed
/// `u64` hash together with an equality predicate, and the table routes the
/// hash to one of `capacity` buckets with `hash & (capacity - 1)`. Each
/// bucket is an insertion-ordered chain.
///
/// Capacity is always a power of two no smaller than the
/// [`ResizePolicy::minimum_capacity`]. An insertion that pushes the load
/// factor above [`ResizePolicy::upper_load_factor`] doubles the capacity
/// (repeatedly if needed), and a removal that drops it below
/// [`ResizePolicy::lower_load_factor`] halves it, never below the floor.
/// Each resize rebuilds the bucket array in one step, so no partially
/// rehashed state is observable.
///
/// # Examples
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use chain_hash::hash_table::Entry;
/// # use chain_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_str(s: &str) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     s.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table: HashTable<(String, u32)> = HashTable::new();
/// let hash = hash_str("alice");
///
/// match table.entry(hash, |(name, _)| name == "alice") {
///     Entry::Vacant(entry) => {
///         entry.insert(("alice".to_string(), 30));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(
///     table.find(hash, |(name, _)| name == "alice"),
///     Some(&("alice".to_string(), 30))
/// );
/// assert_eq!(table.capacity(), 16);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Buckets<V>,
    populated: usize,
    policy: ResizePolicy,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("buckets", &self.buckets)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the default [`ResizePolicy`].
    pub fn new() -> Self {
        Self::with_policy(ResizePolicy::default())
    }

    /// Creates an empty table governed by `policy`.
    ///
    /// The table starts at the policy's minimum capacity.
    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self {
            buckets: Buckets::with_capacity(policy.minimum_capacity()),
            populated: 0,
            policy,
        }
    }

    /// Returns the resize policy this table was created with.
    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        load(self.populated, self.capacity())
    }

    /// Returns the index of the bucket `hash` routes to.
    pub fn bucket_index(&self, hash: u64) -> usize {
        self.buckets.route(hash)
    }

    /// Returns the number of values in the bucket `hash` routes to.
    pub fn bucket_len(&self, hash: u64) -> usize {
        self.buckets.chain(self.buckets.route(hash)).len()
    }

    /// Finds the value matching `eq` in the bucket `hash` routes to.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let (bucket, slot) = self.buckets.position(hash, eq)?;
        Some(&self.buckets.chain(bucket)[slot].value)
    }

    /// Finds the value matching `eq` and returns a mutable reference to it.
    ///
    /// Callers must not change the value in a way that alters its hash or its
    /// equality with other values.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let (bucket, slot) = self.buckets.position(hash, eq)?;
        Some(&mut self.buckets.chain_mut(bucket)[slot].value)
    }

    /// Looks up the value matching `eq`, returning a view that can insert or
    /// remove it.
    ///
    /// Obtaining an entry never resizes the table. Only
    /// [`VacantEntry::insert`] and [`OccupiedEntry::remove`] do.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for value in 0..13u64 {
    ///     // Any well-distributed hash works; the value itself is enough here.
    ///     table.entry(value, |&v| v == value).or_insert(value);
    /// }
    /// assert_eq!(table.len(), 13);
    /// assert_eq!(table.capacity(), 32);
    ///
    /// match table.entry(7, |&v| v == 7) {
    ///     Entry::Occupied(entry) => assert_eq!(entry.remove(), 7),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// assert_eq!(table.len(), 12);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.buckets.position(hash, eq) {
            Some((bucket, slot)) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                slot,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Removes and returns the value matching `eq`, shrinking the table if
    /// the load factor falls below the lower bound.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (bucket, slot) = self.buckets.position(hash, eq)?;
        Some(self.remove_at(bucket, slot))
    }

    /// Removes every value. The capacity is left unchanged.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.populated = 0;
    }

    /// Returns an iterator over the values in bucket order, then insertion
    /// order within each bucket.
    ///
    /// The order is not stable across mutations; a resize in particular
    /// redistributes every value.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cursor: self.begin(),
            remaining: self.populated,
        }
    }

    /// Returns a cursor at the first value, or [`end`](HashTable::end) if the
    /// table is empty.
    pub fn begin(&self) -> Cursor<'_, V> {
        let position = if self.populated == 0 {
            None
        } else {
            self.buckets.next_occupied(0).map(|bucket| (bucket, 0))
        };
        Cursor {
            table: self,
            position,
        }
    }

    /// Returns the past-the-end cursor.
    pub fn end(&self) -> Cursor<'_, V> {
        Cursor {
            table: self,
            position: None,
        }
    }

    /// Returns an iterator that removes and yields every value.
    ///
    /// The table is reset to [`ResizePolicy::minimum_capacity`] buckets
    /// before the first value is yielded, and the iterator owns the old
    /// storage. Values not consumed before the iterator is dropped are dropped
    /// with it.
    pub fn drain(&mut self) -> Drain<'_, V> {
        let buckets = core::mem::replace(
            &mut self.buckets,
            Buckets::with_capacity(self.policy.minimum_capacity()),
        );
        let remaining = core::mem::replace(&mut self.populated, 0);
        Drain {
            inner: IntoIter {
                chains: buckets.into_chains(),
                current: None,
                remaining,
            },
            marker: PhantomData,
        }
    }

    fn remove_at(&mut self, bucket: usize, slot: usize) -> V {
        let Slot { value, .. } = self.buckets.remove(bucket, slot);
        self.populated -= 1;
        if let Some(target) = self
            .policy
            .shrink_target(self.populated, self.buckets.capacity())
        {
            self.resize(target);
        }
        value
    }

    fn insert_new(&mut self, hash: u64, value: V) -> &mut V {
        // Growing before the push leaves the same layout as pushing first and
        // rehashing after: the new value ends up last in its chain either way.
        if let Some(target) = self
            .policy
            .grow_target(self.populated + 1, self.buckets.capacity())
        {
            self.resize(target);
        }
        let (bucket, slot) = self.buckets.push(hash, value);
        self.populated += 1;
        &mut self.buckets.chain_mut(bucket)[slot].value
    }

    fn resize(&mut self, capacity: usize) {
        tracing::debug!(
            from = self.buckets.capacity(),
            to = capacity,
            len = self.populated,
            "rehashing chained table"
        );
        self.buckets.rehash(capacity);
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(capacity.is_power_of_two(), "capacity {capacity}");
        assert!(capacity >= self.policy.minimum_capacity());
        assert_eq!(self.buckets.count(), self.populated);
        let load = self.load_factor();
        assert!(load <= self.policy.upper_load_factor(), "load {load}");
        if capacity > self.policy.minimum_capacity() {
            assert!(load >= self.policy.lower_load_factor(), "load {load}");
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            chains: self.buckets.into_chains(),
            current: None,
        }
    }
}

/// A view into a single slot of a [`HashTable`], which is either vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// No value matched the lookup.
    Vacant(VacantEntry<'a, V>),
    /// A value matched the lookup.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable reference
    /// to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Appends `value` to its bucket and returns a mutable reference to it.
    ///
    /// The table grows first if holding one more value would exceed the upper
    /// load factor.
    pub fn insert(self, value: V) -> &'a mut V {
        self.table.insert_new(self.hash, value)
    }

    /// Returns the hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// An occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    slot: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        &self.table.buckets.chain(self.bucket)[self.slot].value
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets.chain_mut(self.bucket)[self.slot].value
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets.chain_mut(self.bucket)[self.slot].value
    }

    /// Returns the index of the bucket holding the value.
    pub fn bucket_index(&self) -> usize {
        self.bucket
    }

    /// Removes the value from its bucket, keeping the order of the values
    /// after it, and shrinks the table if required.
    pub fn remove(self) -> V {
        self.table.remove_at(self.bucket, self.slot)
    }
}

/// A forward-only position within a [`HashTable`].
///
/// A cursor is either at a value or at the end. It walks buckets in ascending
/// index order and each bucket in insertion order. It borrows the table, so
/// the table cannot be mutated while a cursor exists.
///
/// Two cursors are equal when they point into the same table at the same
/// position. All end cursors of one table are equal.
///
/// # Examples
///
/// ```rust
/// # use chain_hash::hash_table::HashTable;
/// #
/// let mut table: HashTable<u64> = HashTable::new();
/// assert!(table.begin() == table.end());
///
/// table.entry(3, |&v| v == 3).or_insert(3);
/// table.entry(19, |&v| v == 19).or_insert(19);
/// table.entry(1, |&v| v == 1).or_insert(1);
///
/// let mut cursor = table.begin();
/// let mut seen = Vec::new();
/// while cursor != table.end() {
///     seen.push(*cursor.get().unwrap());
///     cursor.advance();
/// }
/// // Bucket 1 first, then bucket 3 in insertion order.
/// assert_eq!(seen, [1, 3, 19]);
/// ```
pub struct Cursor<'a, V> {
    table: &'a HashTable<V>,
    position: Option<(usize, usize)>,
}

impl<V> Clone for Cursor<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Cursor<'_, V> {}

impl<V> PartialEq for Cursor<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table) && self.position == other.position
    }
}

impl<V> Eq for Cursor<'_, V> {}

impl<V> Debug for Cursor<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.position {
            Some((bucket, slot)) => f
                .debug_struct("Cursor")
                .field("bucket", &bucket)
                .field("slot", &slot)
                .finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

impl<'a, V> Cursor<'a, V> {
    /// Returns the value under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<&'a V> {
        let (bucket, slot) = self.position?;
        Some(&self.table.buckets.chain(bucket)[slot].value)
    }

    /// Returns `true` if the cursor is past the last value.
    pub fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// Returns the `(bucket, slot)` the cursor points at.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.position
    }

    /// Moves to the next value: the next slot of the current bucket if there
    /// is one, otherwise the first slot of the next non-empty bucket, otherwise
    /// the end. Advancing the end cursor leaves it at the end.
    pub fn advance(&mut self) {
        let Some((bucket, slot)) = self.position else {
            return;
        };
        let buckets = &self.table.buckets;
        self.position = if slot + 1 < buckets.chain(bucket).len() {
            Some((bucket, slot + 1))
        } else {
            buckets.next_occupied(bucket + 1).map(|next| (next, 0))
        };
    }
}

/// An iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.cursor.get()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: IntoIter<V>,
    marker: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    chains: alloc::vec::IntoIter<Vec<Slot<V>>>,
    current: Option<alloc::vec::IntoIter<Slot<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(slot.value);
            }
            let chain = self.chains.next()?;
            self.current = Some(chain.into_iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    fn insert(table: &mut HashTable<Item>, state: &HashState, key: u64, value: i32) -> bool {
        match table.entry(hash_key(state, key), |v| v.key == key) {
            Entry::Vacant(entry) => {
                entry.insert(Item { key, value });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..64u64 {
            assert!(insert(&mut table, &state, k, (k as i32) * 2));
            table.assert_invariants();
        }
        assert_eq!(table.len(), 64);
        for k in 0..64u64 {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
        }

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let k = 42u64;
        let hash = hash_key(&state, k);

        assert!(insert(&mut table, &state, k, 7));
        assert!(!insert(&mut table, &state, k, 9));

        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                assert_eq!(occ.get().value, 7);
                occ.get_mut().value = 11;
                assert_eq!(occ.bucket_index(), table_index(hash));
            }
            Entry::Vacant(_) => panic!("should be occupied: {k}#{hash:02X}"),
        }
        assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 11);
        assert_eq!(table.len(), 1);
    }

    fn table_index(hash: u64) -> usize {
        (hash as usize) & 15
    }

    #[test]
    fn find_mut_and_modify() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..5u64 {
            insert(&mut table, &state, k, 1);
        }
        for k in 0..5u64 {
            let hash = hash_key(&state, k);
            if let Some(v) = table.find_mut(hash, |v| v.key == k) {
                v.value += 9;
            }
        }
        for k in 0..5u64 {
            let hash = hash_key(&state, k);
            assert_eq!(table.find(hash, |v| v.key == k).unwrap().value, 10);
        }
    }

    #[test]
    fn remove_items() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..40u64 {
            insert(&mut table, &state, k, k as i32);
        }
        for k in (0..40u64).step_by(2) {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.remove(hash, |v| v.key == k),
                Some(Item {
                    key: k,
                    value: k as i32
                })
            );
            assert_eq!(table.remove(hash, |v| v.key == k), None);
            table.assert_invariants();
        }
        assert_eq!(table.len(), 20);
        for k in 0..40u64 {
            let hash = hash_key(&state, k);
            assert_eq!(table.find(hash, |v| v.key == k).is_some(), k % 2 == 1);
        }
    }

    #[test]
    fn grows_past_upper_load_factor() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..12u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.load_factor(), 0.75);

        table.entry(12, |&x| x == 12).or_insert(12);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.load_factor(), 13.0 / 32.0);
        for v in 0..13u64 {
            assert_eq!(table.find(v, |&x| x == v), Some(&v));
        }
        table.assert_invariants();
    }

    #[test]
    fn shrinks_below_lower_load_factor() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..13u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        for v in 0..5u64 {
            table.remove(v, |&x| x == v);
        }
        assert_eq!(table.len(), 8);
        assert_eq!(table.capacity(), 32);

        table.remove(5, |&x| x == 5);
        assert_eq!(table.len(), 7);
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.load_factor(), 0.4375);
        for v in 6..13u64 {
            assert_eq!(table.find(v, |&x| x == v), Some(&v));
        }
        table.assert_invariants();
    }

    #[test]
    fn never_shrinks_below_minimum() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..4u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        for v in 0..4u64 {
            table.remove(v, |&x| x == v);
            assert_eq!(table.capacity(), 16);
        }
        assert!(table.is_empty());
    }

    #[test]
    fn custom_policy_floor() {
        let policy = ResizePolicy::new(0.25, 0.75, 2).unwrap();
        let mut table: HashTable<u64> = HashTable::with_policy(policy);
        assert_eq!(table.capacity(), 2);
        table.entry(0, |&x| x == 0).or_insert(0);
        table.entry(1, |&x| x == 1).or_insert(1);
        assert_eq!(table.capacity(), 4);
        table.remove(0, |&x| x == 0);
        assert_eq!(table.capacity(), 4);
        table.remove(1, |&x| x == 1);
        assert_eq!(table.capacity(), 2);
        table.assert_invariants();
    }

    #[test]
    fn removal_keeps_chain_order() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in [5u64, 21, 37, 53] {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        assert_eq!(table.bucket_len(5), 4);
        table.remove(21, |&x| x == 21);
        let values: Vec<u64> = table.iter().copied().collect();
        assert_eq!(values, [5, 37, 53]);
        assert_eq!(table.bucket_index(37), 5);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..100u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        let capacity = table.capacity();
        assert!(capacity > 16);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert!(table.begin().is_end());
    }

    #[test]
    fn empty_table_begin_is_end() {
        let table: HashTable<u64> = HashTable::new();
        assert_eq!(table.begin(), table.end());
        assert_eq!(table.begin().get(), None);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn cursor_walks_buckets_in_order() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in [7u64, 2, 18, 34, 15] {
            table.entry(v, |&x| x == v).or_insert(v);
        }

        let mut cursor = table.begin();
        assert_eq!(cursor.position(), Some((2, 0)));
        let mut seen = vec![];
        while let Some(v) = cursor.get() {
            seen.push(*v);
            cursor.advance();
        }
        assert_eq!(seen, [2, 18, 34, 7, 15]);
        assert_eq!(cursor, table.end());

        cursor.advance();
        assert!(cursor.is_end());
    }

    #[test]
    fn cursors_of_different_tables_differ() {
        let mut a: HashTable<u64> = HashTable::new();
        let mut b: HashTable<u64> = HashTable::new();
        a.entry(1, |&x| x == 1).or_insert(1);
        b.entry(1, |&x| x == 1).or_insert(1);

        assert_ne!(a.begin(), b.begin());
        assert_ne!(a.end(), b.end());
        assert_eq!(a.end(), a.end());
        assert_eq!(a.begin(), a.begin());
    }

    #[test]
    fn iter_visits_each_value_once() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..200u64 {
            insert(&mut table, &state, k, 0);
        }
        assert_eq!(table.iter().len(), 200);
        let mut keys: Vec<u64> = table.iter().map(|item| item.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn drain_resets_to_minimum_capacity() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..50u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        assert_eq!(table.capacity(), 128);

        let mut drained: Vec<u64> = table.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..50).collect::<Vec<_>>());
        assert!(table.is_empty());
        assert_eq!(table.capacity(), table.policy().minimum_capacity());
        table.assert_invariants();

        for v in 0..13u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        assert_eq!(table.capacity(), 32);
        table.assert_invariants();
    }

    #[test]
    fn leaked_drain_leaves_table_consistent() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..40u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        core::mem::forget(table.drain());

        assert_eq!(table.len(), 0);
        assert!(table.find(3, |&x| x == 3).is_none());
        assert_eq!(table.iter().count(), 0);
        table.assert_invariants();
    }

    #[test]
    fn dropped_drain_still_empties() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..10u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        let mut drain = table.drain();
        assert_eq!(drain.len(), 10);
        drain.next();
        drop(drain);
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn clone_is_deep() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..30u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        let copy = table.clone();
        table.clear();

        assert_eq!(copy.len(), 30);
        assert_eq!(copy.capacity(), 64);
        for v in 0..30u64 {
            assert_eq!(copy.find(v, |&x| x == v), Some(&v));
        }
    }

    #[test]
    fn into_iter_yields_owned_values() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..20u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        let iter = table.into_iter();
        assert_eq!(iter.len(), 20);
        let mut values: Vec<u64> = iter.collect();
        values.sort_unstable();
        assert_eq!(values, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn vacant_entry_without_insert_changes_nothing() {
        let mut table: HashTable<u64> = HashTable::new();
        for v in 0..12u64 {
            table.entry(v, |&x| x == v).or_insert(v);
        }
        match table.entry(12, |&x| x == 12) {
            Entry::Vacant(entry) => assert_eq!(entry.hash(), 12),
            Entry::Occupied(_) => unreachable!(),
        }
        assert_eq!(table.len(), 12);
        assert_eq!(table.capacity(), 16);
    }
}
