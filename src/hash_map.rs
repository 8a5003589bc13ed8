use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::Error;
use crate::error::Result;
use crate::hash_table;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::policy::ResizePolicy;

/// A hash map built on the separate-chaining [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq`, and hashes them with a configurable hasher builder `S`.
/// Unlike `std::collections::HashMap`, [`insert`](HashMap::insert) never
/// replaces an existing value; use [`assign`](HashMap::assign) or
/// [`index_or_default`](HashMap::index_or_default) for that.
///
/// Cloning a map copies every bucket at the source's current capacity.
/// Two maps are equal when they hold the same keys mapped to equal values,
/// regardless of capacity or iteration order.
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashMap<K, V, crate::DefaultHashBuilder> {
    /// Creates an empty map with the default hasher and [`ResizePolicy`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_policy_and_hasher(ResizePolicy::default(), Default::default())
    }

    /// Creates an empty map with the default hasher and the given policy.
    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self::with_policy_and_hasher(policy, Default::default())
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashMap<K, V, crate::DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Builds a map from parallel key and value sequences, pairing them up by
    /// position.
    ///
    /// Pairs are applied in order, so a repeated key ends up mapped to the
    /// value paired with its last occurrence. Fails with
    /// [`Error::LengthMismatch`] before anything is allocated if the lengths
    /// differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Error;
    /// use chain_hash::HashMap;
    ///
    /// let map = HashMap::from_parallel(["a", "b", "a"], [1, 2, 3]).unwrap();
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.at("a"), Ok(&3));
    ///
    /// let err = HashMap::from_parallel(["a", "b"], [1]).unwrap_err();
    /// assert_eq!(err, Error::LengthMismatch { keys: 2, values: 1 });
    /// ```
    pub fn from_parallel<I, J>(keys: I, values: J) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator<Item = V>,
        J::IntoIter: ExactSizeIterator,
    {
        Self::from_parallel_with_hasher(keys, values, Default::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_policy_and_hasher(ResizePolicy::default(), hash_builder)
    }

    /// Creates an empty map with the given policy and hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// # use chain_hash::ResizePolicy;
    /// let policy = ResizePolicy::new(0.1, 0.5, 4).unwrap();
    /// let map: HashMap<i32, i32, _> = HashMap::with_policy_and_hasher(policy, SimpleHasher);
    /// assert_eq!(map.capacity(), 4);
    /// ```
    pub fn with_policy_and_hasher(policy: ResizePolicy, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_policy(policy),
            hash_builder,
        }
    }

    /// Returns the number of entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// map.insert(1, "a");
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two no smaller than
    /// the policy's minimum capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.capacity(), 16);
    /// for i in 0..13 {
    ///     map.insert(i, i);
    /// }
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// for i in 0..12 {
    ///     map.insert(i, i);
    /// }
    /// assert_eq!(map.load_factor(), 0.75);
    /// ```
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the resize policy this map was created with.
    pub fn policy(&self) -> &ResizePolicy {
        self.table.policy()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every entry. The capacity is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// for i in 0..100 {
    ///     map.insert(i, i);
    /// }
    /// let capacity = map.capacity();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the entries in bucket order, then insertion
    /// order within each bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort_unstable();
    /// assert_eq!(pairs, [(&"a", &1), (&"b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut keys: Vec<_> = map.keys().copied().collect();
    /// keys.sort_unstable();
    /// assert_eq!(keys, ["a", "b"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.values().sum::<i32>(), 3);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns a cursor at the first entry, or [`end`](HashMap::end) if the
    /// map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let map = HashMap::from_parallel([1, 2, 3], ["one", "two", "three"]).unwrap();
    ///
    /// let mut visited = 0;
    /// let mut cursor = map.begin();
    /// while cursor != map.end() {
    ///     let (key, value) = cursor.get().unwrap();
    ///     assert_eq!(map.at(key), Ok(value));
    ///     visited += 1;
    ///     cursor.advance();
    /// }
    /// assert_eq!(visited, 3);
    /// ```
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.begin(),
        }
    }

    /// Returns the past-the-end cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let map: HashMap<i32, i32, _> = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.begin(), map.end());
    /// assert!(map.end().get().is_none());
    /// ```
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.end(),
        }
    }

    /// Removes and yields every entry.
    ///
    /// The map drops back to its minimum capacity as soon as the drain is
    /// created, so it stays consistent even if the drain is leaked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.extend((0..100).map(|i| (i, i)));
    /// assert_eq!(map.capacity(), 256);
    ///
    /// let drain = map.drain();
    /// assert_eq!(drain.len(), 100);
    /// drop(drain);
    ///
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Builds a map from parallel key and value sequences using the given
    /// hasher builder. See [`HashMap::from_parallel`].
    pub fn from_parallel_with_hasher<I, J>(keys: I, values: J, hash_builder: S) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator<Item = V>,
        J::IntoIter: ExactSizeIterator,
    {
        let keys = keys.into_iter();
        let values = values.into_iter();
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut map = Self::with_hasher(hash_builder);
        map.extend(keys.zip(values));
        Ok(map)
    }

    /// Returns `true` if the map holds `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value mapped to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value mapped to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns a reference to the value mapped to `key`, or
    /// [`Error::KeyNotFound`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Error;
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("a".to_string(), 1);
    /// assert_eq!(map.at("a"), Ok(&1));
    /// assert_eq!(map.at("b"), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value mapped to `key`, or
    /// [`Error::KeyNotFound`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, 10);
    /// *map.at_mut(&1).unwrap() += 5;
    /// assert_eq!(map.at(&1), Ok(&15));
    /// assert!(map.at_mut(&2).is_err());
    /// ```
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Inserts `key` mapped to `value` if `key` is absent.
    ///
    /// Returns `false` and leaves the existing value untouched if `key` is
    /// already present. The map doubles its capacity when the insertion pushes
    /// the load factor above the upper bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.at(&37), Ok(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Maps `key` to `value`, replacing and returning any previous value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.assign(37, "a"), None);
    /// assert_eq!(map.assign(37, "b"), Some("a"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn assign(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Removes `key`, returning whether it was present.
    ///
    /// The map halves its capacity, down to the policy's minimum, when the
    /// removal drops the load factor below the lower bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert!(map.erase(&1));
    /// assert!(!map.erase(&1));
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` and returns the stored key and value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key)
    }

    /// Returns a mutable reference to the value mapped to `key`, first
    /// inserting `V::default()` if `key` is absent.
    ///
    /// This is the only lookup that creates entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, u32, _> = HashMap::new();
    /// *map.index_or_default("hits") += 1;
    /// *map.index_or_default("hits") += 1;
    /// assert_eq!(map.at("hits"), Ok(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn index_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns the number of entries sharing `key`'s bucket, or
    /// [`Error::KeyNotFound`] if `key` is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
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
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.bucket_size(&1), Ok(1));
    /// assert!(map.bucket_size(&2).is_err());
    /// ```
    pub fn bucket_size<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.present_hash(key)?;
        Ok(self.table.bucket_len(hash))
    }

    /// Returns the index of `key`'s bucket, or [`Error::KeyNotFound`] if `key`
    /// is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let map = HashMap::from_parallel(["k"], [0]).unwrap();
    /// let index = map.bucket_index("k").unwrap();
    /// assert!(index < map.capacity());
    /// assert_eq!(map.bucket_size("k"), Ok(1));
    /// assert!(map.bucket_index("missing").is_err());
    /// ```
    pub fn bucket_index<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.present_hash(key)?;
        Ok(self.table.bucket_index(hash))
    }

    /// Gets the entry for `key` for in-place inspection or insertion.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    fn present_hash<Q>(&self, key: &Q) -> Result<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find(hash, |(k, _)| k.borrow() == key) {
            Some(_) => Ok(hash),
            None => Err(Error::KeyNotFound),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, Q, V, S> Index<&Q> for HashMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value mapped to `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is absent. Use [`HashMap::at`] to handle absence.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found"),
        }
    }
}

/// Extending assigns each pair in order, so later pairs overwrite earlier ones.
impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.assign(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
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
    entry: hash_table::VacantEntry<'a, (K, V)>,
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
    entry: hash_table::OccupiedEntry<'a, (K, V)>,
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

/// A forward-only position within a [`HashMap`].
///
/// See [`hash_table::Cursor`] for the traversal order. The cursor borrows the
/// map, so it cannot outlive a mutation.
pub struct Cursor<'a, K, V> {
    inner: hash_table::Cursor<'a, (K, V)>,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Returns the entry under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.inner.get().map(|(k, v)| (k, v))
    }

    /// Returns `true` if the cursor is past the last entry.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Moves to the next entry, or to the end.
    pub fn advance(&mut self) {
        self.inner.advance();
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
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

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
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

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
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

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: hash_table::IntoIter<(K, V)>,
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

impl<K, V> FusedIterator for IntoIter<K, V> {}
