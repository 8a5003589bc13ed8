use alloc::string::String;
use core::fmt::Debug;
use core::hash::BuildHasher;

use crate::error::Error;
use crate::error::Result;
use crate::hash_map;
use crate::hash_map::HashMap;

/// A string-to-string map with stricter mutation rules than [`HashMap`].
///
/// * [`erase`](Dictionary::erase) fails with [`Error::InvalidKey`] when the
///   key is missing instead of reporting `false`.
/// * [`update`](Dictionary::update) overwrites existing keys, applying pairs
///   left to right so the last pair for a key wins.
///
/// Lookups accept `&str`. The underlying map is reachable read-only through
/// [`as_map`](Dictionary::as_map).
///
/// # Examples
///
/// ```rust
/// use chain_hash::Dictionary;
/// use chain_hash::Error;
///
/// let mut dict = Dictionary::from_parallel(["a", "b"], ["1", "2"]).unwrap();
/// dict.update([("b", "20"), ("c", "3")]);
/// assert_eq!(dict.at("b").map(String::as_str), Ok("20"));
/// assert_eq!(dict.len(), 3);
///
/// assert_eq!(dict.erase("missing"), Err(Error::InvalidKey));
/// assert_eq!(dict.erase("a"), Ok(()));
/// assert_eq!(dict.len(), 2);
/// ```
#[derive(Clone)]
pub struct Dictionary<S> {
    map: HashMap<String, String, S>,
}

impl<S> Debug for Dictionary<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.map.fmt(f)
    }
}

impl<S> PartialEq for Dictionary<S>
where
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<S> Eq for Dictionary<S> where S: BuildHasher {}

impl<S> Default for Dictionary<S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<S> From<HashMap<String, String, S>> for Dictionary<S> {
    fn from(map: HashMap<String, String, S>) -> Self {
        Self { map }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl Dictionary<crate::DefaultHashBuilder> {
    /// Creates an empty dictionary with the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Builds a dictionary from parallel key and value sequences.
    ///
    /// Fails with [`Error::LengthMismatch`] if the lengths differ. See
    /// [`HashMap::from_parallel`].
    pub fn from_parallel<I, J>(keys: I, values: J) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator,
        J::Item: Into<String>,
        J::IntoIter: ExactSizeIterator,
    {
        Self::from_parallel_with_hasher(keys, values, Default::default())
    }
}

impl<S> Dictionary<S> {
    /// Creates an empty dictionary with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.map.load_factor()
    }

    /// Removes every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.map.iter()
    }

    /// Returns a cursor at the first entry.
    pub fn begin(&self) -> hash_map::Cursor<'_, String, String> {
        self.map.begin()
    }

    /// Returns the past-the-end cursor.
    pub fn end(&self) -> hash_map::Cursor<'_, String, String> {
        self.map.end()
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &HashMap<String, String, S> {
        &self.map
    }

    /// Unwraps the underlying map.
    pub fn into_map(self) -> HashMap<String, String, S> {
        self.map
    }
}

impl<S> Dictionary<S>
where
    S: BuildHasher,
{
    /// Builds a dictionary from parallel key and value sequences using the
    /// given hasher builder.
    pub fn from_parallel_with_hasher<I, J>(keys: I, values: J, hash_builder: S) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator,
        J::Item: Into<String>,
        J::IntoIter: ExactSizeIterator,
    {
        let map = HashMap::from_parallel_with_hasher(
            keys.into_iter().map(Into::into),
            values.into_iter().map(Into::into),
            hash_builder,
        )?;
        Ok(Self { map })
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the value mapped to `key`.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.map.get(key)
    }

    /// Returns the value mapped to `key`, or [`Error::KeyNotFound`].
    pub fn at(&self, key: &str) -> Result<&String> {
        self.map.at(key)
    }

    /// Returns the value mapped to `key` mutably, or [`Error::KeyNotFound`].
    pub fn at_mut(&mut self, key: &str) -> Result<&mut String> {
        self.map.at_mut(key)
    }

    /// Returns the value mapped to `key`, inserting an empty string first if
    /// `key` is absent.
    pub fn index_or_default(&mut self, key: impl Into<String>) -> &mut String {
        self.map.index_or_default(key.into())
    }

    /// Returns the size of `key`'s bucket, or [`Error::KeyNotFound`].
    pub fn bucket_size(&self, key: &str) -> Result<usize> {
        self.map.bucket_size(key)
    }

    /// Returns the index of `key`'s bucket, or [`Error::KeyNotFound`].
    pub fn bucket_index(&self, key: &str) -> Result<usize> {
        self.map.bucket_index(key)
    }

    /// Removes `key`.
    ///
    /// Fails with [`Error::InvalidKey`] and leaves the dictionary untouched if
    /// `key` is absent.
    pub fn erase(&mut self, key: &str) -> Result<()> {
        if self.map.erase(key) {
            Ok(())
        } else {
            tracing::trace!(key, "erase of missing dictionary key");
            Err(Error::InvalidKey)
        }
    }

    /// Maps every key in `pairs` to its value, overwriting existing entries.
    ///
    /// Pairs are applied in order, so a later pair for the same key wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::Dictionary;
    ///
    /// let defaults = Dictionary::from_parallel(["color", "size"], ["red", "m"]).unwrap();
    /// let mut settings = Dictionary::from_parallel(["size"], ["xl"]).unwrap();
    ///
    /// settings.update(defaults.iter());
    /// assert_eq!(settings.at("size").unwrap(), "m");
    /// assert_eq!(settings.at("color").unwrap(), "red");
    ///
    /// settings.update([("size", "s"), ("size", "l")]);
    /// assert_eq!(settings.at("size").unwrap(), "l");
    /// ```
    pub fn update<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<'a, S> IntoIterator for &'a Dictionary<S> {
    type IntoIter = hash_map::Iter<'a, String, String>;
    type Item = (&'a String, &'a String);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone, Default)]
    struct FixedSip;

    impl BuildHasher for FixedSip {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(7, 11)
        }
    }

    fn dict(keys: &[&str], values: &[&str]) -> Result<Dictionary<FixedSip>> {
        Dictionary::from_parallel_with_hasher(keys.iter().copied(), values.iter().copied(), FixedSip)
    }

    #[test]
    fn update_overwrites_and_adds() {
        let mut d = dict(&["a", "b"], &["1", "2"]).unwrap();
        d.update([("b", "20"), ("c", "3")]);
        assert_eq!(d.at("a").unwrap(), "1");
        assert_eq!(d.at("b").unwrap(), "20");
        assert_eq!(d.at("c").unwrap(), "3");
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn update_applies_left_to_right() {
        let mut d: Dictionary<FixedSip> = Dictionary::default();
        d.update(Vec::from([("k", "first"), ("k", "second"), ("k", "third")]));
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("k").map(String::as_str), Some("third"));
    }

    #[test]
    fn update_from_another_dictionary() {
        let source = dict(&["x", "y"], &["1", "2"]).unwrap();
        let mut target = dict(&["y", "z"], &["old", "3"]).unwrap();
        target.update(&source);
        assert_eq!(target.len(), 3);
        assert_eq!(target.at("y").unwrap(), "2");
    }

    #[test]
    fn erase_missing_is_invalid_key() {
        let mut d = dict(&["a", "b"], &["1", "2"]).unwrap();
        assert_eq!(d.erase("missing"), Err(Error::InvalidKey));
        assert_eq!(d.len(), 2);

        assert_eq!(d.erase("a"), Ok(()));
        assert!(!d.contains_key("a"));
        assert_eq!(d.len(), 1);
        assert_eq!(d.erase("a"), Err(Error::InvalidKey));
    }

    #[test]
    fn length_mismatch_builds_nothing() {
        assert_eq!(
            dict(&["a", "b", "c"], &["1"]).unwrap_err(),
            Error::LengthMismatch { keys: 3, values: 1 }
        );
    }

    #[test]
    fn lookups_report_missing_keys() {
        let d = dict(&["a"], &["1"]).unwrap();
        assert_eq!(d.at("b"), Err(Error::KeyNotFound));
        assert_eq!(d.bucket_size("b"), Err(Error::KeyNotFound));
        assert_eq!(d.bucket_index("b"), Err(Error::KeyNotFound));
        assert_eq!(d.bucket_size("a"), Ok(1));
        assert!(d.bucket_index("a").unwrap() < d.capacity());
    }

    #[test]
    fn index_or_default_inserts_empty_string() {
        let mut d: Dictionary<FixedSip> = Dictionary::default();
        assert!(d.index_or_default("fresh").is_empty());
        d.index_or_default("fresh").push_str("value");
        assert_eq!(d.at("fresh").unwrap(), "value");
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn shrinks_like_the_underlying_table() {
        let keys: Vec<String> = (0..40).map(|i| alloc::format!("key{i}")).collect();
        let mut d: Dictionary<FixedSip> = Dictionary::default();
        d.update(keys.iter().map(|k| (k.as_str(), "v")));
        assert_eq!(d.capacity(), 64);

        for key in &keys[..30] {
            d.erase(key).unwrap();
        }
        assert_eq!(d.len(), 10);
        assert_eq!(d.capacity(), 32);
        d.as_map().assert_invariants();
    }

    #[test]
    fn equality_and_clone() {
        let a = dict(&["a", "b"], &["1", "2"]).unwrap();
        let b = dict(&["b", "a"], &["2", "1"]).unwrap();
        assert_eq!(a, b);

        let mut c = a.clone();
        c.index_or_default("a").push('!');
        assert_ne!(a, c);
        assert_eq!(a.at("a").unwrap(), "1");
    }

    #[test]
    fn cursor_visits_every_entry() {
        let d = dict(&["a", "b", "c"], &["1", "2", "3"]).unwrap();
        let mut cursor = d.begin();
        let mut count = 0;
        while cursor != d.end() {
            let (key, value) = cursor.get().unwrap();
            assert_eq!(d.at(key), Ok(value));
            count += 1;
            cursor.advance();
        }
        assert_eq!(count, 3);
    }
}
