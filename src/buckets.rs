//! Bucket storage for the chained table.
//!
//! A [`Buckets`] owns one growable chain per bucket. Every slot carries the
//! hash it was inserted with, so moving entries to a different capacity only
//! needs to re-apply the mask.

use alloc::vec::Vec;

/// A stored value together with its cached hash.
#[derive(Clone, Debug)]
pub(crate) struct Slot<V> {
    pub(crate) hash: u64,
    pub(crate) value: V,
}

/// A fixed number of insertion-ordered chains.
///
/// The number of chains is always a power of two so that routing is a mask
/// rather than a modulo.
#[derive(Clone, Debug)]
pub(crate) struct Buckets<V> {
    chains: Vec<Vec<Slot<V>>>,
}

impl<V> Buckets<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        let mut chains = Vec::with_capacity(capacity);
        chains.resize_with(capacity, Vec::new);
        Self { chains }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.chains.len()
    }

    /// Maps a hash to the index of the chain it belongs to.
    #[inline]
    pub(crate) fn route(&self, hash: u64) -> usize {
        (hash as usize) & (self.capacity() - 1)
    }

    #[inline]
    pub(crate) fn chain(&self, index: usize) -> &[Slot<V>] {
        &self.chains[index]
    }

    #[inline]
    pub(crate) fn chain_mut(&mut self, index: usize) -> &mut Vec<Slot<V>> {
        &mut self.chains[index]
    }

    /// Finds the `(bucket, slot)` position of the value matching `eq`.
    pub(crate) fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        let bucket = self.route(hash);
        self.chains[bucket]
            .iter()
            .position(|slot| slot.hash == hash && eq(&slot.value))
            .map(|slot| (bucket, slot))
    }

    /// Appends a value to the end of its chain and returns its position.
    pub(crate) fn push(&mut self, hash: u64, value: V) -> (usize, usize) {
        let bucket = self.route(hash);
        let chain = &mut self.chains[bucket];
        chain.push(Slot { hash, value });
        (bucket, chain.len() - 1)
    }

    /// Removes the slot at `(bucket, slot)`, keeping the order of the rest of
    /// the chain.
    pub(crate) fn remove(&mut self, bucket: usize, slot: usize) -> Slot<V> {
        self.chains[bucket].remove(slot)
    }

    /// Index of the first non-empty chain at or after `from`.
    pub(crate) fn next_occupied(&self, from: usize) -> Option<usize> {
        self.chains
            .get(from..)?
            .iter()
            .position(|chain| !chain.is_empty())
            .map(|offset| from + offset)
    }

    /// Moves every slot into a fresh set of `new_capacity` chains.
    ///
    /// Chains are visited in index order and each chain front to back, so
    /// slots that land in the same new chain keep their relative order.
    pub(crate) fn rehash(&mut self, new_capacity: usize) {
        let old = core::mem::replace(self, Self::with_capacity(new_capacity));
        for slot in old.chains.into_iter().flatten() {
            let bucket = self.route(slot.hash);
            self.chains[bucket].push(slot);
        }
    }

    /// Empties every chain without changing the capacity.
    pub(crate) fn clear(&mut self) {
        for chain in &mut self.chains {
            chain.clear();
        }
    }

    pub(crate) fn into_chains(self) -> alloc::vec::IntoIter<Vec<Slot<V>>> {
        self.chains.into_iter()
    }

    /// Total number of stored slots, counted chain by chain.
    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }
}
