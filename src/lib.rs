#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod buckets;
mod error;
mod policy;

/// A string-to-string dictionary layered over [`HashMap`].
///
/// This module provides a `Dictionary` whose erase fails on missing keys and
/// whose bulk update overwrites existing values.
pub mod dictionary;

/// A key-value map built on the chained `HashTable`.
///
/// This module provides a `HashMap` that wraps the `HashTable` and routes keys
/// through a configurable hasher.
pub mod hash_map;

/// The raw separate-chaining table, addressed by precomputed hashes.
pub mod hash_table;

pub use dictionary::Dictionary;
pub use error::Error;
pub use error::Result;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use policy::ResizePolicy;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashMap::new`] and
        /// [`Dictionary::new`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashMap::new`] and
        /// [`Dictionary::new`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
