use thiserror::Error;

/// Errors reported by [`HashMap`](crate::HashMap),
/// [`Dictionary`](crate::Dictionary) and [`ResizePolicy`](crate::ResizePolicy).
///
/// Absence on the plain table's [`insert`](crate::HashMap::insert) and
/// [`erase`](crate::HashMap::erase) is not an error; those report it through
/// their `bool` return value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The key and value sequences handed to a constructor differ in length.
    #[error("constructor received sequences of different lengths ({keys} keys, {values} values)")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// The requested key is not present.
    #[error("key not found")]
    KeyNotFound,
    /// A [`Dictionary`](crate::Dictionary) was asked to erase a key it does
    /// not hold.
    #[error("invalid key: key not found")]
    InvalidKey,
    /// The minimum capacity is zero or not a power of two.
    #[error("minimum capacity {0} is not a non-zero power of two")]
    InvalidMinimumCapacity(usize),
    /// The load factor bounds cannot keep the table's load bounded.
    #[error("load factors lower={lower} upper={upper} must satisfy 0 <= 2 * lower <= upper")]
    InvalidLoadFactors {
        /// Requested lower bound.
        lower: f64,
        /// Requested upper bound.
        upper: f64,
    },
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = Error::LengthMismatch { keys: 2, values: 3 };
        assert_eq!(
            err.to_string(),
            "constructor received sequences of different lengths (2 keys, 3 values)"
        );
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::InvalidMinimumCapacity(12).to_string(),
            "minimum capacity 12 is not a non-zero power of two"
        );
    }
}
