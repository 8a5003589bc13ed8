//! Load factor bounds and the capacity arithmetic that enforces them.

use crate::error::Error;
use crate::error::Result;

/// Construction-time bounds that decide when a table grows or shrinks.
///
/// After an insertion the table doubles its capacity until
/// `len / capacity <= upper_load_factor`. After a removal it halves its
/// capacity, never going below `minimum_capacity`, until
/// `len / capacity >= lower_load_factor`.
///
/// # Examples
///
/// ```rust
/// use chain_hash::ResizePolicy;
///
/// let policy = ResizePolicy::default();
/// assert_eq!(policy.upper_load_factor(), 0.75);
/// assert_eq!(policy.lower_load_factor(), 0.25);
/// assert_eq!(policy.minimum_capacity(), 16);
///
/// let eager = ResizePolicy::new(0.1, 0.5, 4).unwrap();
/// assert_eq!(eager.minimum_capacity(), 4);
///
/// assert!(ResizePolicy::new(0.25, 0.75, 12).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    lower_load_factor: f64,
    upper_load_factor: f64,
    minimum_capacity: usize,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            lower_load_factor: Self::DEFAULT_LOWER_LOAD_FACTOR,
            upper_load_factor: Self::DEFAULT_UPPER_LOAD_FACTOR,
            minimum_capacity: Self::DEFAULT_MINIMUM_CAPACITY,
        }
    }
}

impl ResizePolicy {
    /// Lower bound used by [`ResizePolicy::default`].
    pub const DEFAULT_LOWER_LOAD_FACTOR: f64 = 0.25;
    /// Upper bound used by [`ResizePolicy::default`].
    pub const DEFAULT_UPPER_LOAD_FACTOR: f64 = 0.75;
    /// Capacity floor used by [`ResizePolicy::default`].
    pub const DEFAULT_MINIMUM_CAPACITY: usize = 16;

    /// Creates a policy from explicit bounds.
    ///
    /// `minimum_capacity` must be a non-zero power of two. The load factors
    /// must satisfy `0 <= 2 * lower <= upper` with a finite, positive
    /// `upper`, so that a single doubling or halving step can never carry the
    /// load across the opposite bound.
    pub fn new(
        lower_load_factor: f64,
        upper_load_factor: f64,
        minimum_capacity: usize,
    ) -> Result<Self> {
        if !minimum_capacity.is_power_of_two() {
            return Err(Error::InvalidMinimumCapacity(minimum_capacity));
        }

        let valid = lower_load_factor >= 0.0
            && upper_load_factor > 0.0
            && upper_load_factor.is_finite()
            && lower_load_factor * 2.0 <= upper_load_factor;
        if !valid {
            return Err(Error::InvalidLoadFactors {
                lower: lower_load_factor,
                upper: upper_load_factor,
            });
        }

        Ok(Self {
            lower_load_factor,
            upper_load_factor,
            minimum_capacity,
        })
    }

    /// The load below which a removal shrinks the table.
    pub fn lower_load_factor(&self) -> f64 {
        self.lower_load_factor
    }

    /// The load above which an insertion grows the table.
    pub fn upper_load_factor(&self) -> f64 {
        self.upper_load_factor
    }

    /// The smallest capacity a table will ever have.
    pub fn minimum_capacity(&self) -> usize {
        self.minimum_capacity
    }

    /// Capacity the table must move to after an insertion, if any.
    pub(crate) fn grow_target(&self, len: usize, capacity: usize) -> Option<usize> {
        if load(len, capacity) <= self.upper_load_factor {
            return None;
        }

        let mut target = capacity;
        while load(len, target) > self.upper_load_factor {
            target = match target.checked_mul(2) {
                Some(doubled) => doubled,
                None => capacity_overflow(),
            };
        }
        Some(target)
    }

    /// Capacity the table must move to after a removal, if any.
    pub(crate) fn shrink_target(&self, len: usize, capacity: usize) -> Option<usize> {
        if capacity <= self.minimum_capacity || load(len, capacity) >= self.lower_load_factor {
            return None;
        }

        let mut target = capacity;
        while target > self.minimum_capacity && load(len, target) < self.lower_load_factor {
            target /= 2;
        }
        Some(target)
    }
}

#[inline(always)]
pub(crate) fn load(len: usize, capacity: usize) -> f64 {
    len as f64 / capacity as f64
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}
