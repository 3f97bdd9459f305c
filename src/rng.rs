//! Random number generation for the random tone mode.
//!
//! The converter never touches a global generator. It takes an [`Rng`], so tests can use
//! [`RngMock`] for predictable tones while the command line uses [`RandRng`].

use core::ops::RangeInclusive;

use rand::Rng as _;

/// A random number generator for tone assignment.
///
/// # Contract
///
/// - The generated number must be within the specified `range` (inclusive).
pub trait Rng {
    /// Generates a random integer within the specified `range`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use adofai_taiko::rng::{Rng, RngMock};
    ///
    /// let mut rng = RngMock([1u64]);
    /// assert_eq!(rng.generate(0u64..=1u64), 1u64);
    /// ```
    fn generate(&mut self, range: RangeInclusive<u64>) -> u64;
}

impl<T: Rng + ?Sized> Rng for Box<T> {
    fn generate(&mut self, range: RangeInclusive<u64>) -> u64 {
        T::generate(self, range)
    }
}

impl<T: Rng + ?Sized> Rng for &mut T {
    fn generate(&mut self, range: RangeInclusive<u64>) -> u64 {
        T::generate(self, range)
    }
}

/// A deterministic mock generator returning predefined values in rotation.
///
/// # Examples
///
/// ```rust
/// use adofai_taiko::rng::{Rng, RngMock};
///
/// let mut rng = RngMock([1u64, 0u64]);
/// assert_eq!(rng.generate(0u64..=1u64), 1u64);
/// assert_eq!(rng.generate(0u64..=1u64), 0u64);
/// assert_eq!(rng.generate(0u64..=1u64), 1u64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RngMock<const N: usize>(pub [u64; N]);

impl<const N: usize> Rng for RngMock<N> {
    fn generate(&mut self, _range: RangeInclusive<u64>) -> u64 {
        let Some(first) = self.0.first().copied() else {
            return 0;
        };
        self.0.rotate_left(1);
        first
    }
}

/// A generator backed by the [`rand`] crate.
///
/// # Examples
///
/// ```rust
/// use adofai_taiko::rng::{Rng, RandRng};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = RandRng(StdRng::seed_from_u64(42));
/// let n = rng.generate(0u64..=1u64);
/// assert!(n <= 1u64);
/// ```
///
/// [`rand`]: https://crates.io/crates/rand
#[derive(Debug, Clone)]
pub struct RandRng<R>(pub R);

impl RandRng<rand::rngs::ThreadRng> {
    /// A generator over the thread-local [`rand`] generator.
    #[must_use]
    pub fn thread_local() -> Self {
        Self(rand::rng())
    }
}

impl<R: rand::RngCore> Rng for RandRng<R> {
    fn generate(&mut self, range: RangeInclusive<u64>) -> u64 {
        if range.is_empty() {
            return *range.start();
        }
        self.0.random_range(range)
    }
}
