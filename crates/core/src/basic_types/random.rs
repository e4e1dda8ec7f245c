use std::fmt::Debug;

use rand::Rng;
use rand::SeedableRng;

/// Abstraction for randomness, in order to swap out different source of randomness.
///
/// This is especially useful when testing, to control which values are generated when random
/// values are required.
pub trait Random: Debug {
    /// Generate a random float in the range 0..1.
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use propel_core::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let value = rng.generate_f64();
    /// assert!((0.0..1.0).contains(&value));
    /// ```
    fn generate_f64(&mut self) -> f64;
}

// We provide a blanket implementation of the trait for any type which implements `SeedableRng`,
// `Rng` and `Debug` to ensure that we can use any "regular" random generator where we expect an
// implementation of Random.
impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_f64(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Random;

    /// A [`Random`] which replays a fixed list of values.
    #[derive(Debug, Default)]
    pub(crate) struct TestRandom {
        pub(crate) floats: Vec<f64>,
    }

    impl Random for TestRandom {
        fn generate_f64(&mut self) -> f64 {
            self.floats.remove(0)
        }
    }
}
