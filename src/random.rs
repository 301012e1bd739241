//! Random number generation, on top of the abstractions of the "rand" crate

use crate::numeric::Float;
use rand::{Rng, SeedableRng};

// Select random number generation engine in use
#[cfg(feature = "f32")]
type Engine = rand_xoshiro::Xoshiro128Plus;
#[cfg(not(feature = "f32"))]
type Engine = rand_xoshiro::Xoshiro256Plus;

/// Seedable random number generator with independent per-batch streams
#[derive(Clone, Debug)]
pub struct RandomGenerator {
    rng: Engine,
}
//
impl RandomGenerator {
    /// Spawn a new random number generator from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Engine::seed_from_u64(seed),
        }
    }

    /// Spawn the generator of the n-th event batch of a run
    ///
    /// Each batch gets its own non-overlapping stream, which only depends on
    /// the run seed and the batch index. This makes results independent of
    /// the order in which batches are processed.
    ///
    pub fn for_batch(seed: u64, batch_id: usize) -> Self {
        let mut result = Self::new(seed);
        for _ in 0..batch_id {
            result.rng.jump();
        }
        result
    }

    /// Generate a random floating-point number between 0 and 1
    pub fn random(&mut self) -> Float {
        self.rng.gen()
    }

    /// Generate an array of random numbers
    pub fn random_array<const N: usize>(&mut self) -> [Float; N] {
        self.rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RandomGenerator::new(42);
        let mut b = RandomGenerator::new(42);
        for _ in 0..16 {
            let x = a.random();
            assert!((0. ..1.).contains(&x));
            assert_eq!(x, b.random());
        }
    }

    #[test]
    fn batches_get_distinct_streams() {
        let first = RandomGenerator::for_batch(7, 0).random_array::<4>();
        let second = RandomGenerator::for_batch(7, 1).random_array::<4>();
        assert_eq!(first, RandomGenerator::new(7).random_array::<4>());
        assert_ne!(first, second);
        assert_eq!(second, RandomGenerator::for_batch(7, 1).random_array::<4>());
    }
}
