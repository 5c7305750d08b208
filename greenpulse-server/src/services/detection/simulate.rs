use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::detection::Detection;

const COUNTS: [u32; 5] = [0, 0, 0, 1, 2];
const WEIGHTS: [u32; 5] = [50, 20, 10, 10, 10];

const MIN_CONFIDENCE: f64 = 0.75;
const MAX_CONFIDENCE: f64 = 0.97;

/// Stand-in for a camera: mostly empty readings with the occasional visitor.
pub struct Simulator {
    rng: StdRng,
    counts: WeightedIndex<u32>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            counts: WeightedIndex::new(WEIGHTS).expect("weights are positive"),
        }
    }

    pub fn detect(&mut self) -> Detection {
        let count = COUNTS[self.counts.sample(&mut self.rng)];
        let confidence = self.rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);

        Detection::new(count, confidence)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
