use std::cell::RefCell;

use ahash::RandomState;
use fastrand::Rng;

#[derive(Debug)]
pub struct Random {
    pub rng: RefCell<Rng>,
    pub seed: Option<u64>,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(Rng::new()),
            seed: None,
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(Rng::with_seed(seed)),
            seed: Some(seed),
        }
    }

    pub fn shuffle<T>(&self, container: &mut [T]) {
        self.rng.borrow_mut().shuffle(container);
    }

    // Get random number in range [lower, upper). Upper is not inclusive
    pub fn range_usize(&self, lower: usize, upper: usize) -> usize {
        self.rng.borrow_mut().usize(lower..upper)
    }

    pub fn reset(&self) {
        if let Some(seed) = self.seed {
            self.rng.replace(Rng::with_seed(seed));
        } else {
            self.rng.replace(Rng::new());
        }
    }

    pub fn random_state(&self) -> RandomState {
        if let Some(seed) = self.seed {
            RandomState::with_seeds(seed, seed + 123, seed + 321, seed + 1337)
        } else {
            RandomState::new()
        }
    }
}
