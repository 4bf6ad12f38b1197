//! Seedable randomness for the fleet simulation.
//!
//! Every random draw of a tick goes through [`SimRng`], so two runs with the
//! same seed and the same edits produce the same board.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Resource, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl SimRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        SimRng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Fresh seed for every run.
    pub fn from_entropy() -> Self {
        SimRng::from_seed_u64(rand::random())
    }

    pub fn from_config(seed: Option<u64>) -> Self {
        seed.map_or_else(SimRng::from_entropy, SimRng::from_seed_u64)
    }
}
