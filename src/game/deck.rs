use rand::Rng;
use rand::seq::SliceRandom;

use super::difficulty::Difficulty;

/// Card values laid out one per cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    values: Vec<u32>,
}

impl Deck {
    /// `1..=pairs` followed by `1..=pairs` again, unshuffled.
    pub fn ordered(difficulty: Difficulty) -> Self {
        let pairs = difficulty.pair_count() as u32;
        let values = (1..=pairs).chain(1..=pairs).collect();
        Deck { values }
    }

    pub fn shuffled<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let mut deck = Self::ordered(difficulty);
        deck.values.shuffle(rng);
        deck
    }

    /// Fixed layout, for replaying a known board.
    pub fn from_values(values: Vec<u32>) -> Self {
        Deck { values }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
