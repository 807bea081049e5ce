//! Randomness used for initial territory assignment, turn order and dice.
//!
//! The engine never reaches for a global generator; it is handed a
//! [`Randomness`] so that tests can replay exact dice.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub trait Randomness: Send {
    /// Uniform in `1..=6`.
    fn roll_die(&mut self) -> u8;

    /// A uniformly random ordering of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// Production randomness backed by any `rand` generator.
#[derive(Debug)]
pub struct RandRandomness<R = StdRng> {
    rng: R,
}

impl RandRandomness<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> RandRandomness<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Randomness for RandRandomness<R> {
    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Replays a fixed sequence of dice and never shuffles.
///
/// Once the script runs out every further roll is a 1.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandomness {
    dice: VecDeque<u8>,
}

impl ScriptedRandomness {
    pub fn new(dice: &[u8]) -> Self {
        Self {
            dice: dice.iter().copied().collect(),
        }
    }

    pub fn push_dice(&mut self, dice: &[u8]) {
        self.dice.extend(dice.iter().copied());
    }

    pub fn remaining(&self) -> usize {
        self.dice.len()
    }
}

impl Randomness for ScriptedRandomness {
    fn roll_die(&mut self) -> u8 {
        self.dice.pop_front().unwrap_or(1)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_stay_in_range() {
        let mut randomness = RandRandomness::seeded(7);
        for _ in 0..1_000 {
            let roll = randomness.roll_die();
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_every_face_appears() {
        let mut randomness = RandRandomness::seeded(11);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[(randomness.roll_die() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_permutation_is_complete() {
        let mut randomness = RandRandomness::seeded(3);
        let mut order = randomness.permutation(42);
        order.sort_unstable();
        assert_eq!(order, (0..42).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let mut a = RandRandomness::seeded(99);
        let mut b = RandRandomness::seeded(99);
        let rolls_a: Vec<u8> = (0..20).map(|_| a.roll_die()).collect();
        let rolls_b: Vec<u8> = (0..20).map(|_| b.roll_die()).collect();
        assert_eq!(rolls_a, rolls_b);
        assert_eq!(a.permutation(10), b.permutation(10));
    }

    #[test]
    fn test_scripted_dice_replay_in_order() {
        let mut scripted = ScriptedRandomness::new(&[6, 5, 4]);
        scripted.push_dice(&[2]);
        assert_eq!(scripted.remaining(), 4);
        assert_eq!(scripted.roll_die(), 6);
        assert_eq!(scripted.roll_die(), 5);
        assert_eq!(scripted.roll_die(), 4);
        assert_eq!(scripted.roll_die(), 2);
        assert_eq!(scripted.roll_die(), 1);
        assert_eq!(scripted.permutation(3), vec![0, 1, 2]);
    }
}
