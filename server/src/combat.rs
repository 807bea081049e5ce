//! Dice combat for a single attack.
//!
//! Attacker rolls up to three dice, defender up to two. Both sides are sorted
//! high to low and compared pairwise; the defender wins ties.

use crate::rng::Randomness;

pub const MAX_ATTACKER_DICE: u32 = 3;
pub const MAX_DEFENDER_DICE: u32 = 2;

/// Dice and losses of one resolved attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    /// Sorted descending.
    pub attacker_rolls: Vec<u8>,
    /// Sorted descending.
    pub defender_rolls: Vec<u8>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
}

/// Number of dice each side throws.
pub fn dice_counts(attacking_armies: u32, defending_armies: u32) -> (usize, usize) {
    (
        attacking_armies.min(MAX_ATTACKER_DICE) as usize,
        defending_armies.min(MAX_DEFENDER_DICE) as usize,
    )
}

pub fn roll_dice(randomness: &mut dyn Randomness, count: usize) -> Vec<u8> {
    let mut rolls: Vec<u8> = (0..count).map(|_| randomness.roll_die()).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls
}

/// Compares best against best and returns `(attacker_losses, defender_losses)`.
pub fn compare_rolls(attacker_rolls: &[u8], defender_rolls: &[u8]) -> (u32, u32) {
    let mut attacker = attacker_rolls.to_vec();
    let mut defender = defender_rolls.to_vec();
    attacker.sort_unstable_by(|a, b| b.cmp(a));
    defender.sort_unstable_by(|a, b| b.cmp(a));

    attacker
        .iter()
        .zip(defender.iter())
        .fold((0, 0), |(attacker_losses, defender_losses), (a, d)| {
            if a > d {
                (attacker_losses, defender_losses + 1)
            } else {
                (attacker_losses + 1, defender_losses)
            }
        })
}

pub fn resolve_battle(
    randomness: &mut dyn Randomness,
    attacking_armies: u32,
    defending_armies: u32,
) -> Battle {
    let (attacker_dice, defender_dice) = dice_counts(attacking_armies, defending_armies);
    let attacker_rolls = roll_dice(randomness, attacker_dice);
    let defender_rolls = roll_dice(randomness, defender_dice);
    let (attacker_losses, defender_losses) = compare_rolls(&attacker_rolls, &defender_rolls);

    Battle {
        attacker_rolls,
        defender_rolls,
        attacker_losses,
        defender_losses,
    }
}

/// Armies that move into a conquered territory.
///
/// The survivors of the attack move in (at least one), but the source always
/// keeps one army behind. Returns 0 only when the source has a single army left.
pub fn occupying_armies(attacking_armies: u32, attacker_losses: u32, source_remaining: u32) -> u32 {
    let survivors = attacking_armies.saturating_sub(attacker_losses).max(1);
    survivors.min(source_remaining.saturating_sub(1))
}
