use shared::Game;

/// Every player with at least one territory receives this many.
pub const MIN_REINFORCEMENTS: u32 = 3;

/// Baseline allotment at turn start: `max(3, territories / 3)`.
///
/// Returns 0 for unknown players and players without territories.
// TODO: continent bonuses and card trade-ins would be added on top of this.
pub fn reinforcements_for(game: &Game, player_id: &str) -> u32 {
    if game.player(player_id).is_none() {
        return 0;
    }

    let owned = game.territories_owned_by(player_id) as u32;
    if owned == 0 {
        return 0;
    }

    (owned / 3).max(MIN_REINFORCEMENTS)
}
