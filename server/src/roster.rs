use log::warn;
use shared::{NewPlayer, Player};
use std::collections::HashSet;
use uuid::Uuid;

const COLORS: [&str; 8] = [
    "blue", "red", "green", "purple", "orange", "cyan", "magenta", "yellow",
];

/// Palette color for the player at `index` (zero based), cycling when exhausted.
pub fn color_for(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

/// Players created when a game is requested without a roster.
pub fn default_roster(count: u8) -> Vec<Player> {
    (0..count as usize)
        .map(|i| {
            Player::new(
                Uuid::new_v4().to_string(),
                format!("Player {}", i + 1),
                color_for(i),
            )
        })
        .collect()
}

/// Fills in a missing id and color for a caller-supplied player.
pub fn admit(new_player: NewPlayer, index: usize) -> Player {
    let id = new_player
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let color = if new_player.color.trim().is_empty() {
        color_for(index).to_string()
    } else {
        new_player.color
    };
    Player::new(id, new_player.name, color)
}

/// Admits a caller-supplied roster. Player ids are unique within a game, so a
/// repeated id is replaced with a generated one.
pub fn admit_roster(players: Vec<NewPlayer>) -> Vec<Player> {
    let mut seen = HashSet::new();
    players
        .into_iter()
        .enumerate()
        .map(|(index, new_player)| {
            let mut player = admit(new_player, index);
            if !seen.insert(player.id.clone()) {
                let fresh = Uuid::new_v4().to_string();
                warn!("Player id {} is already seated, assigning {}", player.id, fresh);
                player.id = fresh;
                seen.insert(player.id.clone());
            }
            player
        })
        .collect()
}
