//! Game data model shared by the server engine and its clients.
//!
//! Everything here is plain data: the server owns the only mutable copy of a
//! [`Game`] and ships full snapshots of it to observers after every change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Player identifiers are caller-supplied tokens, trusted at the boundary.
pub type PlayerId = String;
/// Territory identifiers are stable short keys such as `"arg"` or `"alaska"`.
pub type TerritoryId = String;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    WaitingForPlayers,
    Reinforcement,
    Attack,
    Fortification,
    GameOver,
}

/// How a turn moves between phases.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseRules {
    /// Committing reinforcements ends the turn immediately, so a turn never
    /// reaches Attack or Fortification. Used for reinforcement-only play.
    Direct,
    /// Reinforcement -> Attack -> Fortification -> next player, one fortify per turn.
    #[default]
    Classic,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Rendering only.
    pub color: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A player as supplied to `CreateGame`; the server assigns an id when absent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewPlayer {
    pub id: Option<PlayerId>,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    pub owner_player_id: Option<PlayerId>,
    pub armies: u32,
    pub adjacent_territory_ids: Vec<TerritoryId>,
    /// Opaque shape payload for renderers.
    pub path_data: String,
    /// False for decorative map entries that never take part in play.
    pub clickable: bool,
}

impl Territory {
    pub fn new(id: &str, name: &str, adjacent: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            owner_player_id: None,
            armies: 0,
            adjacent_territory_ids: adjacent.iter().map(|a| a.to_string()).collect(),
            path_data: String::new(),
            clickable: true,
        }
    }

    pub fn is_adjacent(&self, territory_id: &str) -> bool {
        self.adjacent_territory_ids.iter().any(|a| a == territory_id)
    }

    pub fn is_owned_by(&self, player_id: &str) -> bool {
        self.owner_player_id.as_deref() == Some(player_id)
    }
}

/// One game session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Game {
    pub id: Uuid,
    pub players: Vec<Player>,
    pub territories: HashMap<TerritoryId, Territory>,
    pub current_player_id: Option<PlayerId>,
    pub phase: Phase,
    /// Fixed at creation.
    pub turn_order: Vec<PlayerId>,
    pub pending_reinforcements: u32,
    pub rules: PhaseRules,
    /// Starts at 1 when play begins and counts every hand-over.
    pub turn: u32,
}

impl Game {
    pub fn new(id: Uuid, rules: PhaseRules) -> Self {
        Self {
            id,
            players: Vec::new(),
            territories: HashMap::new(),
            current_player_id: None,
            phase: Phase::WaitingForPlayers,
            turn_order: Vec::new(),
            pending_reinforcements: 0,
            rules,
            turn: 0,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.player(player_id).map_or(player_id, |p| p.name.as_str())
    }

    pub fn is_current_player(&self, player_id: &str) -> bool {
        self.current_player_id.as_deref() == Some(player_id)
    }

    pub fn territories_owned_by(&self, player_id: &str) -> usize {
        self.territories
            .values()
            .filter(|t| t.is_owned_by(player_id))
            .count()
    }

    pub fn armies_of(&self, player_id: &str) -> u64 {
        self.territories
            .values()
            .filter(|t| t.is_owned_by(player_id))
            .map(|t| u64::from(t.armies))
            .sum()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReinforcementPlacement {
    pub territory_id: TerritoryId,
    /// Signed so that malformed negative placements can be reported instead of wrapped.
    pub army_count: i32,
}

impl ReinforcementPlacement {
    pub fn new(territory_id: &str, army_count: i32) -> Self {
        Self {
            territory_id: territory_id.to_string(),
            army_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReinforceRequest {
    pub player_id: PlayerId,
    pub territory_id: TerritoryId,
    pub army_count: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttackRequest {
    pub player_id: PlayerId,
    pub attacking_territory_id: TerritoryId,
    pub defending_territory_id: TerritoryId,
    /// Armies committed to this attack, not the whole garrison.
    pub attacking_armies: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FortifyRequest {
    pub player_id: PlayerId,
    pub from_territory_id: TerritoryId,
    pub to_territory_id: TerritoryId,
    pub army_count: i32,
}

/// Category of a rejected action.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    OutOfTurn,
    WrongPhase,
    InvalidOwnership,
    InvalidAdjacencyOrConnectivity,
    InvalidQuantity,
}

/// Outcome of reinforce, commit, fortify, advance-phase and end-turn.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActionReply {
    pub success: bool,
    pub message: String,
    pub failure: Option<FailureKind>,
    /// `None` only when the game itself was not found.
    pub game: Option<Game>,
}

impl ActionReply {
    pub fn ok(message: impl Into<String>, game: Game) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
            game: Some(game),
        }
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>, game: Option<Game>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failure: Some(kind),
            game,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AttackResult {
    pub success: bool,
    pub message: String,
    pub failure: Option<FailureKind>,
    /// Sorted descending.
    pub attacker_dice_rolls: Vec<u8>,
    /// Sorted descending.
    pub defender_dice_rolls: Vec<u8>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub territory_conquered: bool,
    pub updated_game: Option<Game>,
}

impl std::fmt::Display for AttackResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn dice(rolls: &[u8]) -> String {
            if rolls.is_empty() {
                return "none".to_string();
            }
            rolls
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }

        writeln!(f, "{}", self.message)?;
        writeln!(f, "  attacker rolled: {}", dice(&self.attacker_dice_rolls))?;
        writeln!(f, "  defender rolled: {}", dice(&self.defender_dice_rolls))?;
        write!(
            f,
            "  losses: attacker {}, defender {}{}",
            self.attacker_losses,
            self.defender_losses,
            if self.territory_conquered {
                " (conquered)"
            } else {
                ""
            }
        )
    }
}
