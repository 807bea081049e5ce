use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    ActionReply, AttackRequest, AttackResult, FortifyRequest, Game, NewPlayer, PlayerId,
    ReinforceRequest, ReinforcementPlacement,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    Connect {
        client_version: u32,
    },
    Heartbeat,
    Disconnect,
    /// Join a game's notification topic. Kept as text so the server can reject
    /// keys that are not valid game ids.
    Subscribe {
        game_id: String,
    },
    Unsubscribe {
        game_id: String,
    },
    Request {
        request_id: u32,
        command: Command,
    },

    Connected {
        client_id: u32,
    },
    Disconnected {
        reason: String,
    },
    Subscribed {
        game_id: Uuid,
    },
    Response {
        request_id: u32,
        reply: Reply,
    },
    GameStateUpdated {
        game: Game,
    },
    Rejected {
        reason: String,
    },
}

/// One game action submitted by a client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Command {
    /// `None` asks for the server's default roster; `Some(vec![])` creates an
    /// empty game waiting for players.
    CreateGame {
        players: Option<Vec<NewPlayer>>,
    },
    GetGame {
        game_id: Uuid,
    },
    Reinforce {
        game_id: Uuid,
        request: ReinforceRequest,
    },
    CommitReinforcements {
        game_id: Uuid,
        player_id: PlayerId,
        placements: Option<Vec<ReinforcementPlacement>>,
    },
    Attack {
        game_id: Uuid,
        request: AttackRequest,
    },
    Fortify {
        game_id: Uuid,
        request: FortifyRequest,
    },
    AdvancePhase {
        game_id: Uuid,
        player_id: PlayerId,
    },
    EndTurn {
        game_id: Uuid,
        player_id: PlayerId,
    },
}

impl Command {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateGame { .. } => "CreateGame",
            Command::GetGame { .. } => "GetGame",
            Command::Reinforce { .. } => "Reinforce",
            Command::CommitReinforcements { .. } => "CommitReinforcements",
            Command::Attack { .. } => "Attack",
            Command::Fortify { .. } => "Fortify",
            Command::AdvancePhase { .. } => "AdvancePhase",
            Command::EndTurn { .. } => "EndTurn",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Reply {
    Game(Game),
    NotFound { game_id: Uuid },
    Action(ActionReply),
    Attack(AttackResult),
}

impl Reply {
    /// The snapshot carried by this reply, if any.
    pub fn game(&self) -> Option<&Game> {
        match self {
            Reply::Game(game) => Some(game),
            Reply::NotFound { .. } => None,
            Reply::Action(reply) => reply.game.as_ref(),
            Reply::Attack(result) => result.updated_game.as_ref(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Reply::Game(_) => true,
            Reply::NotFound { .. } => false,
            Reply::Action(reply) => reply.success,
            Reply::Attack(result) => result.success,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Reply::Game(game) => format!("Game {}", game.id),
            Reply::NotFound { game_id } => format!("Game {} not found", game_id),
            Reply::Action(reply) => reply.message.clone(),
            Reply::Attack(result) => result.to_string(),
        }
    }
}
