//! Client-side session state: the watched game, the acting player and the
//! requests still waiting for an answer.

use crate::input::{ConsoleCommand, HELP};
use crate::rendering::{render_reply, render_summary, render_targets, render_territories};
use log::{debug, warn};
use shared::{
    AttackRequest, Command, FortifyRequest, Game, NewPlayer, Packet, PlayerId, ReinforceRequest,
    ReinforcementPlacement, Reply, PROTOCOL_VERSION,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Something the network loop should do on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Send(Packet),
    Show(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct ClientSession {
    client_id: Option<u32>,
    game: Option<Game>,
    watching: Option<Uuid>,
    acting_as: Option<PlayerId>,
    next_request_id: u32,
    pending: HashMap<u32, &'static str>,
}

impl ClientSession {
    pub fn new(acting_as: Option<PlayerId>) -> Self {
        Self {
            acting_as,
            next_request_id: 1,
            ..Self::default()
        }
    }

    pub fn connect_packet() -> Packet {
        Packet::Connect {
            client_version: PROTOCOL_VERSION,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client_id.is_some()
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn watching(&self) -> Option<Uuid> {
        self.watching
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// The explicit `as` player, or whoever's turn it is.
    pub fn acting_player(&self) -> Option<PlayerId> {
        let game = self.game.as_ref();
        match &self.acting_as {
            Some(wanted) => Some(
                game.and_then(|g| {
                    g.players
                        .iter()
                        .find(|p| p.name.eq_ignore_ascii_case(wanted))
                        .map(|p| p.id.clone())
                })
                .unwrap_or_else(|| wanted.clone()),
            ),
            None => game.and_then(|g| g.current_player_id.clone()),
        }
    }

    /// Turns a console command into packets or local output.
    pub fn prepare(&mut self, command: ConsoleCommand) -> Result<Vec<Step>, String> {
        match command {
            ConsoleCommand::Help => Ok(vec![Step::Show(HELP.to_string())]),
            ConsoleCommand::Quit => Ok(vec![Step::Send(Packet::Disconnect), Step::Quit]),
            ConsoleCommand::ActAs { player } => {
                self.acting_as = Some(player);
                let who = self.acting_player().unwrap_or_default();
                Ok(vec![Step::Show(format!("acting as {}", who))])
            }
            ConsoleCommand::Create { players } => {
                let players = players.map(|count| {
                    (1..=count)
                        .map(|i| NewPlayer {
                            id: None,
                            name: format!("Player {}", i),
                            color: String::new(),
                        })
                        .collect()
                });
                Ok(vec![self.request(Command::CreateGame { players })])
            }
            ConsoleCommand::Join { game_id } => {
                let mut steps = Vec::new();
                if let Some(current) = self.watching {
                    steps.push(Step::Send(Packet::Unsubscribe {
                        game_id: current.to_string(),
                    }));
                }
                steps.push(Step::Send(Packet::Subscribe { game_id }));
                Ok(steps)
            }
            ConsoleCommand::Leave => {
                let current = self.watching.take().ok_or("not watching a game")?;
                self.game = None;
                Ok(vec![
                    Step::Send(Packet::Unsubscribe {
                        game_id: current.to_string(),
                    }),
                    Step::Show(format!("left game {}", current)),
                ])
            }
            ConsoleCommand::Show => {
                let game = self.require_game()?;
                Ok(vec![Step::Show(render_summary(
                    game,
                    self.acting_as.as_deref(),
                ))])
            }
            ConsoleCommand::List => Ok(vec![Step::Show(render_territories(self.require_game()?))]),
            ConsoleCommand::Targets => {
                let player = self.require_player()?;
                Ok(vec![Step::Show(render_targets(self.require_game()?, &player))])
            }
            ConsoleCommand::Place { territory, armies } => {
                let (game_id, player_id) = self.require_turn()?;
                let territory_id = self.resolve_territory(&territory);
                Ok(vec![self.request(Command::Reinforce {
                    game_id,
                    request: ReinforceRequest {
                        player_id,
                        territory_id,
                        army_count: armies,
                    },
                })])
            }
            ConsoleCommand::Commit { placements } => {
                let (game_id, player_id) = self.require_turn()?;
                let placements = placements
                    .iter()
                    .map(|(territory, armies)| {
                        ReinforcementPlacement::new(&self.resolve_territory(territory), *armies)
                    })
                    .collect();
                Ok(vec![self.request(Command::CommitReinforcements {
                    game_id,
                    player_id,
                    placements: Some(placements),
                })])
            }
            ConsoleCommand::Attack { from, to, armies } => {
                let (game_id, player_id) = self.require_turn()?;
                let request = AttackRequest {
                    player_id,
                    attacking_territory_id: self.resolve_territory(&from),
                    defending_territory_id: self.resolve_territory(&to),
                    attacking_armies: armies,
                };
                Ok(vec![self.request(Command::Attack { game_id, request })])
            }
            ConsoleCommand::Fortify { from, to, armies } => {
                let (game_id, player_id) = self.require_turn()?;
                let request = FortifyRequest {
                    player_id,
                    from_territory_id: self.resolve_territory(&from),
                    to_territory_id: self.resolve_territory(&to),
                    army_count: armies,
                };
                Ok(vec![self.request(Command::Fortify { game_id, request })])
            }
            ConsoleCommand::Next => {
                let (game_id, player_id) = self.require_turn()?;
                Ok(vec![self.request(Command::AdvancePhase { game_id, player_id })])
            }
            ConsoleCommand::End => {
                let (game_id, player_id) = self.require_turn()?;
                Ok(vec![self.request(Command::EndTurn { game_id, player_id })])
            }
        }
    }

    /// Reacts to a packet from the server.
    pub fn on_packet(&mut self, packet: Packet) -> Vec<Step> {
        match packet {
            Packet::Connected { client_id } => {
                self.client_id = Some(client_id);
                vec![Step::Show(format!("connected as observer {}", client_id))]
            }
            Packet::Disconnected { reason } => {
                self.client_id = None;
                vec![Step::Show(format!("disconnected: {}", reason)), Step::Quit]
            }
            Packet::Subscribed { game_id } => {
                self.watching = Some(game_id);
                if self.game.as_ref().is_some_and(|g| g.id != game_id) {
                    self.game = None;
                }
                vec![Step::Show(format!("watching game {}", game_id))]
            }
            Packet::GameStateUpdated { game } => {
                if self.watching != Some(game.id) {
                    debug!("Ignoring update for unwatched game {}", game.id);
                    return Vec::new();
                }
                let turn_changed = self
                    .game
                    .as_ref()
                    .map_or(true, |old| old.current_player_id != game.current_player_id);
                let summary = render_summary(&game, self.acting_as.as_deref());
                self.game = Some(game);
                if turn_changed {
                    vec![Step::Show(summary)]
                } else {
                    Vec::new()
                }
            }
            Packet::Response { request_id, reply } => self.on_reply(request_id, reply),
            Packet::Rejected { reason } => vec![Step::Show(format!("refused: {}", reason))],
            other => {
                warn!("Unexpected packet from server: {:?}", other);
                Vec::new()
            }
        }
    }

    fn on_reply(&mut self, request_id: u32, reply: Reply) -> Vec<Step> {
        let Some(name) = self.pending.remove(&request_id) else {
            debug!("Response to unknown request {}", request_id);
            return Vec::new();
        };

        let mut steps = vec![Step::Show(render_reply(&reply))];
        if let (Reply::Game(game), "CreateGame") = (&reply, name) {
            if let Some(current) = self.watching {
                steps.push(Step::Send(Packet::Unsubscribe {
                    game_id: current.to_string(),
                }));
            }
            steps.push(Step::Send(Packet::Subscribe {
                game_id: game.id.to_string(),
            }));
        }
        steps
    }

    fn request(&mut self, command: Command) -> Step {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.pending.insert(request_id, command.name());
        Step::Send(Packet::Request {
            request_id,
            command,
        })
    }

    fn require_game(&self) -> Result<&Game, String> {
        self.game
            .as_ref()
            .ok_or_else(|| "not watching a game, use create or join".to_string())
    }

    fn require_player(&self) -> Result<PlayerId, String> {
        self.acting_player()
            .ok_or_else(|| "no player to act as, use: as <player>".to_string())
    }

    fn require_turn(&self) -> Result<(Uuid, PlayerId), String> {
        let game_id = self.require_game()?.id;
        Ok((game_id, self.require_player()?))
    }

    /// Accepts a territory id or its name, ignoring case.
    fn resolve_territory(&self, text: &str) -> String {
        self.game
            .as_ref()
            .and_then(|game| {
                game.territories
                    .values()
                    .find(|t| t.id.eq_ignore_ascii_case(text) || t.name.eq_ignore_ascii_case(text))
                    .map(|t| t.id.clone())
            })
            .unwrap_or_else(|| text.to_string())
    }
}
