//! Session-facing entry points for every game action.
//!
//! Each action looks up the game, takes its lock, validates and applies the
//! rules, publishes the new snapshot and only then releases the lock. Actions
//! on one game are therefore serialized, while separate games never contend.

use crate::actions;
use crate::board::BoardCatalog;
use crate::config::EngineConfig;
use crate::error::ActionError;
use crate::notifier::Notifier;
use crate::rng::Randomness;
use crate::roster;
use crate::store::{GameStore, StoreError};
use log::{debug, info, warn};
use shared::{
    ActionReply, AttackRequest, AttackResult, Command, FortifyRequest, Game,
    NewPlayer, ReinforceRequest, ReinforcementPlacement, Reply,
};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub struct ActionEngine {
    store: Arc<GameStore>,
    catalog: BoardCatalog,
    config: EngineConfig,
    notifier: Arc<dyn Notifier>,
    randomness: Mutex<Box<dyn Randomness>>,
}

/// A rejected action together with the state it was checked against.
type Rejection = (ActionError, Option<Game>);

impl ActionEngine {
    pub fn new(
        store: Arc<GameStore>,
        config: EngineConfig,
        notifier: Arc<dyn Notifier>,
        randomness: Box<dyn Randomness>,
    ) -> Self {
        Self {
            store,
            catalog: BoardCatalog::new(config.board),
            config,
            notifier,
            randomness: Mutex::new(randomness),
        }
    }

    /// Replaces the built-in board, e.g. with one from [`BoardCatalog::from_territories`].
    pub fn with_catalog(mut self, catalog: BoardCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn store(&self) -> &Arc<GameStore> {
        &self.store
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Creates and registers a new game.
    ///
    /// `None` seats the configured default roster, while an empty roster
    /// leaves the game waiting for players.
    pub async fn create_game(&self, players: Option<Vec<NewPlayer>>) -> Game {
        let players = match players {
            Some(players) => roster::admit_roster(players),
            None => roster::default_roster(self.config.default_players),
        };

        loop {
            let mut game = Game::new(Uuid::new_v4(), self.config.phase_rules);
            {
                let mut randomness = self.randomness();
                actions::setup_game(&mut game, &self.catalog, players.clone(), &mut **randomness);
            }

            match self.store.insert(game).await {
                Ok(shared) => {
                    let game = shared.lock().await;
                    info!(
                        "Created game {} with {} players on {} territories",
                        game.id,
                        game.players.len(),
                        game.territories.len()
                    );
                    self.notifier.publish(&game);
                    return game.clone();
                }
                Err(StoreError::DuplicateId(id)) => {
                    warn!("Game id {} is already taken, drawing a new one", id);
                }
            }
        }
    }

    /// Registers a game built elsewhere, keeping its id.
    pub async fn adopt_game(&self, game: Game) -> Result<Game, StoreError> {
        let shared = self.store.insert(game).await?;
        let game = shared.lock().await;
        info!("Adopted game {}", game.id);
        self.notifier.publish(&game);
        Ok(game.clone())
    }

    pub async fn get_game(&self, game_id: &Uuid) -> Option<Game> {
        self.store.snapshot(game_id).await
    }

    pub async fn reinforce(&self, game_id: Uuid, request: ReinforceRequest) -> ActionReply {
        let result = self
            .with_game(game_id, |game| actions::reinforce(game, &request))
            .await;
        Self::action_reply("reinforce", result)
    }

    pub async fn commit_reinforcements(
        &self,
        game_id: Uuid,
        player_id: &str,
        placements: Option<Vec<ReinforcementPlacement>>,
    ) -> ActionReply {
        let result = self
            .with_game(game_id, |game| {
                actions::commit_reinforcements(game, player_id, placements.as_deref())
            })
            .await;
        Self::action_reply("commit reinforcements", result)
    }

    pub async fn attack(&self, game_id: Uuid, request: AttackRequest) -> AttackResult {
        let result = self
            .with_game(game_id, |game| {
                let mut randomness = self.randomness();
                actions::attack(game, &request, &mut **randomness)
            })
            .await;

        match result {
            Ok((outcome, game)) => AttackResult {
                success: true,
                message: outcome.message,
                failure: None,
                attacker_dice_rolls: outcome.battle.attacker_rolls,
                defender_dice_rolls: outcome.battle.defender_rolls,
                attacker_losses: outcome.battle.attacker_losses,
                defender_losses: outcome.battle.defender_losses,
                territory_conquered: outcome.conquered,
                updated_game: Some(game),
            },
            Err((error, game)) => {
                debug!("attack rejected: {}", error);
                AttackResult {
                    success: false,
                    message: error.to_string(),
                    failure: Some(error.kind()),
                    updated_game: game,
                    ..AttackResult::default()
                }
            }
        }
    }

    pub async fn fortify(&self, game_id: Uuid, request: FortifyRequest) -> ActionReply {
        let result = self
            .with_game(game_id, |game| actions::fortify(game, &request))
            .await;
        Self::action_reply("fortify", result)
    }

    pub async fn advance_phase(&self, game_id: Uuid, player_id: &str) -> ActionReply {
        let result = self
            .with_game(game_id, |game| actions::advance_phase(game, player_id))
            .await;
        Self::action_reply("advance phase", result)
    }

    pub async fn end_turn(&self, game_id: Uuid, player_id: &str) -> ActionReply {
        let result = self
            .with_game(game_id, |game| actions::end_turn(game, player_id))
            .await;
        Self::action_reply("end turn", result)
    }

    /// Dispatches a wire command to the matching action.
    pub async fn execute(&self, command: Command) -> Reply {
        match command {
            Command::CreateGame { players } => Reply::Game(self.create_game(players).await),
            Command::GetGame { game_id } => match self.get_game(&game_id).await {
                Some(game) => Reply::Game(game),
                None => Reply::NotFound { game_id },
            },
            Command::Reinforce { game_id, request } => {
                Reply::Action(self.reinforce(game_id, request).await)
            }
            Command::CommitReinforcements {
                game_id,
                player_id,
                placements,
            } => Reply::Action(
                self.commit_reinforcements(game_id, &player_id, placements)
                    .await,
            ),
            Command::Attack { game_id, request } => {
                Reply::Attack(self.attack(game_id, request).await)
            }
            Command::Fortify { game_id, request } => {
                Reply::Action(self.fortify(game_id, request).await)
            }
            Command::AdvancePhase { game_id, player_id } => {
                Reply::Action(self.advance_phase(game_id, &player_id).await)
            }
            Command::EndTurn { game_id, player_id } => {
                Reply::Action(self.end_turn(game_id, &player_id).await)
            }
        }
    }

    /// Runs `apply` under the game's lock and publishes on success.
    async fn with_game<T, F>(&self, game_id: Uuid, apply: F) -> Result<(T, Game), Rejection>
    where
        F: FnOnce(&mut Game) -> Result<T, ActionError>,
    {
        let shared = self
            .store
            .get(&game_id)
            .await
            .ok_or((ActionError::GameNotFound(game_id), None))?;

        let mut game = shared.lock().await;
        match apply(&mut *game) {
            Ok(value) => {
                self.notifier.publish(&game);
                Ok((value, game.clone()))
            }
            Err(error) => Err((error, Some(game.clone()))),
        }
    }

    fn action_reply(action: &str, result: Result<(String, Game), Rejection>) -> ActionReply {
        match result {
            Ok((message, game)) => {
                debug!("{} in game {}: {}", action, game.id, message);
                ActionReply::ok(message, game)
            }
            Err((error, game)) => {
                debug!("{} rejected: {}", action, error);
                let kind = error.kind();
                ActionReply::failed(kind, error.to_string(), game)
            }
        }
    }

    fn randomness(&self) -> MutexGuard<'_, Box<dyn Randomness>> {
        self.randomness
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ActionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEngine")
            .field("catalog", &self.catalog.variant())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
