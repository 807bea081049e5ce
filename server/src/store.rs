//! Concurrent keyed collection of active games.
//!
//! The map itself sits behind a read-write lock and is only write-locked for
//! the insert-if-absent of a new game. Each game has its own mutex, so actions
//! on different games never wait on each other while actions on one game run
//! strictly one after another.

use shared::Game;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub type SharedGame = Arc<Mutex<Game>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a game with id {0} already exists")]
    DuplicateId(Uuid),
}

#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<HashMap<Uuid, SharedGame>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new game unless its id is already taken.
    pub async fn insert(&self, game: Game) -> Result<SharedGame, StoreError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(StoreError::DuplicateId(game.id));
        }
        let id = game.id;
        let shared = Arc::new(Mutex::new(game));
        games.insert(id, Arc::clone(&shared));
        Ok(shared)
    }

    pub async fn get(&self, game_id: &Uuid) -> Option<SharedGame> {
        self.games.read().await.get(game_id).cloned()
    }

    /// Copy of the current state of a game.
    pub async fn snapshot(&self, game_id: &Uuid) -> Option<Game> {
        let game = self.get(game_id).await?;
        let guard = game.lock().await;
        Some(guard.clone())
    }

    pub async fn contains(&self, game_id: &Uuid) -> bool {
        self.games.read().await.contains_key(game_id)
    }

    pub async fn game_ids(&self) -> Vec<Uuid> {
        self.games.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}
