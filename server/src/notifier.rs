//! Outbound state-change notifications.
//!
//! The engine calls [`Notifier::publish`] with the full snapshot after every
//! successful mutation, while it still holds the game's lock. Delivery is the
//! notifier's problem: a failed send is logged and never touches game state.

use crate::network::GameMessage;
use log::{debug, error};
use shared::Game;
use std::sync::Mutex;
use tokio::sync::mpsc;

pub trait Notifier: Send + Sync {
    fn publish(&self, game: &Game);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, game: &Game) {
        debug!("No observers attached, dropping update for game {}", game.id);
    }
}

/// Forwards snapshots to the network sender, which fans them out to every
/// observer subscribed to the game.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    game_tx: mpsc::UnboundedSender<GameMessage>,
}

impl ChannelNotifier {
    pub fn new(game_tx: mpsc::UnboundedSender<GameMessage>) -> Self {
        Self { game_tx }
    }
}

impl Notifier for ChannelNotifier {
    fn publish(&self, game: &Game) {
        if let Err(e) = self.game_tx.send(GameMessage::Publish {
            game: Box::new(game.clone()),
        }) {
            error!("Failed to queue update for game {}: {}", game.id, e);
        }
    }
}

/// Keeps every published snapshot in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<Game>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<Game> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, game: &Game) {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(game.clone());
    }
}
