//! # Conquest Game Server Library
//!
//! Authoritative rules engine for a turn-based territory conquest game. The
//! server keeps every active game in memory, validates each player action
//! against the turn rules and pushes the resulting snapshot to every observer
//! subscribed to that game.
//!
//! ## Rules Core
//!
//! The rules are plain functions over a [`shared::Game`]:
//! - [`board`] holds the static territory catalogs new games are dealt from
//! - [`combat`] rolls and compares dice for a single attack
//! - [`connectivity`] decides whether two territories are linked through one
//!   player's holdings
//! - [`reinforcement`] computes the armies a player receives at turn start
//! - [`actions`] validates and applies reinforce, commit, attack, fortify,
//!   advance-phase and end-turn
//!
//! ## Sessions
//!
//! [`engine::ActionEngine`] owns the [`store::GameStore`], a concurrent map
//! from game id to a lock-protected game. An action holds its game's lock
//! from validation through notification, so two actions on the same game
//! never interleave while different games proceed independently.
//!
//! Randomness ([`rng::Randomness`]) and notification ([`notifier::Notifier`])
//! are injected, which keeps every rule deterministic under test.
//!
//! ## Network
//!
//! [`network::Server`] speaks bincode-encoded [`shared::Packet`]s over UDP.
//! Observers connect, send [`shared::Command`] requests and subscribe to game
//! ids; [`observers::ObserverManager`] tracks them and drops any that go quiet.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use server::config::ServerConfig;
//! use server::network::Server;
//! use server::rng::RandRandomness;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = ServerConfig::parse_from(["server", "--port", "8080"]);
//!     let mut server = Server::new(&config, Box::new(RandRandomness::from_entropy())).await?;
//!
//!     let game = server.engine().create_game(None).await;
//!     println!("Game {} is ready", game.id);
//!
//!     server.run().await
//! }
//! ```

pub mod actions;
pub mod board;
pub mod combat;
pub mod config;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod network;
pub mod notifier;
pub mod observers;
pub mod reinforcement;
pub mod rng;
pub mod roster;
pub mod store;
