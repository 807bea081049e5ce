//! # Conquest Terminal Client
//!
//! A line-oriented client for the conquest game server. It connects over UDP,
//! turns typed commands into server requests and prints each game snapshot it
//! is subscribed to.
//!
//! ## Modules
//!
//! - [`input`] parses console lines into commands
//! - [`game`] keeps the session state: watched game, acting player and
//!   outstanding request ids
//! - [`rendering`] formats games, territory lists and replies as text
//! - [`network`] runs the socket, stdin and heartbeat loop
//!
//! Several people can share one terminal: without `--player` every action is
//! sent on behalf of whoever's turn it is.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
