//! Command line configuration for the server binary.

use crate::board::BoardVariant;
use clap::Parser;
use shared::PhaseRules;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Turn-based conquest game server")]
pub struct ServerConfig {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Board dealt to new games
    #[arg(short, long, value_enum, default_value = "demo")]
    pub board: BoardVariant,

    /// Players seated when a game is created without a roster (2 or 4)
    #[arg(long, default_value = "2", value_parser = parse_player_count)]
    pub default_players: u8,

    /// Turn structure: `classic` (reinforce, attack, fortify) or `direct` (commit ends the turn)
    #[arg(long, default_value = "classic", value_parser = parse_phase_rules)]
    pub phase_rules: PhaseRules,

    /// Maximum number of connected observers
    #[arg(short, long, default_value = "64")]
    pub max_observers: usize,

    /// Seconds without a packet before an observer is dropped
    #[arg(long, default_value = "10")]
    pub observer_timeout_secs: u64,

    /// Seed for dice and shuffles; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip creating a game at startup
    #[arg(long)]
    pub no_default_game: bool,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn observer_timeout(&self) -> Duration {
        Duration::from_secs(self.observer_timeout_secs)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            board: self.board,
            default_players: self.default_players,
            phase_rules: self.phase_rules,
        }
    }
}

/// Settings that shape every game the engine creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub board: BoardVariant,
    pub default_players: u8,
    pub phase_rules: PhaseRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board: BoardVariant::Demo,
            default_players: 2,
            phase_rules: PhaseRules::Classic,
        }
    }
}

fn parse_player_count(value: &str) -> Result<u8, String> {
    match value.trim() {
        "2" => Ok(2),
        "4" => Ok(4),
        other => Err(format!("default roster must be 2 or 4 players, got {}", other)),
    }
}

fn parse_phase_rules(value: &str) -> Result<PhaseRules, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "direct" => Ok(PhaseRules::Direct),
        "classic" => Ok(PhaseRules::Classic),
        other => Err(format!("unknown phase rules {}, expected direct or classic", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["server"]);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.engine_config(), EngineConfig::default());
        assert_eq!(config.phase_rules, PhaseRules::Classic);
        assert_eq!(config.observer_timeout(), Duration::from_secs(10));
        assert_eq!(config.seed, None);
        assert!(!config.no_default_game);
    }

    #[test]
    fn test_full_command_line() {
        let config = ServerConfig::parse_from([
            "server",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--board",
            "classic",
            "--default-players",
            "4",
            "--phase-rules",
            "direct",
            "--seed",
            "42",
        ]);

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(
            config.engine_config(),
            EngineConfig {
                board: BoardVariant::Classic,
                default_players: 4,
                phase_rules: PhaseRules::Direct,
            }
        );
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_rejects_unsupported_roster_size() {
        assert!(ServerConfig::try_parse_from(["server", "--default-players", "3"]).is_err());
        assert!(ServerConfig::try_parse_from(["server", "--phase-rules", "chaos"]).is_err());
    }
}
