mod model;
mod packet;

pub use model::{
    ActionReply, AttackRequest, AttackResult, FailureKind, FortifyRequest, Game, NewPlayer, Phase,
    PhaseRules, Player, PlayerId, ReinforceRequest, ReinforcementPlacement, Territory,
    TerritoryId,
};
pub use packet::{Command, Packet, Reply};

pub const PROTOCOL_VERSION: u32 = 1;

/// Largest payload that fits in a single UDP datagram.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn two_player_game() -> Game {
        let mut game = Game::new(Uuid::new_v4(), PhaseRules::Direct);
        game.players = vec![
            Player::new("p1", "Alice", "red"),
            Player::new("p2", "Bob", "blue"),
        ];
        let mut territories = HashMap::new();
        for (id, owner, armies) in [("arg", "p1", 3), ("bra", "p2", 1), ("chi", "p1", 2)] {
            let mut territory = Territory::new(id, id, &[]);
            territory.owner_player_id = Some(owner.to_string());
            territory.armies = armies;
            territories.insert(id.to_string(), territory);
        }
        game.territories = territories;
        game.turn_order = vec!["p1".to_string(), "p2".to_string()];
        game.current_player_id = Some("p1".to_string());
        game.phase = Phase::Reinforcement;
        game
    }

    #[test]
    fn test_new_game_is_waiting() {
        let game = Game::new(Uuid::new_v4(), PhaseRules::Classic);
        assert_eq!(game.phase, Phase::WaitingForPlayers);
        assert!(game.current_player_id.is_none());
        assert_eq!(game.pending_reinforcements, 0);
        assert_eq!(game.rules, PhaseRules::Classic);
    }

    #[test]
    fn test_territory_ownership_queries() {
        let game = two_player_game();
        assert_eq!(game.territories_owned_by("p1"), 2);
        assert_eq!(game.territories_owned_by("p2"), 1);
        assert_eq!(game.territories_owned_by("nobody"), 0);
        assert_eq!(game.armies_of("p1"), 5);
        assert!(game.territories["arg"].is_owned_by("p1"));
        assert!(!game.territories["bra"].is_owned_by("p1"));
    }

    #[test]
    fn test_current_player_and_names() {
        let game = two_player_game();
        assert!(game.is_current_player("p1"));
        assert!(!game.is_current_player("p2"));
        assert_eq!(game.player_name("p2"), "Bob");
        assert_eq!(game.player_name("ghost"), "ghost");
    }

    #[test]
    fn test_adjacency_lookup() {
        let territory = Territory::new("arg", "Argentina", &["bra", "chi"]);
        assert!(territory.is_adjacent("bra"));
        assert!(!territory.is_adjacent("per"));
        assert!(territory.clickable);
        assert!(territory.owner_player_id.is_none());
    }

    #[test]
    fn test_reply_accessors() {
        let game = two_player_game();
        let reply = Reply::Action(ActionReply::failed(
            FailureKind::OutOfTurn,
            "not your turn",
            Some(game.clone()),
        ));
        assert!(!reply.is_success());
        assert_eq!(reply.game(), Some(&game));
        assert_eq!(reply.message(), "not your turn");

        let missing = Reply::NotFound { game_id: game.id };
        assert!(missing.game().is_none());
    }

    #[test]
    fn test_attack_result_display() {
        let result = AttackResult {
            success: true,
            message: "Brasil conquered".to_string(),
            attacker_dice_rolls: vec![6, 5],
            defender_dice_rolls: vec![3],
            attacker_losses: 0,
            defender_losses: 1,
            territory_conquered: true,
            ..AttackResult::default()
        };
        let text = result.to_string();
        assert!(text.contains("attacker rolled: 6, 5"));
        assert!(text.contains("defender rolled: 3"));
        assert!(text.contains("(conquered)"));
    }

    #[test]
    fn test_packet_serialization_game_state() {
        let game = two_player_game();
        let packet = Packet::GameStateUpdated { game: game.clone() };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::GameStateUpdated { game: received } => assert_eq!(received, game),
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_packet_serialization_request() {
        let game_id = Uuid::new_v4();
        let packet = Packet::Request {
            request_id: 7,
            command: Command::CommitReinforcements {
                game_id,
                player_id: "p1".to_string(),
                placements: Some(vec![ReinforcementPlacement::new("arg", 3)]),
            },
        };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::Request {
                request_id,
                command:
                    Command::CommitReinforcements {
                        game_id: id,
                        player_id,
                        placements,
                    },
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(id, game_id);
                assert_eq!(player_id, "p1");
                assert_eq!(placements.unwrap()[0].army_count, 3);
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }
}
