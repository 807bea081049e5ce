//! Plain-text views of a game for the terminal.

use shared::{Game, Phase, Reply, Territory};
use std::fmt::Write;

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::WaitingForPlayers => "waiting for players",
        Phase::Reinforcement => "reinforcement",
        Phase::Attack => "attack",
        Phase::Fortification => "fortification",
        Phase::GameOver => "game over",
    }
}

/// Header with turn, phase and one line per player.
pub fn render_summary(game: &Game, acting_as: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "game {}", game.id);

    match game.current_player_id.as_deref() {
        Some(current) => {
            let _ = writeln!(
                out,
                "turn {} | {} | {} to play, {} reinforcements pending",
                game.turn,
                phase_label(game.phase),
                game.player_name(current),
                game.pending_reinforcements
            );
        }
        None => {
            let _ = writeln!(out, "{}", phase_label(game.phase));
        }
    }

    for player_id in &game.turn_order {
        let Some(player) = game.player(player_id) else {
            continue;
        };
        let marker = if game.is_current_player(player_id) {
            '>'
        } else {
            ' '
        };
        let you = if acting_as == Some(player_id.as_str()) {
            " (you)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{} {:<12} {:<8} {:>2} territories {:>4} armies{}",
            marker,
            player.name,
            player.color,
            game.territories_owned_by(player_id),
            game.armies_of(player_id),
            you
        );
    }

    out.trim_end().to_string()
}

/// Every playable territory sorted by id.
pub fn render_territories(game: &Game) -> String {
    let mut territories: Vec<&Territory> =
        game.territories.values().filter(|t| t.clickable).collect();
    territories.sort_by(|a, b| a.id.cmp(&b.id));

    let mut out = String::new();
    for territory in territories {
        let owner = territory
            .owner_player_id
            .as_deref()
            .map_or("-", |id| game.player_name(id));
        let _ = writeln!(
            out,
            "{:<24} {:<12} {:>3}  borders {}",
            format!("{} ({})", territory.name, territory.id),
            owner,
            territory.armies,
            territory.adjacent_territory_ids.join(", ")
        );
    }
    out.trim_end().to_string()
}

/// Attacks `player_id` could launch right now, ignoring phase.
pub fn attack_options(game: &Game, player_id: &str) -> Vec<(String, String, u32)> {
    let mut options = Vec::new();
    for source in game.territories.values() {
        if !source.is_owned_by(player_id) || source.armies <= 1 {
            continue;
        }
        for neighbour in &source.adjacent_territory_ids {
            let Some(target) = game.territories.get(neighbour) else {
                continue;
            };
            if target.owner_player_id.is_some() && !target.is_owned_by(player_id) {
                options.push((source.id.clone(), target.id.clone(), source.armies - 1));
            }
        }
    }
    options.sort();
    options
}

pub fn render_targets(game: &Game, player_id: &str) -> String {
    let options = attack_options(game, player_id);
    if options.is_empty() {
        return format!("{} has no possible attacks", game.player_name(player_id));
    }

    options
        .iter()
        .map(|(from, to, max)| format!("attack {} {} <1..{}>", from, to, max))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Game(game) => format!("game {} ({})", game.id, phase_label(game.phase)),
        Reply::NotFound { game_id } => format!("game {} not found", game_id),
        Reply::Action(action) if action.success => action.message.clone(),
        Reply::Action(action) => format!("rejected: {}", action.message),
        Reply::Attack(result) if result.success => result.to_string(),
        Reply::Attack(result) => format!("rejected: {}", result.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ActionReply, FailureKind, PhaseRules, Player};
    use uuid::Uuid;

    fn game() -> Game {
        let mut game = Game::new(Uuid::new_v4(), PhaseRules::Direct);
        game.players = vec![
            Player::new("p1", "Alice", "blue"),
            Player::new("p2", "Bob", "red"),
        ];
        game.turn_order = vec!["p1".into(), "p2".into()];
        game.current_player_id = Some("p1".into());
        game.phase = Phase::Attack;
        game.turn = 3;

        let layout = [
            ("arg", "Argentina", &["bra", "chi"][..], "p1", 4),
            ("bra", "Brasil", &["arg", "per"][..], "p2", 2),
            ("chi", "Chile", &["arg", "per"][..], "p1", 1),
            ("per", "Peru", &["bra", "chi"][..], "p2", 3),
        ];
        for (id, name, adjacent, owner, armies) in layout {
            let mut territory = Territory::new(id, name, adjacent);
            territory.owner_player_id = Some(owner.into());
            territory.armies = armies;
            game.territories.insert(id.into(), territory);
        }
        game
    }

    #[test]
    fn test_summary_marks_current_player() {
        let text = render_summary(&game(), Some("p2"));
        assert!(text.contains("turn 3 | attack | Alice to play"));
        assert!(text.lines().any(|l| l.starts_with("> Alice")));
        assert!(text.lines().any(|l| l.contains("Bob") && l.ends_with("(you)")));
    }

    #[test]
    fn test_waiting_game_summary() {
        let game = Game::new(Uuid::new_v4(), PhaseRules::Direct);
        assert!(render_summary(&game, None).ends_with("waiting for players"));
    }

    #[test]
    fn test_territory_listing_is_sorted() {
        let text = render_territories(&game());
        let first: Vec<&str> = text.lines().map(|l| l.split(' ').next().unwrap()).collect();
        assert_eq!(first, vec!["Argentina", "Brasil", "Chile", "Peru"]);
        assert!(text.lines().next().unwrap().contains("Alice"));
    }

    #[test]
    fn test_attack_options() {
        let game = game();
        assert_eq!(
            attack_options(&game, "p1"),
            vec![("arg".to_string(), "bra".to_string(), 3)]
        );
        assert_eq!(
            attack_options(&game, "p2"),
            vec![
                ("bra".to_string(), "arg".to_string(), 1),
                ("per".to_string(), "chi".to_string(), 2),
            ]
        );
        assert_eq!(render_targets(&game, "p1"), "attack arg bra <1..3>");
    }

    #[test]
    fn test_reply_rendering() {
        let rejected = Reply::Action(ActionReply::failed(
            FailureKind::OutOfTurn,
            "It is not p2's turn",
            None,
        ));
        assert_eq!(render_reply(&rejected), "rejected: It is not p2's turn");

        let game_id = Uuid::nil();
        assert_eq!(
            render_reply(&Reply::NotFound { game_id }),
            format!("game {} not found", game_id)
        );
    }
}
