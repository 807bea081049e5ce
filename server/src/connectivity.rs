use shared::Game;
use std::collections::{HashSet, VecDeque};

/// Breadth-first search from `from` to `to` that only steps through
/// territories owned by `player_id`.
pub fn are_connected(game: &Game, from: &str, to: &str, player_id: &str) -> bool {
    if from == to {
        return true;
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let Some(territory) = game.territories.get(current) else {
            continue;
        };
        if !territory.is_owned_by(player_id) {
            continue;
        }

        for neighbour in &territory.adjacent_territory_ids {
            let owned = game
                .territories
                .get(neighbour)
                .is_some_and(|t| t.is_owned_by(player_id));
            if !owned {
                continue;
            }
            if neighbour == to {
                return true;
            }
            if visited.insert(neighbour.as_str()) {
                queue.push_back(neighbour.as_str());
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{PhaseRules, Territory};
    use uuid::Uuid;

    /// a - b - c - d in a line, each owned as given.
    fn line(owners: [&str; 4]) -> Game {
        let mut game = Game::new(Uuid::new_v4(), PhaseRules::Direct);
        let ids = ["a", "b", "c", "d"];
        for (i, id) in ids.iter().enumerate() {
            let mut adjacent = Vec::new();
            if i > 0 {
                adjacent.push(ids[i - 1]);
            }
            if i + 1 < ids.len() {
                adjacent.push(ids[i + 1]);
            }
            let mut territory = Territory::new(id, id, &adjacent);
            territory.owner_player_id = Some(owners[i].to_string());
            territory.armies = 1;
            game.territories.insert(id.to_string(), territory);
        }
        game
    }

    #[test]
    fn test_same_territory_is_connected() {
        let game = line(["p1", "p2", "p1", "p1"]);
        assert!(are_connected(&game, "b", "b", "p1"));
    }

    #[test]
    fn test_direct_neighbours() {
        let game = line(["p1", "p1", "p2", "p2"]);
        assert!(are_connected(&game, "a", "b", "p1"));
        assert!(are_connected(&game, "c", "d", "p2"));
    }

    #[test]
    fn test_path_through_own_intermediary() {
        let game = line(["p1", "p1", "p1", "p2"]);
        assert!(are_connected(&game, "a", "c", "p1"));
        assert!(are_connected(&game, "c", "a", "p1"));
    }

    #[test]
    fn test_enemy_territory_blocks_path() {
        let game = line(["p1", "p2", "p1", "p1"]);
        assert!(!are_connected(&game, "a", "c", "p1"));
        assert!(!are_connected(&game, "a", "d", "p1"));
    }

    #[test]
    fn test_unowned_territory_blocks_path() {
        let mut game = line(["p1", "p1", "p1", "p1"]);
        game.territories.get_mut("b").unwrap().owner_player_id = None;
        assert!(!are_connected(&game, "a", "c", "p1"));
    }

    #[test]
    fn test_unknown_territories_are_not_connected() {
        let game = line(["p1", "p1", "p1", "p1"]);
        assert!(!are_connected(&game, "a", "zzz", "p1"));
        assert!(!are_connected(&game, "zzz", "a", "p1"));
    }

    #[test]
    fn test_source_owned_by_someone_else() {
        let game = line(["p2", "p1", "p1", "p1"]);
        assert!(!are_connected(&game, "a", "c", "p1"));
    }
}
