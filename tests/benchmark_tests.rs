//! Performance benchmarks for the rules engine hot paths

use server::actions::{commit_reinforcements, end_turn, setup_game};
use server::board::{BoardCatalog, BoardVariant};
use server::combat::resolve_battle;
use server::connectivity::are_connected;
use server::reinforcement::reinforcements_for;
use server::rng::RandRandomness;
use server::roster::default_roster;
use shared::{Game, Packet, PhaseRules, ReinforcementPlacement};
use std::time::Instant;
use uuid::Uuid;

fn classic_game(rules: PhaseRules, seed: u64) -> Game {
    let catalog = BoardCatalog::new(BoardVariant::Classic);
    let mut game = Game::new(Uuid::new_v4(), rules);
    let mut randomness = RandRandomness::seeded(seed);
    setup_game(&mut game, &catalog, default_roster(4), &mut randomness);
    game
}

/// Benchmarks the owned-territory search on the full board
#[test]
fn benchmark_connectivity_search() {
    let game = classic_game(PhaseRules::Direct, 3);
    let player = game.turn_order[0].clone();
    let mut owned: Vec<&str> = game
        .territories
        .values()
        .filter(|t| t.is_owned_by(&player))
        .map(|t| t.id.as_str())
        .collect();
    owned.sort();

    let iterations = 10_000;
    let start = Instant::now();
    let mut reachable = 0;

    for i in 0..iterations {
        let from = owned[i % owned.len()];
        let to = owned[(i * 7 + 3) % owned.len()];
        if are_connected(&game, from, to, &player) {
            reachable += 1;
        }
    }

    let duration = start.elapsed();
    println!(
        "Connectivity: {} searches in {:?} ({:.2} μs/search, {} reachable)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64,
        reachable
    );

    assert!(duration.as_millis() < 2000);
}

/// Benchmarks dice rolling and comparison
#[test]
fn benchmark_battle_resolution() {
    let mut randomness = RandRandomness::seeded(11);
    let iterations = 100_000;
    let start = Instant::now();
    let mut losses = 0u64;

    for i in 0..iterations {
        let battle = resolve_battle(&mut randomness, 1 + (i % 3), 1 + (i % 2));
        losses += u64::from(battle.attacker_losses + battle.defender_losses);
    }

    let duration = start.elapsed();
    println!(
        "Battles: {} resolved in {:?} ({:.2} ns/battle)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Every battle compares at least one pair of dice
    assert!(losses >= u64::from(iterations));
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks the reinforcement count over the whole board
#[test]
fn benchmark_reinforcement_count() {
    let game = classic_game(PhaseRules::Direct, 5);
    let iterations = 50_000;
    let start = Instant::now();
    let mut total = 0u64;

    for i in 0..iterations {
        let player = &game.turn_order[i % game.turn_order.len()];
        total += u64::from(reinforcements_for(&game, player));
    }

    let duration = start.elapsed();
    println!(
        "Reinforcements: {} counts in {:?} ({:.2} ns/count)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(total >= 3 * iterations as u64);
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks full commit and hand-over cycles
#[test]
fn benchmark_turn_cycles() {
    let mut game = classic_game(PhaseRules::Direct, 9);
    let iterations = 5_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let player = game.current_player_id.clone().unwrap();
        let target = game
            .territories
            .values()
            .find(|t| t.is_owned_by(&player))
            .map(|t| t.id.clone())
            .unwrap();
        let placements = [ReinforcementPlacement::new(
            &target,
            game.pending_reinforcements as i32,
        )];
        commit_reinforcements(&mut game, &player, Some(&placements)).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Turn cycles: {} commits in {:?} ({:.2} μs/commit)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(game.turn, 1 + iterations);
    assert!(duration.as_millis() < 2000);
}

/// Stress test that ends many turns in a row without placing anything
#[test]
fn stress_test_end_turns() {
    let mut game = classic_game(PhaseRules::Direct, 13);
    let armies: u64 = game.territories.values().map(|t| u64::from(t.armies)).sum();
    let iterations = 20_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let player = game.current_player_id.clone().unwrap();
        end_turn(&mut game, &player).unwrap();
    }

    let duration = start.elapsed();
    println!("End turns: {} in {:?}", iterations, duration);

    assert_eq!(game.current_player_id.as_deref(), Some(game.turn_order[0].as_str()));
    assert_eq!(
        game.territories.values().map(|t| u64::from(t.armies)).sum::<u64>(),
        armies
    );
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks encoding of full board snapshots
#[test]
fn benchmark_packet_serialization() {
    let game = classic_game(PhaseRules::Classic, 17);
    let packet = Packet::GameStateUpdated { game };

    let iterations = 2_000;
    let start = Instant::now();
    let mut bytes = 0;

    for _ in 0..iterations {
        let serialized = bincode::serialize(&packet).unwrap();
        bytes = serialized.len();
        let _: Packet = bincode::deserialize(&serialized).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Snapshot round trip: {} iterations in {:?} ({} bytes each)",
        iterations, duration, bytes
    );

    assert!(bytes < shared::MAX_DATAGRAM_SIZE);
    assert!(duration.as_millis() < 3000);
}
