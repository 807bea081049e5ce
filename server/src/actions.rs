//! Turn rules applied to a single locked game.
//!
//! Every function validates first and mutates only after all checks pass, so a
//! rejected action leaves the game untouched. Locking and notification are the
//! engine's job.

use crate::board::BoardCatalog;
use crate::combat::{self, Battle};
use crate::connectivity::are_connected;
use crate::error::ActionError;
use crate::reinforcement::reinforcements_for;
use crate::rng::Randomness;
use log::{debug, warn};
use shared::{
    AttackRequest, FortifyRequest, Game, Phase, PhaseRules, Player, ReinforceRequest,
    ReinforcementPlacement, TerritoryId,
};

/// Result of an accepted attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub battle: Battle,
    pub conquered: bool,
    pub message: String,
}

/// Seats the players on a fresh board.
///
/// Clickable territories are dealt round-robin in random order with one army
/// each and the turn order is shuffled. Without players the game waits and
/// every territory stays neutral.
pub fn setup_game(
    game: &mut Game,
    catalog: &BoardCatalog,
    players: Vec<Player>,
    randomness: &mut dyn Randomness,
) {
    game.territories = catalog.instantiate();
    game.players = players;

    if game.players.is_empty() {
        game.turn_order.clear();
        game.current_player_id = None;
        game.phase = Phase::WaitingForPlayers;
        game.pending_reinforcements = 0;
        return;
    }

    let mut dealt: Vec<TerritoryId> = game
        .territories
        .values()
        .filter(|t| t.clickable)
        .map(|t| t.id.clone())
        .collect();
    dealt.sort();

    let player_count = game.players.len();
    for (seat, index) in randomness.permutation(dealt.len()).into_iter().enumerate() {
        let owner = game.players[seat % player_count].id.clone();
        if let Some(territory) = game.territories.get_mut(&dealt[index]) {
            territory.owner_player_id = Some(owner);
            territory.armies = 1;
        }
    }

    game.turn_order = randomness
        .permutation(player_count)
        .into_iter()
        .map(|i| game.players[i].id.clone())
        .collect();
    game.current_player_id = game.turn_order.first().cloned();
    game.phase = Phase::Reinforcement;
    game.turn = 1;
    game.pending_reinforcements = game
        .current_player_id
        .as_deref()
        .map_or(0, |id| reinforcements_for(game, id));
}

/// Places all pending reinforcements in one batch.
pub fn commit_reinforcements(
    game: &mut Game,
    player_id: &str,
    placements: Option<&[ReinforcementPlacement]>,
) -> Result<String, ActionError> {
    ensure_turn(game, player_id, Phase::Reinforcement)?;

    let placements = placements
        .ok_or_else(|| ActionError::InvalidQuantity("No placements were provided".into()))?;

    let total: i64 = placements.iter().map(|p| i64::from(p.army_count)).sum();
    if total != i64::from(game.pending_reinforcements) {
        return Err(ActionError::InvalidQuantity(format!(
            "Placements total {} but {} reinforcements are pending",
            total, game.pending_reinforcements
        )));
    }
    if let Some(negative) = placements.iter().find(|p| p.army_count < 0) {
        return Err(ActionError::InvalidQuantity(format!(
            "Cannot place {} armies on {}",
            negative.army_count, negative.territory_id
        )));
    }
    for placement in placements {
        let territory = game
            .territories
            .get(&placement.territory_id)
            .ok_or_else(|| ActionError::TerritoryNotFound(placement.territory_id.clone()))?;
        if !territory.is_owned_by(player_id) {
            return Err(ActionError::InvalidOwnership(format!(
                "{} is not yours",
                territory.name
            )));
        }
    }

    for placement in placements {
        if let Some(territory) = game.territories.get_mut(&placement.territory_id) {
            territory.armies += placement.army_count.unsigned_abs();
        }
    }
    game.pending_reinforcements = 0;

    let placed = format!("Placed {} reinforcements", total);
    Ok(finish_reinforcement(game, placed))
}

/// Places part of the pending reinforcements on one territory.
pub fn reinforce(game: &mut Game, request: &ReinforceRequest) -> Result<String, ActionError> {
    ensure_turn(game, &request.player_id, Phase::Reinforcement)?;

    let territory = game
        .territories
        .get(&request.territory_id)
        .ok_or_else(|| ActionError::TerritoryNotFound(request.territory_id.clone()))?;
    if !territory.is_owned_by(&request.player_id) {
        return Err(ActionError::InvalidOwnership(format!(
            "{} is not yours",
            territory.name
        )));
    }
    if request.army_count < 1 {
        return Err(ActionError::InvalidQuantity(
            "You must place at least 1 army".into(),
        ));
    }
    let count = request.army_count.unsigned_abs();
    if count > game.pending_reinforcements {
        return Err(ActionError::InvalidQuantity(format!(
            "Only {} reinforcements are pending",
            game.pending_reinforcements
        )));
    }

    let name = territory.name.clone();
    if let Some(territory) = game.territories.get_mut(&request.territory_id) {
        territory.armies += count;
    }
    game.pending_reinforcements -= count;

    let placed = format!("Placed {} armies on {}", count, name);
    if game.pending_reinforcements == 0 {
        Ok(finish_reinforcement(game, placed))
    } else {
        Ok(format!(
            "{}, {} left to place",
            placed, game.pending_reinforcements
        ))
    }
}

pub fn attack(
    game: &mut Game,
    request: &AttackRequest,
    randomness: &mut dyn Randomness,
) -> Result<AttackOutcome, ActionError> {
    ensure_turn(game, &request.player_id, Phase::Attack)?;

    let source = game
        .territories
        .get(&request.attacking_territory_id)
        .ok_or_else(|| ActionError::TerritoryNotFound(request.attacking_territory_id.clone()))?;
    let target = game
        .territories
        .get(&request.defending_territory_id)
        .ok_or_else(|| ActionError::TerritoryNotFound(request.defending_territory_id.clone()))?;

    if !source.is_owned_by(&request.player_id) {
        return Err(ActionError::InvalidOwnership(format!(
            "{} is not yours",
            source.name
        )));
    }
    if target.is_owned_by(&request.player_id) {
        return Err(ActionError::InvalidOwnership(
            "You cannot attack your own territory".into(),
        ));
    }
    if target.owner_player_id.is_none() {
        return Err(ActionError::InvalidOwnership(format!(
            "{} has no owner and cannot be attacked",
            target.name
        )));
    }
    if !source.is_adjacent(&target.id) {
        return Err(ActionError::NotAdjacent {
            from: source.name.clone(),
            to: target.name.clone(),
        });
    }
    if source.armies <= 1 {
        return Err(ActionError::InvalidQuantity(
            "You need more than 1 army to attack".into(),
        ));
    }
    let max_attacking = source.armies - 1;
    if request.attacking_armies < 1 || request.attacking_armies.unsigned_abs() > max_attacking {
        return Err(ActionError::InvalidQuantity(format!(
            "You can attack with 1 to {} armies",
            max_attacking
        )));
    }
    if target.armies == 0 {
        return Err(ActionError::InvalidQuantity(format!(
            "{} has no armies to defend with",
            target.name
        )));
    }

    let attacking = request.attacking_armies.unsigned_abs();
    let battle = combat::resolve_battle(randomness, attacking, target.armies);
    let source_name = source.name.clone();
    let target_name = target.name.clone();

    let source_left = match game.territories.get_mut(&request.attacking_territory_id) {
        Some(source) => {
            source.armies = source.armies.saturating_sub(battle.attacker_losses);
            source.armies
        }
        None => 0,
    };
    let target_left = match game.territories.get_mut(&request.defending_territory_id) {
        Some(target) => {
            target.armies = target.armies.saturating_sub(battle.defender_losses);
            target.armies
        }
        None => 0,
    };

    let conquered = target_left == 0;
    let message = if conquered {
        let moved = combat::occupying_armies(attacking, battle.attacker_losses, source_left);
        if moved == 0 {
            warn!(
                "{} was taken but {} has no army to spare, leaving it empty",
                target_name, source_name
            );
        }
        debug_assert!(moved > 0, "conquest without surviving attackers");

        if let Some(source) = game.territories.get_mut(&request.attacking_territory_id) {
            source.armies -= moved;
        }
        if let Some(target) = game.territories.get_mut(&request.defending_territory_id) {
            target.owner_player_id = Some(request.player_id.clone());
            target.armies = moved;
        }
        format!(
            "{} conquered {} and moved in {} armies",
            game.player_name(&request.player_id),
            target_name,
            moved
        )
    } else {
        format!(
            "{} attacked {}: attacker lost {}, defender lost {}",
            source_name, target_name, battle.attacker_losses, battle.defender_losses
        )
    };

    Ok(AttackOutcome {
        battle,
        conquered,
        message,
    })
}

pub fn fortify(game: &mut Game, request: &FortifyRequest) -> Result<String, ActionError> {
    ensure_turn(game, &request.player_id, Phase::Fortification)?;

    let source = game
        .territories
        .get(&request.from_territory_id)
        .ok_or_else(|| ActionError::TerritoryNotFound(request.from_territory_id.clone()))?;
    let target = game
        .territories
        .get(&request.to_territory_id)
        .ok_or_else(|| ActionError::TerritoryNotFound(request.to_territory_id.clone()))?;

    if !source.is_owned_by(&request.player_id) || !target.is_owned_by(&request.player_id) {
        return Err(ActionError::InvalidOwnership(
            "You can only move armies between your own territories".into(),
        ));
    }
    if !are_connected(
        game,
        &request.from_territory_id,
        &request.to_territory_id,
        &request.player_id,
    ) {
        return Err(ActionError::NotConnected {
            from: source.name.clone(),
            to: target.name.clone(),
        });
    }
    if request.army_count < 1 || request.army_count.unsigned_abs() >= source.armies {
        return Err(ActionError::InvalidQuantity(format!(
            "You can move 1 to {} armies out of {}",
            source.armies.saturating_sub(1),
            source.name
        )));
    }

    let count = request.army_count.unsigned_abs();
    let message = format!("Moved {} armies from {} to {}", count, source.name, target.name);
    if let Some(source) = game.territories.get_mut(&request.from_territory_id) {
        source.armies -= count;
    }
    if let Some(target) = game.territories.get_mut(&request.to_territory_id) {
        target.armies += count;
    }

    match game.rules {
        PhaseRules::Direct => Ok(message),
        PhaseRules::Classic => Ok(format!("{}. {}", message, pass_turn(game))),
    }
}

/// Moves the current player from attacking to fortifying.
pub fn advance_phase(game: &mut Game, player_id: &str) -> Result<String, ActionError> {
    if !game.is_current_player(player_id) {
        return Err(ActionError::OutOfTurn(player_id.to_string()));
    }
    match game.phase {
        Phase::Attack => {
            game.phase = Phase::Fortification;
            Ok("Attack phase over, fortify your positions".to_string())
        }
        other => Err(ActionError::PhaseNotAllowed(other)),
    }
}

pub fn end_turn(game: &mut Game, player_id: &str) -> Result<String, ActionError> {
    if !game.is_current_player(player_id) {
        return Err(ActionError::OutOfTurn(player_id.to_string()));
    }
    if !game.turn_order.iter().any(|id| id == player_id) {
        return Err(ActionError::PlayerNotInTurnOrder(player_id.to_string()));
    }
    if game.rules == PhaseRules::Classic
        && !matches!(game.phase, Phase::Attack | Phase::Fortification)
    {
        return Err(ActionError::PhaseNotAllowed(game.phase));
    }

    Ok(pass_turn(game))
}

fn ensure_turn(game: &Game, player_id: &str, expected: Phase) -> Result<(), ActionError> {
    if !game.is_current_player(player_id) {
        return Err(ActionError::OutOfTurn(player_id.to_string()));
    }
    if game.phase != expected {
        return Err(ActionError::WrongPhase {
            expected,
            actual: game.phase,
        });
    }
    Ok(())
}

fn finish_reinforcement(game: &mut Game, placed: String) -> String {
    match game.rules {
        PhaseRules::Direct => format!("{}. {}", placed, pass_turn(game)),
        PhaseRules::Classic => {
            game.phase = Phase::Attack;
            format!("{}. Attack phase begins", placed)
        }
    }
}

/// Hands the turn to the next player in turn order.
// TODO: check for a winner here once victory conditions are defined.
fn pass_turn(game: &mut Game) -> String {
    let Some(current) = game.current_player_id.clone() else {
        return "No player is taking a turn".to_string();
    };
    let Some(position) = game.turn_order.iter().position(|id| *id == current) else {
        return "No player is taking a turn".to_string();
    };

    let next = game.turn_order[(position + 1) % game.turn_order.len()].clone();
    game.pending_reinforcements = reinforcements_for(game, &next);
    game.phase = Phase::Reinforcement;
    game.turn += 1;
    game.current_player_id = Some(next.clone());

    debug!(
        "Game {} turn {}: {} receives {} reinforcements",
        game.id, game.turn, next, game.pending_reinforcements
    );
    format!("It is now {}'s turn", game.player_name(&next))
}
