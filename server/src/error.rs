//! Rule violations reported back to the acting player.

use shared::{FailureKind, Phase, PlayerId, TerritoryId};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Game {0} not found")]
    GameNotFound(Uuid),
    #[error("Territory {0} not found")]
    TerritoryNotFound(TerritoryId),
    #[error("Player {0} is not part of the turn order")]
    PlayerNotInTurnOrder(PlayerId),
    #[error("It is not {0}'s turn")]
    OutOfTurn(PlayerId),
    #[error("Action requires the {expected:?} phase but the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("Action is not allowed during the {0:?} phase")]
    PhaseNotAllowed(Phase),
    #[error("{0}")]
    InvalidOwnership(String),
    #[error("{from} is not adjacent to {to}")]
    NotAdjacent { from: TerritoryId, to: TerritoryId },
    #[error("{from} and {to} are not connected through your own territories")]
    NotConnected { from: TerritoryId, to: TerritoryId },
    #[error("{0}")]
    InvalidQuantity(String),
}

impl ActionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ActionError::GameNotFound(_)
            | ActionError::TerritoryNotFound(_)
            | ActionError::PlayerNotInTurnOrder(_) => FailureKind::NotFound,
            ActionError::OutOfTurn(_) => FailureKind::OutOfTurn,
            ActionError::WrongPhase { .. } | ActionError::PhaseNotAllowed(_) => {
                FailureKind::WrongPhase
            }
            ActionError::InvalidOwnership(_) => FailureKind::InvalidOwnership,
            ActionError::NotAdjacent { .. } | ActionError::NotConnected { .. } => {
                FailureKind::InvalidAdjacencyOrConnectivity
            }
            ActionError::InvalidQuantity(_) => FailureKind::InvalidQuantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_maps_to_its_category() {
        let cases = [
            (ActionError::GameNotFound(Uuid::nil()), FailureKind::NotFound),
            (
                ActionError::TerritoryNotFound("atlantis".into()),
                FailureKind::NotFound,
            ),
            (ActionError::OutOfTurn("p2".into()), FailureKind::OutOfTurn),
            (
                ActionError::WrongPhase {
                    expected: Phase::Attack,
                    actual: Phase::Reinforcement,
                },
                FailureKind::WrongPhase,
            ),
            (
                ActionError::InvalidOwnership("not yours".into()),
                FailureKind::InvalidOwnership,
            ),
            (
                ActionError::NotConnected {
                    from: "a".into(),
                    to: "b".into(),
                },
                FailureKind::InvalidAdjacencyOrConnectivity,
            ),
            (
                ActionError::InvalidQuantity("too many".into()),
                FailureKind::InvalidQuantity,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{}", error);
        }
    }

    #[test]
    fn test_error_messages() {
        let error = ActionError::NotAdjacent {
            from: "arg".into(),
            to: "per".into(),
        };
        assert_eq!(error.to_string(), "arg is not adjacent to per");
        assert_eq!(
            ActionError::OutOfTurn("p2".into()).to_string(),
            "It is not p2's turn"
        );
    }
}
