//! Turn lifecycle state

use crate::core::types::{Side, TurnNumber};
use serde::{Deserialize, Serialize};

/// Phase of the combat state machine
///
/// `Init → CoinPhase → Decision(side) → Execution → ResolutionCheck →
/// NextTurn → CoinPhase …` until `Ended`. Only `Init`, `Decision(Player)` and
/// `Ended` are ever observed between calls; the rest are passed through
/// synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatPhase {
    Init,
    CoinPhase,
    Decision(Side),
    Execution,
    ResolutionCheck,
    NextTurn,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTurnState {
    pub turn_number: TurnNumber,
    pub active_side: Side,
    pub phase: CombatPhase,
    pub is_active: bool,
}

impl Default for CombatTurnState {
    fn default() -> Self {
        Self {
            turn_number: 1,
            active_side: Side::Player,
            phase: CombatPhase::Init,
            is_active: false,
        }
    }
}

impl CombatTurnState {
    pub fn awaiting_player(&self) -> bool {
        self.is_active && self.phase == CombatPhase::Decision(Side::Player)
    }
}

/// Where a command left the combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Suspended in the player's decision phase
    AwaitingPlayer,
    Ended { player_won: bool },
}

impl StepOutcome {
    pub fn is_ended(&self) -> bool {
        matches!(self, StepOutcome::Ended { .. })
    }
}
