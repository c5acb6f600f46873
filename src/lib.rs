//! Coin Combat - turn-based duels decided by coin patterns
//!
//! Each turn the active side throws its coins, the matcher reports which of
//! the side's patterns the faces satisfy, and one of them is executed against
//! the opponent. The player decides through [`CombatSession`] commands; the
//! enemy decides through a [`PatternSelector`].

pub mod coins;
pub mod combat;
pub mod core;
pub mod effects;
pub mod patterns;

pub use crate::coins::{Coin, CoinSet};
pub use crate::combat::{
    ActiveSkill, ActiveSkillKind, Character, CombatEvent, CombatPhase, CombatSession,
    CombatSessionBuilder, CombatTurnState, Fighter, GreedySelector, PatternSelector,
    RandomSelector, SkillCommand, StepOutcome,
};
pub use crate::core::{CombatConfig, CombatError, ErrorKind, PatternId, Result, Role, Side};
pub use crate::patterns::{Pattern, PatternCatalog, PatternShape, PatternTable};
