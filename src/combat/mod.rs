//! Turn-based duel: characters, skills, enemy AI and the session state machine

pub mod ai;
pub mod character;
pub mod events;
pub mod fighter;
pub mod phase;
pub mod session;
pub mod skill;

pub use ai::{GreedySelector, GreedyWeights, PatternSelector, RandomSelector};
pub use character::Character;
pub use events::{render_coins, CombatEvent, CombatEventLog};
pub use fighter::Fighter;
pub use phase::{CombatPhase, CombatTurnState, StepOutcome};
pub use session::{CombatSession, CombatSessionBuilder};
pub use skill::{ActiveSkill, ActiveSkillKind, SkillCommand};
