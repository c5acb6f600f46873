//! Combat events for presentation and AI harnesses
//!
//! The session appends to its [`CombatEventLog`]; the host drains it once per
//! step. Nothing is pushed to subscribers, so there is no subscription order.

use crate::combat::skill::ActiveSkillKind;
use crate::core::types::{PatternId, Side, TurnNumber};
use crate::effects::status::{StatusEffectKind, StatusTick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    CombatStarted {
        player: String,
        enemy: String,
    },
    TurnChanged {
        turn: TurnNumber,
        side: Side,
    },
    CoinsFlipped {
        side: Side,
        coins: Vec<bool>,
        locked: Vec<usize>,
    },
    PlayerDecisionReady {
        matched: Vec<PatternId>,
        coins: Vec<bool>,
    },
    SkillUsed {
        kind: ActiveSkillKind,
        coins: Vec<bool>,
    },
    PatternExecuted {
        side: Side,
        pattern: PatternId,
        name: String,
    },
    DamageApplied {
        target: Side,
        amount: u32,
    },
    DefenseApplied {
        target: Side,
        amount: i32,
    },
    StatusEffectApplied {
        target: Side,
        kind: StatusEffectKind,
        magnitude: i32,
        duration: u32,
    },
    StatusTicked {
        side: Side,
        tick: StatusTick,
    },
    TurnPassed {
        side: Side,
    },
    CombatEnded {
        player_won: bool,
    },
}

impl CombatEvent {
    /// One-line description for logs and text frontends
    pub fn describe(&self) -> String {
        match self {
            CombatEvent::CombatStarted { player, enemy } => {
                format!("{} engages {}", player, enemy)
            }
            CombatEvent::TurnChanged { turn, side } => format!("turn {} ({})", turn, side),
            CombatEvent::CoinsFlipped { side, coins, locked } => {
                let mut s = format!("{} flips {}", side, render_coins(coins));
                if !locked.is_empty() {
                    s.push_str(&format!(" (locked {:?})", locked));
                }
                s
            }
            CombatEvent::PlayerDecisionReady { matched, .. } => {
                let names: Vec<&str> = matched.iter().map(PatternId::as_str).collect();
                format!("player may choose: [{}]", names.join(", "))
            }
            CombatEvent::SkillUsed { kind, coins } => {
                format!("player uses {} -> {}", kind, render_coins(coins))
            }
            CombatEvent::PatternExecuted { side, name, .. } => format!("{} uses {}", side, name),
            CombatEvent::DamageApplied { target, amount } => {
                format!("{} takes {} damage", target, amount)
            }
            CombatEvent::DefenseApplied { target, amount } => {
                format!("{} gains {} defense", target, amount)
            }
            CombatEvent::StatusEffectApplied {
                target,
                kind,
                magnitude,
                duration,
            } => format!("{} gains {} {} for {} turns", target, kind, magnitude, duration),
            CombatEvent::StatusTicked { side, tick } => format!(
                "{} status: -{} hp, +{} hp, +{} def",
                side, tick.damage, tick.healed, tick.defense
            ),
            CombatEvent::TurnPassed { side } => format!("{} passes", side),
            CombatEvent::CombatEnded { player_won } => {
                if *player_won {
                    "player wins".to_string()
                } else {
                    "player is defeated".to_string()
                }
            }
        }
    }
}

/// Coins as `H`/`T` characters
pub fn render_coins(coins: &[bool]) -> String {
    coins.iter().map(|&c| if c { 'H' } else { 'T' }).collect()
}

/// Events produced since the last drain
#[derive(Debug, Clone, Default)]
pub struct CombatEventLog {
    events: Vec<CombatEvent>,
}

impl CombatEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
