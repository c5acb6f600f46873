//! Active skills
//!
//! A skill is a once-per-turn player action that mutates the coin set
//! directly. The character owns the skill and its cooldown; the session turns
//! a [`SkillCommand`] into coin set calls.

use crate::coins::CoinSet;
use crate::core::error::Result;
use crate::core::types::Side;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveSkillKind {
    /// Throw every unlocked coin again
    RethrowAll,
    /// Invert one coin
    FlipOne,
    /// Protect one coin until the user's next turn-start flip
    LockOne,
    /// Exchange two coins
    SwapTwo,
}

impl fmt::Display for ActiveSkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActiveSkillKind::RethrowAll => "rethrow_all",
            ActiveSkillKind::FlipOne => "flip_one",
            ActiveSkillKind::LockOne => "lock_one",
            ActiveSkillKind::SwapTwo => "swap_two",
        };
        f.write_str(s)
    }
}

/// A character's equipped skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSkill {
    pub kind: ActiveSkillKind,
    /// Turn boundaries to wait after use before the skill is ready again
    pub cooldown: u32,
}

impl ActiveSkill {
    pub fn new(kind: ActiveSkillKind, cooldown: u32) -> Self {
        Self { kind, cooldown }
    }
}

/// A player's request to use their skill, with its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCommand {
    RethrowAll,
    FlipOne { index: usize },
    LockOne { index: usize },
    SwapTwo { first: usize, second: usize },
}

impl SkillCommand {
    pub fn kind(&self) -> ActiveSkillKind {
        match self {
            SkillCommand::RethrowAll => ActiveSkillKind::RethrowAll,
            SkillCommand::FlipOne { .. } => ActiveSkillKind::FlipOne,
            SkillCommand::LockOne { .. } => ActiveSkillKind::LockOne,
            SkillCommand::SwapTwo { .. } => ActiveSkillKind::SwapTwo,
        }
    }

    /// Perform the coin mutation on behalf of `user`. On error the coin set is unchanged.
    pub fn apply<R: Rng + ?Sized>(&self, user: Side, coins: &mut CoinSet, rng: &mut R) -> Result<()> {
        match *self {
            SkillCommand::RethrowAll => {
                coins.flip_all(rng);
            }
            SkillCommand::FlipOne { index } => {
                coins.flip_one(index)?;
            }
            SkillCommand::LockOne { index } => coins.lock(index, user)?,
            SkillCommand::SwapTwo { first, second } => coins.swap(first, second)?,
        }
        Ok(())
    }
}
