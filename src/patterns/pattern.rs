//! Pattern definitions
//!
//! A pattern is a named rule over the coin sequence bound to an attack or
//! defense action. Patterns are immutable once loaded.

use crate::core::error::{CombatError, Result};
use crate::core::types::{CoinFace, PatternId};
use crate::effects::status::StatusEffectKind;
use serde::{Deserialize, Serialize};

/// Shortest run a pattern may ask for
pub const MIN_RUN_LENGTH: usize = 2;

/// Longest run a pattern may ask for
pub const MAX_RUN_LENGTH: usize = 5;

/// Shape of the coin sequence a pattern requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternShape {
    /// At least `length` consecutive coins showing the required face
    Run { length: usize },
    /// Every coin shows the required face
    AllSame,
    /// Every coin differs from its predecessor
    Alternating,
}

impl PatternShape {
    pub fn label(&self) -> String {
        match self {
            PatternShape::Run { length } => format!("run of {}", length),
            PatternShape::AllSame => "all same".to_string(),
            PatternShape::Alternating => "alternating".to_string(),
        }
    }
}

/// Status effect carried by a pattern, instantiated on application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectSpec {
    pub kind: StatusEffectKind,
    pub magnitude: i32,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: PatternId,
    /// Display name
    pub name: String,
    pub shape: PatternShape,
    /// Face the shape is matched against (ignored for `Alternating`)
    pub face: CoinFace,
    pub is_attack: bool,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub status_effects: Vec<StatusEffectSpec>,
}

impl Pattern {
    /// Attack pattern with no payload
    pub fn attack(id: &str, shape: PatternShape, face: CoinFace, attack_bonus: i32) -> Self {
        Self {
            id: PatternId::new(id),
            name: id.to_string(),
            shape,
            face,
            is_attack: true,
            attack_bonus,
            defense_bonus: 0,
            status_effects: Vec::new(),
        }
    }

    /// Defense pattern with no payload
    pub fn defense(id: &str, shape: PatternShape, face: CoinFace, defense_bonus: i32) -> Self {
        Self {
            id: PatternId::new(id),
            name: id.to_string(),
            shape,
            face,
            is_attack: false,
            attack_bonus: 0,
            defense_bonus,
            status_effects: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_effect(mut self, kind: StatusEffectKind, magnitude: i32, duration: u32) -> Self {
        self.status_effects.push(StatusEffectSpec {
            kind,
            magnitude,
            duration,
        });
        self
    }

    /// Check the definition is well formed
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(CombatError::config("pattern id must not be empty"));
        }

        if let PatternShape::Run { length } = self.shape {
            if !(MIN_RUN_LENGTH..=MAX_RUN_LENGTH).contains(&length) {
                return Err(CombatError::config(format!(
                    "pattern '{}': run length {} outside {}..={}",
                    self.id, length, MIN_RUN_LENGTH, MAX_RUN_LENGTH
                )));
            }
        }

        for effect in &self.status_effects {
            if effect.duration == 0 {
                return Err(CombatError::config(format!(
                    "pattern '{}': {} effect has zero duration",
                    self.id, effect.kind
                )));
            }
        }

        Ok(())
    }
}
