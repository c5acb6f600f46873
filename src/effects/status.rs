//! Status effects: kinds, timed instances and per-character collections
//!
//! The combat core creates instances when a pattern carries a payload. How an
//! instance acts each turn is up to the character that holds it.

use crate::core::error::{CombatError, Result};
use crate::core::types::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffectKind {
    /// Damage per turn
    Bleed,
    /// Damage per turn
    Poison,
    /// Damage per turn
    Burn,
    /// Healing per turn
    Regeneration,
    /// Attack power reduced by magnitude
    Weaken,
    /// Attack power increased by magnitude
    Strengthen,
    /// Defense gained per turn
    Fortify,
}

impl StatusEffectKind {
    pub const ALL: [StatusEffectKind; 7] = [
        StatusEffectKind::Bleed,
        StatusEffectKind::Poison,
        StatusEffectKind::Burn,
        StatusEffectKind::Regeneration,
        StatusEffectKind::Weaken,
        StatusEffectKind::Strengthen,
        StatusEffectKind::Fortify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusEffectKind::Bleed => "bleed",
            StatusEffectKind::Poison => "poison",
            StatusEffectKind::Burn => "burn",
            StatusEffectKind::Regeneration => "regeneration",
            StatusEffectKind::Weaken => "weaken",
            StatusEffectKind::Strengthen => "strengthen",
            StatusEffectKind::Fortify => "fortify",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CombatError::config(format!("unknown status effect kind '{}'", s)))
    }

    /// Stacking used when the effect catalog has no entry for this kind
    pub fn default_stackable(&self) -> bool {
        self.is_damage_over_time()
    }

    pub fn is_damage_over_time(&self) -> bool {
        matches!(
            self,
            StatusEffectKind::Bleed | StatusEffectKind::Poison | StatusEffectKind::Burn
        )
    }
}

impl fmt::Display for StatusEffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed, magnitude-bearing modifier attached to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectInstance {
    pub kind: StatusEffectKind,
    pub magnitude: i32,
    pub remaining_duration: u32,
    /// Side whose pattern created the instance
    pub source: Side,
}

impl StatusEffectInstance {
    pub fn new(kind: StatusEffectKind, magnitude: i32, duration: u32, source: Side) -> Self {
        Self {
            kind,
            magnitude,
            remaining_duration: duration,
            source,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_duration == 0
    }
}

/// What a character's turn-boundary status update did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTick {
    pub damage: u32,
    pub healed: u32,
    pub defense: i32,
    pub expired: Vec<StatusEffectKind>,
}

impl StatusTick {
    pub fn is_empty(&self) -> bool {
        self.damage == 0 && self.healed == 0 && self.defense == 0 && self.expired.is_empty()
    }
}

/// Status effects held by one character, at most one instance per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    instances: Vec<StatusEffectInstance>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance, merging with an existing one of the same kind
    ///
    /// Stackable kinds sum magnitude and keep the longer duration.
    /// Non-stackable kinds refresh the duration and keep the larger magnitude.
    /// Returns false if the instance was empty and ignored.
    pub fn apply(&mut self, instance: StatusEffectInstance, stackable: bool) -> bool {
        if instance.magnitude == 0 || instance.is_expired() {
            return false;
        }

        match self.instances.iter_mut().find(|i| i.kind == instance.kind) {
            Some(existing) if stackable => {
                existing.magnitude = existing.magnitude.saturating_add(instance.magnitude);
                existing.remaining_duration =
                    existing.remaining_duration.max(instance.remaining_duration);
                existing.source = instance.source;
            }
            Some(existing) => {
                existing.remaining_duration = instance.remaining_duration;
                if instance.magnitude.unsigned_abs() > existing.magnitude.unsigned_abs() {
                    existing.magnitude = instance.magnitude;
                }
                existing.source = instance.source;
            }
            None => self.instances.push(instance),
        }
        true
    }

    /// Decrement every duration by one and drop expired instances.
    /// Returns the kinds that expired.
    pub fn tick(&mut self) -> Vec<StatusEffectKind> {
        for instance in &mut self.instances {
            instance.remaining_duration = instance.remaining_duration.saturating_sub(1);
        }
        let expired = self
            .instances
            .iter()
            .filter(|i| i.is_expired())
            .map(|i| i.kind)
            .collect();
        self.instances.retain(|i| !i.is_expired());
        expired
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffectInstance> {
        self.instances.iter().find(|i| i.kind == kind)
    }

    /// Magnitude of `kind`, or 0 when absent
    pub fn magnitude(&self, kind: StatusEffectKind) -> i32 {
        self.get(kind).map(|i| i.magnitude).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}
