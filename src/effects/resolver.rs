//! Pattern effect resolution
//!
//! Attacks damage the target and land their payload on the target. Defenses
//! add defense to the source and land their payload on the source.

use crate::combat::character::Character;
use crate::combat::events::{CombatEvent, CombatEventLog};
use crate::core::error::{CombatError, Result};
use crate::core::types::{PatternId, Side};
use crate::effects::status::StatusEffectInstance;
use crate::patterns::catalog::EffectCatalog;
use crate::patterns::pattern::Pattern;

/// A character taking part in a resolution, tagged with its side
pub struct Participant<'c> {
    pub side: Side,
    pub character: &'c mut dyn Character,
}

impl<'c> Participant<'c> {
    pub fn new(side: Side, character: &'c mut dyn Character) -> Self {
        Self { side, character }
    }
}

/// What an application changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub pattern: PatternId,
    /// Health actually removed from the target
    pub damage: u32,
    /// Defense added to the source
    pub defense: i32,
    /// Side that received the payload
    pub recipient: Side,
    pub applied: Vec<StatusEffectInstance>,
}

pub struct EffectResolver<'a> {
    effects: &'a dyn EffectCatalog,
}

impl<'a> EffectResolver<'a> {
    pub fn new(effects: &'a dyn EffectCatalog) -> Self {
        Self { effects }
    }

    /// Apply `pattern` from `source` to `target`
    ///
    /// Fails with `InvalidApplication` and mutates nothing when any input is
    /// missing or both participants are the same side.
    pub fn apply<'b>(
        &self,
        pattern: Option<&Pattern>,
        source: Option<Participant<'b>>,
        target: Option<Participant<'b>>,
        events: &mut CombatEventLog,
    ) -> Result<Resolution> {
        let pattern = pattern
            .ok_or_else(|| CombatError::InvalidApplication("missing pattern".to_string()))?;
        let source = source
            .ok_or_else(|| CombatError::InvalidApplication("missing source".to_string()))?;
        let target = target
            .ok_or_else(|| CombatError::InvalidApplication("missing target".to_string()))?;

        if source.side == target.side {
            return Err(CombatError::InvalidApplication(format!(
                "source and target are both {}",
                source.side
            )));
        }

        Ok(self.resolve(pattern, source.side, source.character, target.character, events))
    }

    /// Apply `pattern` from the `source_side` character to its opponent
    ///
    /// The target is always `source_side.opponent()`, so this cannot fail.
    pub fn resolve<'b>(
        &self,
        pattern: &Pattern,
        source_side: Side,
        source: &'b mut dyn Character,
        target: &'b mut dyn Character,
        events: &mut CombatEventLog,
    ) -> Resolution {
        let target_side = source_side.opponent();
        let mut resolution = Resolution {
            pattern: pattern.id.clone(),
            damage: 0,
            defense: 0,
            recipient: if pattern.is_attack {
                target_side
            } else {
                source_side
            },
            applied: Vec::new(),
        };

        if pattern.is_attack {
            let raw = source.attack_power() as i64 + pattern.attack_bonus as i64;
            let amount = raw.clamp(0, u32::MAX as i64) as u32;
            resolution.damage = target.take_damage(amount);
            tracing::debug!(
                pattern = %pattern.id,
                target = %target_side,
                amount = resolution.damage,
                remaining = target.current_health(),
                "Damage applied"
            );
            events.push(CombatEvent::DamageApplied {
                target: target_side,
                amount: resolution.damage,
            });
        } else {
            source.add_defense(pattern.defense_bonus);
            resolution.defense = pattern.defense_bonus;
            tracing::debug!(
                pattern = %pattern.id,
                target = %source_side,
                amount = pattern.defense_bonus,
                "Defense applied"
            );
            events.push(CombatEvent::DefenseApplied {
                target: source_side,
                amount: pattern.defense_bonus,
            });
        }

        let recipient = if pattern.is_attack { target } else { source };

        for spec in &pattern.status_effects {
            let instance =
                StatusEffectInstance::new(spec.kind, spec.magnitude, spec.duration, source_side);
            let stackable = self.effects.is_stackable(spec.kind);
            if recipient.add_status_effect(instance, stackable) {
                events.push(CombatEvent::StatusEffectApplied {
                    target: resolution.recipient,
                    kind: spec.kind,
                    magnitude: spec.magnitude,
                    duration: spec.duration,
                });
                resolution.applied.push(instance);
            }
        }

        resolution
    }
}
