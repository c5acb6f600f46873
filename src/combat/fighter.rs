//! Bundled character implementation
//!
//! Health, attack, defense, status effects and an optional active skill.

use crate::combat::character::Character;
use crate::combat::skill::{ActiveSkill, ActiveSkillKind};
use crate::core::error::{CombatError, Result};
use crate::core::types::Role;
use crate::effects::status::{StatusEffectInstance, StatusEffectKind, StatusEffects, StatusTick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub name: String,
    pub role: Role,
    max_health: u32,
    health: u32,
    base_attack: u32,
    defense: i32,
    statuses: StatusEffects,
    skill: Option<ActiveSkill>,
    cooldown_remaining: u32,
}

impl Fighter {
    pub fn new(name: impl Into<String>, role: impl Into<String>, max_health: u32, attack: u32) -> Self {
        Self {
            name: name.into(),
            role: Role::new(role),
            max_health,
            health: max_health,
            base_attack: attack,
            defense: 0,
            statuses: StatusEffects::new(),
            skill: None,
            cooldown_remaining: 0,
        }
    }

    pub fn with_skill(mut self, kind: ActiveSkillKind, cooldown: u32) -> Self {
        self.skill = Some(ActiveSkill::new(kind, cooldown));
        self
    }

    /// Start below max health
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    pub fn base_attack(&self) -> u32 {
        self.base_attack
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Restore health, capped at max. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }
}

impl Character for Fighter {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_health(&self) -> u32 {
        self.health
    }

    fn max_health(&self) -> u32 {
        self.max_health
    }

    fn attack_power(&self) -> u32 {
        let modifier = self.statuses.magnitude(StatusEffectKind::Strengthen) as i64
            - self.statuses.magnitude(StatusEffectKind::Weaken) as i64;
        let total = self.base_attack as i64 + modifier;
        total.clamp(0, u32::MAX as i64) as u32
    }

    fn defense(&self) -> i32 {
        self.defense
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    fn add_defense(&mut self, amount: i32) {
        self.defense = self.defense.saturating_add(amount);
    }

    fn add_status_effect(&mut self, instance: StatusEffectInstance, stackable: bool) -> bool {
        self.statuses.apply(instance, stackable)
    }

    fn update_status_effects(&mut self) -> StatusTick {
        let mut tick = StatusTick::default();
        let active: Vec<StatusEffectInstance> = self.statuses.iter().copied().collect();

        for instance in active {
            let magnitude = instance.magnitude.max(0) as u32;
            match instance.kind {
                StatusEffectKind::Bleed | StatusEffectKind::Poison | StatusEffectKind::Burn => {
                    tick.damage += self.take_damage(magnitude);
                }
                StatusEffectKind::Regeneration => {
                    // The dead stay dead
                    if self.health > 0 {
                        tick.healed += self.heal(magnitude);
                    }
                }
                StatusEffectKind::Fortify => {
                    self.add_defense(instance.magnitude);
                    tick.defense = tick.defense.saturating_add(instance.magnitude);
                }
                // Passive, read by attack_power
                StatusEffectKind::Weaken | StatusEffectKind::Strengthen => {}
            }
        }

        tick.expired = self.statuses.tick();
        tick
    }

    fn update_skill_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    fn active_skill(&self) -> Option<ActiveSkill> {
        self.skill
    }

    fn is_active_skill_available(&self) -> bool {
        self.skill.is_some() && self.cooldown_remaining == 0
    }

    fn use_active_skill(&mut self) -> Result<ActiveSkill> {
        let skill = self
            .skill
            .ok_or_else(|| CombatError::illegal(format!("{} has no active skill", self.name)))?;

        if self.cooldown_remaining > 0 {
            return Err(CombatError::illegal(format!(
                "{} is on cooldown ({} turns left)",
                skill.kind, self.cooldown_remaining
            )));
        }

        self.cooldown_remaining = skill.cooldown;
        Ok(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Side;

    fn knight() -> Fighter {
        Fighter::new("Aldric", "knight", 30, 10)
    }

    fn status(kind: StatusEffectKind, magnitude: i32, duration: u32) -> StatusEffectInstance {
        StatusEffectInstance::new(kind, magnitude, duration, Side::Enemy)
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut f = knight().with_health(5);
        assert_eq!(f.take_damage(12), 5);
        assert_eq!(f.current_health(), 0);
        assert!(f.is_defeated());
    }

    #[test]
    fn test_attack_modifiers() {
        let mut f = knight();
        f.add_status_effect(status(StatusEffectKind::Weaken, 3, 2), false);
        assert_eq!(f.attack_power(), 7);

        f.add_status_effect(status(StatusEffectKind::Strengthen, 5, 2), true);
        assert_eq!(f.attack_power(), 12);

        f.add_status_effect(status(StatusEffectKind::Weaken, 40, 2), false);
        assert_eq!(f.attack_power(), 0);
    }

    #[test]
    fn test_status_update_applies_and_expires() {
        let mut f = knight().with_health(20);
        f.add_status_effect(status(StatusEffectKind::Poison, 2, 1), true);
        f.add_status_effect(status(StatusEffectKind::Regeneration, 3, 2), false);
        f.add_status_effect(status(StatusEffectKind::Fortify, 1, 2), false);

        let tick = f.update_status_effects();
        assert_eq!(tick.damage, 2);
        assert_eq!(tick.healed, 3);
        assert_eq!(tick.defense, 1);
        assert_eq!(tick.expired, vec![StatusEffectKind::Poison]);
        assert_eq!(f.current_health(), 21);
        assert_eq!(f.defense(), 1);
    }

    #[test]
    fn test_regeneration_does_not_revive() {
        let mut f = knight().with_health(1);
        f.add_status_effect(status(StatusEffectKind::Bleed, 5, 2), true);
        f.add_status_effect(status(StatusEffectKind::Regeneration, 5, 2), false);
        f.update_status_effects();
        assert_eq!(f.current_health(), 0);
    }

    #[test]
    fn test_skill_cooldown_cycle() {
        let mut f = knight().with_skill(ActiveSkillKind::FlipOne, 2);
        assert!(f.is_active_skill_available());

        let used = f.use_active_skill().unwrap();
        assert_eq!(used.kind, ActiveSkillKind::FlipOne);
        assert!(!f.is_active_skill_available());
        assert!(f.use_active_skill().is_err());

        f.update_skill_cooldown();
        assert!(!f.is_active_skill_available());
        f.update_skill_cooldown();
        assert!(f.is_active_skill_available());
    }

    #[test]
    fn test_no_skill_is_illegal() {
        let mut f = knight();
        assert!(!f.is_active_skill_available());
        assert!(f.use_active_skill().is_err());
    }

    #[test]
    fn test_heal_capped() {
        let mut f = knight().with_health(25);
        assert_eq!(f.heal(10), 5);
        assert_eq!(f.current_health(), 30);
    }

    #[test]
    fn test_extreme_modifiers_clamp() {
        let mut f = knight();
        f.add_status_effect(status(StatusEffectKind::Strengthen, i32::MAX, 2), true);
        f.add_status_effect(status(StatusEffectKind::Weaken, i32::MIN, 2), false);
        assert_eq!(f.attack_power(), u32::MAX);

        let mut g = knight();
        g.add_status_effect(status(StatusEffectKind::Weaken, i32::MAX, 2), false);
        g.add_status_effect(status(StatusEffectKind::Strengthen, i32::MIN, 2), true);
        assert_eq!(g.attack_power(), 0);
    }

    #[test]
    fn test_fortify_tick_saturates() {
        let mut f = knight();
        f.add_defense(i32::MAX);
        f.add_status_effect(status(StatusEffectKind::Fortify, i32::MAX, 2), false);
        let tick = f.update_status_effects();
        assert_eq!(tick.defense, i32::MAX);
        assert_eq!(f.defense(), i32::MAX);
    }
}
