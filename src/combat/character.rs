//! The character contract consumed by the combat engine
//!
//! Stat storage, progression and how status effects act each turn belong to
//! the implementor. [`crate::combat::Fighter`] is the bundled implementation.

use crate::combat::skill::ActiveSkill;
use crate::core::error::Result;
use crate::effects::status::{StatusEffectInstance, StatusTick};

pub trait Character {
    fn name(&self) -> &str;

    fn current_health(&self) -> u32;

    fn max_health(&self) -> u32;

    /// Damage dealt by attack patterns before the pattern bonus
    fn attack_power(&self) -> u32;

    fn defense(&self) -> i32;

    /// Subtract health, flooring at 0. Returns the amount actually removed.
    fn take_damage(&mut self, amount: u32) -> u32;

    fn add_defense(&mut self, amount: i32);

    /// Attach an instance, merging per `stackable`. Returns false if ignored.
    fn add_status_effect(&mut self, instance: StatusEffectInstance, stackable: bool) -> bool;

    /// Per-turn status update, called once at each turn boundary
    fn update_status_effects(&mut self) -> StatusTick;

    /// Per-turn cooldown update, called once at each turn boundary
    fn update_skill_cooldown(&mut self);

    fn active_skill(&self) -> Option<ActiveSkill>;

    fn is_active_skill_available(&self) -> bool;

    /// Commit a skill use and start its cooldown
    fn use_active_skill(&mut self) -> Result<ActiveSkill>;

    fn is_defeated(&self) -> bool {
        self.current_health() == 0
    }
}
