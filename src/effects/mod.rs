//! Status effects and pattern effect resolution

pub mod resolver;
pub mod status;

pub use resolver::{EffectResolver, Participant, Resolution};
pub use status::{StatusEffectInstance, StatusEffectKind, StatusEffects, StatusTick};
