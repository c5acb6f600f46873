//! Pattern selection for computer-controlled sides
//!
//! The engine only needs "given attacker, defender and the matched patterns,
//! return one". Selectors are swappable trait objects; closures work too.

use crate::combat::character::Character;
use crate::core::types::PatternId;
use crate::patterns::pattern::Pattern;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub trait PatternSelector {
    /// Pick one of `matched`, or `None` to pass the turn
    fn select_pattern(
        &mut self,
        attacker: &dyn Character,
        defender: &dyn Character,
        matched: &[Pattern],
    ) -> Option<PatternId>;
}

impl<F> PatternSelector for F
where
    F: FnMut(&dyn Character, &dyn Character, &[Pattern]) -> Option<PatternId>,
{
    fn select_pattern(
        &mut self,
        attacker: &dyn Character,
        defender: &dyn Character,
        matched: &[Pattern],
    ) -> Option<PatternId> {
        self(attacker, defender, matched)
    }
}

/// Weights for the greedy selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreedyWeights {
    /// Prefer defense when own health fraction is below this
    pub defend_below: f32,
    /// Score per point of magnitude × duration carried as status effects
    pub effect_weight: f32,
}

impl Default for GreedyWeights {
    fn default() -> Self {
        Self {
            defend_below: 0.3,
            effect_weight: 0.5,
        }
    }
}

/// Picks the attack with the best immediate payoff, or the best defense when hurt
#[derive(Debug, Clone, Default)]
pub struct GreedySelector {
    pub weights: GreedyWeights,
}

impl GreedySelector {
    pub fn new(weights: GreedyWeights) -> Self {
        Self { weights }
    }

    fn payload_score(&self, pattern: &Pattern) -> f32 {
        pattern
            .status_effects
            .iter()
            .map(|e| e.magnitude as f32 * e.duration as f32)
            .sum::<f32>()
            * self.weights.effect_weight
    }

    fn attack_score(&self, pattern: &Pattern, attacker: &dyn Character, defender: &dyn Character) -> f32 {
        let raw = (attacker.attack_power() as i64 + pattern.attack_bonus as i64).max(0);
        // Overkill is wasted
        let dealt = raw.min(defender.current_health() as i64) as f32;
        dealt + self.payload_score(pattern)
    }

    fn defense_score(&self, pattern: &Pattern) -> f32 {
        pattern.defense_bonus as f32 + self.payload_score(pattern)
    }
}

/// First pattern with the highest score, so ties keep catalog order
fn best_by<'p>(
    patterns: impl Iterator<Item = &'p Pattern>,
    mut score: impl FnMut(&Pattern) -> f32,
) -> Option<&'p Pattern> {
    let mut best: Option<(&Pattern, f32)> = None;
    for pattern in patterns {
        let s = score(pattern);
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((pattern, s)),
        }
    }
    best.map(|(p, _)| p)
}

impl PatternSelector for GreedySelector {
    fn select_pattern(
        &mut self,
        attacker: &dyn Character,
        defender: &dyn Character,
        matched: &[Pattern],
    ) -> Option<PatternId> {
        let best_attack = best_by(matched.iter().filter(|p| p.is_attack), |p| {
            self.attack_score(p, attacker, defender)
        });
        let best_defense = best_by(matched.iter().filter(|p| !p.is_attack), |p| {
            self.defense_score(p)
        });

        let health_fraction = if attacker.max_health() == 0 {
            0.0
        } else {
            attacker.current_health() as f32 / attacker.max_health() as f32
        };

        // Finish the opponent whenever possible
        if let Some(attack) = best_attack {
            let raw = attacker.attack_power() as i64 + attack.attack_bonus as i64;
            if raw >= defender.current_health() as i64 {
                return Some(attack.id.clone());
            }
        }

        let choice = if health_fraction < self.weights.defend_below {
            best_defense.or(best_attack)
        } else {
            best_attack.or(best_defense)
        };
        choice.map(|p| p.id.clone())
    }
}

/// Uniformly random choice among the matched patterns
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: ChaCha8Rng,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PatternSelector for RandomSelector {
    fn select_pattern(
        &mut self,
        _attacker: &dyn Character,
        _defender: &dyn Character,
        matched: &[Pattern],
    ) -> Option<PatternId> {
        matched.choose(&mut self.rng).map(|p| p.id.clone())
    }
}
