//! Combat configuration with documented defaults
//!
//! A config is passed into each session explicitly. Nothing here is global,
//! so sequential or side-by-side combats never share settings by accident.

use crate::core::error::{CombatError, Result};
use crate::core::types::Role;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of coins flipped each turn
pub const DEFAULT_COIN_COUNT: usize = 5;

/// Upper bound on the coin count accepted by [`CombatConfig::validate`]
pub const MAX_COINS: usize = 16;

/// Whether `Swap` may move a locked coin
///
/// Swapping a locked coin would let a skill carry the lock to a different
/// position, so it is refused unless the host opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapPolicy {
    #[default]
    DenyLocked,
    AllowLocked,
}

/// Configuration for a single combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Number of coins in the set
    pub coin_count: usize,

    /// Seed for the coin RNG
    ///
    /// `None` seeds from entropy. Two sessions with the same seed, catalog and
    /// decisions produce the same flips.
    pub seed: Option<u64>,

    /// Lock handling for swap skills
    pub swap_policy: SwapPolicy,

    /// Catalog key for the player's patterns
    pub player_role: Role,

    /// Catalog key for the enemy's patterns
    pub enemy_role: Role,

    /// End the combat when the turn-boundary status update drops a
    /// combatant to 0 health, instead of waiting for the next execution
    pub end_on_status_death: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            coin_count: DEFAULT_COIN_COUNT,
            seed: None,
            swap_policy: SwapPolicy::DenyLocked,
            player_role: Role::new("knight"),
            enemy_role: Role::new("slime"),
            end_on_status_death: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    combat: CombatConfig,
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_roles(mut self, player: impl Into<String>, enemy: impl Into<String>) -> Self {
        self.player_role = Role::new(player);
        self.enemy_role = Role::new(enemy);
        self
    }

    pub fn with_coin_count(mut self, count: usize) -> Self {
        self.coin_count = count;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.coin_count == 0 {
            return Err(CombatError::config("coin_count must be at least 1"));
        }

        if self.coin_count > MAX_COINS {
            return Err(CombatError::config(format!(
                "coin_count ({}) exceeds the maximum of {}",
                self.coin_count, MAX_COINS
            )));
        }

        if self.player_role.as_str().is_empty() || self.enemy_role.as_str().is_empty() {
            return Err(CombatError::config("role names must not be empty"));
        }

        Ok(())
    }

    /// Parse the `[combat]` table of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.combat.validate()?;
        Ok(file.combat)
    }
}

/// Load and validate a config file
pub fn load_config(path: &Path) -> Result<CombatConfig> {
    let content = fs::read_to_string(path)?;
    CombatConfig::from_toml_str(&content)
}
