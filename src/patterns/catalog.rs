//! Pattern and effect catalogs
//!
//! The engine only consumes the two lookup traits. [`PatternTable`] is the
//! plain data-table implementation loaded at startup.

use crate::core::error::{CombatError, Result};
use crate::core::types::Role;
use crate::effects::status::StatusEffectKind;
use crate::patterns::pattern::Pattern;
use ahash::{AHashMap, AHashSet};

/// Source of the patterns available to a role
pub trait PatternCatalog {
    /// Patterns for `role` in presentation order; empty if the role is unknown
    fn patterns_for(&self, role: &Role) -> Vec<Pattern>;
}

/// Source of per-kind stacking rules
pub trait EffectCatalog {
    fn is_stackable(&self, kind: StatusEffectKind) -> bool;
}

/// Stacking rules with no overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStacking;

impl EffectCatalog for DefaultStacking {
    fn is_stackable(&self, kind: StatusEffectKind) -> bool {
        kind.default_stackable()
    }
}

/// Check a role's pattern list before a combat uses it
pub fn validate_patterns(role: &Role, patterns: &[Pattern]) -> Result<()> {
    if patterns.is_empty() {
        return Err(CombatError::config(format!(
            "role '{}' has no patterns",
            role
        )));
    }

    let mut seen = AHashSet::new();
    for pattern in patterns {
        pattern
            .validate()
            .map_err(|e| CombatError::config(format!("role '{}': {}", role, e)))?;
        if !seen.insert(pattern.id.clone()) {
            return Err(CombatError::config(format!(
                "role '{}': duplicate pattern id '{}'",
                role, pattern.id
            )));
        }
    }

    Ok(())
}

/// Immutable role → patterns table plus stacking overrides
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    roles: AHashMap<Role, Vec<Pattern>>,
    stacking: AHashMap<StatusEffectKind, bool>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role's patterns, validating them first
    pub fn insert_role(&mut self, role: Role, patterns: Vec<Pattern>) -> Result<()> {
        validate_patterns(&role, &patterns)?;
        self.roles.insert(role, patterns);
        Ok(())
    }

    pub fn with_role(mut self, role: impl Into<String>, patterns: Vec<Pattern>) -> Result<Self> {
        self.insert_role(Role::new(role), patterns)?;
        Ok(self)
    }

    pub fn set_stackable(&mut self, kind: StatusEffectKind, stackable: bool) {
        self.stacking.insert(kind, stackable);
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.keys()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains_key(role)
    }

    pub fn get(&self, role: &Role) -> Option<&[Pattern]> {
        self.roles.get(role).map(Vec::as_slice)
    }
}

impl PatternCatalog for PatternTable {
    fn patterns_for(&self, role: &Role) -> Vec<Pattern> {
        self.roles.get(role).cloned().unwrap_or_default()
    }
}

impl EffectCatalog for PatternTable {
    fn is_stackable(&self, kind: StatusEffectKind) -> bool {
        self.stacking
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_stackable())
    }
}
