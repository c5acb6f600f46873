//! Load pattern tables from TOML files
//!
//! ```toml
//! [status_effects.poison]
//! stackable = true
//!
//! [[roles.knight.patterns]]
//! id = "cleave"
//! name = "Cleave"
//! shape = "run"
//! length = 3
//! face = "heads"
//! attack = true
//! attack_bonus = 4
//! effects = [{ kind = "bleed", magnitude = 2, duration = 2 }]
//! ```

use crate::core::error::{CombatError, Result};
use crate::core::types::{CoinFace, PatternId, Role};
use crate::effects::status::StatusEffectKind;
use crate::patterns::catalog::PatternTable;
use crate::patterns::pattern::{Pattern, PatternShape, StatusEffectSpec};
use std::fs;
use std::path::Path;

/// Load a pattern table from a TOML file
pub fn load_pattern_table(path: &Path) -> Result<PatternTable> {
    let content = fs::read_to_string(path)?;
    parse_pattern_table(&content)
}

/// Parse a pattern table from TOML text
pub fn parse_pattern_table(content: &str) -> Result<PatternTable> {
    let toml: toml::Value = content.parse()?;
    let mut table = PatternTable::new();

    if let Some(effects) = toml.get("status_effects").and_then(|v| v.as_table()) {
        for (name, config) in effects {
            let kind = StatusEffectKind::parse(name)?;
            let stackable = config
                .get("stackable")
                .and_then(|v| v.as_bool())
                .unwrap_or_else(|| kind.default_stackable());
            table.set_stackable(kind, stackable);
        }
    }

    let roles = toml
        .get("roles")
        .and_then(|v| v.as_table())
        .ok_or_else(|| CombatError::config("pattern table has no [roles] section"))?;

    for (role_name, role_value) in roles {
        let role = Role::new(role_name.as_str());
        let entries = role_value
            .get("patterns")
            .and_then(|v| v.as_array())
            .ok_or_else(|| CombatError::config(format!("role '{}' missing patterns", role)))?;

        let patterns = entries
            .iter()
            .map(|entry| parse_pattern(entry, &role))
            .collect::<Result<Vec<_>>>()?;

        table.insert_role(role, patterns)?;
    }

    Ok(table)
}

fn parse_pattern(value: &toml::Value, role: &Role) -> Result<Pattern> {
    let id = value
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CombatError::config(format!("role '{}': pattern missing id", role)))?;

    let context = format!("role '{}', pattern '{}'", role, id);

    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(id)
        .to_string();

    let shape_str = value
        .get("shape")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CombatError::config(format!("{}: missing shape", context)))?;

    let shape = match shape_str {
        "run" => {
            let length = value
                .get("length")
                .and_then(|v| v.as_integer())
                .ok_or_else(|| CombatError::config(format!("{}: run missing length", context)))?;
            let length = usize::try_from(length)
                .map_err(|_| CombatError::config(format!("{}: negative run length", context)))?;
            PatternShape::Run { length }
        }
        "all_same" => PatternShape::AllSame,
        "alternating" => PatternShape::Alternating,
        other => {
            return Err(CombatError::config(format!(
                "{}: unknown shape '{}'",
                context, other
            )))
        }
    };

    let face = match value.get("face").and_then(|v| v.as_str()) {
        Some(face) => parse_face(face)
            .ok_or_else(|| CombatError::config(format!("{}: unknown face '{}'", context, face)))?,
        None if shape == PatternShape::Alternating => CoinFace::Heads,
        None => return Err(CombatError::config(format!("{}: missing face", context))),
    };

    let is_attack = value
        .get("attack")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| CombatError::config(format!("{}: missing attack flag", context)))?;

    let attack_bonus = get_i32(value, "attack_bonus", &context)?;
    let defense_bonus = get_i32(value, "defense_bonus", &context)?;

    let mut status_effects = Vec::new();
    if let Some(effects) = value.get("effects").and_then(|v| v.as_array()) {
        for effect in effects {
            status_effects.push(parse_effect(effect, &context)?);
        }
    }

    let pattern = Pattern {
        id: PatternId::new(id),
        name,
        shape,
        face,
        is_attack,
        attack_bonus,
        defense_bonus,
        status_effects,
    };
    pattern.validate()?;
    Ok(pattern)
}

fn parse_effect(value: &toml::Value, context: &str) -> Result<StatusEffectSpec> {
    let kind_str = value
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CombatError::config(format!("{}: effect missing kind", context)))?;
    let kind = StatusEffectKind::parse(kind_str)
        .map_err(|e| CombatError::config(format!("{}: {}", context, e)))?;

    let magnitude = get_i32(value, "magnitude", context)?;

    let duration = value
        .get("duration")
        .and_then(|v| v.as_integer())
        .ok_or_else(|| CombatError::config(format!("{}: effect missing duration", context)))?;
    let duration = u32::try_from(duration)
        .map_err(|_| CombatError::config(format!("{}: invalid duration {}", context, duration)))?;

    Ok(StatusEffectSpec {
        kind,
        magnitude,
        duration,
    })
}

/// Optional integer field, 0 when absent
fn get_i32(value: &toml::Value, key: &str, context: &str) -> Result<i32> {
    match value.get(key) {
        None => Ok(0),
        Some(v) => {
            let n = v
                .as_integer()
                .ok_or_else(|| CombatError::config(format!("{}: {} must be an integer", context, key)))?;
            i32::try_from(n)
                .map_err(|_| CombatError::config(format!("{}: {} out of range", context, key)))
        }
    }
}

fn parse_face(s: &str) -> Option<CoinFace> {
    match s {
        "heads" => Some(CoinFace::Heads),
        "tails" => Some(CoinFace::Tails),
        _ => None,
    }
}
