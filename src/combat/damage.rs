//! Accuracy and damage resolution for a single ability use.

use serde::Serialize;

use crate::combat::rng::Rng;
use crate::combat::stats::{StageModifiers, Stat};
use crate::data::roster::{Ability, AbilityType, BaseStats};

pub const DAMAGE_FACTOR_MIN: f64 = 0.85;
pub const DAMAGE_FACTOR_MAX: f64 = 1.0;
/// A connecting damaging hit never does less than this.
pub const MIN_DAMAGE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitOutcome {
    pub hits: bool,
    pub damage: f64,
}

impl HitOutcome {
    pub const MISS: Self = Self {
        hits: false,
        damage: 0.0,
    };
}

/// Uniform percentage check: a draw in [0, 100) below `accuracy` connects.
pub fn accuracy_check(accuracy: f64, rng: &mut Rng) -> bool {
    rng.percent() < accuracy
}

/// `power * (offense / defense) * factor`, floored at [MIN_DAMAGE].
pub fn scaled_damage(power: f64, offense: f64, defense: f64, factor: f64) -> f64 {
    (power * (offense / defense) * factor).max(MIN_DAMAGE)
}

/// Offense and defense stats an ability type reads, or `None` for non-damaging types.
pub fn stat_pair(ability_type: &AbilityType) -> Option<(Stat, Stat)> {
    match ability_type {
        AbilityType::Physical => Some((Stat::Attack, Stat::Defense)),
        AbilityType::Special => Some((Stat::SpecialAttack, Stat::SpecialDefense)),
        AbilityType::Other(_) => None,
    }
}

/// Damage for an ability that has already connected. Non-damaging types deal their
/// raw power without stat scaling or jitter.
pub fn damage_on_hit(
    ability: &Ability,
    attacker: &BaseStats,
    defender: &BaseStats,
    attacker_mods: &StageModifiers,
    defender_mods: &StageModifiers,
    rng: &mut Rng,
) -> f64 {
    let power = f64::from(ability.power);
    let Some((offense_stat, defense_stat)) = stat_pair(&ability.ability_type) else {
        return power;
    };
    let offense = attacker_mods.effective(attacker, offense_stat);
    let defense = defender_mods.effective(defender, defense_stat);
    let factor = rng.uniform(DAMAGE_FACTOR_MIN, DAMAGE_FACTOR_MAX);
    scaled_damage(power, offense, defense, factor)
}

/// Resolve one ability use: accuracy draw first, then damage draw on a hit.
pub fn resolve_hit(
    ability: &Ability,
    attacker: &BaseStats,
    defender: &BaseStats,
    attacker_mods: &StageModifiers,
    defender_mods: &StageModifiers,
    rng: &mut Rng,
) -> HitOutcome {
    if !accuracy_check(ability.accuracy, rng) {
        return HitOutcome::MISS;
    }
    HitOutcome {
        hits: true,
        damage: damage_on_hit(ability, attacker, defender, attacker_mods, defender_mods, rng),
    }
}
