use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::roster::BaseStats;

/// Multiplier gained per positive stage.
pub const BUFF_PER_STAGE: f64 = 0.5;
/// Divisor growth per negative stage.
pub const DEBUFF_PER_STAGE: f64 = 0.33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Hp,
    MaxHp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    pub fn base_value(self, stats: &BaseStats) -> f64 {
        match self {
            Self::Hp => stats.hp,
            Self::MaxHp => stats.max_hp,
            Self::Attack => stats.attack,
            Self::Defense => stats.defense,
            Self::SpecialAttack => stats.special_attack,
            Self::SpecialDefense => stats.special_defense,
            Self::Speed => stats.speed,
        }
    }
}

/// Effective value of `base` under a stage modifier.
///
/// Positive stages scale by `1 + 0.5 * stage`, negative stages divide by
/// `1 + 0.33 * |stage|`. Stages are not clamped.
pub fn effective_stat(base: f64, stage: Option<i32>) -> f64 {
    match stage {
        Some(stage) if stage > 0 => base * (1.0 + stage as f64 * BUFF_PER_STAGE),
        Some(stage) if stage < 0 => base / (1.0 + stage.unsigned_abs() as f64 * DEBUFF_PER_STAGE),
        _ => base,
    }
}

/// Per-battle stat stages for one side. Discarded when the battle ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageModifiers {
    stages: BTreeMap<Stat, i32>,
}

impl StageModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stat: Stat, stage: i32) -> Self {
        self.set(stat, stage);
        self
    }

    pub fn set(&mut self, stat: Stat, stage: i32) {
        self.stages.insert(stat, stage);
    }

    /// Adds `delta` to the current stage of `stat`.
    pub fn shift(&mut self, stat: Stat, delta: i32) {
        *self.stages.entry(stat).or_insert(0) += delta;
    }

    pub fn stage(&self, stat: Stat) -> Option<i32> {
        self.stages.get(&stat).copied()
    }

    pub fn effective(&self, stats: &BaseStats, stat: Stat) -> f64 {
        effective_stat(stat.base_value(stats), self.stage(stat))
    }
}
