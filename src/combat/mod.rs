pub mod damage;
pub mod engine;
pub mod rng;
pub mod stats;

pub use damage::{
    accuracy_check, damage_on_hit, resolve_hit, scaled_damage, stat_pair, HitOutcome,
    DAMAGE_FACTOR_MAX, DAMAGE_FACTOR_MIN, MIN_DAMAGE,
};
pub use engine::{
    decide_winner, simulate_battle, Battle, BattleConfig, BattlePhase, BattleResult, Side,
    TieBreak, TurnOrder, TurnSummary, MAX_TURNS,
};
pub use rng::Rng;
pub use stats::{effective_stat, StageModifiers, Stat, BUFF_PER_STAGE, DEBUFF_PER_STAGE};
