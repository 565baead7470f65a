//! Tournament configuration: defaults, environment overrides and file locations.

use std::env;
use std::str::FromStr;

use crate::combat::{BattleConfig, TurnOrder, MAX_TURNS};
use crate::data::roster::DEFAULT_ROSTER_PATH;

pub const DEFAULT_OUTPUT_PATH: &str = "battle_simulation_results.json";
pub const DEFAULT_BATTLES_PER_MATCHUP: u32 = 100;
/// Raw battle records kept in the output document for debugging.
pub const DEFAULT_RAW_SAMPLE_LIMIT: usize = 100;

pub const ENV_BATTLES: &str = "CODEMON_BATTLES";
pub const ENV_SEED: &str = "CODEMON_SEED";
pub const ENV_TURN_ORDER: &str = "CODEMON_TURN_ORDER";
pub const ENV_ROSTER: &str = "CODEMON_ROSTER";
pub const ENV_OUTPUT: &str = "CODEMON_OUTPUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentConfig {
    /// Battles run for every unordered pair of languages.
    pub battles_per_matchup: u32,
    /// Seed for the battle generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub turn_order: TurnOrder,
    pub max_turns: u32,
    pub raw_sample_limit: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            battles_per_matchup: DEFAULT_BATTLES_PER_MATCHUP,
            seed: None,
            turn_order: TurnOrder::default(),
            max_turns: MAX_TURNS,
            raw_sample_limit: DEFAULT_RAW_SAMPLE_LIMIT,
        }
    }
}

impl TournamentConfig {
    /// Defaults overridden by `CODEMON_BATTLES`, `CODEMON_SEED` and `CODEMON_TURN_ORDER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [TournamentConfig::from_env] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            battles_per_matchup: parse_or_default(
                lookup(ENV_BATTLES).as_deref(),
                ENV_BATTLES,
                defaults.battles_per_matchup,
            ),
            seed: lookup(ENV_SEED)
                .as_deref()
                .and_then(|raw| parse_or_warn(raw, ENV_SEED)),
            turn_order: parse_or_default(
                lookup(ENV_TURN_ORDER).as_deref(),
                ENV_TURN_ORDER,
                defaults.turn_order,
            ),
            ..defaults
        }
    }

    pub fn battle_config(&self) -> BattleConfig {
        BattleConfig {
            turn_order: self.turn_order,
            max_turns: self.max_turns.max(1),
        }
    }
}

/// Roster path from `CODEMON_ROSTER`, else the default file name.
pub fn roster_path() -> String {
    env::var(ENV_ROSTER).unwrap_or_else(|_| DEFAULT_ROSTER_PATH.to_string())
}

/// Output path from `CODEMON_OUTPUT`, else the default file name.
pub fn output_path() -> String {
    env::var(ENV_OUTPUT).unwrap_or_else(|_| DEFAULT_OUTPUT_PATH.to_string())
}

/// Parse `raw` when present; invalid values log a warning and fall back to `default`.
pub fn parse_or_default<T>(raw: Option<&str>, name: &str, default: T) -> T
where
    T: FromStr,
{
    raw.and_then(|value| parse_or_warn(value, name))
        .unwrap_or(default)
}

fn parse_or_warn<T: FromStr>(raw: &str, name: &str) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("invalid {name} '{raw}', using default");
            None
        }
    }
}
