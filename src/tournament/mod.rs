pub mod aggregate;
pub mod report;
pub mod runner;

pub use aggregate::{
    ability_key, aggregate, aggregate_abilities, aggregate_languages, aggregate_matchups,
    matchup_key, AbilityStats, AggregateStats, LanguageStats, MatchupStats,
};
pub use report::{load_report, SimulationMetadata, SimulationReport};
pub use runner::{run_tournament, RawRecord};

use crate::combat::Rng;
use crate::config::TournamentConfig;
use crate::data::roster::Roster;
use crate::data::validate::validate_roster;
use crate::error::Result;

/// Full pipeline: reject invalid rosters, seed the generator, run every matchup,
/// aggregate, and package the output document with a bounded raw sample.
pub fn simulate_roster(roster: &Roster, config: &TournamentConfig) -> Result<SimulationReport> {
    validate_roster(roster).into_result()?;

    let (mut rng, seed) = match config.seed {
        Some(seed) => (Rng::new(seed), seed),
        None => Rng::from_entropy(),
    };
    tracing::debug!(seed, "battle generator seeded");

    let records = run_tournament(roster, config, &mut rng)?;
    let stats = aggregate(roster, &records);

    Ok(SimulationReport {
        metadata: SimulationMetadata {
            simulation_date: chrono::Utc::now().to_rfc3339(),
            total_battles: records.len(),
            battles_per_matchup: config.battles_per_matchup,
            languages_simulated: roster.len(),
            random_seed: Some(seed),
            turn_order: Some(config.turn_order.to_string()),
        },
        stats,
        raw_results: records
            .into_iter()
            .take(config.raw_sample_limit)
            .collect(),
    })
}
