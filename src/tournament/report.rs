//! The simulation output document: metadata, the three aggregate tables and a
//! bounded sample of raw battles. Written by `simulate`, read back by the
//! analysis commands.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodemonError, Result};
use crate::tournament::aggregate::AggregateStats;
use crate::tournament::runner::RawRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetadata {
    /// RFC 3339 timestamp of the run.
    pub simulation_date: String,
    pub total_battles: usize,
    pub battles_per_matchup: u32,
    pub languages_simulated: usize,
    /// Seed the run used; replaying with it reproduces the document.
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub turn_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub metadata: SimulationMetadata,
    #[serde(flatten)]
    pub stats: AggregateStats,
    #[serde(default)]
    pub raw_results: Vec<RawRecord>,
}

impl SimulationReport {
    /// Pretty JSON. Fails on NaN or infinite figures, which JSON would turn into
    /// `null` and the reader would then reject.
    pub fn to_json(&self) -> Result<String> {
        if let Some(field) = self.first_non_finite() {
            return Err(CodemonError::NonFinite(field));
        }
        serde_json::to_string_pretty(self).map_err(|source| CodemonError::Serialize {
            what: "simulation report",
            source,
        })
    }

    fn first_non_finite(&self) -> Option<String> {
        self.stats.first_non_finite().or_else(|| {
            self.raw_results.iter().find_map(|record| {
                let result = &record.result;
                let damage_ok = result.damage_dealt.values().all(|d| d.is_finite());
                (!result.winner_hp_remaining.is_finite() || !damage_ok)
                    .then(|| format!("raw_results[{}]", record.battle_num))
            })
        })
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| CodemonError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote simulation report");
        Ok(())
    }
}

pub fn load_report(path: impl AsRef<Path>) -> Result<SimulationReport> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CodemonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CodemonError::Json {
        path: path.to_path_buf(),
        source,
    })
}
