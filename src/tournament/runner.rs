use serde::{Deserialize, Serialize};

use crate::combat::{simulate_battle, BattleResult, Rng};
use crate::config::TournamentConfig;
use crate::data::roster::{Roster, ABILITIES_PER_LANGUAGE};
use crate::error::{CodemonError, Result};

/// One battle as it happened: who fought, which abilities they picked, and the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub battle_num: u32,
    pub language1: String,
    pub language2: String,
    pub ability1_index: usize,
    pub ability2_index: usize,
    #[serde(flatten)]
    pub result: BattleResult,
}

impl RawRecord {
    pub fn involves(&self, id: &str) -> bool {
        self.language1 == id || self.language2 == id
    }

    /// Ability index `id` used in this battle, if it took part.
    pub fn ability_index_for(&self, id: &str) -> Option<usize> {
        if self.language1 == id {
            Some(self.ability1_index)
        } else if self.language2 == id {
            Some(self.ability2_index)
        } else {
            None
        }
    }

    pub fn damage_dealt_by(&self, id: &str) -> f64 {
        self.result.damage_dealt.get(id).copied().unwrap_or(0.0)
    }
}

/// Uniform choice between a language's two abilities.
fn pick_ability(rng: &mut Rng) -> usize {
    (rng.next_u64() % ABILITIES_PER_LANGUAGE as u64) as usize
}

/// Run `battles_per_matchup` battles for every unordered pair of languages, in
/// roster order, drawing from a single generator stream.
pub fn run_tournament(
    roster: &Roster,
    config: &TournamentConfig,
    rng: &mut Rng,
) -> Result<Vec<RawRecord>> {
    if roster.len() < 2 {
        return Err(CodemonError::RosterTooSmall(roster.len()));
    }

    let battle_config = config.battle_config();
    let pair_count = roster.len() * (roster.len() - 1) / 2;
    let mut records = Vec::with_capacity(pair_count * config.battles_per_matchup as usize);

    tracing::info!(
        languages = roster.len(),
        matchups = pair_count,
        battles_per_matchup = config.battles_per_matchup,
        turn_order = %config.turn_order,
        "starting tournament"
    );

    for (first, second) in roster.pairs() {
        tracing::debug!("simulating {} vs {}", first.id, second.id);
        for battle_num in 0..config.battles_per_matchup {
            let ability1_index = pick_ability(rng);
            let ability2_index = pick_ability(rng);
            let result = simulate_battle(
                first,
                second,
                ability1_index,
                ability2_index,
                battle_config,
                rng,
            )?;
            records.push(RawRecord {
                battle_num,
                language1: first.id.clone(),
                language2: second.id.clone(),
                ability1_index,
                ability2_index,
                result,
            });
        }
    }

    tracing::info!(battles = records.len(), "tournament finished");
    Ok(records)
}
