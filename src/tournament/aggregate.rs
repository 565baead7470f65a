//! Reduces raw battle records into per-language, per-ability and per-matchup tables.
//!
//! Each table is built by its own pass over the records. Keys with no battles
//! are left out rather than reported with empty averages.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::data::roster::Roster;
use crate::tournament::runner::RawRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub total_battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    /// `None` when the language never won.
    pub avg_hp_remaining_when_winning: Option<f64>,
    pub avg_turns_when_winning: Option<f64>,
    pub avg_damage_dealt: f64,
    pub language_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityStats {
    pub language_id: String,
    pub language_name: String,
    pub ability_name: String,
    pub ability_index: usize,
    pub ability_type: String,
    pub ability_power: u32,
    pub total_uses: u32,
    pub wins_with_ability: u32,
    pub losses_with_ability: u32,
    pub win_rate_with_ability: f64,
    pub avg_damage_with_ability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupStats {
    pub language1: String,
    pub language2: String,
    pub language1_name: String,
    pub language2_name: String,
    pub total_battles: u32,
    pub language1_wins: u32,
    pub language2_wins: u32,
    pub language1_win_rate: f64,
    pub language2_win_rate: f64,
}

/// All three aggregate views over one tournament.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub language_performance: BTreeMap<String, LanguageStats>,
    pub ability_performance: BTreeMap<String, AbilityStats>,
    pub matchup_statistics: BTreeMap<String, MatchupStats>,
}

impl AggregateStats {
    /// Path of the first NaN or infinite figure, e.g. `language_performance.rust.avg_damage_dealt`.
    /// JSON has no encoding for those values.
    pub fn first_non_finite(&self) -> Option<String> {
        for (id, language) in &self.language_performance {
            let figures = [
                ("win_rate", Some(language.win_rate)),
                ("avg_hp_remaining_when_winning", language.avg_hp_remaining_when_winning),
                ("avg_turns_when_winning", language.avg_turns_when_winning),
                ("avg_damage_dealt", Some(language.avg_damage_dealt)),
            ];
            for (field, value) in figures {
                if value.is_some_and(|v| !v.is_finite()) {
                    return Some(format!("language_performance.{id}.{field}"));
                }
            }
        }
        for (key, ability) in &self.ability_performance {
            for (field, value) in [
                ("win_rate_with_ability", ability.win_rate_with_ability),
                ("avg_damage_with_ability", ability.avg_damage_with_ability),
            ] {
                if !value.is_finite() {
                    return Some(format!("ability_performance.{key}.{field}"));
                }
            }
        }
        for (key, matchup) in &self.matchup_statistics {
            for (field, value) in [
                ("language1_win_rate", matchup.language1_win_rate),
                ("language2_win_rate", matchup.language2_win_rate),
            ] {
                if !value.is_finite() {
                    return Some(format!("matchup_statistics.{key}.{field}"));
                }
            }
        }
        None
    }
}

pub fn ability_key(language_id: &str, ability_index: usize) -> String {
    format!("{language_id}_{ability_index}")
}

pub fn matchup_key(language1: &str, language2: &str) -> String {
    format!("{language1}_vs_{language2}")
}

/// Running sums for one key. Averages are taken only when the key has battles.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    battles: u32,
    wins: u32,
    losses: u32,
    hp_when_winning: f64,
    turns_when_winning: f64,
    damage: f64,
}

impl Tally {
    fn record(&mut self, record: &RawRecord, id: &str) {
        self.battles += 1;
        self.damage += record.damage_dealt_by(id);
        if record.result.winner == id {
            self.wins += 1;
            self.hp_when_winning += record.result.winner_hp_remaining;
            self.turns_when_winning += f64::from(record.result.turns_taken);
        } else if record.result.loser == id {
            self.losses += 1;
        }
    }

    fn decided(&self) -> u32 {
        self.wins + self.losses
    }

    fn win_rate(&self) -> f64 {
        self.wins as f64 / self.decided() as f64
    }

    fn avg_damage(&self) -> f64 {
        self.damage / self.battles as f64
    }

    fn mean_when_winning(&self, sum: f64) -> Option<f64> {
        (self.wins > 0).then(|| sum / self.wins as f64)
    }
}

pub fn aggregate_languages(
    roster: &Roster,
    records: &[RawRecord],
) -> BTreeMap<String, LanguageStats> {
    roster
        .languages
        .iter()
        .filter_map(|language| {
            let mut tally = Tally::default();
            for record in records.iter().filter(|r| r.involves(&language.id)) {
                tally.record(record, &language.id);
            }
            if tally.decided() == 0 {
                return None;
            }
            Some((
                language.id.clone(),
                LanguageStats {
                    total_battles: tally.decided(),
                    wins: tally.wins,
                    losses: tally.losses,
                    win_rate: tally.win_rate(),
                    avg_hp_remaining_when_winning: tally.mean_when_winning(tally.hp_when_winning),
                    avg_turns_when_winning: tally.mean_when_winning(tally.turns_when_winning),
                    avg_damage_dealt: tally.avg_damage(),
                    language_name: language.name.clone(),
                },
            ))
        })
        .collect()
}

pub fn aggregate_abilities(
    roster: &Roster,
    records: &[RawRecord],
) -> BTreeMap<String, AbilityStats> {
    let mut stats = BTreeMap::new();
    for language in &roster.languages {
        for (ability_index, ability) in language.abilities.iter().enumerate() {
            let mut tally = Tally::default();
            for record in records
                .iter()
                .filter(|r| r.ability_index_for(&language.id) == Some(ability_index))
            {
                tally.record(record, &language.id);
            }
            if tally.decided() == 0 {
                continue;
            }
            stats.insert(
                ability_key(&language.id, ability_index),
                AbilityStats {
                    language_id: language.id.clone(),
                    language_name: language.name.clone(),
                    ability_name: ability.name.clone(),
                    ability_index,
                    ability_type: ability.ability_type.to_string(),
                    ability_power: ability.power,
                    total_uses: tally.decided(),
                    wins_with_ability: tally.wins,
                    losses_with_ability: tally.losses,
                    win_rate_with_ability: tally.win_rate(),
                    avg_damage_with_ability: tally.avg_damage(),
                },
            );
        }
    }
    stats
}

pub fn aggregate_matchups(
    roster: &Roster,
    records: &[RawRecord],
) -> BTreeMap<String, MatchupStats> {
    let position: HashMap<&str, usize> = roster
        .languages
        .iter()
        .enumerate()
        .map(|(index, language)| (language.id.as_str(), index))
        .collect();

    // (total, wins for the earlier roster entry, wins for the later one)
    let mut counts: BTreeMap<(usize, usize), (u32, u32, u32)> = BTreeMap::new();
    for record in records {
        let (Some(&a), Some(&b)) = (
            position.get(record.language1.as_str()),
            position.get(record.language2.as_str()),
        ) else {
            continue;
        };
        if a == b {
            continue;
        }
        let (low, high) = (a.min(b), a.max(b));
        let entry = counts.entry((low, high)).or_default();
        entry.0 += 1;
        if record.result.winner == roster.languages[low].id {
            entry.1 += 1;
        } else if record.result.winner == roster.languages[high].id {
            entry.2 += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, (total, _, _))| *total > 0)
        .map(|((low, high), (total, wins1, wins2))| {
            let first = &roster.languages[low];
            let second = &roster.languages[high];
            (
                matchup_key(&first.id, &second.id),
                MatchupStats {
                    language1: first.id.clone(),
                    language2: second.id.clone(),
                    language1_name: first.name.clone(),
                    language2_name: second.name.clone(),
                    total_battles: total,
                    language1_wins: wins1,
                    language2_wins: wins2,
                    language1_win_rate: wins1 as f64 / total as f64,
                    language2_win_rate: wins2 as f64 / total as f64,
                },
            )
        })
        .collect()
}

pub fn aggregate(roster: &Roster, records: &[RawRecord]) -> AggregateStats {
    AggregateStats {
        language_performance: aggregate_languages(roster, records),
        ability_performance: aggregate_abilities(roster, records),
        matchup_statistics: aggregate_matchups(roster, records),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::combat::BattleResult;
    use crate::data::roster::{Ability, AbilityType, BaseStats, Combatant};

    fn language(id: &str) -> Combatant {
        let ability = |name: &str| Ability {
            name: name.to_string(),
            ability_type: AbilityType::Special,
            power: 30,
            accuracy: 100.0,
        };
        Combatant {
            id: id.to_string(),
            name: format!("Lang {id}"),
            base_stats: BaseStats {
                hp: 100.0,
                max_hp: 100.0,
                attack: 50.0,
                defense: 50.0,
                special_attack: 50.0,
                special_defense: 50.0,
                speed: 50.0,
            },
            abilities: [ability(&format!("{id}-0")), ability(&format!("{id}-1"))],
        }
    }

    fn record(
        pair: (&str, &str),
        abilities: (usize, usize),
        winner_is_first: bool,
        hp: f64,
        turns: u32,
        damage: (f64, f64),
    ) -> RawRecord {
        let (winner, loser) = if winner_is_first {
            (pair.0, pair.1)
        } else {
            (pair.1, pair.0)
        };
        let mut damage_dealt = BTreeMap::new();
        damage_dealt.insert(pair.0.to_string(), damage.0);
        damage_dealt.insert(pair.1.to_string(), damage.1);
        RawRecord {
            battle_num: 0,
            language1: pair.0.to_string(),
            language2: pair.1.to_string(),
            ability1_index: abilities.0,
            ability2_index: abilities.1,
            result: BattleResult {
                winner: winner.to_string(),
                loser: loser.to_string(),
                winner_hp_remaining: hp,
                turns_taken: turns,
                winner_ability_used: String::new(),
                loser_ability_used: String::new(),
                damage_dealt,
                ended_by_turn_cap: false,
            },
        }
    }

    #[test]
    fn language_pass_averages_over_wins_only() {
        let roster = Roster::new(vec![language("a"), language("b")]);
        let records = vec![
            record(("a", "b"), (0, 0), true, 40.0, 4, (100.0, 60.0)),
            record(("a", "b"), (1, 0), true, 20.0, 6, (100.0, 80.0)),
            record(("a", "b"), (1, 1), false, 10.0, 5, (70.0, 100.0)),
        ];
        let stats = aggregate_languages(&roster, &records);

        let a = &stats["a"];
        assert_eq!((a.wins, a.losses, a.total_battles), (2, 1, 3));
        assert_eq!(a.avg_hp_remaining_when_winning, Some(30.0));
        assert_eq!(a.avg_turns_when_winning, Some(5.0));
        assert_eq!(a.avg_damage_dealt, 90.0);

        let b = &stats["b"];
        assert_eq!(b.avg_hp_remaining_when_winning, Some(10.0));
        assert_eq!(b.avg_damage_dealt, 80.0);
    }

    #[test]
    fn never_winning_language_has_no_winning_averages() {
        let roster = Roster::new(vec![language("a"), language("b")]);
        let records = vec![record(("a", "b"), (0, 0), true, 40.0, 4, (100.0, 0.0))];
        let stats = aggregate_languages(&roster, &records);
        assert_eq!(stats["b"].win_rate, 0.0);
        assert_eq!(stats["b"].avg_hp_remaining_when_winning, None);
        assert_eq!(stats["b"].avg_turns_when_winning, None);
    }

    #[test]
    fn languages_without_battles_are_omitted() {
        let roster = Roster::new(vec![language("a"), language("b"), language("idle")]);
        let records = vec![record(("a", "b"), (0, 0), true, 40.0, 4, (100.0, 0.0))];
        let stats = aggregate(&roster, &records);
        assert!(!stats.language_performance.contains_key("idle"));
        assert!(!stats.ability_performance.keys().any(|k| k.starts_with("idle")));
        assert!(!stats.matchup_statistics.contains_key("a_vs_idle"));
    }

    #[test]
    fn ability_pass_skips_unused_abilities() {
        let roster = Roster::new(vec![language("a"), language("b")]);
        let records = vec![
            record(("a", "b"), (0, 1), true, 40.0, 4, (100.0, 10.0)),
            record(("a", "b"), (0, 1), false, 40.0, 4, (10.0, 100.0)),
        ];
        let stats = aggregate_abilities(&roster, &records);
        assert!(stats.contains_key("a_0"));
        assert!(!stats.contains_key("a_1"));
        assert!(!stats.contains_key("b_0"));
        let b1 = &stats["b_1"];
        assert_eq!(b1.total_uses, 2);
        assert_eq!(b1.wins_with_ability, 1);
        assert_eq!(b1.ability_name, "b-1");
        assert_eq!(b1.ability_type, "Special");
        assert_eq!(b1.avg_damage_with_ability, 55.0);
    }

    #[test]
    fn matchup_key_follows_roster_order() {
        let roster = Roster::new(vec![language("a"), language("b")]);
        let records = vec![
            record(("b", "a"), (0, 0), true, 40.0, 4, (100.0, 10.0)),
            record(("a", "b"), (0, 0), true, 40.0, 4, (100.0, 10.0)),
            record(("a", "b"), (0, 0), true, 40.0, 4, (100.0, 10.0)),
        ];
        let stats = aggregate_matchups(&roster, &records);
        let matchup = &stats["a_vs_b"];
        assert!(!stats.contains_key("b_vs_a"));
        assert_eq!(matchup.total_battles, 3);
        assert_eq!(matchup.language1_wins, 2);
        assert_eq!(matchup.language2_wins, 1);
        assert!((matchup.language1_win_rate + matchup.language2_win_rate - 1.0).abs() < 1e-12);
    }
}
