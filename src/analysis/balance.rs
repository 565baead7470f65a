//! Balance classification over a simulation report, plus the balance report
//! written to `balance_report.json`.

use std::fmt;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::ranking::{rank_abilities, rank_languages};
use crate::analysis::percent;
use crate::error::{CodemonError, Result};
use crate::tournament::{AggregateStats, SimulationReport};

pub const LANGUAGE_BALANCED_MIN: f64 = 0.45;
pub const LANGUAGE_BALANCED_MAX: f64 = 0.55;
pub const ABILITY_OVERPOWERED_ABOVE: f64 = 0.70;
pub const ABILITY_UNDERPOWERED_BELOW: f64 = 0.30;
pub const NOTABLE_MATCHUP_ABOVE: f64 = 0.70;
pub const NOTABLE_MATCHUP_BELOW: f64 = 0.30;
/// Power change suggested for an out-of-band ability.
pub const POWER_ADJUSTMENT: u32 = 20;

pub const DEFAULT_BALANCE_REPORT_PATH: &str = "balance_report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Overpowered,
    Balanced,
    Underpowered,
}

impl BalanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overpowered => "OVERPOWERED",
            Self::Balanced => "BALANCED",
            Self::Underpowered => "UNDERPOWERED",
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_language(win_rate: f64) -> BalanceStatus {
    if win_rate > LANGUAGE_BALANCED_MAX {
        BalanceStatus::Overpowered
    } else if win_rate < LANGUAGE_BALANCED_MIN {
        BalanceStatus::Underpowered
    } else {
        BalanceStatus::Balanced
    }
}

pub fn classify_ability(win_rate: f64) -> BalanceStatus {
    if win_rate > ABILITY_OVERPOWERED_ABOVE {
        BalanceStatus::Overpowered
    } else if win_rate < ABILITY_UNDERPOWERED_BELOW {
        BalanceStatus::Underpowered
    } else {
        BalanceStatus::Balanced
    }
}

/// New power for an ability in the given state; `None` when it is balanced.
/// Reductions never go below 1.
pub fn suggested_power(status: BalanceStatus, power: u32) -> Option<u32> {
    match status {
        BalanceStatus::Overpowered => Some(power.saturating_sub(POWER_ADJUSTMENT).max(1)),
        BalanceStatus::Underpowered => Some(power.saturating_add(POWER_ADJUSTMENT)),
        BalanceStatus::Balanced => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub overpowered_languages: usize,
    pub underpowered_languages: usize,
    pub overpowered_abilities: usize,
    pub underpowered_abilities: usize,
}

impl IssueCounts {
    pub fn total(&self) -> usize {
        self.overpowered_languages
            + self.underpowered_languages
            + self.overpowered_abilities
            + self.underpowered_abilities
    }
}

pub fn count_issues(stats: &AggregateStats) -> IssueCounts {
    let mut counts = IssueCounts::default();
    for language in stats.language_performance.values() {
        match classify_language(language.win_rate) {
            BalanceStatus::Overpowered => counts.overpowered_languages += 1,
            BalanceStatus::Underpowered => counts.underpowered_languages += 1,
            BalanceStatus::Balanced => {}
        }
    }
    for ability in stats.ability_performance.values() {
        match classify_ability(ability.win_rate_with_ability) {
            BalanceStatus::Overpowered => counts.overpowered_abilities += 1,
            BalanceStatus::Underpowered => counts.underpowered_abilities += 1,
            BalanceStatus::Balanced => {}
        }
    }
    counts
}

/// Share of languages and abilities that are balanced. `None` for an empty report.
pub fn balance_score(stats: &AggregateStats) -> Option<f64> {
    let items = stats.language_performance.len() + stats.ability_performance.len();
    if items == 0 {
        return None;
    }
    let issues = count_issues(stats).total();
    Some((items - issues) as f64 / items as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceVerdict {
    Excellent,
    Good,
    SignificantIssues,
}

impl BalanceVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Excellent
        } else if score >= 0.6 {
            Self::Good
        } else {
            Self::SignificantIssues
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent balance!",
            Self::Good => "Good balance, minor issues",
            Self::SignificantIssues => "Significant balance issues detected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total_battles: usize,
    pub languages_tested: usize,
    pub abilities_tested: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageIssue {
    pub language: String,
    pub win_rate: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityIssue {
    pub language: String,
    pub ability: String,
    pub win_rate: f64,
    pub power: u32,
    pub suggested_power: u32,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceIssues {
    pub overpowered_languages: Vec<LanguageIssue>,
    pub underpowered_languages: Vec<LanguageIssue>,
    pub overpowered_abilities: Vec<AbilityIssue>,
    pub underpowered_abilities: Vec<AbilityIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotableMatchup {
    pub language1_name: String,
    pub language2_name: String,
    pub language1_win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub summary: BalanceSummary,
    pub balance_issues: BalanceIssues,
    pub notable_matchups: Vec<NotableMatchup>,
    pub recommendations: Vec<String>,
    pub balance_score: Option<f64>,
}

impl BalanceReport {
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let payload = serde_json::to_string_pretty(self).map_err(|source| {
            CodemonError::Serialize {
                what: "balance report",
                source,
            }
        })?;
        fs::write(path, payload).map_err(|source| CodemonError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn build_balance_report(report: &SimulationReport) -> BalanceReport {
    let stats = &report.stats;
    let mut issues = BalanceIssues::default();
    let mut recommendations = Vec::new();

    for (_, language) in rank_languages(stats) {
        let status = classify_language(language.win_rate);
        let issue = |suggestion: &str| LanguageIssue {
            language: language.language_name.clone(),
            win_rate: language.win_rate,
            suggestion: suggestion.to_string(),
        };
        match status {
            BalanceStatus::Overpowered => {
                issues.overpowered_languages.push(issue(
                    "Consider nerfing abilities or reducing base stats",
                ));
                recommendations.push(format!(
                    "{}: consider nerfing abilities",
                    language.language_name
                ));
            }
            BalanceStatus::Underpowered => {
                issues.underpowered_languages.push(issue(
                    "Consider buffing abilities or increasing base stats",
                ));
                recommendations.push(format!(
                    "{}: consider buffing abilities",
                    language.language_name
                ));
            }
            BalanceStatus::Balanced => {}
        }
    }

    for (_, ability) in rank_abilities(stats) {
        let status = classify_ability(ability.win_rate_with_ability);
        let Some(new_power) = suggested_power(status, ability.ability_power) else {
            continue;
        };
        let verb = if status == BalanceStatus::Overpowered {
            "Reduce"
        } else {
            "Increase"
        };
        let entry = AbilityIssue {
            language: ability.language_name.clone(),
            ability: ability.ability_name.clone(),
            win_rate: ability.win_rate_with_ability,
            power: ability.ability_power,
            suggested_power: new_power,
            suggestion: format!(
                "{verb} power from {} to {new_power}",
                ability.ability_power
            ),
        };
        recommendations.push(format!(
            "{} - {}: {}",
            entry.language, entry.ability, entry.suggestion
        ));
        if status == BalanceStatus::Overpowered {
            issues.overpowered_abilities.push(entry);
        } else {
            issues.underpowered_abilities.push(entry);
        }
    }

    let notable_matchups = stats
        .matchup_statistics
        .values()
        .filter(|m| {
            m.language1_win_rate > NOTABLE_MATCHUP_ABOVE
                || m.language1_win_rate < NOTABLE_MATCHUP_BELOW
        })
        .map(|m| NotableMatchup {
            language1_name: m.language1_name.clone(),
            language2_name: m.language2_name.clone(),
            language1_win_rate: m.language1_win_rate,
        })
        .collect();

    BalanceReport {
        summary: BalanceSummary {
            total_battles: report.metadata.total_battles,
            languages_tested: stats.language_performance.len(),
            abilities_tested: stats.ability_performance.len(),
        },
        balance_issues: issues,
        notable_matchups,
        recommendations,
        balance_score: balance_score(stats),
    }
}

/// Human-readable balance analysis: language table, top and bottom abilities,
/// power suggestions and lopsided matchups.
pub fn render_analysis(report: &SimulationReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    let _ = writeln!(out, "Codemon Balance Analysis");
    let _ = writeln!(out, "{}", "=".repeat(50));

    let _ = writeln!(out, "\nLanguage Performance Analysis:");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let languages = rank_languages(stats);
    for (_, language) in &languages {
        let _ = writeln!(
            out,
            "{:<20} | Win Rate: {:>6} | {}",
            language.language_name,
            percent(language.win_rate),
            classify_language(language.win_rate)
        );
    }

    let abilities = rank_abilities(stats);
    let _ = writeln!(out, "\nAbility Performance Analysis:");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "Top 5 Overpowered Abilities:");
    for (rank, (_, ability)) in abilities.iter().take(5).enumerate() {
        let _ = writeln!(
            out,
            "{}. {:<15} - {:<20} | Win Rate: {:>6} | Power: {}",
            rank + 1,
            ability.language_name,
            ability.ability_name,
            percent(ability.win_rate_with_ability),
            ability.ability_power
        );
    }
    let _ = writeln!(out, "\nBottom 5 Underpowered Abilities:");
    let bottom_start = abilities.len().saturating_sub(5);
    for (rank, (_, ability)) in abilities[bottom_start..].iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {:<15} - {:<20} | Win Rate: {:>6} | Power: {}",
            rank + 1,
            ability.language_name,
            ability.ability_name,
            percent(ability.win_rate_with_ability),
            ability.ability_power
        );
    }

    if let (Some((_, strongest)), Some((_, weakest))) = (abilities.first(), abilities.last()) {
        let _ = writeln!(out, "\nBalance Recommendations:");
        let _ = writeln!(out, "{}", "-".repeat(40));
        let _ = writeln!(
            out,
            "Most Overpowered: {} - {}",
            strongest.language_name, strongest.ability_name
        );
        let _ = writeln!(
            out,
            "   Current Win Rate: {}",
            percent(strongest.win_rate_with_ability)
        );
        let _ = writeln!(
            out,
            "   Suggested: Reduce power from {} to {}",
            strongest.ability_power,
            strongest.ability_power.saturating_sub(POWER_ADJUSTMENT).max(1)
        );
        let _ = writeln!(
            out,
            "\nMost Underpowered: {} - {}",
            weakest.language_name, weakest.ability_name
        );
        let _ = writeln!(
            out,
            "   Current Win Rate: {}",
            percent(weakest.win_rate_with_ability)
        );
        let _ = writeln!(
            out,
            "   Suggested: Increase power from {} to {}",
            weakest.ability_power,
            weakest.ability_power.saturating_add(POWER_ADJUSTMENT)
        );
    }

    let _ = writeln!(out, "\nLanguage-Specific Recommendations:");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (_, language) in &languages {
        let advice = match classify_language(language.win_rate) {
            BalanceStatus::Overpowered => "Consider nerfing abilities",
            BalanceStatus::Underpowered => "Consider buffing abilities",
            BalanceStatus::Balanced => "Well balanced",
        };
        let _ = writeln!(out, "{}: {advice}", language.language_name);
    }

    let _ = writeln!(out, "\nNotable Matchups:");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for matchup in build_balance_report(report).notable_matchups {
        let marker = if matchup.language1_win_rate > NOTABLE_MATCHUP_ABOVE {
            "+"
        } else {
            "-"
        };
        let _ = writeln!(
            out,
            "{marker} {} vs {}: {} win rate",
            matchup.language1_name,
            matchup.language2_name,
            percent(matchup.language1_win_rate)
        );
    }

    out
}
