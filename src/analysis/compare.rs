//! Before/after comparison of two simulation reports, used after a balance
//! patch to see what moved.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::analysis::balance::{classify_language, count_issues, IssueCounts};
use crate::analysis::{percent, signed_percent};
use crate::tournament::SimulationReport;

/// Ability win-rate swing that counts as an improvement or a decline.
pub const SIGNIFICANT_CHANGE: f64 = 0.10;
pub const LISTED_CHANGES: usize = 5;
pub const TOP_ABILITIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageChange {
    pub id: String,
    pub name: String,
    pub before: f64,
    pub after: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityChange {
    pub language_name: String,
    pub ability_name: String,
    /// Absent when the ability did not appear in the earlier report.
    pub before: Option<f64>,
    pub after: f64,
}

impl AbilityChange {
    pub fn change(&self) -> Option<f64> {
        self.before.map(|before| self.after - before)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub battles_before: usize,
    pub battles_after: usize,
    pub languages: Vec<LanguageChange>,
    pub top_abilities: Vec<AbilityChange>,
    pub issues_before: IssueCounts,
    pub issues_after: IssueCounts,
    pub improved: Vec<AbilityChange>,
    pub declined: Vec<AbilityChange>,
}

impl Comparison {
    /// Positive when the later report has fewer balance issues.
    pub fn issue_delta(&self) -> i64 {
        self.issues_before.total() as i64 - self.issues_after.total() as i64
    }
}

pub fn compare_reports(before: &SimulationReport, after: &SimulationReport) -> Comparison {
    let languages = before
        .stats
        .language_performance
        .iter()
        .filter_map(|(id, old)| {
            let new = after.stats.language_performance.get(id)?;
            Some(LanguageChange {
                id: id.clone(),
                name: new.language_name.clone(),
                before: old.win_rate,
                after: new.win_rate,
                change: new.win_rate - old.win_rate,
            })
        })
        .collect();

    // Abilities match by display names so a re-keyed roster still lines up.
    let mut previous: HashMap<(&str, &str), f64> = HashMap::new();
    for ability in before.stats.ability_performance.values() {
        previous
            .entry((ability.language_name.as_str(), ability.ability_name.as_str()))
            .or_insert(ability.win_rate_with_ability);
    }

    let changes: Vec<AbilityChange> = after
        .stats
        .ability_performance
        .values()
        .map(|ability| AbilityChange {
            language_name: ability.language_name.clone(),
            ability_name: ability.ability_name.clone(),
            before: previous
                .get(&(ability.language_name.as_str(), ability.ability_name.as_str()))
                .copied(),
            after: ability.win_rate_with_ability,
        })
        .collect();

    let mut top_abilities = changes.clone();
    top_abilities.sort_by(|left, right| right.after.total_cmp(&left.after));
    top_abilities.truncate(TOP_ABILITIES);

    let improved = changes
        .iter()
        .filter(|c| c.change().is_some_and(|d| d > SIGNIFICANT_CHANGE))
        .take(LISTED_CHANGES)
        .cloned()
        .collect();
    let declined = changes
        .iter()
        .filter(|c| c.change().is_some_and(|d| d < -SIGNIFICANT_CHANGE))
        .take(LISTED_CHANGES)
        .cloned()
        .collect();

    Comparison {
        battles_before: before.metadata.total_battles,
        battles_after: after.metadata.total_battles,
        languages,
        top_abilities,
        issues_before: count_issues(&before.stats),
        issues_after: count_issues(&after.stats),
        improved,
        declined,
    }
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Balance Comparison: Before vs After");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "Battles: {} before, {} after",
        comparison.battles_before, comparison.battles_after
    );

    let _ = writeln!(out, "\nLanguage Win Rate Changes:");
    let _ = writeln!(out, "{}", "-".repeat(60));
    for language in &comparison.languages {
        let _ = writeln!(
            out,
            "{:<20} {:>6} -> {:>6} ({:>7}) {}",
            language.name,
            percent(language.before),
            percent(language.after),
            signed_percent(language.change),
            classify_language(language.after)
        );
    }

    let _ = writeln!(out, "\nTop {TOP_ABILITIES} Abilities After:");
    let _ = writeln!(out, "{}", "-".repeat(60));
    for ability in &comparison.top_abilities {
        let change = ability
            .change()
            .map(signed_percent)
            .unwrap_or_else(|| "new".to_string());
        let _ = writeln!(
            out,
            "{:<15} - {:<20} {:>6} ({change})",
            ability.language_name,
            ability.ability_name,
            percent(ability.after)
        );
    }

    let _ = writeln!(out, "\nBalance Issues:");
    let _ = writeln!(out, "{}", "-".repeat(60));
    let rows = [
        (
            "Overpowered languages",
            comparison.issues_before.overpowered_languages,
            comparison.issues_after.overpowered_languages,
        ),
        (
            "Underpowered languages",
            comparison.issues_before.underpowered_languages,
            comparison.issues_after.underpowered_languages,
        ),
        (
            "Overpowered abilities",
            comparison.issues_before.overpowered_abilities,
            comparison.issues_after.overpowered_abilities,
        ),
        (
            "Underpowered abilities",
            comparison.issues_before.underpowered_abilities,
            comparison.issues_after.underpowered_abilities,
        ),
    ];
    for (label, before, after) in rows {
        let _ = writeln!(out, "{label:<24} {before:>3} -> {after:>3}");
    }
    let delta = comparison.issue_delta();
    let verdict = match delta {
        d if d > 0 => format!("Improved: {d} fewer issues"),
        d if d < 0 => format!("Worse: {} more issues", -d),
        _ => "No change in issue count".to_string(),
    };
    let _ = writeln!(out, "{verdict}");

    for (title, list) in [
        ("Improved abilities", &comparison.improved),
        ("Declined abilities", &comparison.declined),
    ] {
        if list.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{title}:");
        for ability in list {
            let _ = writeln!(
                out,
                "  {} - {}: {}",
                ability.language_name,
                ability.ability_name,
                ability
                    .change()
                    .map(signed_percent)
                    .unwrap_or_default()
            );
        }
    }

    out
}
