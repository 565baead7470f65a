//! Text charts over a simulation report.

use std::fmt::Write as _;

use crate::analysis::balance::{balance_score, count_issues, BalanceVerdict};
use crate::analysis::percent;
use crate::analysis::ranking::{rank_abilities, rank_languages};
use crate::tournament::{matchup_key, SimulationReport};

pub const LANGUAGE_BAR_WIDTH: usize = 20;
pub const ABILITY_BAR_WIDTH: usize = 15;
/// Damage points per bar cell.
pub const DAMAGE_PER_CELL: f64 = 10.0;
/// Longest damage bar drawn, whatever the damage.
pub const MAX_DAMAGE_CELLS: usize = 60;
pub const TOP_ABILITIES: usize = 10;
const MATRIX_NAME_WIDTH: usize = 8;

/// `rate * width` filled cells, left-aligned in a column of `width` characters.
pub fn bar(rate: f64, width: usize) -> String {
    let cells = (rate.clamp(0.0, 1.0) * width as f64) as usize;
    format!("{:<width$}", "█".repeat(cells), width = width)
}

fn damage_bar(avg_damage: f64) -> String {
    let cells = if avg_damage.is_finite() {
        ((avg_damage.max(0.0) / DAMAGE_PER_CELL) as usize).min(MAX_DAMAGE_CELLS)
    } else {
        0
    };
    format!("{:<15}", "█".repeat(cells))
}

fn short_name(name: &str) -> String {
    name.chars().take(MATRIX_NAME_WIDTH).collect()
}

pub fn render_language_chart(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Language Win Rates");
    let _ = writeln!(out, "{}", "=".repeat(60));
    for (_, language) in rank_languages(&report.stats) {
        let _ = writeln!(
            out,
            "{:<20} |{}| {:>6}",
            language.language_name,
            bar(language.win_rate, LANGUAGE_BAR_WIDTH),
            percent(language.win_rate)
        );
    }
    out
}

pub fn render_ability_chart(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Top {TOP_ABILITIES} Ability Win Rates");
    let _ = writeln!(out, "{}", "=".repeat(70));
    for (_, ability) in rank_abilities(&report.stats).into_iter().take(TOP_ABILITIES) {
        let label = format!("{} - {}", ability.language_name, ability.ability_name);
        let _ = writeln!(
            out,
            "{:<35} |{}| {:>6}",
            label,
            bar(ability.win_rate_with_ability, ABILITY_BAR_WIDTH),
            percent(ability.win_rate_with_ability)
        );
    }
    out
}

/// Average damage per ability, in ability win-rate order.
pub fn render_damage_chart(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Average Damage by Ability");
    let _ = writeln!(out, "{}", "=".repeat(70));
    for (_, ability) in rank_abilities(&report.stats) {
        let label = format!("{} - {}", ability.language_name, ability.ability_name);
        let _ = writeln!(
            out,
            "{:<35} |{}| {:.1}",
            label,
            damage_bar(ability.avg_damage_with_ability),
            ability.avg_damage_with_ability
        );
    }
    out
}

/// Head-to-head grid. Each cell is the row language's win rate against the
/// column language, read from the stored orientation of the pair; `--` on the
/// diagonal and for pairs with no data.
pub fn render_matchup_matrix(report: &SimulationReport) -> String {
    let stats = &report.stats;
    let ids: Vec<&String> = stats.language_performance.keys().collect();
    let mut out = String::new();

    let _ = writeln!(out, "Head-to-Head Matchup Matrix");
    let _ = writeln!(out, "{}", "=".repeat(80));

    let _ = write!(out, "{:<width$}", "", width = MATRIX_NAME_WIDTH + 2);
    for id in &ids {
        let name = &stats.language_performance[*id].language_name;
        let _ = write!(out, "{:>width$}", short_name(name), width = MATRIX_NAME_WIDTH);
    }
    let _ = writeln!(out);

    for row in &ids {
        let name = &stats.language_performance[*row].language_name;
        let _ = write!(
            out,
            "{:<width$}",
            short_name(name),
            width = MATRIX_NAME_WIDTH + 2
        );
        for column in &ids {
            let cell = if row == column {
                "--".to_string()
            } else if let Some(m) = stats.matchup_statistics.get(&matchup_key(row, column)) {
                format!("{:.0}%", m.language1_win_rate * 100.0)
            } else if let Some(m) = stats.matchup_statistics.get(&matchup_key(column, row)) {
                format!("{:.0}%", m.language2_win_rate * 100.0)
            } else {
                "--".to_string()
            };
            let _ = write!(out, "{:>width$}", cell, width = MATRIX_NAME_WIDTH);
        }
        let _ = writeln!(out);
    }
    out
}

pub fn render_balance_summary(report: &SimulationReport) -> String {
    let stats = &report.stats;
    let issues = count_issues(stats);
    let mut out = String::new();

    let _ = writeln!(out, "Balance Summary");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "Total battles: {}", report.metadata.total_battles);
    let _ = writeln!(out, "Languages: {}", stats.language_performance.len());
    let _ = writeln!(out, "Abilities: {}", stats.ability_performance.len());
    let _ = writeln!(
        out,
        "Overpowered languages: {}  Underpowered languages: {}",
        issues.overpowered_languages, issues.underpowered_languages
    );
    let _ = writeln!(
        out,
        "Overpowered abilities: {}  Underpowered abilities: {}",
        issues.overpowered_abilities, issues.underpowered_abilities
    );
    match balance_score(stats) {
        Some(score) => {
            let _ = writeln!(out, "Balance score: {}", percent(score));
            let _ = writeln!(out, "{}", BalanceVerdict::from_score(score).describe());
        }
        None => {
            let _ = writeln!(out, "Balance score: n/a");
        }
    }
    out
}

/// Every chart in display order.
pub fn render_visualization(report: &SimulationReport) -> String {
    [
        render_language_chart(report),
        render_ability_chart(report),
        render_damage_chart(report),
        render_matchup_matrix(report),
        render_balance_summary(report),
    ]
    .join("\n")
}
