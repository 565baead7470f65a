use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use codemon::analysis::{
    balance_score, build_balance_report, classify_language, compare_reports, count_issues,
    rank_abilities, rank_languages, render_analysis, render_comparison, render_visualization,
    BalanceReport, BalanceStatus,
};
use codemon::analysis::visualize::render_damage_chart;
use codemon::config::TournamentConfig;
use codemon::data::{Ability, AbilityType, BaseStats, Combatant, Roster};
use codemon::tournament::{simulate_roster, SimulationReport};

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("codemon-{name}-{stamp}.json"))
}

fn language(id: &str, name: &str, attack: f64, speed: f64) -> Combatant {
    let ability = |name: &str, ability_type: AbilityType, power: u32| Ability {
        name: name.to_string(),
        ability_type,
        power,
        accuracy: 95.0,
    };
    Combatant {
        id: id.to_string(),
        name: name.to_string(),
        base_stats: BaseStats {
            hp: 100.0,
            max_hp: 100.0,
            attack,
            defense: 70.0,
            special_attack: attack,
            special_defense: 70.0,
            speed,
        },
        abilities: [
            ability("Compile", AbilityType::Physical, 50),
            ability("Interpret", AbilityType::Special, 50),
        ],
    }
}

/// One dominant, one hopeless and one middling language.
fn lopsided_report() -> SimulationReport {
    let roster = Roster::new(vec![
        language("titan", "Titanium", 220.0, 120.0),
        language("mid", "Middleware", 80.0, 60.0),
        language("weak", "Weakling", 20.0, 10.0),
    ]);
    let config = TournamentConfig {
        battles_per_matchup: 60,
        seed: Some(31),
        ..TournamentConfig::default()
    };
    simulate_roster(&roster, &config).expect("roster is valid")
}

#[test]
fn dominant_language_ranks_first_and_is_overpowered() {
    let report = lopsided_report();
    let ranked = rank_languages(&report.stats);
    assert_eq!(ranked[0].0, "titan");
    assert_eq!(ranked[2].0, "weak");
    assert_eq!(classify_language(ranked[0].1.win_rate), BalanceStatus::Overpowered);
    assert_eq!(classify_language(ranked[2].1.win_rate), BalanceStatus::Underpowered);

    let abilities = rank_abilities(&report.stats);
    assert!(abilities[0].0.starts_with("titan_"));
}

#[test]
fn balance_report_lists_issues_and_scores() {
    let report = lopsided_report();
    let balance = build_balance_report(&report);

    assert_eq!(balance.summary.total_battles, 180);
    assert_eq!(balance.summary.languages_tested, 3);
    assert_eq!(balance.summary.abilities_tested, 6);
    assert!(balance
        .balance_issues
        .overpowered_languages
        .iter()
        .any(|issue| issue.language == "Titanium"));
    assert!(balance
        .balance_issues
        .underpowered_languages
        .iter()
        .any(|issue| issue.language == "Weakling"));
    for issue in &balance.balance_issues.overpowered_abilities {
        assert_eq!(issue.suggested_power, 30);
    }
    for issue in &balance.balance_issues.underpowered_abilities {
        assert_eq!(issue.suggested_power, 70);
    }
    assert!(!balance.notable_matchups.is_empty());

    let score = balance.balance_score.expect("report has items");
    assert!((0.0..=1.0).contains(&score));
    let issues = count_issues(&report.stats).total();
    let expected = (9 - issues) as f64 / 9.0;
    assert!((score - expected).abs() < 1e-12);
    assert_eq!(balance_score(&report.stats), Some(score));
}

#[test]
fn balance_report_writes_json() {
    let balance = build_balance_report(&lopsided_report());
    let path = unique_temp_path("balance");
    balance.write(&path).expect("balance report writes");

    let raw = std::fs::read_to_string(&path).expect("balance report reads");
    let _ = std::fs::remove_file(&path);
    let parsed: BalanceReport = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(parsed.summary, balance.summary);
    assert_eq!(parsed.recommendations, balance.recommendations);
    assert_eq!(
        parsed.balance_issues.overpowered_languages.len(),
        balance.balance_issues.overpowered_languages.len()
    );
    assert_eq!(parsed.notable_matchups.len(), balance.notable_matchups.len());
    let score = parsed.balance_score.expect("score survives");
    assert!((score - balance.balance_score.unwrap_or_default()).abs() < 1e-9);
}

#[test]
fn text_renderings_mention_every_language() {
    let report = lopsided_report();
    let analysis = render_analysis(&report);
    let charts = render_visualization(&report);

    for name in ["Titanium", "Middleware", "Weakling"] {
        assert!(analysis.contains(name), "analysis is missing {name}");
        assert!(charts.contains(name), "charts are missing {name}");
    }
    assert!(analysis.contains("OVERPOWERED"));
    assert!(charts.contains("Head-to-Head Matchup Matrix"));
    assert!(charts.contains("--"));
    assert!(charts.contains('█'));
}

#[test]
fn comparing_a_report_with_itself_shows_no_change() {
    let report = lopsided_report();
    let comparison = compare_reports(&report, &report);

    assert_eq!(comparison.languages.len(), 3);
    assert!(comparison.languages.iter().all(|l| l.change == 0.0));
    assert_eq!(comparison.issue_delta(), 0);
    assert!(comparison.improved.is_empty());
    assert!(comparison.declined.is_empty());
    assert!(render_comparison(&comparison).contains("No change in issue count"));
}

#[test]
fn large_ability_swings_are_listed() {
    let before = lopsided_report();
    let mut after = before.clone();
    let boosted = after
        .stats
        .ability_performance
        .get_mut("mid_0")
        .expect("mid used its first ability");
    boosted.win_rate_with_ability += 0.25;
    let dropped = after
        .stats
        .ability_performance
        .get_mut("mid_1")
        .expect("mid used its second ability");
    dropped.win_rate_with_ability -= 0.25;

    let comparison = compare_reports(&before, &after);
    assert_eq!(comparison.improved.len(), 1);
    assert_eq!(comparison.improved[0].ability_name, "Compile");
    assert_eq!(comparison.declined.len(), 1);
    assert_eq!(comparison.declined[0].ability_name, "Interpret");
    assert!(comparison.top_abilities.len() <= 5);
}

#[test]
fn damage_chart_has_a_row_per_ability_in_win_rate_order() {
    let report = lopsided_report();
    let chart = render_damage_chart(&report);
    assert!(chart.starts_with("Average Damage by Ability"));

    let ranked = rank_abilities(&report.stats);
    let rows: Vec<&str> = chart.lines().skip(2).collect();
    assert_eq!(rows.len(), ranked.len());
    for (row, (_, ability)) in rows.iter().zip(&ranked) {
        let label = format!("{} - {}", ability.language_name, ability.ability_name);
        assert!(row.starts_with(&label), "row '{row}' should start with '{label}'");
        assert!(row.ends_with(&format!("{:.1}", ability.avg_damage_with_ability)));
    }
}

#[test]
fn comparison_rows_show_the_balance_status_after() {
    let report = lopsided_report();
    let rendered = render_comparison(&compare_reports(&report, &report));

    let titan_row = rendered
        .lines()
        .find(|line| line.starts_with("Titanium"))
        .expect("Titanium has a row");
    assert!(titan_row.ends_with("OVERPOWERED"), "{titan_row}");
    let weak_row = rendered
        .lines()
        .find(|line| line.starts_with("Weakling"))
        .expect("Weakling has a row");
    assert!(weak_row.ends_with("UNDERPOWERED"), "{weak_row}");
}
