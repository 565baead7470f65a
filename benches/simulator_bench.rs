//! Battle throughput benchmarks: single battles and a small round-robin tournament.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use codemon::combat::{simulate_battle, BattleConfig, Rng, TieBreak, TurnOrder};
use codemon::config::TournamentConfig;
use codemon::data::{Ability, AbilityType, BaseStats, Combatant, Roster};
use codemon::tournament::{aggregate, run_tournament};

fn fighter(id: &str, attack: f64, speed: f64) -> Combatant {
    let ability = |name: &str, ability_type: AbilityType, power: u32| Ability {
        name: format!("{id}-{name}"),
        ability_type,
        power,
        accuracy: 90.0,
    };
    Combatant {
        id: id.to_string(),
        name: id.to_uppercase(),
        base_stats: BaseStats {
            hp: 100.0,
            max_hp: 100.0,
            attack,
            defense: 70.0,
            special_attack: attack + 5.0,
            special_defense: 75.0,
            speed,
        },
        abilities: [
            ability("strike", AbilityType::Physical, 60),
            ability("surge", AbilityType::Special, 55),
        ],
    }
}

fn bench_battles(c: &mut Criterion) {
    let first = fighter("rust", 80.0, 80.0);
    let second = fighter("go", 78.0, 75.0);

    let mut group = c.benchmark_group("battle");
    group.throughput(Throughput::Elements(1));

    for (label, turn_order) in [
        ("by_speed", TurnOrder::BySpeed(TieBreak::CoinFlip)),
        ("fixed", TurnOrder::Fixed),
    ] {
        let config = BattleConfig {
            turn_order,
            ..BattleConfig::default()
        };
        group.bench_function(label, |b| {
            let mut rng = Rng::new(7);
            b.iter(|| black_box(simulate_battle(&first, &second, 0, 1, config, &mut rng)));
        });
    }
    group.finish();
}

fn bench_tournament(c: &mut Criterion) {
    let roster = Roster::new(
        ["rust", "go", "python", "java", "c", "zig"]
            .iter()
            .enumerate()
            .map(|(i, id)| fighter(id, 70.0 + i as f64 * 3.0, 60.0 + i as f64 * 5.0))
            .collect(),
    );
    let config = TournamentConfig {
        battles_per_matchup: 20,
        ..TournamentConfig::default()
    };

    let mut group = c.benchmark_group("tournament");
    group.sample_size(30);
    group.throughput(Throughput::Elements(15 * 20));
    group.bench_function("six_languages_20_each", |b| {
        let mut rng = Rng::new(7);
        b.iter(|| {
            let records = run_tournament(&roster, &config, &mut rng);
            if let Ok(records) = records {
                black_box(aggregate(&roster, &records));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_battles, bench_tournament);
criterion_main!(benches);
