//! Run the battle benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, battles_per_sec, battles_per_min, turns_per_sec, turns_per_battle).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::Instant;

use codemon::combat::{simulate_battle, BattleConfig, Rng};
use codemon::data::{Ability, AbilityType, BaseStats, Combatant};

const LOG_PATH: &str = "benchmark_log.csv";
const LOG_HEADER: &[u8] = b"date,battles_per_sec,battles_per_min,turns_per_sec,turns_per_battle\n";

fn fighter(id: &str, speed: f64) -> Combatant {
    let ability = |name: &str, ability_type: AbilityType, power: u32| Ability {
        name: name.to_string(),
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
            attack: 80.0,
            defense: 70.0,
            special_attack: 85.0,
            special_defense: 75.0,
            speed,
        },
        abilities: [
            ability("Strike", AbilityType::Physical, 60),
            ability("Surge", AbilityType::Special, 55),
        ],
    }
}

fn append_log(line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(LOG_HEADER)?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let first = fighter("rust", 80.0);
    let second = fighter("go", 75.0);
    let config = BattleConfig::default();
    let mut rng = Rng::new(7);

    // Run for at least this long or this many battles
    const MIN_DURATION_MS: u128 = 2000;
    const MIN_BATTLES: u32 = 5000;

    let start = Instant::now();
    let mut battles: u32 = 0;
    let mut turns: u64 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || battles < MIN_BATTLES {
        let ability1 = battles as usize % 2;
        let ability2 = (battles as usize / 2) % 2;
        match simulate_battle(&first, &second, ability1, ability2, config, &mut rng) {
            Ok(result) => turns += u64::from(result.turns_taken),
            Err(err) => {
                eprintln!("benchmark battle failed: {err}");
                std::process::exit(1);
            }
        }
        battles += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let battles_per_sec = battles as f64 / elapsed_secs;
    let battles_per_min = battles_per_sec * 60.0;
    let turns_per_sec = turns as f64 / elapsed_secs;
    let turns_per_battle = turns as f64 / battles as f64;

    println!("Battle benchmark:");
    println!("  Battles:      {battles}");
    println!("  Duration:     {elapsed_secs:.2} s");
    println!("  Battles/s:    {battles_per_sec:.2}");
    println!("  Battles/min:  {battles_per_min:.2}");
    println!("  Turns/s:      {turns_per_sec:.2}");
    println!("  Turns/battle: {turns_per_battle:.2}");

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{date},{battles_per_sec:.4},{battles_per_min:.4},{turns_per_sec:.4},{turns_per_battle:.4}\n"
        );
        if let Err(err) = append_log(&line) {
            eprintln!("failed to append {LOG_PATH}: {err}");
            std::process::exit(1);
        }
        println!("Appended to {LOG_PATH}");
    }
}
