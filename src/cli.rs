use std::fmt::Write as _;

use crate::analysis::{
    build_balance_report, compare_reports, percent, rank_languages, render_analysis,
    render_comparison, render_visualization, DEFAULT_BALANCE_REPORT_PATH,
};
use crate::combat::TurnOrder;
use crate::config::{self, parse_or_default, TournamentConfig};
use crate::data::{load_roster, validate_roster, ValidationSeverity};
use crate::tournament::{load_report, simulate_roster, SimulationReport};

const USAGE: &str = "usage: codemon <simulate|analyze|visualize|compare|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Analyze,
    Visualize,
    Compare,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("analyze") => Some(Command::Analyze),
        Some("visualize") => Some(Command::Visualize),
        Some("compare") => Some(Command::Compare),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Analyze) => handle_analyze(args),
        Some(Command::Visualize) => handle_visualize(args),
        Some(Command::Compare) => handle_compare(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Arguments after the subcommand, split into positionals and `--flag value` pairs.
struct CommandArgs<'a> {
    positional: Vec<&'a String>,
    flags: Vec<(&'a str, Option<&'a String>)>,
}

impl<'a> CommandArgs<'a> {
    fn parse(args: &'a [String]) -> Self {
        let mut positional = Vec::new();
        let mut flags = Vec::new();
        let mut rest = args.iter().skip(2);
        while let Some(arg) = rest.next() {
            if let Some(name) = arg.strip_prefix("--") {
                flags.push((name, rest.next()));
            } else {
                positional.push(arg);
            }
        }
        Self { positional, flags }
    }

    fn positional(&self, index: usize) -> Option<&'a String> {
        self.positional.get(index).copied()
    }

    fn flag(&self, name: &str) -> Option<&'a String> {
        self.flags
            .iter()
            .find(|(flag, _)| *flag == name)
            .and_then(|(_, value)| *value)
    }
}

fn handle_simulate(args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let roster_path = parsed
        .positional(0)
        .cloned()
        .unwrap_or_else(config::roster_path);
    let output = parsed.flag("out").cloned().unwrap_or_else(config::output_path);

    let mut tournament = TournamentConfig::from_env();
    tournament.battles_per_matchup = parse_u32_arg(
        parsed.positional(1),
        "battles",
        tournament.battles_per_matchup,
    );
    if let Some(raw) = parsed.positional(2) {
        match raw.parse::<u64>() {
            Ok(seed) => tournament.seed = Some(seed),
            Err(_) => eprintln!("invalid seed '{raw}', using an entropy seed"),
        }
    }
    if let Some(raw) = parsed.flag("turn-order") {
        tournament.turn_order =
            parse_or_default::<TurnOrder>(Some(raw.as_str()), "turn-order", tournament.turn_order);
    }

    let roster = match load_roster(&roster_path) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("failed to load roster: {err}");
            return 1;
        }
    };
    let validation = validate_roster(&roster);
    for diagnostic in &validation.diagnostics {
        if diagnostic.severity == ValidationSeverity::Warning {
            tracing::warn!("{diagnostic}");
        }
    }
    if let Err(err) = validation.into_result() {
        eprintln!("roster rejected: {err}");
        return 1;
    }

    let report = match simulate_roster(&roster, &tournament) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };
    if let Err(err) = report.write(&output) {
        eprintln!("failed to write results: {err}");
        return 1;
    }

    print!("{}", simulation_summary(&report, &output));
    0
}

fn simulation_summary(report: &SimulationReport, output: &str) -> String {
    let mut out = String::new();
    let meta = &report.metadata;
    let _ = writeln!(
        out,
        "simulated {} battles across {} languages ({} per matchup)",
        meta.total_battles, meta.languages_simulated, meta.battles_per_matchup
    );
    if let Some(seed) = meta.random_seed {
        let _ = writeln!(out, "seed: {seed}");
    }
    let _ = writeln!(out, "results written to {output}");
    let _ = writeln!(out, "\nLanguage rankings:");
    for (rank, (_, language)) in rank_languages(&report.stats).iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<20} {:>6} ({}W/{}L)",
            rank + 1,
            language.language_name,
            percent(language.win_rate),
            language.wins,
            language.losses
        );
    }
    out
}

fn load_results(path: &str) -> Option<SimulationReport> {
    match load_report(path) {
        Ok(report) => Some(report),
        Err(err) => {
            eprintln!("failed to load results: {err}");
            None
        }
    }
}

fn handle_analyze(args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let path = parsed
        .positional(0)
        .cloned()
        .unwrap_or_else(config::output_path);
    let Some(report) = load_results(&path) else {
        return 1;
    };

    print!("{}", render_analysis(&report));

    let report_path = parsed
        .flag("report")
        .map(String::as_str)
        .unwrap_or(DEFAULT_BALANCE_REPORT_PATH);
    if let Err(err) = build_balance_report(&report).write(report_path) {
        eprintln!("failed to write balance report: {err}");
        return 1;
    }
    println!("\nbalance report written to {report_path}");
    0
}

fn handle_visualize(args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let path = parsed
        .positional(0)
        .cloned()
        .unwrap_or_else(config::output_path);
    let Some(report) = load_results(&path) else {
        return 1;
    };
    print!("{}", render_visualization(&report));
    0
}

fn handle_compare(args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let (Some(before_path), Some(after_path)) = (parsed.positional(0), parsed.positional(1))
    else {
        eprintln!("usage: codemon compare <before-results.json> <after-results.json>");
        return 2;
    };

    let (Some(before), Some(after)) = (load_results(before_path), load_results(after_path)) else {
        return 1;
    };
    print!("{}", render_comparison(&compare_reports(&before, &after)));
    0
}

fn handle_validate(args: &[String]) -> i32 {
    let parsed = CommandArgs::parse(args);
    let path = parsed
        .positional(0)
        .cloned()
        .unwrap_or_else(config::roster_path);

    let roster = match load_roster(&path) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_roster(&roster);
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s)",
            report.errors().count()
        );
        1
    } else {
        println!(
            "validation passed: {path} ({} languages, {} diagnostics)",
            roster.len(),
            report.diagnostics.len()
        );
        0
    }
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
