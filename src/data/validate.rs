use std::collections::HashSet;
use std::fmt;

use crate::combat::{scaled_damage, stat_pair, MAX_TURNS};
use crate::data::roster::{Combatant, Roster, ABILITIES_PER_LANGUAGE};
use crate::error::{CodemonError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }

    /// Turn a report with errors into [CodemonError::InvalidRoster].
    pub fn into_result(self) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }
        Err(CodemonError::InvalidRoster(
            self.errors().map(ToString::to_string).collect(),
        ))
    }
}

pub fn validate_roster(roster: &Roster) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids = HashSet::new();

    if roster.len() < 2 {
        report.push(
            ValidationSeverity::Error,
            "languages",
            format!("need at least two languages, found {}", roster.len()),
        );
    }

    for (index, language) in roster.languages.iter().enumerate() {
        let base_context = format!("languages[{index}]");

        if language.id.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{base_context}.id"),
                "missing non-empty 'id'",
            );
        } else if !seen_ids.insert(language.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("{base_context}.id"),
                format!("duplicate id '{}'", language.id),
            );
        }

        if language.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{base_context}.name"),
                "missing non-empty 'name'",
            );
        }

        validate_base_stats(&mut report, language, &base_context);
        validate_abilities(&mut report, language, &base_context);
    }

    validate_damage_bounds(&mut report, roster);

    report
}

fn validate_base_stats(report: &mut ValidationReport, language: &Combatant, base_context: &str) {
    let context = format!("{base_context} id='{}'.base_stats", language.id);
    let stats = &language.base_stats;

    let named = [
        ("hp", stats.hp),
        ("maxHp", stats.max_hp),
        ("attack", stats.attack),
        ("defense", stats.defense),
        ("specialAttack", stats.special_attack),
        ("specialDefense", stats.special_defense),
        ("speed", stats.speed),
    ];
    for (name, value) in named {
        if !value.is_finite() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{name}"),
                format!("expected a finite number, found {value}"),
            );
        } else if value < 0.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{name}"),
                format!("negative stat {value}"),
            );
        }
    }

    if stats.hp <= 0.0 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.hp"),
            "hp must be positive",
        );
    }
    if stats.hp > stats.max_hp {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.hp"),
            format!("hp {} exceeds maxHp {}", stats.hp, stats.max_hp),
        );
    }
    // Damage divides by these.
    for (name, value) in [
        ("defense", stats.defense),
        ("specialDefense", stats.special_defense),
    ] {
        if value == 0.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{name}"),
                "defense stats must be positive",
            );
        }
    }
}

fn validate_abilities(report: &mut ValidationReport, language: &Combatant, base_context: &str) {
    for (ability_index, ability) in language.abilities.iter().enumerate() {
        let context = format!(
            "{base_context} id='{}'.abilities[{ability_index}]",
            language.id
        );

        if ability.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            );
        }

        if !(0.0..=100.0).contains(&ability.accuracy) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.accuracy"),
                format!("accuracy {} outside 0-100", ability.accuracy),
            );
        }

        if !ability.ability_type.is_damaging() {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.type"),
                format!(
                    "non-damaging type '{}' deals raw power {}",
                    ability.ability_type, ability.power
                ),
            );
        }
    }

    if language.abilities[0].name == language.abilities[ABILITIES_PER_LANGUAGE - 1].name {
        report.push(
            ValidationSeverity::Warning,
            format!("{base_context} id='{}'.abilities", language.id),
            "both abilities share a name; comparisons keyed by ability name will merge them",
        );
    }
}

/// Every damaging ability, at full jitter and over a full-length battle, must
/// deal a finite amount to every opponent. Defenders with a non-positive
/// defense stat are already reported above.
fn validate_damage_bounds(report: &mut ValidationReport, roster: &Roster) {
    for attacker in &roster.languages {
        for (ability_index, ability) in attacker.abilities.iter().enumerate() {
            let Some((offense_stat, defense_stat)) = stat_pair(&ability.ability_type) else {
                continue;
            };
            let offense = offense_stat.base_value(&attacker.base_stats);
            for defender in roster.languages.iter().filter(|d| d.id != attacker.id) {
                let defense = defense_stat.base_value(&defender.base_stats);
                if defense <= 0.0 || !defense.is_finite() || !offense.is_finite() {
                    continue;
                }
                let per_hit = scaled_damage(f64::from(ability.power), offense, defense, 1.0);
                if !(per_hit * f64::from(MAX_TURNS)).is_finite() {
                    report.push(
                        ValidationSeverity::Error,
                        format!(
                            "id='{}'.abilities[{ability_index}] vs id='{}'",
                            attacker.id, defender.id
                        ),
                        format!(
                            "damage is not finite ({} power, {offense} offense, {defense} defense)",
                            ability.power
                        ),
                    );
                }
            }
        }
    }
}
