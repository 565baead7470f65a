pub mod roster;
pub mod validate;

pub use roster::{
    load_roster, parse_document, parse_roster, Ability, AbilityType, BaseStats, Combatant,
    DocumentFormat, Roster, ABILITIES_PER_LANGUAGE, DEFAULT_ROSTER_PATH,
};
pub use validate::{
    validate_roster, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};
