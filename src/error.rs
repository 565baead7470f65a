//! Error types raised while loading rosters, simulating battles and reading reports.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodemonError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse json '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to parse yaml '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid roster '{path}': {source}")]
    RosterShape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {0}: value is not a finite number")]
    NonFinite(String),

    #[error("unsupported document format for '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("roster is invalid: {}", .0.join("; "))]
    InvalidRoster(Vec<String>),

    #[error("roster needs at least two languages, found {0}")]
    RosterTooSmall(usize),

    #[error("unknown language '{0}'")]
    UnknownCombatant(String),

    #[error("ability index {index} out of range for '{combatant}' (expected 0 or 1)")]
    AbilityIndex { combatant: String, index: usize },
}

pub type Result<T> = std::result::Result<T, CodemonError>;
