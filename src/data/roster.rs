//! Roster data: the languages that fight, their base stats and their two abilities.
//! Loaded once per run from `codemon_battle_simulator.json` (or a YAML equivalent).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CodemonError, Result};

pub const DEFAULT_ROSTER_PATH: &str = "codemon_battle_simulator.json";

/// Every language carries exactly this many abilities.
pub const ABILITIES_PER_LANGUAGE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: f64,
    pub max_hp: f64,
    pub attack: f64,
    pub defense: f64,
    pub special_attack: f64,
    pub special_defense: f64,
    pub speed: f64,
}

/// Damage category of an ability. Anything other than `Physical` or `Special` is a
/// non-damaging category whose name is preserved verbatim (e.g. `Status`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AbilityType {
    Physical,
    Special,
    Other(String),
}

impl AbilityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Physical => "Physical",
            Self::Special => "Special",
            Self::Other(name) => name,
        }
    }

    pub fn is_damaging(&self) -> bool {
        matches!(self, Self::Physical | Self::Special)
    }
}

impl From<String> for AbilityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Physical" => Self::Physical,
            "Special" => Self::Special,
            _ => Self::Other(value),
        }
    }
}

impl From<AbilityType> for String {
    fn from(value: AbilityType) -> Self {
        match value {
            AbilityType::Physical => "Physical".to_string(),
            AbilityType::Special => "Special".to_string(),
            AbilityType::Other(name) => name,
        }
    }
}

impl fmt::Display for AbilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(rename = "type")]
    pub ability_type: AbilityType,
    pub power: u32,
    /// Percent chance to connect, 0-100.
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub base_stats: BaseStats,
    pub abilities: [Ability; ABILITIES_PER_LANGUAGE],
}

impl Combatant {
    pub fn ability(&self, index: usize) -> Result<&Ability> {
        self.abilities
            .get(index)
            .ok_or_else(|| CodemonError::AbilityIndex {
                combatant: self.id.clone(),
                index,
            })
    }
}

/// The full set of languages taking part in a tournament, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub languages: Vec<Combatant>,
}

impl Roster {
    pub fn new(languages: Vec<Combatant>) -> Self {
        Self {
            metadata: None,
            languages,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.languages.iter().find(|language| language.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Combatant> {
        self.get(id)
            .ok_or_else(|| CodemonError::UnknownCombatant(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Every unordered pair `(i, j)` with `i < j` over file order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Combatant, &Combatant)> + '_ {
        self.languages.iter().enumerate().flat_map(move |(i, first)| {
            self.languages[i + 1..].iter().map(move |second| (first, second))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            _ => Err(CodemonError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parse a roster from raw text. Accepts either `{ "languages": [...] }` or a bare
/// top-level array. Structural problems (missing fields, wrong ability count, wrong
/// types) fail here; semantic checks live in [crate::data::validate].
pub fn parse_roster(raw: &str, format: DocumentFormat, path: &Path) -> Result<Roster> {
    let document = parse_document(raw, format, path)?;
    let roster = if document.is_array() {
        serde_json::from_value(document).map(Roster::new)
    } else {
        serde_json::from_value(document)
    };
    roster.map_err(|source| CodemonError::RosterShape {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse JSON or YAML text into a generic document tree.
pub fn parse_document(raw: &str, format: DocumentFormat, path: &Path) -> Result<Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(raw).map_err(|source| CodemonError::Json {
            path: path.to_path_buf(),
            source,
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(raw).map_err(|source| CodemonError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|source| CodemonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let roster = parse_roster(&raw, format, path)?;
    tracing::info!(
        path = %path.display(),
        languages = roster.len(),
        "loaded roster"
    );
    Ok(roster)
}
