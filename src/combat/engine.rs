//! Turn loop for a single battle between two languages.
//!
//! Each turn both effective speeds are recomputed and the faster side acts
//! first. A side knocked out by the first action does not act that turn. The
//! loop stops when either side reaches 0 HP or after [MAX_TURNS] turns.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combat::damage::{resolve_hit, HitOutcome};
use crate::combat::rng::Rng;
use crate::combat::stats::{StageModifiers, Stat};
use crate::data::roster::{Ability, Combatant};
use crate::error::Result;

/// Hard cap on turns per battle.
pub const MAX_TURNS: u32 = 50;

/// Which side acts first when both effective speeds are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// One uniform draw per tied turn.
    #[default]
    CoinFlip,
    /// Side one always wins the tie.
    SideOne,
    /// Side one on odd turns, side two on even turns.
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnOrder {
    /// Faster side acts first; ties go to the [TieBreak] rule.
    BySpeed(TieBreak),
    /// Side one always acts first regardless of speed.
    Fixed,
}

impl Default for TurnOrder {
    fn default() -> Self {
        Self::BySpeed(TieBreak::default())
    }
}

impl TurnOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BySpeed(TieBreak::CoinFlip) => "speed",
            Self::BySpeed(TieBreak::SideOne) => "speed-side-one",
            Self::BySpeed(TieBreak::Alternate) => "speed-alternate",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for TurnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TurnOrder {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "speed" | "speed-coin-flip" => Ok(Self::BySpeed(TieBreak::CoinFlip)),
            "speed-side-one" => Ok(Self::BySpeed(TieBreak::SideOne)),
            "speed-alternate" => Ok(Self::BySpeed(TieBreak::Alternate)),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!(
                "unknown turn order '{other}' (expected speed, speed-side-one, speed-alternate or fixed)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleConfig {
    pub turn_order: TurnOrder,
    pub max_turns: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_order: TurnOrder::default(),
            max_turns: MAX_TURNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    InProgress,
    Concluded,
}

/// Winner rule applied when a battle concludes: side one wins while it has HP
/// left, otherwise side two. A turn-cap finish with both alive therefore goes
/// to side one, and a simultaneous knockout goes to side two.
pub fn decide_winner(hp_one: f64) -> Side {
    if hp_one > 0.0 {
        Side::One
    } else {
        Side::Two
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: String,
    pub loser: String,
    pub winner_hp_remaining: f64,
    pub turns_taken: u32,
    pub winner_ability_used: String,
    pub loser_ability_used: String,
    /// Total damage dealt by each language, keyed by id.
    pub damage_dealt: BTreeMap<String, f64>,
    /// Both sides were still standing when the turn cap ended the battle.
    #[serde(default)]
    pub ended_by_turn_cap: bool,
}

/// What happened in one turn. `actions` is indexed by side; `None` means that
/// side did not act.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnSummary {
    pub turn: u32,
    pub first_mover: Side,
    pub actions: [Option<HitOutcome>; 2],
}

#[derive(Debug, Clone)]
struct Fighter<'a> {
    combatant: &'a Combatant,
    ability: &'a Ability,
    hp: f64,
    modifiers: StageModifiers,
    damage_dealt: f64,
}

impl<'a> Fighter<'a> {
    fn new(combatant: &'a Combatant, ability_index: usize) -> Result<Self> {
        Ok(Self {
            combatant,
            ability: combatant.ability(ability_index)?,
            hp: combatant.base_stats.hp,
            modifiers: StageModifiers::new(),
            damage_dealt: 0.0,
        })
    }

    fn speed(&self) -> f64 {
        self.modifiers.effective(&self.combatant.base_stats, Stat::Speed)
    }

    fn is_standing(&self) -> bool {
        self.hp > 0.0
    }
}

/// A battle in progress. Holds private HP and stage snapshots; the roster
/// definitions are only borrowed.
#[derive(Debug, Clone)]
pub struct Battle<'a> {
    sides: [Fighter<'a>; 2],
    turn: u32,
    config: BattleConfig,
}

impl<'a> Battle<'a> {
    pub fn new(
        first: &'a Combatant,
        second: &'a Combatant,
        first_ability: usize,
        second_ability: usize,
        config: BattleConfig,
    ) -> Result<Self> {
        Ok(Self {
            sides: [
                Fighter::new(first, first_ability)?,
                Fighter::new(second, second_ability)?,
            ],
            turn: 0,
            config,
        })
    }

    /// Replace the stage modifiers of one side.
    pub fn with_modifiers(mut self, side: Side, modifiers: StageModifiers) -> Self {
        self.sides[side.index()].modifiers = modifiers;
        self
    }

    pub fn modifiers_mut(&mut self, side: Side) -> &mut StageModifiers {
        &mut self.sides[side.index()].modifiers
    }

    pub fn hp(&self, side: Side) -> f64 {
        self.sides[side.index()].hp
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> BattlePhase {
        let both_standing = self.sides.iter().all(Fighter::is_standing);
        if both_standing && self.turn < self.config.max_turns {
            BattlePhase::InProgress
        } else {
            BattlePhase::Concluded
        }
    }

    /// Side that acts first on the current turn. Speeds are re-read every turn
    /// because stage modifiers may have changed.
    fn first_mover(&self, rng: &mut Rng) -> Side {
        let tie_break = match self.config.turn_order {
            TurnOrder::Fixed => return Side::One,
            TurnOrder::BySpeed(tie_break) => tie_break,
        };
        let speed_one = self.sides[0].speed();
        let speed_two = self.sides[1].speed();
        if speed_one > speed_two {
            return Side::One;
        }
        if speed_two > speed_one {
            return Side::Two;
        }
        match tie_break {
            TieBreak::SideOne => Side::One,
            TieBreak::Alternate if self.turn % 2 == 1 => Side::One,
            TieBreak::Alternate => Side::Two,
            TieBreak::CoinFlip if rng.coin_flip() => Side::One,
            TieBreak::CoinFlip => Side::Two,
        }
    }

    fn act(&mut self, attacker: Side, rng: &mut Rng) -> Option<HitOutcome> {
        let [one, two] = &mut self.sides;
        let (attacker_state, defender_state) = match attacker {
            Side::One => (one, two),
            Side::Two => (two, one),
        };
        if !attacker_state.is_standing() {
            return None;
        }
        let outcome = resolve_hit(
            attacker_state.ability,
            &attacker_state.combatant.base_stats,
            &defender_state.combatant.base_stats,
            &attacker_state.modifiers,
            &defender_state.modifiers,
            rng,
        );
        if outcome.hits {
            defender_state.hp = (defender_state.hp - outcome.damage).max(0.0);
            attacker_state.damage_dealt += outcome.damage;
        }
        Some(outcome)
    }

    /// Play one turn. Does nothing once the battle has concluded.
    pub fn step(&mut self, rng: &mut Rng) -> Option<TurnSummary> {
        if self.phase() == BattlePhase::Concluded {
            return None;
        }
        self.turn += 1;
        let first = self.first_mover(rng);
        let mut actions = [None, None];
        actions[first.index()] = self.act(first, rng);
        actions[first.other().index()] = self.act(first.other(), rng);
        Some(TurnSummary {
            turn: self.turn,
            first_mover: first,
            actions,
        })
    }

    pub fn run(mut self, rng: &mut Rng) -> BattleResult {
        while self.step(rng).is_some() {}
        self.into_result()
    }

    fn into_result(self) -> BattleResult {
        let [one, two] = &self.sides;
        let ended_by_turn_cap = one.is_standing() && two.is_standing();
        let (winner, loser) = match decide_winner(one.hp) {
            Side::One => (one, two),
            Side::Two => (two, one),
        };

        let mut damage_dealt = BTreeMap::new();
        for fighter in &self.sides {
            *damage_dealt
                .entry(fighter.combatant.id.clone())
                .or_insert(0.0) += fighter.damage_dealt;
        }

        BattleResult {
            winner: winner.combatant.id.clone(),
            loser: loser.combatant.id.clone(),
            winner_hp_remaining: winner.hp,
            turns_taken: self.turn,
            winner_ability_used: winner.ability.name.clone(),
            loser_ability_used: loser.ability.name.clone(),
            damage_dealt,
            ended_by_turn_cap,
        }
    }
}

/// Run one full battle between `first` (side one) and `second` (side two).
pub fn simulate_battle(
    first: &Combatant,
    second: &Combatant,
    first_ability: usize,
    second_ability: usize,
    config: BattleConfig,
    rng: &mut Rng,
) -> Result<BattleResult> {
    Ok(Battle::new(first, second, first_ability, second_ability, config)?.run(rng))
}
