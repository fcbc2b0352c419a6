use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::MOVE_RADIUS;
use crate::error::{CombatError, CombatResult};
use crate::grid::Grid;
use crate::range::{contains, move_range};
use crate::types::{Position, Side, StatKind, Unit, UnitId};

/// Lifecycle of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BattleState {
    Setup,
    InProgress,
    Victory,
    Defeat,
}

impl BattleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BattleState::Victory | BattleState::Defeat)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BattleState::Setup => "setup",
            BattleState::InProgress => "inProgress",
            BattleState::Victory => "victory",
            BattleState::Defeat => "defeat",
        }
    }
}

/// One hit of an area skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    pub target: UnitId,
    pub target_name: String,
    pub damage: i32,
    pub remaining_hp: i32,
}

/// Entries of the battle log, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BattleEvent {
    #[serde(rename_all = "camelCase")]
    BattleStart { boss_name: String },
    #[serde(rename_all = "camelCase")]
    Moved { unit: UnitId, name: String, to: Position },
    #[serde(rename_all = "camelCase")]
    Attack {
        attacker: String,
        target: String,
        skill: String,
        damage: i32,
        remaining_hp: i32,
    },
    #[serde(rename_all = "camelCase")]
    Whiff { attacker: String, skill: String },
    #[serde(rename_all = "camelCase")]
    AreaAttack {
        attacker: String,
        skill: String,
        hits: Vec<Hit>,
    },
    #[serde(rename_all = "camelCase")]
    TeamBuff {
        source: String,
        skill: String,
        stat: StatKind,
        percent: i32,
        turns: u8,
    },
    #[serde(rename_all = "camelCase")]
    BuffExpired { name: String, stat: StatKind },
    #[serde(rename_all = "camelCase")]
    CooldownsReduced { source: String, skill: String },
    #[serde(rename_all = "camelCase")]
    NoTarget { name: String },
    #[serde(rename_all = "camelCase")]
    NoReadySkill { name: String },
    #[serde(rename_all = "camelCase")]
    KnockedOut { name: String },
    #[serde(rename_all = "camelCase")]
    PhaseTransition { name: String, phase: u8 },
    #[serde(rename_all = "camelCase")]
    RoundStart { round: u32 },
    #[serde(rename_all = "camelCase")]
    Victory { credits: u32 },
    Defeat,
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::BattleStart { boss_name } => {
                write!(f, "Battle begins! Face {} in the final showdown!", boss_name)
            }
            BattleEvent::Moved { name, to, .. } => {
                write!(f, "{} moved to position ({}, {}).", name, to.row, to.col)
            }
            BattleEvent::Attack {
                attacker,
                target,
                skill,
                damage,
                ..
            } => write!(f, "{} hits {} with {} for {} damage!", attacker, target, skill, damage),
            BattleEvent::Whiff { attacker, skill } => {
                write!(f, "{} uses {} but hits nothing.", attacker, skill)
            }
            BattleEvent::AreaAttack {
                attacker,
                skill,
                hits,
            } => {
                if hits.is_empty() {
                    return write!(f, "{} unleashes {} but hits nothing.", attacker, skill);
                }
                write!(f, "{} unleashes {}:", attacker, skill)?;
                for hit in hits {
                    write!(f, " {} takes {} damage.", hit.target_name, hit.damage)?;
                }
                Ok(())
            }
            BattleEvent::TeamBuff {
                source,
                skill,
                stat,
                percent,
                turns,
            } => write!(
                f,
                "{} uses {}! Team {} increased by {}% for {} turns!",
                source,
                skill,
                stat.label(),
                percent,
                turns
            ),
            BattleEvent::BuffExpired { name, stat } => {
                write!(f, "{}'s {} boost wears off.", name, stat.label())
            }
            BattleEvent::CooldownsReduced { source, skill } => {
                write!(f, "{} uses {}! Team cooldowns reduced by 1.", source, skill)
            }
            BattleEvent::NoTarget { name } => write!(f, "{} couldn't find a target.", name),
            BattleEvent::NoReadySkill { name } => write!(f, "{} has no skill ready.", name),
            BattleEvent::KnockedOut { name } => write!(f, "{} is knocked out!", name),
            BattleEvent::PhaseTransition { name, phase } => write!(
                f,
                "{} enters phase {}: Creative Block! Defense reduced!",
                name, phase
            ),
            BattleEvent::RoundStart { round } => write!(f, "--- Round {} Begins ---", round),
            BattleEvent::Victory { credits } => {
                write!(f, "Victory! Earned {} credits.", credits)
            }
            BattleEvent::Defeat => f.write_str("Defeat... the team has fallen."),
        }
    }
}

/// A single encounter: board, combatants, turn bookkeeping and log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    pub grid: Grid,
    /// All combatants; knocked-out units stay here for history
    pub units: Vec<Unit>,
    /// Speed-sorted acting order, fixed for the whole battle
    pub turn_order: Vec<UnitId>,
    pub current_index: usize,
    pub round: u32,
    pub log: Vec<BattleEvent>,
    pub state: BattleState,
}

impl Battle {
    /// Build a battle in `Setup`: ids are assigned in insertion order, players first.
    ///
    /// Each unit's `position` is its requested starting cell.
    pub fn new(grid: Grid, players: Vec<Unit>, enemies: Vec<Unit>) -> Self {
        let units = players
            .into_iter()
            .map(|mut u| {
                u.side = Side::Player;
                u
            })
            .chain(enemies.into_iter().map(|mut u| {
                u.side = Side::Enemy;
                u
            }))
            .enumerate()
            .map(|(i, mut u)| {
                u.id = UnitId(i as u32);
                u
            })
            .collect();

        Self {
            grid,
            units,
            turn_order: Vec::new(),
            current_index: 0,
            round: 1,
            log: Vec::new(),
            state: BattleState::Setup,
        }
    }

    /// Place every unit on its starting cell, compute the turn order, and go live
    pub fn begin(&mut self) -> CombatResult<()> {
        if self.state != BattleState::Setup {
            return Err(CombatError::BattleInProgress);
        }
        for unit in self.units.iter_mut() {
            let start = unit.position;
            self.grid.place_unit(unit, start)?;
        }
        self.turn_order = crate::turns::compute_turn_order(&self.units);
        self.current_index = 0;
        self.round = 1;
        if let Some(boss) = self.units.iter().find(|u| u.is_boss()) {
            self.log.push(BattleEvent::BattleStart {
                boss_name: boss.name.clone(),
            });
        }
        self.state = BattleState::InProgress;
        Ok(())
    }

    pub fn unit(&self, id: UnitId) -> CombatResult<&Unit> {
        self.units.get(id.index()).ok_or(CombatError::UnknownUnit)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> CombatResult<&mut Unit> {
        self.units.get_mut(id.index()).ok_or(CombatError::UnknownUnit)
    }

    /// Living unit on `pos`, if any
    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.grid
            .occupant(pos)
            .and_then(|id| self.units.get(id.index()))
            .filter(|u| u.is_alive())
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.side == side && u.is_alive())
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == BattleState::InProgress
    }

    /// Move a unit within its move range, marking it as moved
    pub fn move_unit(&mut self, id: UnitId, to: Position) -> CombatResult<()> {
        if !self.is_in_progress() {
            return Err(CombatError::NoActiveBattle);
        }
        let unit = self.unit(id)?;
        if !unit.is_alive() {
            return Err(CombatError::UnknownUnit);
        }
        if unit.moved {
            return Err(CombatError::AlreadyMoved);
        }
        if !Grid::in_bounds(to) {
            return Err(CombatError::InvalidTarget {
                row: to.row,
                col: to.col,
            });
        }
        if self.grid.occupant(to).is_some_and(|o| o != id) {
            return Err(CombatError::OccupiedCell {
                row: to.row,
                col: to.col,
            });
        }
        if !contains(&move_range(&self.grid, unit.position, MOVE_RADIUS), to) {
            return Err(CombatError::InvalidTarget {
                row: to.row,
                col: to.col,
            });
        }

        let unit = &mut self.units[id.index()];
        self.grid.place_unit(unit, to)?;
        unit.moved = true;
        let event = BattleEvent::Moved {
            unit: id,
            name: unit.name.clone(),
            to,
        };
        self.log.push(event);
        Ok(())
    }

    /// Take knocked-out units off the board and log them
    pub(crate) fn clear_fallen(&mut self) {
        for i in 0..self.units.len() {
            let unit = &self.units[i];
            if unit.is_alive() || self.grid.occupant(unit.position) != Some(unit.id) {
                continue;
            }
            self.grid.remove_unit(unit);
            let name = unit.name.clone();
            self.log.push(BattleEvent::KnockedOut { name });
        }
    }

    /// Settle Victory/Defeat if one side has no living units
    pub fn check_outcome(&mut self) -> BattleState {
        if self.state != BattleState::InProgress {
            return self.state;
        }
        if self.living(Side::Player).next().is_none() {
            self.state = BattleState::Defeat;
        } else if self.living(Side::Enemy).next().is_none() {
            self.state = BattleState::Victory;
        }
        self.state
    }

    /// Render the log as display strings
    pub fn log_lines(&self) -> Vec<String> {
        use alloc::string::ToString;
        self.log.iter().map(|e| e.to_string()).collect()
    }
}
