//! View types for UI serialization
//!
//! A flat snapshot of the battle for the renderer: JSON through serde, or a
//! compact SCALE blob for the hot path.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::battle::Battle;
use crate::controller::{Selection, SelectionMode};
use crate::grid::{Cell, Hazard, Terrain};
use crate::types::{EffectKind, Position, Skill, StatBuff, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u8,
    pub col: u8,
}

impl From<Position> for CellRef {
    fn from(pos: Position) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub row: u8,
    pub col: u8,
    pub terrain: String,
    pub hazard: Option<String>,
    pub occupant: Option<u32>,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        Self {
            row: cell.position.row,
            col: cell.position.col,
            terrain: match cell.terrain {
                Terrain::Floor => String::from("floor"),
                Terrain::Desk => String::from("desk"),
            },
            hazard: cell.hazard.map(|h| match h {
                Hazard::CrowdNoise => String::from("crowdNoise"),
            }),
            occupant: cell.occupant.map(|id| id.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillView {
    pub name: String,
    pub effect: String,
    pub cooldown_max: u8,
    pub cooldown_remaining: u8,
    pub range: u8,
    pub ready: bool,
}

impl From<&Skill> for SkillView {
    fn from(skill: &Skill) -> Self {
        let effect = match skill.effect {
            EffectKind::SingleTarget => "singleTarget",
            EffectKind::AreaAroundTarget => "areaAroundTarget",
            EffectKind::TeamBuffAtk => "teamBuffAtk",
            EffectKind::TeamBuffDef => "teamBuffDef",
            EffectKind::TeamCooldownReduction => "teamCooldownReduction",
        };
        Self {
            name: skill.name.clone(),
            effect: effect.to_string(),
            cooldown_max: skill.cooldown_max,
            cooldown_remaining: skill.cooldown_remaining,
            range: skill.range,
            ready: skill.is_ready(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffView {
    pub stat: String,
    pub amount: i32,
    pub turns_remaining: u8,
}

impl From<&StatBuff> for BuffView {
    fn from(buff: &StatBuff) -> Self {
        Self {
            stat: buff.stat.label().to_string(),
            amount: buff.amount,
            turns_remaining: buff.turns_remaining,
        }
    }
}

/// A combatant as the renderer sees it: live hp, effective stats
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitView {
    pub id: u32,
    pub name: String,
    pub is_player: bool,
    pub hp: i32,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub row: u8,
    pub col: u8,
    pub alive: bool,
    pub moved: bool,
    pub attacked: bool,
    pub phase: Option<u8>,
    pub skills: Vec<SkillView>,
    pub buffs: Vec<BuffView>,
}

impl From<&Unit> for UnitView {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id.0,
            name: unit.name.clone(),
            is_player: unit.is_player(),
            hp: unit.hp,
            max_hp: unit.max_hp,
            atk: unit.effective_atk(),
            def: unit.effective_def(),
            spd: unit.spd,
            row: unit.position.row,
            col: unit.position.col,
            alive: unit.is_alive(),
            moved: unit.moved,
            attacked: unit.attacked,
            phase: unit.phase,
            skills: unit.skills.iter().map(SkillView::from).collect(),
            buffs: unit.buffs.iter().map(BuffView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub unit: Option<u32>,
    /// "idle", "moving" or "targeting"
    pub mode: String,
    pub skill: Option<u32>,
    pub move_range: Vec<CellRef>,
    pub attack_range: Vec<CellRef>,
    pub cell: Option<CellRef>,
}

impl From<&Selection> for SelectionView {
    fn from(selection: &Selection) -> Self {
        let (mode, skill) = match selection.mode {
            SelectionMode::Idle => ("idle", None),
            SelectionMode::Moving => ("moving", None),
            SelectionMode::Targeting { skill } => ("targeting", Some(skill as u32)),
        };
        Self {
            unit: selection.unit.map(|id| id.0),
            mode: mode.to_string(),
            skill,
            // Move range is only drawn while moving
            move_range: if mode == "moving" {
                selection.move_range.iter().copied().map(CellRef::from).collect()
            } else {
                Vec::new()
            },
            attack_range: selection.attack_range.iter().copied().map(CellRef::from).collect(),
            cell: selection.cell.map(CellRef::from),
        }
    }
}

/// The complete battle view sent to the frontend
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleView {
    /// "setup", "inProgress", "victory" or "defeat"
    pub state: String,
    pub round: u32,
    pub active_unit: Option<u32>,
    pub turn_order: Vec<u32>,
    pub cells: Vec<CellView>,
    pub units: Vec<UnitView>,
    pub selection: SelectionView,
    pub ai_in_flight: bool,
    pub log: Vec<String>,
}

impl BattleView {
    pub fn new(battle: Option<&Battle>, selection: &Selection, ai_in_flight: bool) -> Self {
        let selection = SelectionView::from(selection);
        let Some(battle) = battle else {
            return Self {
                state: String::from("setup"),
                round: 0,
                active_unit: None,
                turn_order: Vec::new(),
                cells: Vec::new(),
                units: Vec::new(),
                selection,
                ai_in_flight,
                log: Vec::new(),
            };
        };
        Self {
            state: battle.state.as_str().to_string(),
            round: battle.round,
            active_unit: battle.active_unit_id().map(|id| id.0),
            turn_order: battle.turn_order.iter().map(|id| id.0).collect(),
            cells: battle.grid.cells().iter().map(CellView::from).collect(),
            units: battle.units.iter().map(UnitView::from).collect(),
            selection,
            ai_in_flight,
            log: battle.log_lines(),
        }
    }

    pub fn unit(&self, id: u32) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }
}
