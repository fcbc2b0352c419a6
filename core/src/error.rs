//! Error types for combat operations
//!
//! Every rejection is local and non-fatal: the battle stays in its last valid
//! state and the acting side keeps its turn.

use core::fmt;

use alloc::string::String;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Errors that can occur while setting up or playing a battle
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CombatError {
    /// Not enough stamina to start a battle
    InsufficientStamina { have: u32, need: u32 },
    /// Target cell already holds a living unit
    OccupiedCell { row: u8, col: u8 },
    /// Skill is still cooling down
    SkillNotReady { skill: String },
    /// Unit has already used a skill this turn
    AlreadyActed,
    /// Unit has already moved this turn
    AlreadyMoved,
    /// Cell is off the board or outside the computed range
    InvalidTarget { row: u8, col: u8 },
    /// The command does not come from the active player unit
    NotYourTurn,
    /// No battle is running
    NoActiveBattle,
    /// A battle is already running
    BattleInProgress,
    /// A unit must be selected first
    NoUnitSelected,
    /// Unit id does not exist in this battle
    UnknownUnit,
    /// Skill index does not exist on the unit
    UnknownSkill,
    /// The roster provider returned no owned characters
    NoOwnedCharacters,
}

impl fmt::Display for CombatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatError::InsufficientStamina { have, need } => {
                write!(f, "Not enough stamina: have {}, need {}", have, need)
            }
            CombatError::OccupiedCell { row, col } => {
                write!(f, "Cell ({}, {}) is occupied", row, col)
            }
            CombatError::SkillNotReady { skill } => write!(f, "{} is on cooldown", skill),
            CombatError::AlreadyActed => f.write_str("Unit has already acted this turn"),
            CombatError::AlreadyMoved => f.write_str("Unit has already moved this turn"),
            CombatError::InvalidTarget { row, col } => {
                write!(f, "Cell ({}, {}) is not a valid target", row, col)
            }
            CombatError::NotYourTurn => f.write_str("It is not this unit's turn"),
            CombatError::NoActiveBattle => f.write_str("No battle in progress"),
            CombatError::BattleInProgress => f.write_str("A battle is already in progress"),
            CombatError::NoUnitSelected => f.write_str("No unit selected"),
            CombatError::UnknownUnit => f.write_str("Unknown unit"),
            CombatError::UnknownSkill => f.write_str("Unknown skill"),
            CombatError::NoOwnedCharacters => f.write_str("No owned characters to field"),
        }
    }
}

/// Result type alias for combat operations
pub type CombatResult<T> = Result<T, CombatError>;
