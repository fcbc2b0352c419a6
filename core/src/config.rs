use serde::{Deserialize, Serialize};

/// Board width and height
pub const GRID_SIZE: u8 = 5;
/// Starting cells on the back row hold at most this many player units
pub const MAX_TEAM_SIZE: usize = 3;
/// How far a unit may move in one turn (Manhattan distance)
pub const MOVE_RADIUS: u8 = 2;
/// Reach of a basic attack
pub const BASIC_ATTACK_RADIUS: u8 = 1;
/// Radius of the blast around an area skill's chosen cell
pub const AREA_EFFECT_RADIUS: u8 = 1;
/// Defense value at which damage reaches zero
pub const DEFENSE_SCALE: i64 = 300;
/// Chance for a cell to be a desk
pub const DESK_CHANCE_PERCENT: u32 = 20;
/// Chance for a cell to carry a hazard
pub const HAZARD_CHANCE_PERCENT: u32 = 10;
/// Boss enters phase two below this share of max hp
pub const BOSS_PHASE_THRESHOLD_PERCENT: i64 = 30;
/// Area skills hit for 150% of attack
pub const AREA_DAMAGE_PERCENT: i64 = 150;
/// Team attack buff
pub const ATK_BUFF_PERCENT: i32 = 10;
/// Team defense buff
pub const DEF_BUFF_PERCENT: i32 = 20;
/// Owner turn-ends an attack buff survives
pub const ATK_BUFF_TURNS: u8 = 3;
/// Owner turn-ends a defense buff survives
pub const DEF_BUFF_TURNS: u8 = 4;

/// Tunables consumed by the battle controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleConfig {
    /// Stamina deducted to start a battle
    pub stamina_cost: u32,
    /// Credits granted on victory
    pub victory_credits: u32,
    /// Story chapter unlocked on victory
    pub victory_chapter: u32,
    /// Maximum number of owned characters fielded, capped at [`MAX_TEAM_SIZE`]
    pub max_team_size: usize,
    /// Pause before an enemy moves
    pub ai_move_delay_ms: u32,
    /// Pause between an enemy's move and its attack
    pub ai_attack_delay_ms: u32,
    /// Pause before an enemy's turn ends
    pub ai_end_delay_ms: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            stamina_cost: 15,
            victory_credits: 500,
            victory_chapter: 11,
            max_team_size: 3,
            ai_move_delay_ms: 1000,
            ai_attack_delay_ms: 800,
            ai_end_delay_ms: 500,
        }
    }
}
