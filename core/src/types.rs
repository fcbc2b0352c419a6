use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::config::{ATK_BUFF_PERCENT, ATK_BUFF_TURNS, BASIC_ATTACK_RADIUS, DEF_BUFF_PERCENT, DEF_BUFF_TURNS};

/// Identifier of a unit inside one battle (its slot in `Battle::units`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// |Δrow| + |Δcol|
    pub fn distance(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }
}

/// Which team a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// What a skill does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    /// Damage the occupant of the chosen cell
    SingleTarget,
    /// Damage every opponent around the chosen cell
    AreaAroundTarget,
    /// Raise every living ally's attack
    TeamBuffAtk,
    /// Raise every living ally's defense
    TeamBuffDef,
    /// Shave one turn off every other living ally's cooldowns
    TeamCooldownReduction,
}

impl EffectKind {
    /// Whether the effect deals damage
    pub fn is_offensive(self) -> bool {
        matches!(self, EffectKind::SingleTarget | EffectKind::AreaAroundTarget)
    }
}

/// A combat skill with its cooldown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub cooldown_max: u8,
    pub cooldown_remaining: u8,
    pub effect: EffectKind,
    /// Manhattan reach when choosing the target cell
    pub range: u8,
}

impl Skill {
    pub fn new(name: &str, effect: EffectKind, cooldown_max: u8, range: u8) -> Self {
        Self {
            name: name.to_string(),
            cooldown_max,
            cooldown_remaining: 0,
            effect,
            range,
        }
    }

    /// The attack every unit carries in slot 0
    pub fn basic_attack() -> Self {
        Self::new("Basic Attack", EffectKind::SingleTarget, 0, BASIC_ATTACK_RADIUS)
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Count down by one owner turn, floored at zero
    pub fn tick(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Atk,
    Def,
}

impl StatKind {
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Atk => "ATK",
            StatKind::Def => "DEF",
        }
    }

    pub fn buff_percent(self) -> i32 {
        match self {
            StatKind::Atk => ATK_BUFF_PERCENT,
            StatKind::Def => DEF_BUFF_PERCENT,
        }
    }

    pub fn buff_turns(self) -> u8 {
        match self {
            StatKind::Atk => ATK_BUFF_TURNS,
            StatKind::Def => DEF_BUFF_TURNS,
        }
    }
}

/// A timed flat bonus to one stat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBuff {
    pub stat: StatKind,
    pub amount: i32,
    pub turns_remaining: u8,
}

/// A combatant on the battlefield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    pub hp: i32,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub position: Position,
    pub skills: Vec<Skill>,
    pub moved: bool,
    pub attacked: bool,
    pub buffs: Vec<StatBuff>,
    /// Set for bosses only: 1 or 2
    pub phase: Option<u8>,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    pub fn is_boss(&self) -> bool {
        self.phase.is_some()
    }

    fn buff_total(&self, stat: StatKind) -> i32 {
        self.buffs
            .iter()
            .filter(|b| b.stat == stat)
            .map(|b| b.amount)
            .sum()
    }

    /// Attack including active buffs
    pub fn effective_atk(&self) -> i32 {
        self.atk.saturating_add(self.buff_total(StatKind::Atk))
    }

    /// Defense including active buffs
    pub fn effective_def(&self) -> i32 {
        self.def.saturating_add(self.buff_total(StatKind::Def))
    }

    /// Subtract damage, clamping hp to [0, max_hp]. Returns the damage dealt.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0).min(self.hp);
        self.hp -= amount;
        amount
    }

    /// Attach a buff, refreshing an existing one on the same stat
    pub fn apply_buff(&mut self, buff: StatBuff) {
        self.buffs.retain(|b| b.stat != buff.stat);
        self.buffs.push(buff);
    }

    /// Count skills and buffs down by one owner turn. Returns the stats whose buffs ran out.
    pub fn end_own_turn(&mut self) -> Vec<StatKind> {
        for skill in self.skills.iter_mut() {
            skill.tick();
        }
        let mut expired = Vec::new();
        for buff in self.buffs.iter_mut() {
            buff.turns_remaining = buff.turns_remaining.saturating_sub(1);
            if buff.turns_remaining == 0 {
                expired.push(buff.stat);
            }
        }
        self.buffs.retain(|b| b.turns_remaining > 0);
        expired
    }
}
