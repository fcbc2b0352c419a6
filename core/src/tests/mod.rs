mod ai;
mod grid;
mod skills;

use crate::battle::Battle;
use crate::grid::Grid;
use crate::types::*;

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

fn make_unit(name: &str, hp: i32, atk: i32, def: i32, spd: i32, row: u8, col: u8) -> Unit {
    Unit {
        id: UnitId(0),
        name: name.to_string(),
        side: Side::Player,
        hp,
        max_hp: hp,
        atk,
        def,
        spd,
        position: Position::new(row, col),
        skills: vec![Skill::basic_attack()],
        moved: false,
        attacked: false,
        buffs: Vec::new(),
        phase: None,
    }
}

fn with_skill(mut unit: Unit, name: &str, effect: EffectKind, cooldown: u8, range: u8) -> Unit {
    unit.skills.push(Skill::new(name, effect, cooldown, range));
    unit
}

/// Battle on an empty all-floor board, already in progress
fn live_battle(players: Vec<Unit>, enemies: Vec<Unit>) -> Battle {
    let mut battle = Battle::new(Grid::new(), players, enemies);
    battle.begin().expect("test battle should begin");
    battle
}
